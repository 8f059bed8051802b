use crate::{context::AppContext, error::AppError, query::Query};
use async_trait::async_trait;

/// 查询总线（Query Bus）
///
/// - 根据查询类型定位处理器，并原样返回其结果或错误；
/// - 没有处理器时返回 `HandlerNotFound`，绝不静默返回空值；
/// - 总线自身不施加超时，超时策略由调用方负责。
#[async_trait]
pub trait QueryBus: Send + Sync {
    async fn execute<Q>(&self, ctx: &AppContext, q: Q) -> Result<Q::Dto, AppError>
    where
        Q: Query;
}
