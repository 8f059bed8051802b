use crate::{context::AppContext, error::AppError, query::Query};
use async_trait::async_trait;

#[async_trait]
pub trait QueryHandler<Q>: Send + Sync
where
    Q: Query,
{
    async fn handle(&self, ctx: &AppContext, q: Q) -> Result<Q::Dto, AppError>;

    /// 判别谓词：同一查询类型注册了多个处理器时，按注册顺序选取第一个返回 true 的处理器
    fn supports(&self, _q: &Q) -> bool {
        true
    }
}
