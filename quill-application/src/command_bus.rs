use crate::{command::Command, context::AppContext, error::AppError};
use async_trait::async_trait;

/// 命令总线（Command Bus）
///
/// - 单向发送，不提供结果通道：返回 `Ok` 仅表示消息已被代理接受，
///   不代表任何处理器已经执行（至少一次、最终一致）；
/// - 仅在本地失败时返回错误：主题推导、序列化或传输发布失败；
/// - 该 trait 带有泛型方法，通常以具体实现类型注入使用。
#[async_trait]
pub trait CommandBus: Send + Sync {
    async fn send<C>(&self, ctx: &AppContext, cmd: C) -> Result<(), AppError>
    where
        C: Command;
}
