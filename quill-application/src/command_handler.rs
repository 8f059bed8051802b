use crate::{command::Command, context::AppContext, error::AppError};
use async_trait::async_trait;
use quill_domain::domain_event::DomainEvent;
use quill_domain::eventing::{EventBus, SerializedEvent};

/// 命令处理器
///
/// 投递语义为至少一次，处理器需自行去重（例如创建前先检查是否存在）。
/// 返回任何错误都会使消息被拒绝并进入死信队列；希望“确认但跳过”的情形应返回 `Ok(())`。
#[async_trait]
pub trait CommandHandler<C>: Send + Sync
where
    C: Command,
{
    async fn handle(&self, ctx: &AppContext, cmd: C) -> Result<(), AppError>;
}

/// 在存储写入成功后发布领域事件；发布失败作为处理器自身的错误返回
pub async fn publish_event<E>(bus: &dyn EventBus, ctx: &AppContext, event: &E) -> Result<(), AppError>
where
    E: DomainEvent,
{
    let serialized = SerializedEvent::from_event(event)?;
    bus.publish(&ctx.biz, &serialized).await?;
    Ok(())
}
