//! 事件处理器（EventHandler）
//!
//! 同一事件可注册任意数量的处理器；每个处理器拥有独立的订阅队列，
//! 因此 `handler_name` 在同一事件内必须唯一。
//!
use crate::domain_event::{BusinessContext, DomainEvent};
use async_trait::async_trait;

#[async_trait]
pub trait EventHandler<E>: Send + Sync
where
    E: DomainEvent,
{
    /// 处理器名称（参与订阅队列命名与日志）
    fn handler_name(&self) -> &str;

    /// 处理事件；返回错误时消息被拒绝且不重新入队
    async fn handle(&self, ctx: &BusinessContext, event: E) -> anyhow::Result<()>;
}
