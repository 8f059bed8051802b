//! 事件总线（EventBus）协议
//!
//! 发布失败必须返回给调用方：命令处理器会把它作为自身错误返回，
//! 使命令消息被拒绝并进入死信队列。
//!
use super::SerializedEvent;
use crate::{domain_event::BusinessContext, error::DomainResult as Result};
use async_trait::async_trait;

#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, ctx: &BusinessContext, event: &SerializedEvent) -> Result<()>;
}
