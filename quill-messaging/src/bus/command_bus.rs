use crate::codec::EnvelopeCodec;
use crate::topic::TopicKind;
use crate::transport::Publisher;
use async_trait::async_trait;
use quill_application::command::Command;
use quill_application::command_bus::CommandBus;
use quill_application::context::AppContext;
use quill_application::error::AppError;
use std::sync::Arc;
use tracing::debug;

/// 经消息代理单向发送命令
pub struct BrokerCommandBus {
    publisher: Arc<dyn Publisher>,
    codec: EnvelopeCodec,
}

impl BrokerCommandBus {
    pub fn new(publisher: Arc<dyn Publisher>) -> Self {
        Self {
            publisher,
            codec: EnvelopeCodec,
        }
    }
}

#[async_trait]
impl CommandBus for BrokerCommandBus {
    async fn send<C>(&self, ctx: &AppContext, cmd: C) -> Result<(), AppError>
    where
        C: Command,
    {
        let topic = TopicKind::Command.topic(C::NAME)?;
        let message = self
            .codec
            .encode(TopicKind::Command, C::NAME, &ctx.biz, &cmd)?;
        let message_id = message.uuid.clone();

        self.publisher.publish(&topic, message).await?;
        debug!(%topic, %message_id, "command sent");
        Ok(())
    }
}
