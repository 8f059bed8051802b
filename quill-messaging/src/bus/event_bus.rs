use crate::codec::EnvelopeCodec;
use crate::topic::TopicKind;
use crate::transport::Publisher;
use async_trait::async_trait;
use quill_domain::domain_event::BusinessContext;
use quill_domain::error::DomainResult;
use quill_domain::eventing::{EventBus, SerializedEvent};
use std::sync::Arc;
use tracing::debug;

/// 经消息代理广播领域事件；消息 ID 沿用事件 ID
pub struct BrokerEventBus {
    publisher: Arc<dyn Publisher>,
    codec: EnvelopeCodec,
}

impl BrokerEventBus {
    pub fn new(publisher: Arc<dyn Publisher>) -> Self {
        Self {
            publisher,
            codec: EnvelopeCodec,
        }
    }
}

#[async_trait]
impl EventBus for BrokerEventBus {
    async fn publish(&self, ctx: &BusinessContext, event: &SerializedEvent) -> DomainResult<()> {
        let topic = TopicKind::Event.topic(event.event_type())?;
        let message = self.codec.encode_event(event, ctx)?;

        self.publisher.publish(&topic, message).await?;
        debug!(%topic, message_id = event.event_id(), "event published");
        Ok(())
    }
}
