use super::channel::Channel;
use super::layout::QueueLayout;
use super::topology::TopologyBuilder;
use crate::error::MessagingResult;
use crate::transport::{DeliveryStream, Subscriber};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// 通道之上的订阅者：先按布局声明拓扑，再开始消费
pub struct AmqpSubscriber {
    channel: Arc<dyn Channel>,
    topology: TopologyBuilder,
    layout: QueueLayout,
}

impl AmqpSubscriber {
    pub fn new(channel: Arc<dyn Channel>, topology: TopologyBuilder, layout: QueueLayout) -> Self {
        Self {
            channel,
            topology,
            layout,
        }
    }
}

#[async_trait]
impl Subscriber for AmqpSubscriber {
    async fn subscribe(&self, topic: &str, consumer_group: &str) -> MessagingResult<DeliveryStream> {
        let params = self.layout.params(topic, consumer_group);
        let topology = self.topology.build(self.channel.as_ref(), &params).await?;
        let consumer_tag = format!("{}.consumer", topology.queue);

        debug!(topic, consumer_group, queue = %topology.queue, "subscribing");
        self.channel.basic_consume(&topology.queue, &consumer_tag).await
    }
}
