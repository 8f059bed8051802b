use super::channel::{Channel, ExchangeKind};
use super::layout::QueueLayout;
use super::topology::TopologyBuilder;
use crate::error::MessagingResult;
use crate::message::Message;
use crate::transport::Publisher;
use async_trait::async_trait;
use dashmap::DashSet;
use std::sync::Arc;
use tracing::debug;

/// 通道之上的发布者
///
/// 首次发布某主题前声明其拓扑：
/// - 持久队列布局声明完整拓扑（含死信），消费者启动前发送的命令得以保留；
/// - 扇出布局只声明 fanout 交换机，没有订阅队列的事件由代理丢弃。
pub struct AmqpPublisher {
    channel: Arc<dyn Channel>,
    topology: TopologyBuilder,
    layout: QueueLayout,
    declared: DashSet<String>,
}

impl AmqpPublisher {
    pub fn new(channel: Arc<dyn Channel>, topology: TopologyBuilder, layout: QueueLayout) -> Self {
        Self {
            channel,
            topology,
            layout,
            declared: DashSet::new(),
        }
    }

    async fn ensure_declared(&self, topic: &str) -> MessagingResult<()> {
        if self.declared.contains(topic) {
            return Ok(());
        }

        match self.layout {
            QueueLayout::Durable => {
                let params = self.layout.params(topic, "");
                self.topology.build(self.channel.as_ref(), &params).await?;
            }
            QueueLayout::FanOut => {
                self.channel
                    .exchange_declare(topic, ExchangeKind::Fanout, true)
                    .await?;
            }
        }

        debug!(topic, layout = ?self.layout, "publish topology declared");
        self.declared.insert(topic.to_owned());
        Ok(())
    }
}

#[async_trait]
impl Publisher for AmqpPublisher {
    async fn publish(&self, topic: &str, message: Message) -> MessagingResult<()> {
        self.ensure_declared(topic).await?;
        let (exchange, routing_key) = self.layout.publish_target(topic);
        self.channel
            .basic_publish(&exchange, &routing_key, message)
            .await
    }
}
