use super::channel::Channel;
use super::topology::DeadLetterConfig;
use crate::error::MessagingResult;
use crate::message::keys;
use crate::transport::Delivery;
use chrono::{SecondsFormat, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// 死信重放：由运维触发的唯一重投路径
///
/// 从 `<queue>.<queue_suffix>` 逐条拉取，保留消息 ID 与元数据，
/// 写入 `replayed_at` 并递增 `replay_count` 后经默认交换机发回 `<queue>`，
/// 发布成功后才确认死信副本。
/// 同一次重放中再次取到已重放过的消息 ID 时停止，
/// 避免仍在失败的消费者把消息重新停放后被无限循环重放。
pub struct DeadLetterReplayer {
    channel: Arc<dyn Channel>,
    dead_letter: DeadLetterConfig,
}

impl DeadLetterReplayer {
    pub fn new(channel: Arc<dyn Channel>, dead_letter: DeadLetterConfig) -> Self {
        Self {
            channel,
            dead_letter,
        }
    }

    /// 返回重放条数；`limit` 为空时清空整个死信队列
    pub async fn replay(&self, queue: &str, limit: Option<usize>) -> MessagingResult<usize> {
        let dlq = self.dead_letter.queue_for(queue);
        let mut seen = HashSet::new();
        let mut replayed = 0;

        while limit.is_none_or(|limit| replayed < limit) {
            let Some(Delivery {
                mut message, acker, ..
            }) = self.channel.basic_get(&dlq).await?
            else {
                break;
            };

            if !seen.insert(message.uuid.clone()) {
                info!(queue, message_id = %message.uuid, "dead letter parked again during replay, stopping");
                acker.reject(true).await?;
                break;
            }

            let count = message
                .metadata(keys::REPLAY_COUNT)
                .and_then(|c| c.parse::<u32>().ok())
                .unwrap_or(0)
                .saturating_add(1);
            message.set_metadata(
                keys::REPLAYED_AT,
                Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            );
            message.set_metadata(keys::REPLAY_COUNT, count.to_string());
            let message_id = message.uuid.clone();

            if let Err(err) = self.channel.basic_publish("", queue, message).await {
                warn!(queue, %message_id, error = %err, "replay publish failed, returning message to dead letter queue");
                acker.reject(true).await?;
                return Err(err);
            }
            acker.ack().await?;

            info!(queue, %message_id, replay_count = count, "dead letter replayed");
            replayed += 1;
        }

        Ok(replayed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amqp::{ExchangeKind, FieldTable, InMemoryBroker, TopologyChannel};
    use crate::message::Message;
    use crate::transport::DeliveryStream;
    use async_trait::async_trait;

    /// 重放发布立即回到死信队列，模拟持续失败的消费者
    struct Reparking(InMemoryBroker);

    #[async_trait]
    impl TopologyChannel for Reparking {
        async fn exchange_declare(
            &self,
            name: &str,
            kind: ExchangeKind,
            durable: bool,
        ) -> MessagingResult<()> {
            self.0.exchange_declare(name, kind, durable).await
        }

        async fn queue_declare(
            &self,
            name: &str,
            durable: bool,
            arguments: FieldTable,
        ) -> MessagingResult<()> {
            self.0.queue_declare(name, durable, arguments).await
        }

        async fn queue_bind(
            &self,
            queue: &str,
            exchange: &str,
            routing_key: &str,
        ) -> MessagingResult<()> {
            self.0.queue_bind(queue, exchange, routing_key).await
        }
    }

    #[async_trait]
    impl Channel for Reparking {
        async fn basic_publish(
            &self,
            exchange: &str,
            routing_key: &str,
            message: Message,
        ) -> MessagingResult<()> {
            let parked = format!("{routing_key}.dlq");
            self.0.basic_publish(exchange, &parked, message).await
        }

        async fn basic_consume(
            &self,
            queue: &str,
            consumer_tag: &str,
        ) -> MessagingResult<DeliveryStream> {
            self.0.basic_consume(queue, consumer_tag).await
        }

        async fn basic_get(&self, queue: &str) -> MessagingResult<Option<Delivery>> {
            self.0.basic_get(queue).await
        }

        async fn close(&self) -> MessagingResult<()> {
            self.0.close().await
        }
    }

    #[tokio::test]
    async fn stops_when_replayed_messages_come_back() {
        let broker = InMemoryBroker::new();
        broker
            .queue_declare("orders.dlq", true, FieldTable::new())
            .await
            .unwrap();
        for body in ["a", "b", "c"] {
            broker
                .basic_publish("", "orders.dlq", Message::new(body.as_bytes().to_vec()))
                .await
                .unwrap();
        }

        let replayer =
            DeadLetterReplayer::new(Arc::new(Reparking(broker.clone())), Default::default());
        let replayed = replayer.replay("orders", None).await.unwrap();

        assert_eq!(replayed, 3);
        let parked = broker.ready_messages("orders.dlq");
        assert_eq!(parked.len(), 3);
        assert!(
            parked
                .iter()
                .all(|m| m.metadata(keys::REPLAY_COUNT) == Some("1"))
        );
    }

    #[tokio::test]
    async fn replay_count_saturates() {
        let broker = InMemoryBroker::new();
        for queue in ["orders", "orders.dlq"] {
            broker.queue_declare(queue, true, FieldTable::new()).await.unwrap();
        }
        let mut message = Message::new(b"x".to_vec());
        message.set_metadata(keys::REPLAY_COUNT, u32::MAX.to_string());
        broker.basic_publish("", "orders.dlq", message).await.unwrap();

        let replayer = DeadLetterReplayer::new(Arc::new(broker.clone()), Default::default());
        assert_eq!(replayer.replay("orders", None).await.unwrap(), 1);

        let requeued = broker.ready_messages("orders");
        let max = u32::MAX.to_string();
        assert_eq!(requeued[0].metadata(keys::REPLAY_COUNT), Some(max.as_str()));
    }
}
