//! lapin 适配：在真实 AMQP 0.9.1 连接上实现 `Channel`
//!
//! 消息 ID 对应 `message_id` 属性，元数据对应字符串头；
//! 持久化投递模式，内容类型 `application/json`。
//!
use super::channel::{Channel, ExchangeKind, FieldTable, FieldValue, TopologyChannel};
use crate::error::{MessagingError, MessagingResult};
use crate::message::{Message, Metadata};
use crate::transport::{Acknowledger, Delivery, DeliveryStream};
use async_trait::async_trait;
use futures_util::StreamExt;
use lapin::acker::Acker;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicGetOptions, BasicPublishOptions,
    BasicRejectOptions, ExchangeDeclareOptions, QueueBindOptions, QueueDeclareOptions,
};
use lapin::types::{AMQPValue, FieldTable as AmqpTable, LongString, ShortString};
use lapin::{BasicProperties, Connection, ConnectionProperties};
use tracing::info;

const PERSISTENT: u8 = 2;

fn transport(err: lapin::Error) -> MessagingError {
    MessagingError::Transport(err.to_string())
}

pub struct LapinChannel {
    // 连接随通道一同持有，避免被提前释放
    _connection: Connection,
    channel: lapin::Channel,
}

impl LapinChannel {
    pub async fn connect(uri: &str) -> MessagingResult<Self> {
        let connection = Connection::connect(uri, ConnectionProperties::default())
            .await
            .map_err(transport)?;
        let channel = connection.create_channel().await.map_err(transport)?;
        info!(channel_id = channel.id(), "amqp channel opened");
        Ok(Self {
            _connection: connection,
            channel,
        })
    }
}

fn to_amqp_table(table: &FieldTable) -> AmqpTable {
    let mut out = AmqpTable::default();
    for (key, value) in table {
        let value = match value {
            FieldValue::Str(s) => AMQPValue::LongString(LongString::from(s.as_str())),
            FieldValue::Bool(b) => AMQPValue::Boolean(*b),
            FieldValue::Int(i) => AMQPValue::LongLongInt(*i),
        };
        out.insert(ShortString::from(key.as_str()), value);
    }
    out
}

fn metadata_of(headers: &Option<AmqpTable>) -> Metadata {
    headers
        .iter()
        .flat_map(|table| table.inner().iter())
        .filter_map(|(key, value)| match value {
            AMQPValue::LongString(s) => Some((
                key.as_str().to_owned(),
                String::from_utf8_lossy(s.as_bytes()).into_owned(),
            )),
            AMQPValue::ShortString(s) => Some((key.as_str().to_owned(), s.as_str().to_owned())),
            _ => None,
        })
        .collect()
}

fn to_delivery(delivery: lapin::message::Delivery) -> Delivery {
    let uuid = delivery
        .properties
        .message_id()
        .as_ref()
        .map(|id| id.as_str().to_owned())
        .unwrap_or_default();
    let message = Message {
        uuid,
        payload: delivery.data,
        metadata: metadata_of(delivery.properties.headers()),
    };

    Delivery {
        message,
        redelivered: delivery.redelivered,
        acker: Box::new(LapinAcker(delivery.acker)),
    }
}

struct LapinAcker(Acker);

#[async_trait]
impl Acknowledger for LapinAcker {
    async fn ack(&self) -> MessagingResult<()> {
        self.0.ack(BasicAckOptions::default()).await.map_err(transport)
    }

    async fn reject(&self, requeue: bool) -> MessagingResult<()> {
        self.0
            .reject(BasicRejectOptions { requeue })
            .await
            .map_err(transport)
    }
}

#[async_trait]
impl TopologyChannel for LapinChannel {
    async fn exchange_declare(
        &self,
        name: &str,
        kind: ExchangeKind,
        durable: bool,
    ) -> MessagingResult<()> {
        let kind = match kind {
            ExchangeKind::Direct => lapin::ExchangeKind::Direct,
            ExchangeKind::Fanout => lapin::ExchangeKind::Fanout,
        };
        let options = ExchangeDeclareOptions {
            durable,
            ..Default::default()
        };
        self.channel
            .exchange_declare(name, kind, options, AmqpTable::default())
            .await
            .map_err(transport)
    }

    async fn queue_declare(
        &self,
        name: &str,
        durable: bool,
        arguments: FieldTable,
    ) -> MessagingResult<()> {
        let options = QueueDeclareOptions {
            durable,
            ..Default::default()
        };
        self.channel
            .queue_declare(name, options, to_amqp_table(&arguments))
            .await
            .map(|_| ())
            .map_err(transport)
    }

    async fn queue_bind(&self, queue: &str, exchange: &str, routing_key: &str) -> MessagingResult<()> {
        self.channel
            .queue_bind(
                queue,
                exchange,
                routing_key,
                QueueBindOptions::default(),
                AmqpTable::default(),
            )
            .await
            .map_err(transport)
    }
}

#[async_trait]
impl Channel for LapinChannel {
    async fn basic_publish(
        &self,
        exchange: &str,
        routing_key: &str,
        message: Message,
    ) -> MessagingResult<()> {
        let mut headers = AmqpTable::default();
        for (key, value) in &message.metadata {
            headers.insert(
                ShortString::from(key.as_str()),
                AMQPValue::LongString(LongString::from(value.as_str())),
            );
        }
        let properties = BasicProperties::default()
            .with_message_id(ShortString::from(message.uuid.as_str()))
            .with_content_type(ShortString::from("application/json"))
            .with_delivery_mode(PERSISTENT)
            .with_headers(headers);

        self.channel
            .basic_publish(
                exchange,
                routing_key,
                BasicPublishOptions::default(),
                &message.payload,
                properties,
            )
            .await
            .map_err(transport)?
            .await
            .map_err(transport)?;
        Ok(())
    }

    async fn basic_consume(&self, queue: &str, consumer_tag: &str) -> MessagingResult<DeliveryStream> {
        let consumer = self
            .channel
            .basic_consume(
                queue,
                consumer_tag,
                BasicConsumeOptions::default(),
                AmqpTable::default(),
            )
            .await
            .map_err(transport)?;
        Ok(Box::pin(consumer.map(|res| res.map(to_delivery).map_err(transport))))
    }

    async fn basic_get(&self, queue: &str) -> MessagingResult<Option<Delivery>> {
        let got = self
            .channel
            .basic_get(queue, BasicGetOptions::default())
            .await
            .map_err(transport)?;
        Ok(got.map(|message| to_delivery(message.delivery)))
    }

    async fn close(&self) -> MessagingResult<()> {
        self.channel.close(200, "bye").await.map_err(transport)
    }
}
