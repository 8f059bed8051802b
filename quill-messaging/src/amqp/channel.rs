use crate::error::MessagingResult;
use crate::message::Message;
use crate::transport::{Delivery, DeliveryStream};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;

/// 参数表（队列参数等）
pub type FieldTable = BTreeMap<String, FieldValue>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Str(String),
    Bool(bool),
    Int(i64),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExchangeKind {
    Direct,
    Fanout,
}

impl fmt::Display for ExchangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeKind::Direct => f.write_str("direct"),
            ExchangeKind::Fanout => f.write_str("fanout"),
        }
    }
}

/// 拓扑声明所需的最小通道能力
#[async_trait]
pub trait TopologyChannel: Send + Sync {
    async fn exchange_declare(
        &self,
        name: &str,
        kind: ExchangeKind,
        durable: bool,
    ) -> MessagingResult<()>;

    async fn queue_declare(
        &self,
        name: &str,
        durable: bool,
        arguments: FieldTable,
    ) -> MessagingResult<()>;

    async fn queue_bind(&self, queue: &str, exchange: &str, routing_key: &str)
    -> MessagingResult<()>;
}

/// 代理通道
///
/// 空交换机名表示默认交换机：按路由键直接投递到同名队列。
#[async_trait]
pub trait Channel: TopologyChannel {
    async fn basic_publish(
        &self,
        exchange: &str,
        routing_key: &str,
        message: Message,
    ) -> MessagingResult<()>;

    async fn basic_consume(&self, queue: &str, consumer_tag: &str)
    -> MessagingResult<DeliveryStream>;

    /// 拉取单条消息；队列为空时返回 `None`
    async fn basic_get(&self, queue: &str) -> MessagingResult<Option<Delivery>>;

    async fn close(&self) -> MessagingResult<()>;
}
