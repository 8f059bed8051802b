//! 传输端口
//!
//! `Publisher` 把消息发布到主题；`Subscriber` 以（主题, 消费组）订阅，
//! 返回有序的投递流。每条投递必须被确认或拒绝恰好一次。
//!
use crate::error::MessagingResult;
use crate::message::Message;
use async_trait::async_trait;
use futures_core::stream::BoxStream;

/// 投递结算（确认/拒绝）
#[async_trait]
pub trait Acknowledger: Send + Sync {
    async fn ack(&self) -> MessagingResult<()>;

    /// `requeue = false` 时由代理按死信参数转入死信队列
    async fn reject(&self, requeue: bool) -> MessagingResult<()>;
}

/// 一次投递
pub struct Delivery {
    pub message: Message,
    /// 是否为重新投递
    pub redelivered: bool,
    pub acker: Box<dyn Acknowledger>,
}

impl std::fmt::Debug for Delivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Delivery")
            .field("message", &self.message)
            .field("redelivered", &self.redelivered)
            .finish_non_exhaustive()
    }
}

pub type DeliveryStream = BoxStream<'static, MessagingResult<Delivery>>;

#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, topic: &str, message: Message) -> MessagingResult<()>;
}

#[async_trait]
pub trait Subscriber: Send + Sync {
    async fn subscribe(&self, topic: &str, consumer_group: &str) -> MessagingResult<DeliveryStream>;
}
