//! 基于消息代理的命令/事件投递（quill-messaging）
//!
//! - 消息模型与信封编解码：逻辑名称写入元数据，解码时据此校验类型；
//! - 传输端口 `Publisher`/`Subscriber` 与 AMQP 风格的通道抽象；
//! - 拓扑构建（含死信交换机/死信队列）与两种队列布局；
//! - 内存代理 `InMemoryBroker`，以及可选的 lapin 适配（特性 `amqp`）；
//! - 代理之上的命令总线、事件总线，路由器与处理器；
//! - 死信重放。
pub mod amqp;
pub mod bus;
pub mod codec;
pub mod error;
pub mod message;
pub mod router;
pub mod topic;
pub mod transport;

pub use bus::{BrokerCommandBus, BrokerEventBus};
pub use codec::EnvelopeCodec;
pub use error::{MessagingError, MessagingResult};
pub use message::{Message, Metadata};
pub use router::{CommandProcessor, EventProcessor, Router, RouterConfig, RouterHandle};
pub use topic::TopicKind;
pub use transport::{Acknowledger, Delivery, DeliveryStream, Publisher, Subscriber};
