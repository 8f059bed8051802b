//! AMQP 风格的代理抽象
//!
//! - `channel`：通道端口与参数表；
//! - `topology`：主队列 + 死信交换机/死信队列的声明；
//! - `layout`：命令的持久队列布局与事件的扇出布局；
//! - `publisher`/`subscriber`：在通道之上实现传输端口；
//! - `memory`：遵循 AMQP 语义的内存代理；
//! - `replay`：死信重放。
mod channel;
mod layout;
mod memory;
mod publisher;
mod replay;
mod subscriber;
mod topology;

#[cfg(feature = "amqp")]
mod lapin_channel;

pub use channel::{Channel, ExchangeKind, FieldTable, FieldValue, TopologyChannel};
pub use layout::QueueLayout;
pub use memory::InMemoryBroker;
pub use publisher::AmqpPublisher;
pub use replay::DeadLetterReplayer;
pub use subscriber::AmqpSubscriber;
pub use topology::{DeadLetterConfig, Topology, TopologyBuilder, TopologyParams};

#[cfg(feature = "amqp")]
pub use lapin_channel::LapinChannel;

/// 队列参数：死信交换机
pub const X_DEAD_LETTER_EXCHANGE: &str = "x-dead-letter-exchange";
/// 队列参数：死信路由键
pub const X_DEAD_LETTER_ROUTING_KEY: &str = "x-dead-letter-routing-key";
