//! 事件子系统（eventing）端口
//!
//! - `EventBus`：发布已序列化的领域事件（广播，不指定消费者）；
//! - `EventHandler`：按事件类型消费领域事件；
//! - `SerializedEvent`：与传输无关的事件记录（类型名 + JSON 载荷）。
//!
//! 该模块仅定义协议，不绑定具体传输实现。
//!
mod bus;
mod handler;
mod serialized_event;

pub use bus::EventBus;
pub use handler::EventHandler;
pub use serialized_event::SerializedEvent;
