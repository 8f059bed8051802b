//! 路由器与处理器
//!
//! 处理器把“逻辑名称 → 处理器”的注册转换为路由（主题 + 消费组 + 分发函数），
//! 路由器为每条路由启动一个消费循环，逐条解码、分发并结算投递：
//! `Received → Decoding → Dispatching → {Acknowledged | Rejected}`。
mod command_processor;
mod engine;
mod event_processor;
mod route;

pub use command_processor::CommandProcessor;
pub use engine::{Router, RouterConfig, RouterHandle};
pub use event_processor::EventProcessor;
pub use route::{DispatchError, DispatchFn, DispatchFuture, Outcome, Processor, Route};
