//! 博客服务组合根（quill）
//!
//! 把领域层、应用层与消息层装配成可运行的服务：
//! - `config`：figment 分层配置；
//! - `telemetry`：tracing 订阅者初始化；
//! - `storage`：内存仓储适配器；
//! - `container`：依赖装配与路由器生命周期；
//! - `demo`：端到端演示流程。
pub mod config;
pub mod container;
pub mod demo;
pub mod storage;
pub mod telemetry;

pub use config::AppConfig;
pub use container::{Container, ContainerError, open_channel};
