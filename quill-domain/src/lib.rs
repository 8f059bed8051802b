//! 博客领域层（quill-domain）
//!
//! 定义写模型与读模型共享的领域构件：
//! - 实体（`entity`、`model`）：帖子、用户与动态记录；
//! - 领域事件（`domain_event`）：携带完整状态的事实，作为消息总线的广播载荷；
//! - 仓储端口（`persist`）：命令与查询处理器依赖的最小存储接口；
//! - 事件端口（`eventing`）：事件总线与事件处理器协议。
//!
//! 本 crate 不绑定任何存储或消息中间件，具体实现由基础设施层提供。
//!
pub mod domain_event;
pub mod entity;
pub mod error;
pub mod eventing;
pub mod model;
pub mod persist;

// 允许在本 crate 内部通过 ::quill_domain 进行自引用，
// 以便 #[domain_event] 生成的路径在本 crate 中也能解析。
extern crate self as quill_domain;
