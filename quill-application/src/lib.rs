//! 博客应用层（quill-application）
//!
//! - 命令/查询/DTO 协议与命令总线、查询总线端口；
//! - 进程内查询总线 `InProcessQueryBus`；
//! - 帖子、用户与动态记录的用例处理器。
//!
//! 命令总线的代理实现位于 `quill-messaging`，本 crate 只依赖其端口。
pub mod activity;
pub mod command;
pub mod command_bus;
pub mod command_handler;
pub mod context;
pub mod dto;
pub mod error;
pub mod in_process_query_bus;
pub mod post;
pub mod query;
pub mod query_bus;
pub mod query_handler;
pub mod user;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use in_process_query_bus::InProcessQueryBus;

// 允许宏生成的 ::quill_application 路径在本 crate 中解析
extern crate self as quill_application;
