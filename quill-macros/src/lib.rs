//! 消息类型过程宏（quill-macros）
//!
//! 为命令、查询、领域事件与 DTO 生成稳定的逻辑名称与常用派生：
//! - `#[command]`：实现 `quill_application::command::Command`；
//! - `#[query(dto = T)]`：实现 `quill_application::query::Query`；
//! - `#[domain_event]`：实现 `quill_domain::domain_event::DomainEvent`；
//! - `#[dto]`：实现 `quill_application::dto::Dto`。
//!
//! 逻辑名称默认取类型标识符，可通过 `name = "..."` 覆写。名称会参与主题
//! （`commands.<Name>` / `events.<Name>`）推导，因此不允许包含空白或 `.`。
//!
use proc_macro::TokenStream;

mod command;
mod domain_event;
mod dto;
mod query;
mod utils;

/// 命令宏
/// - 合并派生：Debug, Clone, PartialEq, Serialize, Deserialize
/// - 实现 `Command`，`NAME` 默认为结构体名
/// - 参数：`#[command(name = "...")]`
#[proc_macro_attribute]
pub fn command(attr: TokenStream, item: TokenStream) -> TokenStream {
    command::expand(attr, item)
}

/// 查询宏
/// - 合并派生：Debug, Clone, PartialEq, Serialize, Deserialize
/// - 实现 `Query`，必须通过 `dto = Type` 指定返回的 DTO
/// - 参数：`#[query(dto = PostView, name = "...")]`
#[proc_macro_attribute]
pub fn query(attr: TokenStream, item: TokenStream) -> TokenStream {
    query::expand(attr, item)
}

/// 领域事件宏
/// - 仅支持具名字段结构体
/// - 实现 `DomainEvent`：`NAME` 与 `aggregate_id()`（默认读取 `id` 字段）
/// - 参数：`#[domain_event(name = "...", id = field)]`
#[proc_macro_attribute]
pub fn domain_event(attr: TokenStream, item: TokenStream) -> TokenStream {
    domain_event::expand(attr, item)
}

/// DTO 宏：合并派生并实现 `Dto`（支持泛型）
#[proc_macro_attribute]
pub fn dto(attr: TokenStream, item: TokenStream) -> TokenStream {
    dto::expand(attr, item)
}
