//! 领域事件（Domain Event）
//!
//! 定义事件载荷需要实现的最小接口（`DomainEvent`）、贯穿消息链路的业务上下文
//! （`BusinessContext`），以及帖子与用户的具体事件。事件描述已经发生的事实，
//! 携带事实发生时的完整状态而非增量。

mod business_context;
mod domain_event_trait;
mod post_events;
mod user_events;

pub use business_context::BusinessContext;
pub use domain_event_trait::DomainEvent;
pub use post_events::{PostWasCreated, PostWasDeleted, PostWasUpdated};
pub use user_events::UserWasCreated;
