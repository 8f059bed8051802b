//! 查询视图（DTO）
//!
//! 与领域模型解耦的只读输出；用户视图不包含密码。
use chrono::{DateTime, Utc};
use quill_domain::entity::Entity;
use quill_domain::model::{ActivityEntry, Post, User};
use quill_domain::persist::PaginatedResult;
use quill_macros::dto;
use uuid::Uuid;

#[dto]
pub struct PostView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
}

impl From<&Post> for PostView {
    fn from(post: &Post) -> Self {
        Self {
            id: *post.id(),
            created_at: *post.created_at(),
            updated_at: *post.updated_at(),
            slug: post.slug().to_owned(),
            title: post.title().to_owned(),
            content: post.content().to_owned(),
            author_id: post.author_id(),
        }
    }
}

#[dto]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub provider: String,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub provider_user_id: String,
    pub avatar_url: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id(),
            email: user.email().to_owned(),
            provider: user.provider().to_owned(),
            name: user.name().to_owned(),
            first_name: user.first_name().to_owned(),
            last_name: user.last_name().to_owned(),
            provider_user_id: user.provider_user_id().to_owned(),
            avatar_url: user.avatar_url().to_owned(),
        }
    }
}

/// 分页视图
#[dto]
pub struct PaginatedView<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> PaginatedView<T> {
    pub fn from_result<E>(result: PaginatedResult<E>, f: impl FnMut(E) -> T) -> Self {
        let result = result.map(f);
        Self {
            items: result.items,
            total: result.total,
            page: result.page,
            page_size: result.page_size,
        }
    }
}

#[dto]
pub struct ActivityView {
    pub event_id: String,
    pub event_type: String,
    pub aggregate_id: String,
    pub correlation_id: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl From<&ActivityEntry> for ActivityView {
    fn from(entry: &ActivityEntry) -> Self {
        Self {
            event_id: entry.event_id().to_owned(),
            event_type: entry.event_type().to_owned(),
            aggregate_id: entry.aggregate_id().to_owned(),
            correlation_id: entry.correlation_id().map(str::to_owned),
            recorded_at: *entry.recorded_at(),
        }
    }
}

/// 最近动态，按记录时间倒序
#[dto]
pub struct ActivityFeedView {
    pub items: Vec<ActivityView>,
}
