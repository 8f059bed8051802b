use crate::entity::Entity;
use crate::model::Post;
use chrono::{DateTime, Utc};
use quill_macros::domain_event;
use uuid::Uuid;

#[domain_event]
pub struct PostWasCreated {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
}

#[domain_event]
pub struct PostWasUpdated {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
}

/// 删除事件携带删除前的完整状态
#[domain_event]
pub struct PostWasDeleted {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
}

macro_rules! from_post {
    ($($event:ident),+ $(,)?) => {
        $(
            impl From<&Post> for $event {
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
        )+
    };
}

from_post!(PostWasCreated, PostWasUpdated, PostWasDeleted);
