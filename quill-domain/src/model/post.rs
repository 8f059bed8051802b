use crate::entity::Entity;
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 博客帖子
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[builder(into)]
    slug: String,
    #[builder(into)]
    title: String,
    #[builder(into)]
    content: String,
    /// 作者（用户）ID
    author_id: Uuid,
}

impl Post {
    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author_id(&self) -> Uuid {
        self.author_id
    }

    /// 修订帖子内容：保留标识、作者与创建时间，刷新更新时间
    pub fn revise(
        &self,
        slug: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            content: content.into(),
            updated_at: at,
            ..self.clone()
        }
    }
}

impl Entity for Post {
    type Id = Uuid;

    const KIND: &'static str = "post";

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    fn updated_at(&self) -> &DateTime<Utc> {
        &self.updated_at
    }
}
