use super::PaginatedResult;
use crate::{error::DomainResult as Result, model::Post};
use async_trait::async_trait;
use bon::Builder;
use uuid::Uuid;

/// 帖子列表过滤条件（空条件不参与过滤）
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct PostFilter {
    #[builder(default = 1)]
    page: u32,
    #[builder(default = 10)]
    page_size: u32,
    /// slug 子串匹配
    #[builder(into)]
    slug: Option<String>,
    /// 标题或正文子串匹配
    #[builder(into)]
    text: Option<String>,
    /// 作者姓名子串匹配
    #[builder(into)]
    author: Option<String>,
}

impl PostFilter {
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn slug(&self) -> Option<&str> {
        non_empty(&self.slug)
    }

    pub fn text(&self) -> Option<&str> {
        non_empty(&self.text)
    }

    pub fn author(&self) -> Option<&str> {
        non_empty(&self.author)
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1) as usize * self.page_size as usize
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn save(&self, post: &Post) -> Result<()>;

    async fn update(&self, post: &Post) -> Result<()>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>>;

    async fn find_all_by(&self, filter: &PostFilter) -> Result<PaginatedResult<Post>>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}
