use crate::query_handler::QueryHandler;
use crate::view::{PaginatedView, PostView};
use crate::{context::AppContext, error::AppError};
use async_trait::async_trait;
use quill_domain::persist::{PostFilter, PostRepository};
use quill_macros::query;
use std::sync::Arc;

/// 单页条数上限
pub const MAX_PAGE_SIZE: u32 = 100;

/// 帖子分页查询；空字符串的过滤条件不参与过滤
#[query(dto = PaginatedView<PostView>)]
pub struct FindAllByQuery {
    pub page: u32,
    pub page_size: u32,
    pub slug: Option<String>,
    /// 标题或正文
    pub text: Option<String>,
    /// 作者姓名
    pub author: Option<String>,
}

impl FindAllByQuery {
    fn validate(&self) -> Result<(), AppError> {
        if self.page < 1 {
            return Err(AppError::Validation(format!(
                "page must be >= 1, got {}",
                self.page
            )));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(AppError::Validation(format!(
                "page_size must be within 1..={MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        Ok(())
    }
}

pub struct FindAllByHandler {
    posts: Arc<dyn PostRepository>,
}

impl FindAllByHandler {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }
}

#[async_trait]
impl QueryHandler<FindAllByQuery> for FindAllByHandler {
    async fn handle(
        &self,
        _ctx: &AppContext,
        q: FindAllByQuery,
    ) -> Result<PaginatedView<PostView>, AppError> {
        q.validate()?;

        let filter = PostFilter::builder()
            .page(q.page)
            .page_size(q.page_size)
            .maybe_slug(q.slug)
            .maybe_text(q.text)
            .maybe_author(q.author)
            .build();

        let page = self.posts.find_all_by(&filter).await?;
        Ok(PaginatedView::from_result(page, |post| PostView::from(&post)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryPosts;
    use chrono::Utc;
    use quill_domain::model::Post;
    use uuid::Uuid;

    fn post(slug: &str) -> Post {
        let now = Utc::now();
        Post::builder()
            .id(Uuid::new_v4())
            .created_at(now)
            .updated_at(now)
            .slug(slug)
            .title(slug.to_uppercase())
            .content("body")
            .author_id(Uuid::new_v4())
            .build()
    }

    fn query(page: u32, page_size: u32) -> FindAllByQuery {
        FindAllByQuery {
            page,
            page_size,
            slug: None,
            text: None,
            author: None,
        }
    }

    #[tokio::test]
    async fn pages_through_filtered_posts() {
        let posts = MemoryPosts::with([post("rust-1"), post("go-1"), post("rust-2"), post("rust-3")]);
        let handler = FindAllByHandler::new(Arc::new(posts));

        let mut q = query(2, 2);
        q.slug = Some("rust".into());
        let view = handler.handle(&AppContext::default(), q).await.unwrap();

        assert_eq!(view.total, 3);
        assert_eq!(view.page, 2);
        assert_eq!(view.page_size, 2);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].slug, "rust-3");
    }

    #[tokio::test]
    async fn rejects_out_of_range_paging() {
        let handler = FindAllByHandler::new(Arc::new(MemoryPosts::default()));
        let ctx = AppContext::default();

        for (page, page_size) in [(0, 10), (1, 0), (1, MAX_PAGE_SIZE + 1)] {
            let err = handler.handle(&ctx, query(page, page_size)).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{page}/{page_size}: {err}");
        }
        assert!(handler.handle(&ctx, query(1, MAX_PAGE_SIZE)).await.is_ok());
    }
}
