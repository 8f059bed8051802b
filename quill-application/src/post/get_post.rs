use crate::query_handler::QueryHandler;
use crate::view::PostView;
use crate::{context::AppContext, error::AppError};
use async_trait::async_trait;
use quill_domain::persist::PostRepository;
use quill_macros::query;
use std::sync::Arc;
use uuid::Uuid;

#[query(dto = PostView)]
pub struct GetPostQuery {
    pub id: Uuid,
}

pub struct GetPostHandler {
    posts: Arc<dyn PostRepository>,
}

impl GetPostHandler {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }
}

#[async_trait]
impl QueryHandler<GetPostQuery> for GetPostHandler {
    async fn handle(&self, _ctx: &AppContext, q: GetPostQuery) -> Result<PostView, AppError> {
        self.posts
            .find_by_id(q.id)
            .await?
            .map(|post| PostView::from(&post))
            .ok_or_else(|| AppError::not_found("post", q.id))
    }
}
