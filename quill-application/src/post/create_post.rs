use crate::command_handler::{CommandHandler, publish_event};
use crate::{context::AppContext, error::AppError};
use async_trait::async_trait;
use chrono::Utc;
use quill_domain::domain_event::PostWasCreated;
use quill_domain::error::DomainError;
use quill_domain::eventing::EventBus;
use quill_domain::model::Post;
use quill_domain::persist::PostRepository;
use quill_macros::command;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

#[command]
pub struct CreatePostCommand {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub content: String,
    /// 作者（用户）ID
    pub author: Uuid,
}

pub struct CreatePostHandler {
    posts: Arc<dyn PostRepository>,
    events: Arc<dyn EventBus>,
}

impl CreatePostHandler {
    pub fn new(posts: Arc<dyn PostRepository>, events: Arc<dyn EventBus>) -> Self {
        Self { posts, events }
    }
}

#[async_trait]
impl CommandHandler<CreatePostCommand> for CreatePostHandler {
    async fn handle(&self, ctx: &AppContext, cmd: CreatePostCommand) -> Result<(), AppError> {
        // 重复投递：已存在则确认并跳过，不再发布事件
        if self.posts.find_by_id(cmd.id).await?.is_some() {
            debug!(post_id = %cmd.id, "post already exists, skipping");
            return Ok(());
        }

        let now = Utc::now();
        let post = Post::builder()
            .id(cmd.id)
            .created_at(now)
            .updated_at(now)
            .slug(cmd.slug)
            .title(cmd.title)
            .content(cmd.content)
            .author_id(cmd.author)
            .build();

        match self.posts.save(&post).await {
            Ok(()) => {}
            // 并发的重复投递先一步写入
            Err(DomainError::Duplicate { .. }) => {
                debug!(post_id = %cmd.id, "post saved concurrently, skipping");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }
        publish_event(self.events.as_ref(), ctx, &PostWasCreated::from(&post)).await
    }
}
