use crate::command_handler::{CommandHandler, publish_event};
use crate::{context::AppContext, error::AppError};
use async_trait::async_trait;
use quill_domain::domain_event::PostWasDeleted;
use quill_domain::eventing::EventBus;
use quill_domain::persist::PostRepository;
use quill_macros::command;
use std::sync::Arc;
use uuid::Uuid;

#[command]
pub struct DeletePostCommand {
    pub id: Uuid,
}

pub struct DeletePostHandler {
    posts: Arc<dyn PostRepository>,
    events: Arc<dyn EventBus>,
}

impl DeletePostHandler {
    pub fn new(posts: Arc<dyn PostRepository>, events: Arc<dyn EventBus>) -> Self {
        Self { posts, events }
    }
}

#[async_trait]
impl CommandHandler<DeletePostCommand> for DeletePostHandler {
    /// 删除不存在的帖子视为错误，消息将进入死信队列
    async fn handle(&self, ctx: &AppContext, cmd: DeletePostCommand) -> Result<(), AppError> {
        let Some(post) = self.posts.find_by_id(cmd.id).await? else {
            return Err(AppError::not_found("post", cmd.id));
        };

        self.posts.delete(cmd.id).await?;
        publish_event(self.events.as_ref(), ctx, &PostWasDeleted::from(&post)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemoryPosts, RecordingEventBus};
    use chrono::Utc;
    use quill_domain::entity::Entity;
    use quill_domain::model::Post;

    #[tokio::test]
    async fn deletes_post_and_publishes_prior_state() {
        let now = Utc::now();
        let post = Post::builder()
            .id(Uuid::new_v4())
            .created_at(now)
            .updated_at(now)
            .slug("bye")
            .title("Bye")
            .content("gone soon")
            .author_id(Uuid::new_v4())
            .build();
        let posts = Arc::new(MemoryPosts::with([post.clone()]));
        let events = Arc::new(RecordingEventBus::default());
        let handler = DeletePostHandler::new(posts.clone(), events.clone());

        handler
            .handle(&AppContext::default(), DeletePostCommand { id: *post.id() })
            .await
            .unwrap();

        assert!(posts.all().is_empty());
        let deleted = events.events_of::<PostWasDeleted>();
        assert_eq!(deleted, vec![PostWasDeleted::from(&post)]);
        assert_eq!(deleted[0].content, "gone soon");
    }

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let events = Arc::new(RecordingEventBus::default());
        let handler = DeletePostHandler::new(Arc::new(MemoryPosts::default()), events.clone());

        let err = handler
            .handle(&AppContext::default(), DeletePostCommand { id: Uuid::new_v4() })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { entity: "post", .. }));
        assert!(events.published().is_empty());
    }
}
