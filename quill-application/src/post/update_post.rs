use crate::command_handler::{CommandHandler, publish_event};
use crate::{context::AppContext, error::AppError};
use async_trait::async_trait;
use chrono::Utc;
use quill_domain::domain_event::PostWasUpdated;
use quill_domain::eventing::EventBus;
use quill_domain::persist::PostRepository;
use quill_macros::command;
use std::sync::Arc;
use uuid::Uuid;

#[command]
pub struct UpdatePostCommand {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub content: String,
}

pub struct UpdatePostHandler {
    posts: Arc<dyn PostRepository>,
    events: Arc<dyn EventBus>,
}

impl UpdatePostHandler {
    pub fn new(posts: Arc<dyn PostRepository>, events: Arc<dyn EventBus>) -> Self {
        Self { posts, events }
    }
}

#[async_trait]
impl CommandHandler<UpdatePostCommand> for UpdatePostHandler {
    async fn handle(&self, ctx: &AppContext, cmd: UpdatePostCommand) -> Result<(), AppError> {
        let Some(post) = self.posts.find_by_id(cmd.id).await? else {
            return Err(AppError::not_found("post", cmd.id));
        };

        let revised = post.revise(cmd.slug, cmd.title, cmd.content, Utc::now());
        self.posts.update(&revised).await?;
        publish_event(self.events.as_ref(), ctx, &PostWasUpdated::from(&revised)).await
    }
}
