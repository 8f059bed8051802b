use crate::command_handler::{CommandHandler, publish_event};
use crate::{context::AppContext, error::AppError};
use async_trait::async_trait;
use chrono::Utc;
use quill_domain::domain_event::UserWasCreated;
use quill_domain::error::DomainError;
use quill_domain::eventing::EventBus;
use quill_domain::model::User;
use quill_domain::persist::UserRepository;
use quill_macros::command;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

#[command]
pub struct CreateUserCommand {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub provider: String,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub provider_user_id: String,
    pub avatar_url: String,
}

pub struct CreateUserHandler {
    users: Arc<dyn UserRepository>,
    events: Arc<dyn EventBus>,
}

impl CreateUserHandler {
    pub fn new(users: Arc<dyn UserRepository>, events: Arc<dyn EventBus>) -> Self {
        Self { users, events }
    }
}

#[async_trait]
impl CommandHandler<CreateUserCommand> for CreateUserHandler {
    async fn handle(&self, ctx: &AppContext, cmd: CreateUserCommand) -> Result<(), AppError> {
        if self.users.find_by_id(cmd.id).await?.is_some() {
            debug!(user_id = %cmd.id, "user already exists, skipping");
            return Ok(());
        }

        let now = Utc::now();
        let user = User::builder()
            .id(cmd.id)
            .created_at(now)
            .updated_at(now)
            .email(cmd.email)
            .password(cmd.password)
            .provider(cmd.provider)
            .name(cmd.name)
            .first_name(cmd.first_name)
            .last_name(cmd.last_name)
            .provider_user_id(cmd.provider_user_id)
            .avatar_url(cmd.avatar_url)
            .build();

        match self.users.save(&user).await {
            Ok(()) => {}
            // 并发的重复投递先一步写入
            Err(DomainError::Duplicate { .. }) => {
                debug!(user_id = %cmd.id, "user saved concurrently, skipping");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }
        publish_event(self.events.as_ref(), ctx, &UserWasCreated::from(&user)).await
    }
}
