use crate::query_handler::QueryHandler;
use crate::view::UserView;
use crate::{context::AppContext, error::AppError};
use async_trait::async_trait;
use quill_domain::persist::UserRepository;
use quill_macros::query;
use std::sync::Arc;

#[query(dto = UserView)]
pub struct FindUserByQuery {
    pub provider_user_id: String,
    pub email: String,
}

pub struct FindUserByHandler {
    users: Arc<dyn UserRepository>,
}

impl FindUserByHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl QueryHandler<FindUserByQuery> for FindUserByHandler {
    async fn handle(&self, _ctx: &AppContext, q: FindUserByQuery) -> Result<UserView, AppError> {
        self.users
            .find_by_provider_user_id_and_email(&q.provider_user_id, &q.email)
            .await?
            .map(|user| UserView::from(&user))
            .ok_or_else(|| AppError::not_found("user", format!("{}/{}", q.provider_user_id, q.email)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_handler::CommandHandler;
    use crate::test_support::{MemoryUsers, RecordingEventBus};
    use crate::user::{CreateUserCommand, CreateUserHandler};
    use uuid::Uuid;

    #[tokio::test]
    async fn finds_by_provider_account_and_email() {
        let users = Arc::new(MemoryUsers::default());
        let id = Uuid::new_v4();
        CreateUserHandler::new(users.clone(), Arc::new(RecordingEventBus::default()))
            .handle(
                &AppContext::default(),
                CreateUserCommand {
                    id,
                    email: "grace@example.com".into(),
                    password: String::new(),
                    provider: "google".into(),
                    name: "Grace Hopper".into(),
                    first_name: "Grace".into(),
                    last_name: "Hopper".into(),
                    provider_user_id: "g-7".into(),
                    avatar_url: String::new(),
                },
            )
            .await
            .unwrap();

        let handler = FindUserByHandler::new(users);
        let ctx = AppContext::default();
        let found = handler
            .handle(
                &ctx,
                FindUserByQuery {
                    provider_user_id: "g-7".into(),
                    email: "grace@example.com".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.name, "Grace Hopper");

        let err = handler
            .handle(
                &ctx,
                FindUserByQuery {
                    provider_user_id: "g-7".into(),
                    email: "other@example.com".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { entity: "user", .. }));
    }
}
