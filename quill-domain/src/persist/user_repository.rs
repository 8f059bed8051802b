use crate::{error::DomainResult as Result, model::User};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save(&self, user: &User) -> Result<()>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_provider_user_id_and_email(
        &self,
        provider_user_id: &str,
        email: &str,
    ) -> Result<Option<User>>;
}
