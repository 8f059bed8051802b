use crate::entity::Entity;
use crate::model::User;
use quill_macros::domain_event;
use uuid::Uuid;

/// 用户创建事件（不携带密码）
#[domain_event]
pub struct UserWasCreated {
    pub id: Uuid,
    pub email: String,
    pub provider: String,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub provider_user_id: String,
    pub avatar_url: String,
}

impl From<&User> for UserWasCreated {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id(),
            email: user.email().to_owned(),
            provider: user.provider().to_owned(),
            name: user.name().to_owned(),
            first_name: user.first_name().to_owned(),
            last_name: user.last_name().to_owned(),
            provider_user_id: user.provider_user_id().to_owned(),
            avatar_url: user.avatar_url().to_owned(),
        }
    }
}
