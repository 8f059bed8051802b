use crate::entity::Entity;
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户（OAuth 登录后落库）
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[builder(into)]
    email: String,
    #[builder(into)]
    password: String,
    #[builder(into)]
    provider: String,
    #[builder(into)]
    name: String,
    #[builder(into)]
    first_name: String,
    #[builder(into)]
    last_name: String,
    #[builder(into)]
    provider_user_id: String,
    #[builder(into)]
    avatar_url: String,
}

impl User {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn provider_user_id(&self) -> &str {
        &self.provider_user_id
    }

    pub fn avatar_url(&self) -> &str {
        &self.avatar_url
    }
}

impl Entity for User {
    type Id = Uuid;

    const KIND: &'static str = "user";

    fn id(&self) -> &Uuid {
        &self.id
    }

    fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    fn updated_at(&self) -> &DateTime<Utc> {
        &self.updated_at
    }
}
