use crate::domain_event::DomainEvent;
use crate::error::{DomainError, DomainResult};
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 序列化后的领域事件
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedEvent {
    #[builder(into, default = Uuid::new_v4().to_string())]
    event_id: String,
    #[builder(into)]
    event_type: String,
    #[builder(into)]
    aggregate_id: String,
    #[builder(default = Utc::now())]
    occurred_at: DateTime<Utc>,
    payload: serde_json::Value,
}

impl SerializedEvent {
    /// 由具体事件构造，`event_type` 取事件逻辑名称
    pub fn from_event<E: DomainEvent>(event: &E) -> DomainResult<Self> {
        Ok(Self::builder()
            .event_type(E::NAME)
            .aggregate_id(event.aggregate_id())
            .payload(serde_json::to_value(event)?)
            .build())
    }

    /// 还原为具体事件，类型名不一致时返回 `TypeMismatch`
    pub fn to_event<E: DomainEvent>(&self) -> DomainResult<E> {
        if self.event_type != E::NAME {
            return Err(DomainError::TypeMismatch {
                expected: E::NAME.to_string(),
                found: self.event_type.clone(),
            });
        }
        Ok(serde_json::from_value(self.payload.clone())?)
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn aggregate_id(&self) -> &str {
        &self.aggregate_id
    }

    pub fn occurred_at(&self) -> &DateTime<Utc> {
        &self.occurred_at
    }

    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_event::{PostWasDeleted, UserWasCreated};

    fn user_created() -> UserWasCreated {
        UserWasCreated {
            id: Uuid::new_v4(),
            email: "ada@example.com".into(),
            provider: "github".into(),
            name: "Ada Lovelace".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            provider_user_id: "gh-42".into(),
            avatar_url: "https://example.com/ada.png".into(),
        }
    }

    #[test]
    fn from_event_uses_logical_name_and_aggregate_id() {
        let ev = user_created();
        let serialized = SerializedEvent::from_event(&ev).unwrap();

        assert_eq!(serialized.event_type(), "UserWasCreated");
        assert_eq!(serialized.aggregate_id(), ev.id.to_string());
        assert_eq!(serialized.payload()["provider_user_id"], "gh-42");
        assert!(Uuid::parse_str(serialized.event_id()).is_ok());
        assert_eq!(serialized.to_event::<UserWasCreated>().unwrap(), ev);
    }

    #[test]
    fn to_event_rejects_other_event_types() {
        let serialized = SerializedEvent::from_event(&user_created()).unwrap();
        let err = serialized.to_event::<PostWasDeleted>().unwrap_err();
        match err {
            DomainError::TypeMismatch { expected, found } => {
                assert_eq!(expected, "PostWasDeleted");
                assert_eq!(found, "UserWasCreated");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
