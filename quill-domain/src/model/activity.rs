use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 动态记录：由领域事件投影而来的只读条目
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    #[builder(into)]
    event_id: String,
    #[builder(into)]
    event_type: String,
    #[builder(into)]
    aggregate_id: String,
    correlation_id: Option<String>,
    recorded_at: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn aggregate_id(&self) -> &str {
        &self.aggregate_id
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn recorded_at(&self) -> &DateTime<Utc> {
        &self.recorded_at
    }
}
