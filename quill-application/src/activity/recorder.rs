use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use quill_domain::domain_event::{BusinessContext, DomainEvent};
use quill_domain::eventing::EventHandler;
use quill_domain::model::ActivityEntry;
use quill_domain::persist::ActivityRepository;
use std::sync::Arc;
use uuid::Uuid;

/// 通用事件处理器：任何领域事件都记为一条动态
///
/// 事件 ID 取自上下文的 `causation_id`（即事件消息 ID），
/// 缺失时生成新 ID。
pub struct ActivityRecorder {
    activity: Arc<dyn ActivityRepository>,
}

impl ActivityRecorder {
    pub const NAME: &'static str = "activity_recorder";

    pub fn new(activity: Arc<dyn ActivityRepository>) -> Self {
        Self { activity }
    }
}

#[async_trait]
impl<E> EventHandler<E> for ActivityRecorder
where
    E: DomainEvent,
{
    fn handler_name(&self) -> &str {
        Self::NAME
    }

    async fn handle(&self, ctx: &BusinessContext, event: E) -> anyhow::Result<()> {
        let event_id = ctx
            .causation_id()
            .map(str::to_owned)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let entry = ActivityEntry::builder()
            .event_id(event_id)
            .event_type(E::NAME)
            .aggregate_id(event.aggregate_id())
            .maybe_correlation_id(ctx.correlation_id().map(str::to_owned))
            .recorded_at(Utc::now())
            .build();

        self.activity
            .append(entry)
            .await
            .with_context(|| format!("cannot record activity for {}", E::NAME))
    }
}
