use crate::query_handler::QueryHandler;
use crate::view::{ActivityFeedView, ActivityView};
use crate::{context::AppContext, error::AppError};
use async_trait::async_trait;
use quill_domain::persist::ActivityRepository;
use quill_macros::query;
use std::sync::Arc;

const MAX_LIMIT: usize = 100;

#[query(dto = ActivityFeedView)]
pub struct ListRecentActivityQuery {
    pub limit: usize,
}

pub struct ListRecentActivityHandler {
    activity: Arc<dyn ActivityRepository>,
}

impl ListRecentActivityHandler {
    pub fn new(activity: Arc<dyn ActivityRepository>) -> Self {
        Self { activity }
    }
}

#[async_trait]
impl QueryHandler<ListRecentActivityQuery> for ListRecentActivityHandler {
    async fn handle(
        &self,
        _ctx: &AppContext,
        q: ListRecentActivityQuery,
    ) -> Result<ActivityFeedView, AppError> {
        if !(1..=MAX_LIMIT).contains(&q.limit) {
            return Err(AppError::Validation(format!(
                "limit must be within 1..={MAX_LIMIT}, got {}",
                q.limit
            )));
        }

        let entries = self.activity.recent(q.limit).await?;
        Ok(ActivityFeedView {
            items: entries.iter().map(ActivityView::from).collect(),
        })
    }
}
