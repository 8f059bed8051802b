use crate::{error::DomainResult as Result, model::ActivityEntry};
use async_trait::async_trait;

/// 动态记录读模型
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn append(&self, entry: ActivityEntry) -> Result<()>;

    /// 最近的记录，按发生时间倒序
    async fn recent(&self, limit: usize) -> Result<Vec<ActivityEntry>>;
}
