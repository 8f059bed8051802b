//! 动态记录：事件处理器把领域事件投影为动态条目，查询返回最近动态
mod list_recent;
mod recorder;

pub use list_recent::{ListRecentActivityHandler, ListRecentActivityQuery};
pub use recorder::ActivityRecorder;
