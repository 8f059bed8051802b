//! 仓储端口（persist）
//!
//! 命令与查询处理器依赖的最小存储接口。分页语义：
//! `page` 从 1 开始，偏移量为 `(page - 1) * page_size`。
//!
mod activity_repository;
mod paginated;
mod post_repository;
mod user_repository;

pub use activity_repository::ActivityRepository;
pub use paginated::PaginatedResult;
pub use post_repository::{PostFilter, PostRepository};
pub use user_repository::UserRepository;
