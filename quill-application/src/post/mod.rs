//! 帖子用例：创建、更新、删除（命令）与按 ID、按条件查询（查询）
mod create_post;
mod delete_post;
mod find_all_by;
mod get_post;
mod update_post;

pub use create_post::{CreatePostCommand, CreatePostHandler};
pub use delete_post::{DeletePostCommand, DeletePostHandler};
pub use find_all_by::{FindAllByHandler, FindAllByQuery, MAX_PAGE_SIZE};
pub use get_post::{GetPostHandler, GetPostQuery};
pub use update_post::{UpdatePostCommand, UpdatePostHandler};
