//! 领域实体
//!
//! `Post` 与 `User` 为写模型的持久化对象；`ActivityEntry` 为由领域事件
//! 投影而来的动态记录。
mod activity;
mod post;
mod user;

pub use activity::ActivityEntry;
pub use post::Post;
pub use user::User;
