//! 用户用例：OAuth 登录后创建用户（命令）与按提供方账号查找（查询）
mod create_user;
mod find_user_by;

pub use create_user::{CreateUserCommand, CreateUserHandler};
pub use find_user_by::{FindUserByHandler, FindUserByQuery};
