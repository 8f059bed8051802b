//! 实体（Entity）基础抽象
//!
//! 为帖子、用户等持久化对象提供统一的标识与时间戳访问，
//! 存储适配器据此按标识索引、按创建时间排序。
//!
use chrono::{DateTime, Utc};
use std::{fmt::Display, hash::Hash, str::FromStr};

/// 具备唯一标识与创建/更新时间的实体抽象
pub trait Entity: Send + Sync {
    /// 实体标识类型，要求可解析、可显示、可哈希
    type Id: FromStr + Clone + Display + Eq + Hash + Send + Sync;

    /// 实体名称（用于错误信息与日志）
    const KIND: &'static str;

    fn id(&self) -> &Self::Id;

    fn created_at(&self) -> &DateTime<Utc>;

    fn updated_at(&self) -> &DateTime<Utc>;
}
