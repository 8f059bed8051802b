use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// 领域事件载荷需要满足的通用能力边界
///
/// 通常由 `#[domain_event]` 宏实现。
pub trait DomainEvent:
    Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// 事件逻辑名称：决定主题 `events.<NAME>`，并作为消息信封中的判别符
    const NAME: &'static str;

    /// 事件所属实体的标识
    fn aggregate_id(&self) -> String;
}
