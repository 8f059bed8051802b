use bon::Builder;
use serde::{Deserialize, Serialize};

/// 业务上下文信息
///
/// 随消息元数据传播：命令处理器发布的事件沿用命令的 `correlation_id`，
/// 并以命令消息 ID 作为 `causation_id`。
#[derive(Builder, Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessContext {
    /// 关联ID
    #[builder(into)]
    correlation_id: Option<String>,
    /// 因果ID
    #[builder(into)]
    causation_id: Option<String>,
    /// 触发事件的主体类型（如用户、系统等）
    #[builder(into)]
    actor_type: Option<String>,
    /// 触发事件的主体ID
    #[builder(into)]
    actor_id: Option<String>,
}

impl BusinessContext {
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn causation_id(&self) -> Option<&str> {
        self.causation_id.as_deref()
    }

    pub fn actor_type(&self) -> Option<&str> {
        self.actor_type.as_deref()
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }
}
