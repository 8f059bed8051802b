use std::collections::BTreeMap;
use uuid::Uuid;

/// 消息元数据（有序字符串映射）
pub type Metadata = BTreeMap<String, String>;

/// 元数据键
pub mod keys {
    /// 逻辑名称（命令/事件类型判别）
    pub const NAME: &str = "name";
    /// 命令发送时间（RFC 3339，UTC）
    pub const SENT_AT: &str = "sent_at";
    /// 事件发布时间（RFC 3339，UTC）
    pub const PUBLISHED_AT: &str = "published_at";
    pub const CORRELATION_ID: &str = "correlation_id";
    pub const ACTOR_TYPE: &str = "actor_type";
    pub const ACTOR_ID: &str = "actor_id";
    /// 死信重放时间
    pub const REPLAYED_AT: &str = "replayed_at";
    /// 死信重放次数
    pub const REPLAY_COUNT: &str = "replay_count";
    /// 死信来源队列
    pub const DEATH_QUEUE: &str = "x-death-queue";
    /// 死信原因
    pub const DEATH_REASON: &str = "x-death-reason";
}

/// 传输消息：唯一 ID + JSON 负载 + 元数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub uuid: String,
    pub payload: Vec<u8>,
    pub metadata: Metadata,
}

impl Message {
    /// 以新生成的 UUIDv4 作为消息 ID
    pub fn new(payload: Vec<u8>) -> Self {
        Self::with_uuid(Uuid::new_v4().to_string(), payload)
    }

    pub fn with_uuid(uuid: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            uuid: uuid.into(),
            payload,
            metadata: Metadata::new(),
        }
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// 逻辑名称
    pub fn name(&self) -> Option<&str> {
        self.metadata(keys::NAME)
    }
}
