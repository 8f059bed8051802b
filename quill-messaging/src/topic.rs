use crate::error::{MessagingError, MessagingResult};
use crate::message::keys;
use std::fmt;

/// 主题类别：逻辑名称到主题的映射是纯函数，发布与订阅两侧必须一致
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TopicKind {
    Command,
    Event,
}

impl TopicKind {
    pub fn prefix(self) -> &'static str {
        match self {
            TopicKind::Command => "commands",
            TopicKind::Event => "events",
        }
    }

    /// `commands.<Name>` / `events.<Name>`
    pub fn topic(self, name: &str) -> MessagingResult<String> {
        let reason = if name.is_empty() {
            Some("name is empty")
        } else if name.contains('.') {
            Some("name must not contain '.'")
        } else if name.chars().any(char::is_whitespace) {
            Some("name must not contain whitespace")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(MessagingError::Topic {
                name: name.to_owned(),
                reason,
            }),
            None => Ok(format!("{}.{name}", self.prefix())),
        }
    }

    /// 发送/发布时间戳对应的元数据键
    pub fn timestamp_key(self) -> &'static str {
        match self {
            TopicKind::Command => keys::SENT_AT,
            TopicKind::Event => keys::PUBLISHED_AT,
        }
    }
}

impl fmt::Display for TopicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicKind::Command => f.write_str("command"),
            TopicKind::Event => f.write_str("event"),
        }
    }
}
