//! 消息子系统统一错误定义
//!
use quill_application::error::AppError;
use quill_domain::error::DomainError;
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MessagingError {
    // --- 命名/编解码 ---
    #[error("invalid topic name {name:?}: {reason}")]
    Topic { name: String, reason: &'static str },

    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },

    #[error("cannot decode message {uuid}: {reason}")]
    Decode { uuid: String, reason: String },

    // --- 拓扑 ---
    #[error("{context}: {source}")]
    Topology {
        context: String,
        #[source]
        source: Box<MessagingError>,
    },

    // --- 代理/通道 ---
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("channel closed")]
    ChannelClosed,

    #[error("transport error: {0}")]
    Transport(String),

    // --- 注册/路由 ---
    #[error("handler already registered: {0}")]
    AlreadyRegistered(String),

    #[error("duplicate route: topic={topic}, consumer_group={consumer_group}")]
    DuplicateRoute {
        topic: String,
        consumer_group: String,
    },
}

impl MessagingError {
    pub(crate) fn topology(context: impl Into<String>, source: MessagingError) -> Self {
        Self::Topology {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

pub type MessagingResult<T> = Result<T, MessagingError>;

impl From<MessagingError> for AppError {
    fn from(err: MessagingError) -> Self {
        AppError::Infra(err.to_string())
    }
}

impl From<MessagingError> for DomainError {
    fn from(err: MessagingError) -> Self {
        DomainError::event_bus(err.to_string())
    }
}
