use crate::error::MessagingError;
use crate::message::Message;
use crate::topic::TopicKind;
use crate::transport::Subscriber;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// 分发失败；三种情形一律拒绝投递
#[derive(Debug, Error)]
pub enum DispatchError {
    /// 解码失败是永久性的，重投也不会成功
    #[error("decode failed: {0}")]
    Decode(#[source] MessagingError),

    #[error("handler failed: {0:#}")]
    Handler(anyhow::Error),

    #[error("handler panicked: {0}")]
    Panicked(String),
}

pub type DispatchFuture = Pin<Box<dyn Future<Output = Result<(), DispatchError>> + Send>>;

/// 解码并调用处理器
pub type DispatchFn = Arc<dyn Fn(Message) -> DispatchFuture + Send + Sync>;

/// 投递结算结果
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Acknowledged,
    Rejected { requeue: bool },
}

/// 一条订阅路由
#[derive(Clone)]
pub struct Route {
    pub kind: TopicKind,
    /// 逻辑名称
    pub name: &'static str,
    pub topic: String,
    pub consumer_group: String,
    /// 处理器标识（日志用）
    pub handler: String,
    pub subscriber: Arc<dyn Subscriber>,
    pub dispatch: DispatchFn,
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("topic", &self.topic)
            .field("consumer_group", &self.consumer_group)
            .field("handler", &self.handler)
            .finish_non_exhaustive()
    }
}

/// 向路由器提供路由的处理器
pub trait Processor {
    fn routes(&self) -> Vec<Route>;
}
