//! 组合根（Container）
//!
//! 依次构建：存储 → 查询总线 → 发布者/订阅者 → 命令/事件总线 → 处理器 → 路由器。
//! 所有依赖显式传递，不使用全局状态。
//!
use crate::config::{AppConfig, BrokerConfig, Transport};
use crate::storage::InMemoryStore;
use quill_application::activity::{ActivityRecorder, ListRecentActivityHandler, ListRecentActivityQuery};
use quill_application::error::AppError;
use quill_application::post::{
    CreatePostCommand, CreatePostHandler, DeletePostCommand, DeletePostHandler, FindAllByHandler,
    FindAllByQuery, GetPostHandler, GetPostQuery, UpdatePostCommand, UpdatePostHandler,
};
use quill_application::user::{
    CreateUserCommand, CreateUserHandler, FindUserByHandler, FindUserByQuery,
};
use quill_application::InProcessQueryBus;
use quill_domain::domain_event::{PostWasCreated, PostWasDeleted, PostWasUpdated, UserWasCreated};
use quill_domain::eventing::EventBus;
use quill_messaging::amqp::{
    AmqpPublisher, AmqpSubscriber, Channel, DeadLetterConfig, DeadLetterReplayer, InMemoryBroker,
    QueueLayout, TopologyBuilder,
};
use quill_messaging::{
    BrokerCommandBus, BrokerEventBus, CommandProcessor, EventProcessor, MessagingError, Router,
    RouterHandle,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("transport `amqp` requires the `amqp` feature")]
    AmqpDisabled,
    #[error("router already started")]
    AlreadyStarted,
    #[error(transparent)]
    Messaging(#[from] MessagingError),
    #[error(transparent)]
    App(#[from] AppError),
}

/// 按配置打开代理通道
pub async fn open_channel(config: &BrokerConfig) -> Result<Arc<dyn Channel>, ContainerError> {
    match config.transport {
        Transport::Memory => {
            info!("using in-memory broker");
            Ok(Arc::new(InMemoryBroker::new()))
        }
        #[cfg(feature = "amqp")]
        Transport::Amqp => {
            let channel = quill_messaging::amqp::LapinChannel::connect(&config.uri).await?;
            Ok(Arc::new(channel))
        }
        #[cfg(not(feature = "amqp"))]
        Transport::Amqp => Err(ContainerError::AmqpDisabled),
    }
}

pub struct Container {
    pub store: InMemoryStore,
    pub query_bus: Arc<InProcessQueryBus>,
    pub command_bus: Arc<BrokerCommandBus>,
    pub event_bus: Arc<BrokerEventBus>,
    channel: Arc<dyn Channel>,
    dead_letter: DeadLetterConfig,
    router: Option<Router>,
}

impl Container {
    pub fn build(config: &AppConfig, channel: Arc<dyn Channel>) -> Result<Self, ContainerError> {
        let store = InMemoryStore::new();
        let posts = Arc::new(store.clone());
        let users = Arc::new(store.clone());
        let activity = Arc::new(store.clone());

        let query_bus = Arc::new(InProcessQueryBus::new());
        query_bus.register::<GetPostQuery, _>(Arc::new(GetPostHandler::new(posts.clone())));
        query_bus.register::<FindAllByQuery, _>(Arc::new(FindAllByHandler::new(posts.clone())));
        query_bus.register::<FindUserByQuery, _>(Arc::new(FindUserByHandler::new(users.clone())));
        query_bus.register::<ListRecentActivityQuery, _>(Arc::new(
            ListRecentActivityHandler::new(activity.clone()),
        ));
        query_bus.ensure_registered::<GetPostQuery>()?;
        query_bus.ensure_registered::<FindAllByQuery>()?;
        query_bus.ensure_registered::<FindUserByQuery>()?;
        query_bus.ensure_registered::<ListRecentActivityQuery>()?;

        let topology = TopologyBuilder::new(config.dead_letter.clone());
        let command_publisher = Arc::new(AmqpPublisher::new(
            channel.clone(),
            topology.clone(),
            QueueLayout::Durable,
        ));
        let event_publisher = Arc::new(AmqpPublisher::new(
            channel.clone(),
            topology.clone(),
            QueueLayout::FanOut,
        ));
        let command_subscriber = Arc::new(AmqpSubscriber::new(
            channel.clone(),
            topology.clone(),
            QueueLayout::Durable,
        ));
        let event_subscriber = Arc::new(AmqpSubscriber::new(
            channel.clone(),
            topology,
            QueueLayout::FanOut,
        ));

        let command_bus = Arc::new(BrokerCommandBus::new(command_publisher));
        let event_bus = Arc::new(BrokerEventBus::new(event_publisher));
        let events: Arc<dyn EventBus> = event_bus.clone();

        let mut commands = CommandProcessor::new(command_subscriber);
        commands.add_handler::<CreatePostCommand, _>(Arc::new(CreatePostHandler::new(
            posts.clone(),
            events.clone(),
        )))?;
        commands.add_handler::<UpdatePostCommand, _>(Arc::new(UpdatePostHandler::new(
            posts.clone(),
            events.clone(),
        )))?;
        commands.add_handler::<DeletePostCommand, _>(Arc::new(DeletePostHandler::new(
            posts,
            events.clone(),
        )))?;
        commands.add_handler::<CreateUserCommand, _>(Arc::new(CreateUserHandler::new(
            users, events,
        )))?;

        let recorder = Arc::new(ActivityRecorder::new(activity));
        let mut event_handlers = EventProcessor::new(event_subscriber);
        event_handlers.add_handler::<PostWasCreated, _>(recorder.clone())?;
        event_handlers.add_handler::<PostWasUpdated, _>(recorder.clone())?;
        event_handlers.add_handler::<PostWasDeleted, _>(recorder.clone())?;
        event_handlers.add_handler::<UserWasCreated, _>(recorder)?;

        let mut router = Router::new(config.router);
        router.add_processor(&commands)?;
        router.add_processor(&event_handlers)?;

        info!(
            queries = query_bus.registered_queries().len(),
            routes = router.routes().len(),
            "container built"
        );

        Ok(Self {
            store,
            query_bus,
            command_bus,
            event_bus,
            channel,
            dead_letter: config.dead_letter.clone(),
            router: Some(router),
        })
    }

    /// 启动路由器；只能调用一次
    pub async fn start(&mut self) -> Result<RouterHandle, ContainerError> {
        let router = self.router.take().ok_or(ContainerError::AlreadyStarted)?;
        Ok(router.run().await?)
    }

    /// 等待在途处理结束后关闭通道
    pub async fn stop(&self, handle: RouterHandle) -> Result<(), ContainerError> {
        handle.shutdown();
        handle.join().await;
        self.channel.close().await?;
        Ok(())
    }

    pub fn replayer(&self) -> DeadLetterReplayer {
        DeadLetterReplayer::new(self.channel.clone(), self.dead_letter.clone())
    }

    pub fn channel(&self) -> &Arc<dyn Channel> {
        &self.channel
    }
}
