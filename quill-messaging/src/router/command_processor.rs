use super::route::{DispatchError, DispatchFn, Processor, Route};
use crate::codec::EnvelopeCodec;
use crate::error::{MessagingError, MessagingResult};
use crate::message::Message;
use crate::topic::TopicKind;
use crate::transport::Subscriber;
use quill_application::command::Command;
use quill_application::command_handler::CommandHandler;
use quill_application::context::AppContext;
use std::any::type_name;
use std::sync::Arc;
use tracing::debug;

/// 命令处理器：每个命令名称恰好一个处理器，重复注册在启动期报错
pub struct CommandProcessor {
    subscriber: Arc<dyn Subscriber>,
    codec: EnvelopeCodec,
    routes: Vec<Route>,
}

impl CommandProcessor {
    pub fn new(subscriber: Arc<dyn Subscriber>) -> Self {
        Self {
            subscriber,
            codec: EnvelopeCodec,
            routes: Vec::new(),
        }
    }

    pub fn add_handler<C, H>(&mut self, handler: Arc<H>) -> MessagingResult<()>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        if self.routes.iter().any(|r| r.name == C::NAME) {
            return Err(MessagingError::AlreadyRegistered(format!("command {}", C::NAME)));
        }
        let topic = TopicKind::Command.topic(C::NAME)?;

        let codec = self.codec;
        let dispatch: DispatchFn = Arc::new(move |message: Message| {
            let handler = handler.clone();
            Box::pin(async move {
                let cmd: C = codec
                    .decode(C::NAME, &message)
                    .map_err(DispatchError::Decode)?;
                let ctx = AppContext {
                    biz: codec.context_of(&message),
                    idempotency_key: Some(message.uuid.clone()),
                };
                handler
                    .handle(&ctx, cmd)
                    .await
                    .map_err(|err| DispatchError::Handler(err.into()))
            })
        });

        debug!(command = C::NAME, handler = type_name::<H>(), "command handler added");
        self.routes.push(Route {
            kind: TopicKind::Command,
            name: C::NAME,
            consumer_group: topic.clone(),
            topic,
            handler: type_name::<H>().to_owned(),
            subscriber: self.subscriber.clone(),
            dispatch,
        });
        Ok(())
    }
}

impl Processor for CommandProcessor {
    fn routes(&self) -> Vec<Route> {
        self.routes.clone()
    }
}
