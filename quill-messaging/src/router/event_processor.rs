use super::route::{DispatchError, DispatchFn, Processor, Route};
use crate::codec::EnvelopeCodec;
use crate::error::{MessagingError, MessagingResult};
use crate::message::Message;
use crate::topic::TopicKind;
use crate::transport::Subscriber;
use quill_domain::domain_event::DomainEvent;
use quill_domain::eventing::EventHandler;
use std::sync::Arc;
use tracing::debug;

/// 事件处理器：同一事件可注册任意多个处理器，各自以处理器名称作为消费组
pub struct EventProcessor {
    subscriber: Arc<dyn Subscriber>,
    codec: EnvelopeCodec,
    routes: Vec<Route>,
}

impl EventProcessor {
    pub fn new(subscriber: Arc<dyn Subscriber>) -> Self {
        Self {
            subscriber,
            codec: EnvelopeCodec,
            routes: Vec::new(),
        }
    }

    pub fn add_handler<E, H>(&mut self, handler: Arc<H>) -> MessagingResult<()>
    where
        E: DomainEvent,
        H: EventHandler<E> + 'static,
    {
        let handler_name = handler.handler_name().to_owned();
        if self
            .routes
            .iter()
            .any(|r| r.name == E::NAME && r.consumer_group == handler_name)
        {
            return Err(MessagingError::AlreadyRegistered(format!(
                "event {} handler {handler_name}",
                E::NAME
            )));
        }
        let topic = TopicKind::Event.topic(E::NAME)?;

        let codec = self.codec;
        let dispatch: DispatchFn = Arc::new(move |message: Message| {
            let handler = handler.clone();
            Box::pin(async move {
                let event: E = codec
                    .decode(E::NAME, &message)
                    .map_err(DispatchError::Decode)?;
                let ctx = codec.context_of(&message);
                handler
                    .handle(&ctx, event)
                    .await
                    .map_err(DispatchError::Handler)
            })
        });

        debug!(event = E::NAME, handler = %handler_name, "event handler added");
        self.routes.push(Route {
            kind: TopicKind::Event,
            name: E::NAME,
            topic,
            consumer_group: handler_name.clone(),
            handler: handler_name,
            subscriber: self.subscriber.clone(),
            dispatch,
        });
        Ok(())
    }
}

impl Processor for EventProcessor {
    fn routes(&self) -> Vec<Route> {
        self.routes.clone()
    }
}
