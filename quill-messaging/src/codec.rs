//! 信封编解码（EnvelopeCodec）
//!
//! 负载为 JSON，元数据携带逻辑名称、发送/发布时间与业务上下文。
//! 解码时逻辑名称必须与路由名称一致，否则视为永久性解码错误。
//!
use crate::error::{MessagingError, MessagingResult};
use crate::message::{Message, keys};
use crate::topic::TopicKind;
use chrono::{SecondsFormat, Utc};
use quill_domain::domain_event::BusinessContext;
use quill_domain::eventing::SerializedEvent;
use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Clone, Copy, Debug, Default)]
pub struct EnvelopeCodec;

impl EnvelopeCodec {
    /// 以新消息 ID 编码命令或事件
    pub fn encode<T>(
        &self,
        kind: TopicKind,
        name: &str,
        ctx: &BusinessContext,
        value: &T,
    ) -> MessagingResult<Message>
    where
        T: Serialize,
    {
        let payload = serde_json::to_vec(value)?;
        Ok(self.envelope(kind, name, Message::new(payload), ctx))
    }

    /// 编码已序列化的领域事件，消息 ID 沿用事件 ID
    pub fn encode_event(
        &self,
        event: &SerializedEvent,
        ctx: &BusinessContext,
    ) -> MessagingResult<Message> {
        let payload = serde_json::to_vec(event.payload())?;
        let message = Message::with_uuid(event.event_id(), payload);
        Ok(self.envelope(TopicKind::Event, event.event_type(), message, ctx))
    }

    fn envelope(
        &self,
        kind: TopicKind,
        name: &str,
        mut message: Message,
        ctx: &BusinessContext,
    ) -> Message {
        message.set_metadata(keys::NAME, name);
        message.set_metadata(
            kind.timestamp_key(),
            Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        );

        // 无关联 ID 时以本消息 ID 开启新的关联链
        let correlation_id = ctx
            .correlation_id()
            .map(str::to_owned)
            .unwrap_or_else(|| message.uuid.clone());
        message.set_metadata(keys::CORRELATION_ID, correlation_id);

        if let Some(actor_type) = ctx.actor_type() {
            message.set_metadata(keys::ACTOR_TYPE, actor_type);
        }
        if let Some(actor_id) = ctx.actor_id() {
            message.set_metadata(keys::ACTOR_ID, actor_id);
        }
        message
    }

    /// 按路由名称解码
    pub fn decode<T>(&self, name: &str, message: &Message) -> MessagingResult<T>
    where
        T: DeserializeOwned,
    {
        let decode_error = |reason: String| MessagingError::Decode {
            uuid: message.uuid.clone(),
            reason,
        };

        match message.name() {
            None => return Err(decode_error("missing name metadata".into())),
            Some(found) if found != name => {
                return Err(decode_error(format!(
                    "name mismatch: expected {name}, found {found}"
                )));
            }
            Some(_) => {}
        }

        serde_json::from_slice(&message.payload).map_err(|e| decode_error(e.to_string()))
    }

    /// 还原业务上下文：因果 ID 为本消息 ID
    pub fn context_of(&self, message: &Message) -> BusinessContext {
        BusinessContext::builder()
            .maybe_correlation_id(message.metadata(keys::CORRELATION_ID))
            .causation_id(message.uuid.as_str())
            .maybe_actor_type(message.metadata(keys::ACTOR_TYPE))
            .maybe_actor_id(message.metadata(keys::ACTOR_ID))
            .build()
    }
}
