//! 拓扑构建（TopologyBuilder）
//!
//! 按固定顺序声明：
//! 1. 死信交换机（direct，持久化）；
//! 2. 死信队列 `<queue>.<queue_suffix>`，以路由键 `<queue>.<routing_key_suffix>` 绑定到死信交换机；
//! 3. 主队列，参数在调用方参数基础上合并死信交换机与死信路由键；
//! 4. 若指定交换机，声明交换机并绑定主队列。
//!
//! 任一步失败即中止，错误信息标明失败对象。
//!
use super::channel::{ExchangeKind, FieldTable, TopologyChannel};
use super::{X_DEAD_LETTER_EXCHANGE, X_DEAD_LETTER_ROUTING_KEY};
use crate::error::{MessagingError, MessagingResult};
use bon::Builder;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 死信命名配置
#[derive(Builder, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeadLetterConfig {
    #[builder(into, default = "dlx".to_owned())]
    pub exchange: String,
    #[builder(into, default = "dlq".to_owned())]
    pub queue_suffix: String,
    #[builder(into, default = "dlx".to_owned())]
    pub routing_key_suffix: String,
}

impl Default for DeadLetterConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl DeadLetterConfig {
    pub fn queue_for(&self, queue: &str) -> String {
        format!("{queue}.{}", self.queue_suffix)
    }

    pub fn routing_key_for(&self, queue: &str) -> String {
        format!("{queue}.{}", self.routing_key_suffix)
    }
}

/// 主队列声明参数
#[derive(Builder, Clone, Debug, PartialEq, Eq)]
pub struct TopologyParams {
    #[builder(into)]
    pub queue: String,
    #[builder(default = true)]
    pub durable: bool,
    /// 调用方提供的队列参数，死信参数会合并进来
    #[builder(default)]
    pub arguments: FieldTable,
    /// 为空时使用默认交换机，跳过绑定
    #[builder(into)]
    pub exchange: Option<String>,
    #[builder(default = ExchangeKind::Direct)]
    pub exchange_kind: ExchangeKind,
    #[builder(into, default)]
    pub routing_key: String,
}

/// 拓扑描述：一次构建实际声明的对象
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Topology {
    pub queue: String,
    pub queue_arguments: FieldTable,
    pub dead_letter_exchange: String,
    pub dead_letter_queue: String,
    pub dead_letter_routing_key: String,
    /// (交换机, 路由键)
    pub binding: Option<(String, String)>,
}

#[derive(Clone, Debug, Default)]
pub struct TopologyBuilder {
    dead_letter: DeadLetterConfig,
}

impl TopologyBuilder {
    pub fn new(dead_letter: DeadLetterConfig) -> Self {
        Self { dead_letter }
    }

    pub fn dead_letter(&self) -> &DeadLetterConfig {
        &self.dead_letter
    }

    /// 计算拓扑描述（纯函数，不访问代理）
    pub fn describe(&self, params: &TopologyParams) -> Topology {
        let dead_letter_queue = self.dead_letter.queue_for(&params.queue);
        let dead_letter_routing_key = self.dead_letter.routing_key_for(&params.queue);

        let mut queue_arguments = params.arguments.clone();
        queue_arguments.insert(
            X_DEAD_LETTER_EXCHANGE.to_owned(),
            self.dead_letter.exchange.as_str().into(),
        );
        queue_arguments.insert(
            X_DEAD_LETTER_ROUTING_KEY.to_owned(),
            dead_letter_routing_key.as_str().into(),
        );

        Topology {
            queue: params.queue.clone(),
            queue_arguments,
            dead_letter_exchange: self.dead_letter.exchange.clone(),
            dead_letter_queue,
            dead_letter_routing_key,
            binding: params
                .exchange
                .as_ref()
                .filter(|exchange| !exchange.is_empty())
                .map(|exchange| (exchange.clone(), params.routing_key.clone())),
        }
    }

    /// 在代理上声明拓扑
    pub async fn build<C>(&self, channel: &C, params: &TopologyParams) -> MessagingResult<Topology>
    where
        C: TopologyChannel + ?Sized,
    {
        let topology = self.describe(params);
        let dlx = &topology.dead_letter_exchange;
        let dlq = &topology.dead_letter_queue;
        let dlrk = &topology.dead_letter_routing_key;

        channel
            .exchange_declare(dlx, ExchangeKind::Direct, true)
            .await
            .map_err(|e| MessagingError::topology(format!("cannot declare dlx exchange {dlx}"), e))?;
        debug!(exchange = %dlx, "dead letter exchange declared");

        channel
            .queue_declare(dlq, true, FieldTable::new())
            .await
            .map_err(|e| MessagingError::topology(format!("cannot declare dlq queue {dlq}"), e))?;
        channel.queue_bind(dlq, dlx, dlrk).await.map_err(|e| {
            MessagingError::topology(
                format!("cannot bind dlq queue {dlq} to exchange {dlx} with routing key {dlrk}"),
                e,
            )
        })?;
        debug!(queue = %dlq, routing_key = %dlrk, "dead letter queue declared");

        let queue = &topology.queue;
        channel
            .queue_declare(queue, params.durable, topology.queue_arguments.clone())
            .await
            .map_err(|e| MessagingError::topology(format!("cannot declare queue {queue}"), e))?;
        debug!(queue = %queue, "queue declared");

        if let Some((exchange, routing_key)) = &topology.binding {
            channel
                .exchange_declare(exchange, params.exchange_kind, params.durable)
                .await
                .map_err(|e| {
                    MessagingError::topology(format!("cannot declare exchange {exchange}"), e)
                })?;
            channel
                .queue_bind(queue, exchange, routing_key)
                .await
                .map_err(|e| {
                    MessagingError::topology(
                        format!(
                            "cannot bind queue {queue} to exchange {exchange} with routing key {routing_key}"
                        ),
                        e,
                    )
                })?;
            debug!(queue = %queue, exchange = %exchange, routing_key = %routing_key, "queue bound");
        }

        Ok(topology)
    }
}
