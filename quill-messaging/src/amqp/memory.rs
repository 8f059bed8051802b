//! 内存代理（InMemoryBroker）
//!
//! 按 AMQP 0.9.1 的常用语义实现 `Channel`：
//! - 默认交换机、direct 与 fanout 交换机；
//! - 重复声明幂等，参数不一致时返回前置条件失败；
//! - 绑定到不存在的交换机或队列返回未找到；
//! - 投递在结算前处于未确认状态；`reject(requeue = true)` 放回队首，
//!   `reject(requeue = false)` 按队列死信参数转发，未配置死信时丢弃；
//! - `close` 结束全部消费流，未确认消息放回队首。
//!
use super::channel::{Channel, ExchangeKind, FieldTable, TopologyChannel};
use super::{X_DEAD_LETTER_EXCHANGE, X_DEAD_LETTER_ROUTING_KEY};
use crate::error::{MessagingError, MessagingResult};
use crate::message::{Message, keys};
use crate::transport::{Acknowledger, Delivery, DeliveryStream};
use async_trait::async_trait;
use futures_util::stream;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Clone, Default)]
pub struct InMemoryBroker {
    state: Arc<Mutex<BrokerState>>,
    closed: CancellationToken,
}

#[derive(Default)]
struct BrokerState {
    exchanges: HashMap<String, ExchangeState>,
    queues: HashMap<String, QueueState>,
    next_tag: u64,
}

struct ExchangeState {
    kind: ExchangeKind,
    durable: bool,
    /// (队列, 路由键)
    bindings: Vec<(String, String)>,
}

struct QueueState {
    durable: bool,
    arguments: FieldTable,
    ready: VecDeque<Ready>,
    unacked: HashMap<u64, Message>,
    notify: Arc<Notify>,
}

struct Ready {
    message: Message,
    redelivered: bool,
}

impl QueueState {
    fn push_back(&mut self, message: Message) {
        self.ready.push_back(Ready {
            message,
            redelivered: false,
        });
        self.notify.notify_one();
    }

    fn push_front(&mut self, message: Message) {
        self.ready.push_front(Ready {
            message,
            redelivered: true,
        });
        self.notify.notify_one();
    }
}

impl BrokerState {
    fn queue_mut(&mut self, queue: &str) -> MessagingResult<&mut QueueState> {
        self.queues
            .get_mut(queue)
            .ok_or_else(|| MessagingError::NotFound(format!("queue {queue}")))
    }

    /// 路由消息，返回命中的队列数；默认交换机上无同名队列时丢弃
    fn route(&mut self, exchange: &str, routing_key: &str, message: Message) -> MessagingResult<usize> {
        let targets: Vec<String> = if exchange.is_empty() {
            self.queues
                .contains_key(routing_key)
                .then(|| routing_key.to_owned())
                .into_iter()
                .collect()
        } else {
            let ex = self
                .exchanges
                .get(exchange)
                .ok_or_else(|| MessagingError::NotFound(format!("exchange {exchange}")))?;
            let mut targets: Vec<String> = ex
                .bindings
                .iter()
                .filter(|(_, key)| ex.kind == ExchangeKind::Fanout || key == routing_key)
                .map(|(queue, _)| queue.clone())
                .collect();
            targets.sort();
            targets.dedup();
            targets
        };

        for queue in &targets {
            if let Some(state) = self.queues.get_mut(queue) {
                state.push_back(message.clone());
            }
        }
        Ok(targets.len())
    }

    /// 从队首取出一条消息并登记为未确认
    fn take(&mut self, queue: &str) -> MessagingResult<Option<(u64, Ready)>> {
        self.next_tag += 1;
        let tag = self.next_tag;
        let state = self.queue_mut(queue)?;
        let Some(ready) = state.ready.pop_front() else {
            return Ok(None);
        };
        state.unacked.insert(tag, ready.message.clone());
        // 队列仍有积压时唤醒下一个消费者
        if !state.ready.is_empty() {
            state.notify.notify_one();
        }
        Ok(Some((tag, ready)))
    }

    fn settle(&mut self, queue: &str, tag: u64) -> MessagingResult<Message> {
        self.queue_mut(queue)?
            .unacked
            .remove(&tag)
            .ok_or_else(|| MessagingError::PreconditionFailed(format!("unknown delivery tag {tag}")))
    }

    fn dead_letter(&mut self, queue: &str, mut message: Message) -> MessagingResult<()> {
        let arguments = &self.queue_mut(queue)?.arguments;
        let Some(exchange) = arguments
            .get(X_DEAD_LETTER_EXCHANGE)
            .and_then(|v| v.as_str())
            .map(str::to_owned)
        else {
            debug!(queue, message_id = %message.uuid, "rejected message dropped, no dead letter exchange");
            return Ok(());
        };
        let routing_key = arguments
            .get(X_DEAD_LETTER_ROUTING_KEY)
            .and_then(|v| v.as_str())
            .map_or_else(|| queue.to_owned(), str::to_owned);

        message.set_metadata(keys::DEATH_QUEUE, queue);
        message.set_metadata(keys::DEATH_REASON, "rejected");
        let message_id = message.uuid.clone();

        match self.route(&exchange, &routing_key, message) {
            Ok(0) => warn!(queue, %exchange, %routing_key, %message_id, "dead letter unroutable, dropped"),
            Ok(_) => debug!(queue, %exchange, %routing_key, %message_id, "message dead-lettered"),
            Err(err) => warn!(queue, %exchange, %message_id, error = %err, "dead letter exchange missing, dropped"),
        }
        Ok(())
    }
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BrokerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_open(&self) -> MessagingResult<()> {
        if self.closed.is_cancelled() {
            return Err(MessagingError::ChannelClosed);
        }
        Ok(())
    }

    fn delivery(&self, queue: &str, tag: u64, ready: Ready) -> Delivery {
        Delivery {
            message: ready.message,
            redelivered: ready.redelivered,
            acker: Box::new(MemoryAcker {
                broker: self.clone(),
                queue: queue.to_owned(),
                tag,
            }),
        }
    }

    // --- 观测接口 ---

    pub fn has_queue(&self, queue: &str) -> bool {
        self.lock().queues.contains_key(queue)
    }

    pub fn exchange_kind(&self, exchange: &str) -> Option<ExchangeKind> {
        self.lock().exchanges.get(exchange).map(|e| e.kind)
    }

    pub fn queue_arguments(&self, queue: &str) -> Option<FieldTable> {
        self.lock().queues.get(queue).map(|q| q.arguments.clone())
    }

    /// 交换机上的绑定 (队列, 路由键)
    pub fn bindings(&self, exchange: &str) -> Vec<(String, String)> {
        self.lock()
            .exchanges
            .get(exchange)
            .map(|e| e.bindings.clone())
            .unwrap_or_default()
    }

    pub fn ready_count(&self, queue: &str) -> usize {
        self.lock().queues.get(queue).map_or(0, |q| q.ready.len())
    }

    pub fn unacked_count(&self, queue: &str) -> usize {
        self.lock().queues.get(queue).map_or(0, |q| q.unacked.len())
    }

    /// 待投递消息快照（队首在前）
    pub fn ready_messages(&self, queue: &str) -> Vec<Message> {
        self.lock()
            .queues
            .get(queue)
            .map(|q| q.ready.iter().map(|r| r.message.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TopologyChannel for InMemoryBroker {
    async fn exchange_declare(
        &self,
        name: &str,
        kind: ExchangeKind,
        durable: bool,
    ) -> MessagingResult<()> {
        self.ensure_open()?;
        if name.is_empty() {
            return Err(MessagingError::PreconditionFailed(
                "cannot redeclare the default exchange".into(),
            ));
        }

        let mut state = self.lock();
        match state.exchanges.get(name) {
            Some(ex) if ex.kind == kind && ex.durable == durable => Ok(()),
            Some(ex) => Err(MessagingError::PreconditionFailed(format!(
                "exchange {name} already declared as {} (durable={})",
                ex.kind, ex.durable
            ))),
            None => {
                state.exchanges.insert(
                    name.to_owned(),
                    ExchangeState {
                        kind,
                        durable,
                        bindings: Vec::new(),
                    },
                );
                Ok(())
            }
        }
    }

    async fn queue_declare(
        &self,
        name: &str,
        durable: bool,
        arguments: FieldTable,
    ) -> MessagingResult<()> {
        self.ensure_open()?;
        if name.is_empty() {
            return Err(MessagingError::PreconditionFailed(
                "queue name must not be empty".into(),
            ));
        }

        let mut state = self.lock();
        match state.queues.get(name) {
            Some(q) if q.durable == durable && q.arguments == arguments => Ok(()),
            Some(_) => Err(MessagingError::PreconditionFailed(format!(
                "queue {name} already declared with different parameters"
            ))),
            None => {
                state.queues.insert(
                    name.to_owned(),
                    QueueState {
                        durable,
                        arguments,
                        ready: VecDeque::new(),
                        unacked: HashMap::new(),
                        notify: Arc::new(Notify::new()),
                    },
                );
                Ok(())
            }
        }
    }

    async fn queue_bind(&self, queue: &str, exchange: &str, routing_key: &str) -> MessagingResult<()> {
        self.ensure_open()?;
        if exchange.is_empty() {
            return Err(MessagingError::PreconditionFailed(
                "cannot bind to the default exchange".into(),
            ));
        }

        let mut state = self.lock();
        if !state.queues.contains_key(queue) {
            return Err(MessagingError::NotFound(format!("queue {queue}")));
        }
        let ex = state
            .exchanges
            .get_mut(exchange)
            .ok_or_else(|| MessagingError::NotFound(format!("exchange {exchange}")))?;

        let binding = (queue.to_owned(), routing_key.to_owned());
        if !ex.bindings.contains(&binding) {
            ex.bindings.push(binding);
        }
        Ok(())
    }
}

#[async_trait]
impl Channel for InMemoryBroker {
    async fn basic_publish(
        &self,
        exchange: &str,
        routing_key: &str,
        message: Message,
    ) -> MessagingResult<()> {
        self.ensure_open()?;
        let message_id = message.uuid.clone();
        let routed = self.lock().route(exchange, routing_key, message)?;
        if routed == 0 {
            debug!(exchange, routing_key, %message_id, "message unroutable, dropped");
        }
        Ok(())
    }

    async fn basic_consume(&self, queue: &str, consumer_tag: &str) -> MessagingResult<DeliveryStream> {
        self.ensure_open()?;
        let notify = self.lock().queue_mut(queue)?.notify.clone();
        debug!(queue, consumer_tag, "consumer attached");

        let state = (self.clone(), queue.to_owned(), notify);
        let deliveries = stream::unfold(state, |(broker, queue, notify)| async move {
            loop {
                if broker.closed.is_cancelled() {
                    return None;
                }
                let taken = broker.lock().take(&queue);
                match taken {
                    Ok(Some((tag, ready))) => {
                        let delivery = broker.delivery(&queue, tag, ready);
                        return Some((Ok(delivery), (broker, queue, notify)));
                    }
                    Ok(None) => {}
                    Err(err) => return Some((Err(err), (broker, queue, notify))),
                }
                tokio::select! {
                    _ = broker.closed.cancelled() => return None,
                    _ = notify.notified() => {}
                }
            }
        });
        Ok(Box::pin(deliveries))
    }

    async fn basic_get(&self, queue: &str) -> MessagingResult<Option<Delivery>> {
        self.ensure_open()?;
        let taken = self.lock().take(queue)?;
        Ok(taken.map(|(tag, ready)| self.delivery(queue, tag, ready)))
    }

    async fn close(&self) -> MessagingResult<()> {
        let mut state = self.lock();
        for queue in state.queues.values_mut() {
            let mut unacked: Vec<(u64, Message)> = queue.unacked.drain().collect();
            unacked.sort_by_key(|(tag, _)| std::cmp::Reverse(*tag));
            for (_, message) in unacked {
                queue.push_front(message);
            }
        }
        self.closed.cancel();
        debug!("in-memory broker closed");
        Ok(())
    }
}

struct MemoryAcker {
    broker: InMemoryBroker,
    queue: String,
    tag: u64,
}

#[async_trait]
impl Acknowledger for MemoryAcker {
    async fn ack(&self) -> MessagingResult<()> {
        self.broker.ensure_open()?;
        self.broker.lock().settle(&self.queue, self.tag)?;
        Ok(())
    }

    async fn reject(&self, requeue: bool) -> MessagingResult<()> {
        self.broker.ensure_open()?;
        let mut state = self.broker.lock();
        let message = state.settle(&self.queue, self.tag)?;
        if requeue {
            state.queue_mut(&self.queue)?.push_front(message);
            Ok(())
        } else {
            state.dead_letter(&self.queue, message)
        }
    }
}
