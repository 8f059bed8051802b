//! 路由器（Router）
//!
//! - `run` 先订阅全部路由（全有或全无），再为每条路由启动一个消费循环；
//! - 每条投递在独立任务中处理，由 `TaskTracker` 跟踪；
//! - 每条路由以信号量限制在途处理数（`max_in_flight`）；
//! - `RouterHandle::shutdown` 停止接收新投递，`join` 等待消费循环与全部在途处理结束。
//!
use super::route::{DispatchError, Outcome, Processor, Route};
use crate::error::{MessagingError, MessagingResult};
use crate::transport::{Delivery, DeliveryStream};
use futures_util::{FutureExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

/// 路由器配置
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// 拒绝时不重新入队，消息经死信路由进入死信队列
    pub no_requeue_on_reject: bool,
    /// 单条路由的在途处理上限
    pub max_in_flight: usize,
    /// 捕获处理器 panic 并按失败拒绝
    pub recover_panics: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            no_requeue_on_reject: true,
            max_in_flight: 16,
            recover_panics: true,
        }
    }
}

pub struct Router {
    config: RouterConfig,
    routes: Vec<Route>,
}

impl Router {
    pub fn new(config: RouterConfig) -> Self {
        Self {
            config,
            routes: Vec::new(),
        }
    }

    /// 收集处理器的路由；(主题, 消费组) 重复时报错
    pub fn add_processor(&mut self, processor: &dyn Processor) -> MessagingResult<()> {
        for route in processor.routes() {
            if self
                .routes
                .iter()
                .any(|r| r.topic == route.topic && r.consumer_group == route.consumer_group)
            {
                return Err(MessagingError::DuplicateRoute {
                    topic: route.topic,
                    consumer_group: route.consumer_group,
                });
            }
            self.routes.push(route);
        }
        Ok(())
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// 启动路由器，返回可用于关闭/等待的句柄
    pub async fn run(self) -> MessagingResult<RouterHandle> {
        let mut subscribed: Vec<(Arc<Route>, DeliveryStream)> = Vec::with_capacity(self.routes.len());
        for route in self.routes {
            let stream = route
                .subscriber
                .subscribe(&route.topic, &route.consumer_group)
                .await?;
            debug!(topic = %route.topic, consumer_group = %route.consumer_group, "route subscribed");
            subscribed.push((Arc::new(route), stream));
        }

        let token = CancellationToken::new();
        let tracker = TaskTracker::new();
        let route_count = subscribed.len();
        let loops = subscribed
            .into_iter()
            .map(|(route, stream)| {
                tokio::spawn(consume_loop(
                    route,
                    stream,
                    self.config,
                    token.clone(),
                    tracker.clone(),
                ))
            })
            .collect();

        info!(routes = route_count, "router started");
        Ok(RouterHandle {
            token,
            loops,
            tracker,
        })
    }
}

async fn consume_loop(
    route: Arc<Route>,
    mut stream: DeliveryStream,
    config: RouterConfig,
    token: CancellationToken,
    tracker: TaskTracker,
) {
    let permits = Arc::new(Semaphore::new(config.max_in_flight.max(1)));

    loop {
        let permit = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            permit = permits.clone().acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => break,
            },
        };

        let next = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            next = stream.next() => next,
        };

        match next {
            Some(Ok(delivery)) => {
                let route = route.clone();
                tracker.spawn(async move {
                    process(&route, delivery, &config).await;
                    drop(permit);
                });
            }
            Some(Err(err)) => {
                warn!(topic = %route.topic, error = %err, "cannot receive delivery");
            }
            None => {
                info!(topic = %route.topic, "delivery stream ended");
                break;
            }
        }
    }

    debug!(topic = %route.topic, consumer_group = %route.consumer_group, "consumer loop stopped");
}

/// 处理单条投递：解码、分发、结算
pub(crate) async fn process(route: &Route, delivery: Delivery, config: &RouterConfig) -> Outcome {
    let Delivery {
        message,
        redelivered,
        acker,
    } = delivery;
    let message_id = message.uuid.clone();
    let started = Instant::now();

    let dispatched = (route.dispatch)(message);
    let result = if config.recover_panics {
        match AssertUnwindSafe(dispatched).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => Err(DispatchError::Panicked(panic_message(panic.as_ref()))),
        }
    } else {
        dispatched.await
    };
    let duration_ms = started.elapsed().as_millis() as u64;

    let outcome = match &result {
        Ok(()) => {
            info!(
                kind = %route.kind,
                name = route.name,
                handler = %route.handler,
                %message_id,
                redelivered,
                duration_ms,
                "message handled"
            );
            Outcome::Acknowledged
        }
        Err(err) => {
            let requeue = !config.no_requeue_on_reject;
            warn!(
                kind = %route.kind,
                name = route.name,
                handler = %route.handler,
                %message_id,
                redelivered,
                duration_ms,
                requeue,
                error = %err,
                "message rejected"
            );
            Outcome::Rejected { requeue }
        }
    };

    let settled = match outcome {
        Outcome::Acknowledged => acker.ack().await,
        Outcome::Rejected { requeue } => acker.reject(requeue).await,
    };
    if let Err(err) = settled {
        error!(topic = %route.topic, %message_id, error = %err, "cannot settle delivery");
    }

    outcome
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}

/// 路由器运行句柄：用于优雅关闭与等待任务结束
pub struct RouterHandle {
    token: CancellationToken,
    loops: Vec<JoinHandle<()>>,
    tracker: TaskTracker,
}

impl RouterHandle {
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    pub async fn join(mut self) {
        let loops = std::mem::take(&mut self.loops);
        for l in loops {
            let _ = l.await;
        }

        self.tracker.close();
        self.tracker.wait().await;
        info!("router stopped");
    }
}

impl Drop for RouterHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
