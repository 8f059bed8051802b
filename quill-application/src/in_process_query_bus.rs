use crate::{
    context::AppContext, error::AppError, query::Query, query_bus::QueryBus,
    query_handler::QueryHandler,
};
use async_trait::async_trait;
use dashmap::DashMap;
use std::any::{Any, TypeId, type_name};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;

type BoxAnySend = Box<dyn Any + Send>;

type QueryHandlerFuture<'a> =
    Pin<Box<dyn Future<Output = Result<BoxAnySend, AppError>> + Send + 'a>>;

type QueryHandlerFn =
    Arc<dyn for<'a> Fn(BoxAnySend, &'a AppContext) -> QueryHandlerFuture<'a> + Send + Sync>;

type SupportsFn = Arc<dyn Fn(&(dyn Any + Send + Sync)) -> bool + Send + Sync>;

#[derive(Clone)]
struct Registration {
    handler: &'static str,
    supports: SupportsFn,
    call: QueryHandlerFn,
}

/// 进程内（非分布式）的 QueryBus 实现
/// - 通过 TypeId 为每种 Query 维护按注册顺序排列的处理器列表
/// - 分发时选取第一个 `supports` 返回 true 的处理器（先注册者优先）
/// - 以类型擦除方式调度，并在调用端进行结果还原
pub struct InProcessQueryBus {
    handlers: DashMap<TypeId, (&'static str, Vec<Registration>)>,
}

impl Default for InProcessQueryBus {
    fn default() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }
}

impl InProcessQueryBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册查询处理器；同一查询类型可注册多个，按注册顺序参与匹配
    pub fn register<Q, H>(&self, handler: Arc<H>)
    where
        Q: Query,
        H: QueryHandler<Q> + 'static,
    {
        let supports: SupportsFn = {
            let handler = handler.clone();
            Arc::new(move |q| q.downcast_ref::<Q>().is_some_and(|q| handler.supports(q)))
        };

        let call: QueryHandlerFn = Arc::new(move |boxed_q, ctx| {
            let handler = handler.clone();

            Box::pin(async move {
                match boxed_q.downcast::<Q>() {
                    Ok(q) => {
                        let dto = handler.handle(ctx, *q).await?;
                        Ok(Box::new(dto) as BoxAnySend)
                    }
                    Err(_) => Err(AppError::TypeMismatch {
                        expected: type_name::<Q>(),
                        found: "unknown",
                    }),
                }
            })
        });

        let mut entry = self
            .handlers
            .entry(TypeId::of::<Q>())
            .or_insert_with(|| (Q::NAME, Vec::new()));
        entry.1.push(Registration {
            handler: type_name::<H>(),
            supports,
            call,
        });

        debug!(
            query = Q::NAME,
            handler = type_name::<H>(),
            position = entry.1.len() - 1,
            "query handler registered"
        );
    }

    /// 启动期自检：确认某查询类型至少注册了一个处理器
    pub fn ensure_registered<Q>(&self) -> Result<(), AppError>
    where
        Q: Query,
    {
        match self.handlers.get(&TypeId::of::<Q>()) {
            Some(entry) if !entry.1.is_empty() => Ok(()),
            _ => Err(AppError::HandlerNotFound(Q::NAME)),
        }
    }

    /// 获取已注册的查询名列表（只读视图）
    pub fn registered_queries(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|e| e.value().0).collect()
    }
}

#[async_trait]
impl QueryBus for InProcessQueryBus {
    async fn execute<Q>(&self, ctx: &AppContext, q: Q) -> Result<Q::Dto, AppError>
    where
        Q: Query,
    {
        let selected = {
            let Some(entry) = self.handlers.get(&TypeId::of::<Q>()) else {
                return Err(AppError::HandlerNotFound(Q::NAME));
            };
            let candidate: &(dyn Any + Send + Sync) = &q;
            entry.1.iter().find(|r| (r.supports)(candidate)).cloned()
        };

        let Some(registration) = selected else {
            return Err(AppError::HandlerNotFound(Q::NAME));
        };

        debug!(query = Q::NAME, handler = registration.handler, "executing query");
        let out = (registration.call)(Box::new(q), ctx).await?;

        match out.downcast::<Q::Dto>() {
            Ok(dto) => Ok(*dto),
            Err(_) => Err(AppError::TypeMismatch {
                expected: type_name::<Q::Dto>(),
                found: "unknown",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::Dto;
    use serde::Serialize;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::task::JoinSet;

    #[derive(Debug)]
    struct Lookup {
        key: String,
    }

    impl Query for Lookup {
        const NAME: &'static str = "Lookup";
        type Dto = Found;
    }

    #[derive(Debug, PartialEq, Serialize)]
    struct Found {
        by: &'static str,
        hits: usize,
    }

    impl Dto for Found {}

    struct Tagged {
        tag: &'static str,
        prefix: Option<&'static str>,
        hits: AtomicUsize,
    }

    impl Tagged {
        fn new(tag: &'static str, prefix: Option<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                tag,
                prefix,
                hits: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl QueryHandler<Lookup> for Tagged {
        async fn handle(&self, _ctx: &AppContext, q: Lookup) -> Result<Found, AppError> {
            if q.key == "boom" {
                return Err(AppError::Validation("boom is not a key".into()));
            }
            let hits = self.hits.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(Found { by: self.tag, hits })
        }

        fn supports(&self, q: &Lookup) -> bool {
            self.prefix.is_none_or(|p| q.key.starts_with(p))
        }
    }

    fn lookup(key: &str) -> Lookup {
        Lookup { key: key.into() }
    }

    #[tokio::test]
    async fn returns_handler_result_unchanged() {
        let bus = InProcessQueryBus::new();
        bus.register::<Lookup, _>(Tagged::new("only", None));

        let ctx = AppContext::default();
        let found = bus.execute(&ctx, lookup("a")).await.unwrap();
        assert_eq!(found, Found { by: "only", hits: 1 });

        let err = bus.execute(&ctx, lookup("boom")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "boom is not a key"));
    }

    #[tokio::test]
    async fn missing_handler_is_an_error() {
        let bus = InProcessQueryBus::new();
        let err = bus
            .execute(&AppContext::default(), lookup("a"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::HandlerNotFound("Lookup")));
        assert!(bus.ensure_registered::<Lookup>().is_err());
    }

    #[tokio::test]
    async fn first_registered_handler_wins() {
        let bus = InProcessQueryBus::new();
        let first = Tagged::new("first", None);
        let second = Tagged::new("second", None);
        bus.register::<Lookup, _>(first.clone());
        bus.register::<Lookup, _>(second.clone());

        for _ in 0..3 {
            let found = bus.execute(&AppContext::default(), lookup("x")).await.unwrap();
            assert_eq!(found.by, "first");
        }
        assert_eq!(first.hits.load(Ordering::SeqCst), 3);
        assert_eq!(second.hits.load(Ordering::SeqCst), 0);
        assert_eq!(bus.registered_queries(), vec!["Lookup"]);
    }

    #[tokio::test]
    async fn erased_call_rejects_foreign_payload() {
        let bus = InProcessQueryBus::new();
        bus.register::<Lookup, _>(Tagged::new("only", None));

        let call = bus.handlers.get(&TypeId::of::<Lookup>()).unwrap().1[0]
            .call
            .clone();
        let ctx = AppContext::default();
        let err = match call(Box::new(7_u8), &ctx).await {
            Ok(_) => panic!("foreign payload must not reach the handler"),
            Err(err) => err,
        };

        assert!(matches!(
            err,
            AppError::TypeMismatch { expected, found: "unknown" } if expected == type_name::<Lookup>()
        ));
    }

    #[tokio::test]
    async fn supports_predicate_selects_handler() {
        let bus = InProcessQueryBus::new();
        bus.register::<Lookup, _>(Tagged::new("users", Some("user:")));
        bus.register::<Lookup, _>(Tagged::new("posts", Some("post:")));

        let ctx = AppContext::default();
        assert_eq!(bus.execute(&ctx, lookup("post:1")).await.unwrap().by, "posts");
        assert_eq!(bus.execute(&ctx, lookup("user:1")).await.unwrap().by, "users");

        let err = bus.execute(&ctx, lookup("tag:1")).await.unwrap_err();
        assert!(matches!(err, AppError::HandlerNotFound("Lookup")));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_execution_is_safe() {
        let bus = Arc::new(InProcessQueryBus::new());
        let handler = Tagged::new("shared", None);
        bus.register::<Lookup, _>(handler.clone());
        bus.ensure_registered::<Lookup>().unwrap();

        let mut set = JoinSet::new();
        for i in 0..64 {
            let bus = bus.clone();
            set.spawn(async move {
                bus.execute(&AppContext::default(), lookup(&format!("k{i}")))
                    .await
                    .map(|f| f.hits)
            });
        }

        let mut seen = Vec::new();
        while let Some(res) = set.join_next().await {
            seen.push(res.unwrap().unwrap());
        }
        seen.sort_unstable();
        assert_eq!(seen, (1..=64).collect::<Vec<_>>());
        assert_eq!(handler.hits.load(Ordering::SeqCst), 64);
    }
}
