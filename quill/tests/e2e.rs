use quill::config::AppConfig;
use quill::{Container, ContainerError};
use quill_application::activity::ListRecentActivityQuery;
use quill_application::command_bus::CommandBus;
use quill_application::context::AppContext;
use quill_application::error::AppError;
use quill_application::post::{
    CreatePostCommand, DeletePostCommand, FindAllByQuery, GetPostQuery, UpdatePostCommand,
};
use quill_application::query_bus::QueryBus;
use quill_application::user::{CreateUserCommand, FindUserByQuery};
use quill_application::view::PostView;
use quill_domain::domain_event::BusinessContext;
use quill_messaging::amqp::{Channel, InMemoryBroker};
use quill_messaging::message::keys;
use quill_messaging::RouterHandle;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use uuid::Uuid;

struct App {
    broker: InMemoryBroker,
    container: Container,
    handle: Option<RouterHandle>,
}

impl App {
    async fn start() -> Self {
        let broker = InMemoryBroker::new();
        let channel: Arc<dyn Channel> = Arc::new(broker.clone());
        let mut container = Container::build(&AppConfig::default(), channel).unwrap();
        let handle = container.start().await.unwrap();
        Self {
            broker,
            container,
            handle: Some(handle),
        }
    }

    async fn send<C: quill_application::command::Command>(&self, cmd: C) {
        self.container.command_bus.send(&ctx(), cmd).await.unwrap();
    }

    async fn stop(mut self) {
        if let Some(handle) = self.handle.take() {
            self.container.stop(handle).await.unwrap();
        }
    }

    async fn drained(&self, queue: &str) {
        eventually(|| self.broker.ready_count(queue) == 0 && self.broker.unacked_count(queue) == 0)
            .await;
    }
}

fn ctx() -> AppContext {
    AppContext {
        biz: BusinessContext::builder()
            .correlation_id("e2e")
            .actor_type("user")
            .actor_id("tester")
            .build(),
        idempotency_key: None,
    }
}

async fn eventually(mut check: impl FnMut() -> bool) {
    timeout(Duration::from_secs(5), async {
        while !check() {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not met in time");
}

fn create_user(id: Uuid, name: &str) -> CreateUserCommand {
    CreateUserCommand {
        id,
        email: format!("{}@example.com", name.to_lowercase()),
        password: "hunter2".into(),
        provider: "github".into(),
        name: name.into(),
        first_name: name.into(),
        last_name: "Tester".into(),
        provider_user_id: format!("gh-{id}"),
        avatar_url: String::new(),
    }
}

fn create_post(id: Uuid, author: Uuid, slug: &str) -> CreatePostCommand {
    CreatePostCommand {
        id,
        slug: slug.into(),
        title: format!("Title of {slug}"),
        content: "body".into(),
        author,
    }
}

/// 读模型最终一致：NotFound 时重试直到超时
async fn until_found<T, F, Fut>(mut query: F) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    timeout(Duration::from_secs(5), async {
        loop {
            match query().await {
                Ok(found) => return found,
                Err(AppError::NotFound { .. }) => sleep(Duration::from_millis(10)).await,
                Err(err) => panic!("unexpected error: {err}"),
            }
        }
    })
    .await
    .expect("read model never caught up")
}

async fn wait_for_post(app: &App, id: Uuid) -> PostView {
    let ctx = ctx();
    until_found(|| app.container.query_bus.execute(&ctx, GetPostQuery { id })).await
}

#[tokio::test(flavor = "multi_thread")]
async fn created_post_becomes_queryable() {
    let app = App::start().await;
    let author = Uuid::new_v4();
    let post_id = Uuid::new_v4();

    app.send(create_user(author, "Grace")).await;
    app.send(create_post(post_id, author, "hello-world")).await;

    let view = wait_for_post(&app, post_id).await;
    assert_eq!(view.id, post_id);
    assert_eq!(view.slug, "hello-world");
    assert_eq!(view.author_id, author);

    let lookup = ctx();
    let user = until_found(|| {
        app.container.query_bus.execute(
            &lookup,
            FindUserByQuery {
                provider_user_id: format!("gh-{author}"),
                email: "grace@example.com".into(),
            },
        )
    })
    .await;
    assert_eq!(user.name, "Grace");

    let page = app
        .container
        .query_bus
        .execute(
            &ctx(),
            FindAllByQuery {
                page: 1,
                page_size: 10,
                slug: None,
                text: Some("Title of hello".into()),
                author: Some("Gra".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0], view);

    app.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn activity_feed_follows_the_command_chain() {
    let app = App::start().await;
    let author = Uuid::new_v4();
    let post_id = Uuid::new_v4();

    app.send(create_user(author, "Ada")).await;
    app.send(create_post(post_id, author, "draft")).await;
    wait_for_post(&app, post_id).await;
    app.send(UpdatePostCommand {
        id: post_id,
        slug: "final".into(),
        title: "Final".into(),
        content: "done".into(),
    })
    .await;

    let feed = timeout(Duration::from_secs(5), async {
        loop {
            let feed = app
                .container
                .query_bus
                .execute(&ctx(), ListRecentActivityQuery { limit: 10 })
                .await
                .unwrap();
            if feed.items.len() == 3 {
                return feed;
            }
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("activity feed incomplete");

    let mut types: Vec<_> = feed.items.iter().map(|a| a.event_type.as_str()).collect();
    types.sort_unstable();
    assert_eq!(types, ["PostWasCreated", "PostWasUpdated", "UserWasCreated"]);
    assert!(
        feed.items
            .iter()
            .all(|a| a.correlation_id.as_deref() == Some("e2e"))
    );
    assert_eq!(wait_for_post(&app, post_id).await.slug, "final");

    app.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_create_is_acknowledged_without_second_event() {
    let app = App::start().await;
    let author = Uuid::new_v4();
    let post_id = Uuid::new_v4();

    let first = CreatePostCommand {
        id: post_id,
        slug: "abc".into(),
        title: "Hello World".into(),
        content: "0123456789".into(),
        author,
    };
    app.send(first.clone()).await;
    wait_for_post(&app, post_id).await;
    app.send(create_post(post_id, author, "twice")).await;
    app.drained("commands.CreatePostCommand").await;
    app.drained("events.PostWasCreated.activity_recorder").await;

    let stored = wait_for_post(&app, post_id).await;
    assert_eq!(
        (stored.slug.as_str(), stored.title.as_str(), stored.content.as_str()),
        ("abc", "Hello World", "0123456789")
    );
    assert_eq!(stored.author_id, first.author);
    assert_eq!(app.broker.ready_count("commands.CreatePostCommand.dlq"), 0);

    let feed = app
        .container
        .query_bus
        .execute(&ctx(), ListRecentActivityQuery { limit: 10 })
        .await
        .unwrap();
    assert_eq!(feed.items.len(), 1);
    assert_eq!(feed.items[0].event_type, "PostWasCreated");
    assert_eq!(feed.items[0].aggregate_id, post_id.to_string());

    app.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_missing_post_is_dead_lettered() {
    let app = App::start().await;
    let missing = Uuid::new_v4();

    app.send(DeletePostCommand { id: missing }).await;
    eventually(|| app.broker.ready_count("commands.DeletePostCommand.dlq") == 1).await;

    let parked = app
        .broker
        .ready_messages("commands.DeletePostCommand.dlq")
        .remove(0);
    assert_eq!(parked.name(), Some("DeletePostCommand"));
    assert_eq!(parked.metadata(keys::CORRELATION_ID), Some("e2e"));

    app.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn replay_after_fix_completes_the_command() {
    let app = App::start().await;
    let author = Uuid::new_v4();
    let post_id = Uuid::new_v4();

    // 帖子尚不存在，更新进入死信队列
    app.send(UpdatePostCommand {
        id: post_id,
        slug: "late".into(),
        title: "Late".into(),
        content: "arrived after".into(),
    })
    .await;
    eventually(|| app.broker.ready_count("commands.UpdatePostCommand.dlq") == 1).await;

    app.send(create_post(post_id, author, "early")).await;
    wait_for_post(&app, post_id).await;

    let replayed = app
        .container
        .replayer()
        .replay("commands.UpdatePostCommand", None)
        .await
        .unwrap();
    assert_eq!(replayed, 1);

    eventually(|| app.broker.ready_count("commands.UpdatePostCommand.dlq") == 0).await;
    app.drained("commands.UpdatePostCommand").await;
    assert_eq!(wait_for_post(&app, post_id).await.slug, "late");

    app.stop().await;
}

#[tokio::test]
async fn router_starts_only_once() {
    let channel: Arc<dyn Channel> = Arc::new(InMemoryBroker::new());
    let mut container = Container::build(&AppConfig::default(), channel).unwrap();

    let handle = container.start().await.unwrap();
    assert!(matches!(
        container.start().await,
        Err(ContainerError::AlreadyStarted)
    ));
    container.stop(handle).await.unwrap();
}

#[tokio::test]
async fn demo_scenario_round_trips() {
    let app = App::start().await;
    let view = quill::demo::run(&app.container).await.unwrap();
    assert_eq!(view.slug, "hello-quill");
    app.stop().await;
}

#[cfg(not(feature = "amqp"))]
#[tokio::test]
async fn amqp_transport_needs_the_feature() {
    let mut config = AppConfig::default();
    config.broker.transport = quill::config::Transport::Amqp;

    let err = quill::open_channel(&config.broker).await.err().unwrap();
    assert!(matches!(err, ContainerError::AmqpDisabled));
}
