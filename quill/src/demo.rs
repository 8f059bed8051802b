//! 演示流程：创建用户与帖子，随后经查询总线读回帖子
use crate::container::Container;
use anyhow::{Context, bail};
use quill_application::command_bus::CommandBus;
use quill_application::context::AppContext;
use quill_application::error::AppError;
use quill_application::post::{CreatePostCommand, GetPostQuery};
use quill_application::query_bus::QueryBus;
use quill_application::user::CreateUserCommand;
use quill_application::view::PostView;
use quill_domain::domain_event::BusinessContext;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::info;
use uuid::Uuid;

const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// 发送命令后轮询读模型，直到帖子可见或超时
///
/// 调用方负责启动路由器；命令经代理异步处理，因此读回需要等待。
pub async fn run(container: &Container) -> anyhow::Result<PostView> {
    let ctx = AppContext {
        biz: BusinessContext::builder()
            .correlation_id(Uuid::new_v4().to_string())
            .actor_type("system")
            .actor_id("quill-demo")
            .build(),
        idempotency_key: None,
    };

    let author = Uuid::new_v4();
    container
        .command_bus
        .send(
            &ctx,
            CreateUserCommand {
                id: author,
                email: "ada@example.com".into(),
                password: "changeme".into(),
                provider: "local".into(),
                name: "Ada Lovelace".into(),
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                provider_user_id: "ada".into(),
                avatar_url: String::new(),
            },
        )
        .await
        .context("cannot send CreateUserCommand")?;

    let post_id = Uuid::new_v4();
    container
        .command_bus
        .send(
            &ctx,
            CreatePostCommand {
                id: post_id,
                slug: "hello-quill".into(),
                title: "Hello, quill".into(),
                content: "Commands travel through the broker, queries stay in process.".into(),
                author,
            },
        )
        .await
        .context("cannot send CreatePostCommand")?;
    info!(%post_id, "demo commands sent");

    let deadline = Instant::now() + READ_TIMEOUT;
    loop {
        match container
            .query_bus
            .execute(&ctx, GetPostQuery { id: post_id })
            .await
        {
            Ok(view) => return Ok(view),
            Err(AppError::NotFound { .. }) if Instant::now() < deadline => {
                sleep(Duration::from_millis(50)).await;
            }
            Err(AppError::NotFound { .. }) => {
                bail!("post {post_id} not visible after {READ_TIMEOUT:?}")
            }
            Err(err) => return Err(err.into()),
        }
    }
}
