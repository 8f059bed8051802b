use quill_domain::domain_event::BusinessContext;

/// 应用层上下文（Application Context）
///
/// 承载一次应用层调用（命令/查询）所需的横切信息，例如：
/// - 业务语境（`BusinessContext`）：关联追踪 `correlation_id`、因果链 `causation_id`、
///   执行者类型/ID 等；
/// - 幂等键（`idempotency_key`）：经代理投递的命令以消息 ID 作为幂等键。
///
/// 典型用法：
/// ```rust
/// use quill_application::context::AppContext;
/// use quill_domain::domain_event::BusinessContext;
///
/// let ctx = AppContext {
///     biz: BusinessContext::builder()
///         .correlation_id("cor-123")
///         .actor_type("user")
///         .actor_id("u-1")
///         .build(),
///     idempotency_key: None,
/// };
/// assert_eq!(ctx.biz.correlation_id(), Some("cor-123"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct AppContext {
    /// 业务语境（链路追踪、审计主体、操作因果）
    pub biz: BusinessContext,
    /// 幂等键（可选）
    pub idempotency_key: Option<String>,
}
