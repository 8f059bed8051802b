use crate::dto::Dto;

/// 应用层查询（Query）
///
/// 表达只读意图，不改变领域状态。
/// - 在调用方任务内同步解析，从不经过消息代理；
/// - 结果返回 [`Dto`](crate::dto::Dto)；
/// - 通常由 `#[query(dto = T)]` 宏实现。
pub trait Query: Send + Sync + 'static {
    /// 查询的稳定名称（用于日志与“无处理器”错误）
    const NAME: &'static str;

    /// 查询返回的数据传输对象
    type Dto: Dto;
}
