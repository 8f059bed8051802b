use serde::Serialize;

/// 数据传输对象（DTO）
///
/// - 作为查询的输出载体，面向接口/外部系统序列化友好；
/// - 与领域模型解耦，避免将领域对象直接暴露到接口层；
/// - 通常由 `#[dto]` 宏实现。
pub trait Dto: Serialize + Send + Sync + 'static {}
