use serde::Serialize;
use serde::de::DeserializeOwned;

/// 应用层命令（Command）
///
/// 表达“意图”的写操作请求，通常会修改领域状态。
/// - 不返回业务数据；发送成功仅表示已被消息代理接收；
/// - 序列化一次后经代理投递，处理器收到的值与发送的值深度相等；
/// - 建议保持语义化的“动宾结构”命名，如 `CreatePostCommand`。
///
/// 关联常量：
/// - `NAME`：命令的稳定名称，决定主题 `commands.<NAME>` 并写入消息元数据。
///   通常由 `#[command]` 宏生成，避免依赖 `type_name::<T>()`。
pub trait Command: Serialize + DeserializeOwned + Send + Sync + 'static {
    const NAME: &'static str;
}
