use crate::{adapter::ResolvedAdapter, dispatch_key::DispatchKey, error::CommandResult};

/// 处理器定位器（外部协作者）
///
/// 按 [`DispatchKey`] 返回一个已绑定到唯一处理器的适配器实例：
/// - 未注册时必须返回 [`CommandError::HandlerNotFound`]，不得返回空；
/// - 需支持并发解析；
/// - 单例/瞬态等生命周期策略由实现方决定，总线视每次解析为新实例且不缓存。
///
/// [`CommandError::HandlerNotFound`]: crate::error::CommandError::HandlerNotFound
pub trait HandlerLocator: Send + Sync {
    fn resolve(&self, key: &DispatchKey) -> CommandResult<ResolvedAdapter>;
}
