use crate::{
    command::{Command, TypedCommand},
    error::CommandResult,
};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// 命令总线（Command Bus）
///
/// - 根据命令的**运行时**具体类型路由到唯一的处理器，调用方无需关心处理器；
/// - 命令以 `Box<dyn Command>` / `Box<dyn TypedCommand<R>>` 传入，
///   即便调用方只持有较宽泛的引用也能正确路由；
/// - 处理器的错误原样返回，不做包装或转换；
/// - 该 trait 带有泛型方法，通常以具体实现类型注入使用。
#[async_trait]
pub trait CommandBus: Send + Sync {
    /// 等价于 `dispatch_with(command, CancellationToken::new())`
    async fn dispatch(&self, command: Box<dyn Command>) -> CommandResult<()> {
        self.dispatch_with(command, CancellationToken::new()).await
    }

    /// 分发无返回值命令到对应处理器
    ///
    /// 取消是协作式的：`token` 仅转交给处理器，已取消的 `token` 也会照常解析并调用处理器。
    async fn dispatch_with(
        &self,
        command: Box<dyn Command>,
        token: CancellationToken,
    ) -> CommandResult<()>;

    /// 等价于 `dispatch_returning_with(command, CancellationToken::new())`
    async fn dispatch_returning<R>(&self, command: Box<dyn TypedCommand<R>>) -> CommandResult<R>
    where
        R: Send + 'static,
    {
        self.dispatch_returning_with(command, CancellationToken::new())
            .await
    }

    /// 分发声明返回类型 `R` 的命令，返回处理器产出的值
    async fn dispatch_returning_with<R>(
        &self,
        command: Box<dyn TypedCommand<R>>,
        token: CancellationToken,
    ) -> CommandResult<R>
    where
        R: Send + 'static;
}
