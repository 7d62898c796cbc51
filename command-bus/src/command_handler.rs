use crate::{command::Command, error::CommandResult};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// 命令处理器：每个命令类型（或命令/返回类型对）恰有一个实现
///
/// - `R` 默认为 `()`，即无返回值命令；
/// - `token` 为调用方传入的取消信号（与调用方共享状态），
///   处理器应在有意义的挂起点检查并以 [`CommandError::Cancelled`] 结束，
///   总线不会强行中断处理器。
///
/// [`CommandError::Cancelled`]: crate::error::CommandError::Cancelled
#[async_trait]
pub trait CommandHandler<C, R = ()>: Send + Sync
where
    C: Command,
    R: Send + 'static,
{
    async fn execute(&self, command: C, token: CancellationToken) -> CommandResult<R>;
}
