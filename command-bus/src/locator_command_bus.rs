use crate::{
    bus::CommandBus,
    command::{Command, ErasedCommand, TypedCommand},
    dispatch_key::DispatchKey,
    error::CommandResult,
    locator::HandlerLocator,
};
use async_trait::async_trait;
use bon::Builder;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// 基于 [`HandlerLocator`] 的 CommandBus 实现
/// - 由命令运行时类型推导 `DispatchKey`，向定位器请求适配器
/// - 自身无可变状态，可作为长期存在的单例被并发调用
/// - 不缓存适配器，每次调度都重新解析
#[derive(Builder, Clone)]
pub struct LocatorCommandBus {
    locator: Arc<dyn HandlerLocator>,
}

impl LocatorCommandBus {
    pub fn new(locator: Arc<dyn HandlerLocator>) -> Self {
        Self { locator }
    }
}

#[async_trait]
impl CommandBus for LocatorCommandBus {
    async fn dispatch_with(
        &self,
        command: Box<dyn Command>,
        token: CancellationToken,
    ) -> CommandResult<()> {
        let command = ErasedCommand::from_boxed(command);
        let key = DispatchKey::of_void(&command);
        tracing::debug!(%key, cancelled = token.is_cancelled(), "resolving command adapter");

        let adapter = self.locator.resolve(&key)?.into_void()?;

        adapter
            .handle(command, token)
            .instrument(tracing::debug_span!("dispatch", %key))
            .await
    }

    async fn dispatch_returning_with<R>(
        &self,
        command: Box<dyn TypedCommand<R>>,
        token: CancellationToken,
    ) -> CommandResult<R>
    where
        R: Send + 'static,
    {
        let command = ErasedCommand::from_boxed(command);
        let key = DispatchKey::of_returning::<R>(&command);
        tracing::debug!(%key, cancelled = token.is_cancelled(), "resolving command adapter");

        let adapter = self.locator.resolve(&key)?.into_returning::<R>()?;

        adapter
            .handle(command, token)
            .instrument(tracing::debug_span!("dispatch", %key))
            .await
    }
}
