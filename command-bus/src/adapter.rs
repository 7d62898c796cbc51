//! 调度适配器（Dispatch Adapter）
//!
//! 将强类型的 [`CommandHandler`] 桥接为总线可调用的、类型擦除的统一接口：
//! - [`VoidAdapter`]：无返回值命令，实现 [`DispatchAdapter`]；
//! - [`ResultAdapter`]：返回 `R` 的命令，实现 [`ReturningAdapter<R>`]。
//!
//! 适配器仅持有处理器引用，由定位器在每次调度时新建，用后即弃。
//!
use crate::command::{Command, ErasedCommand, TypedCommand};
use crate::command_handler::CommandHandler;
use crate::error::{CommandError, CommandResult};
use async_trait::async_trait;
use std::any::{Any, type_name};
use std::marker::PhantomData;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// 无返回值命令的统一调用接口
#[async_trait]
pub trait DispatchAdapter: Send + Sync {
    async fn handle(&self, command: ErasedCommand, token: CancellationToken) -> CommandResult<()>;
}

/// 返回 `R` 的命令的统一调用接口
#[async_trait]
pub trait ReturningAdapter<R>: Send + Sync
where
    R: Send + 'static,
{
    async fn handle(&self, command: ErasedCommand, token: CancellationToken) -> CommandResult<R>;
}

pub struct VoidAdapter<H, C>
where
    H: ?Sized,
{
    handler: Arc<H>,
    _command: PhantomData<fn(C)>,
}

impl<H, C> VoidAdapter<H, C>
where
    H: ?Sized,
{
    pub fn new(handler: Arc<H>) -> Self {
        Self {
            handler,
            _command: PhantomData,
        }
    }
}

#[async_trait]
impl<H, C> DispatchAdapter for VoidAdapter<H, C>
where
    H: CommandHandler<C> + ?Sized + 'static,
    C: Command,
{
    async fn handle(&self, command: ErasedCommand, token: CancellationToken) -> CommandResult<()> {
        let command = command.downcast::<C>()?;
        self.handler.execute(command, token).await
    }
}

pub struct ResultAdapter<H, C, R>
where
    H: ?Sized,
{
    handler: Arc<H>,
    _command: PhantomData<fn(C) -> R>,
}

impl<H, C, R> ResultAdapter<H, C, R>
where
    H: ?Sized,
{
    pub fn new(handler: Arc<H>) -> Self {
        Self {
            handler,
            _command: PhantomData,
        }
    }
}

#[async_trait]
impl<H, C, R> ReturningAdapter<R> for ResultAdapter<H, C, R>
where
    H: CommandHandler<C, R> + ?Sized + 'static,
    C: TypedCommand<R>,
    R: Send + 'static,
{
    async fn handle(&self, command: ErasedCommand, token: CancellationToken) -> CommandResult<R> {
        let command = command.downcast::<C>()?;
        self.handler.execute(command, token).await
    }
}

/// 定位器解析出的适配器实例
///
/// 内部为 `Box<dyn DispatchAdapter>` 或 `Box<dyn ReturningAdapter<R>>`，
/// 由总线按所需种类还原；种类或返回类型不符即为装配缺陷。
pub struct ResolvedAdapter {
    adapter_name: &'static str,
    inner: Box<dyn Any + Send>,
}

impl ResolvedAdapter {
    pub fn void<A>(adapter: A) -> Self
    where
        A: DispatchAdapter + 'static,
    {
        let adapter: Box<dyn DispatchAdapter> = Box::new(adapter);
        Self {
            adapter_name: type_name::<A>(),
            inner: Box::new(adapter),
        }
    }

    pub fn returning<A, R>(adapter: A) -> Self
    where
        A: ReturningAdapter<R> + 'static,
        R: Send + 'static,
    {
        let adapter: Box<dyn ReturningAdapter<R>> = Box::new(adapter);
        Self {
            adapter_name: type_name::<A>(),
            inner: Box::new(adapter),
        }
    }

    pub fn adapter_name(&self) -> &'static str {
        self.adapter_name
    }

    pub fn into_void(self) -> CommandResult<Box<dyn DispatchAdapter>> {
        let found = self.adapter_name;
        self.inner
            .downcast::<Box<dyn DispatchAdapter>>()
            .map(|adapter| *adapter)
            .map_err(|_| CommandError::TypeMismatch {
                expected: type_name::<dyn DispatchAdapter>(),
                found,
            })
    }

    pub fn into_returning<R>(self) -> CommandResult<Box<dyn ReturningAdapter<R>>>
    where
        R: Send + 'static,
    {
        let found = self.adapter_name;
        self.inner
            .downcast::<Box<dyn ReturningAdapter<R>>>()
            .map(|adapter| *adapter)
            .map_err(|_| CommandError::TypeMismatch {
                expected: type_name::<dyn ReturningAdapter<R>>(),
                found,
            })
    }
}

impl std::fmt::Debug for ResolvedAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedAdapter")
            .field("adapter_name", &self.adapter_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct Greet(String);
    impl Command for Greet {}

    #[derive(Debug)]
    struct Other;
    impl Command for Other {}

    struct Add(i32, i32);
    impl Command for Add {}
    impl TypedCommand<i32> for Add {}

    #[derive(Default)]
    struct GreetHandler {
        seen: Mutex<Vec<Greet>>,
    }

    #[async_trait]
    impl CommandHandler<Greet> for GreetHandler {
        async fn execute(&self, command: Greet, _token: CancellationToken) -> CommandResult<()> {
            self.seen.lock().unwrap().push(command);
            Ok(())
        }
    }

    struct AddHandler;

    #[async_trait]
    impl CommandHandler<Add, i32> for AddHandler {
        async fn execute(&self, command: Add, _token: CancellationToken) -> CommandResult<i32> {
            Ok(command.0 + command.1)
        }
    }

    #[tokio::test]
    async fn void_adapter_forwards_to_handler() {
        let handler = Arc::new(GreetHandler::default());
        let adapter = VoidAdapter::<_, Greet>::new(handler.clone());

        adapter
            .handle(
                ErasedCommand::new(Greet("hi".into())),
                CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(*handler.seen.lock().unwrap(), vec![Greet("hi".into())]);
    }

    #[tokio::test]
    async fn void_adapter_rejects_foreign_command() {
        let handler = Arc::new(GreetHandler::default());
        let adapter = VoidAdapter::<_, Greet>::new(handler.clone());

        let err = adapter
            .handle(ErasedCommand::new(Other), CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            CommandError::TypeMismatch { expected, found } => {
                assert!(expected.ends_with("Greet"));
                assert!(found.ends_with("Other"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(handler.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn result_adapter_returns_handler_value() {
        let adapter = ResultAdapter::<_, Add, i32>::new(Arc::new(AddHandler));
        let sum = adapter
            .handle(ErasedCommand::new(Add(2, 3)), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(sum, 5);
    }

    #[test]
    fn resolved_adapter_kind_mismatch_is_fatal() {
        let resolved = ResolvedAdapter::void(VoidAdapter::<_, Greet>::new(Arc::new(
            GreetHandler::default(),
        )));
        let err = resolved.into_returning::<i32>().err().unwrap();
        assert!(err.is_fatal());

        let resolved =
            ResolvedAdapter::returning::<_, i32>(ResultAdapter::<_, Add, i32>::new(Arc::new(AddHandler)));
        assert!(resolved.into_returning::<String>().is_err());
    }
}
