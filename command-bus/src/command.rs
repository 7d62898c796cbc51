//! 命令（Command）标记
//!
//! 命令是表达“意图”的不可变值对象，本身不携带任何处理器引用，
//! 总线仅依据其**运行时具体类型**完成路由。
//!
use crate::error::{CommandError, CommandResult};
use std::any::{Any, TypeId, type_name};

/// 命令的运行时身份
///
/// 为任意 `Any + Send + Sync` 类型自动实现，使得 `dyn Command` 也能给出其
/// 具体类型的 `TypeId` / 类型名，并可被擦除为 `Any` 以便在适配器内还原。
/// 使用方无需（也无法）手动实现。
///
/// 注意：`Box<dyn Command>` 本身也满足 `Any + Send + Sync`，
/// 需先解引用（`(*boxed).command_name()`）才能得到内部具体类型的身份。
pub trait CommandIdentity: Send + Sync + 'static {
    /// 具体命令类型的 `TypeId`
    fn command_type_id(&self) -> TypeId;

    /// 具体命令类型名（仅用于诊断，不作为路由依据）
    fn command_name(&self) -> &'static str;

    /// 擦除为 `Any`，交由适配器向下转型
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

impl<T> CommandIdentity for T
where
    T: Any + Send + Sync,
{
    fn command_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn command_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

/// 应用层命令（Command）
///
/// 纯类型标记，不声明返回值。
/// - 建议保持语义化的“动宾结构”命名，如 `CreateUser`、`CloseOrder`；
/// - 可通过 `#[derive(Command)]` 自动实现。
pub trait Command: CommandIdentity {}

/// 声明返回类型 `R` 的命令
///
/// 每个 `TypedCommand<R>` 同时也是 [`Command`]。
pub trait TypedCommand<R>: Command
where
    R: Send + 'static,
{
}

/// 类型擦除后的命令
///
/// 同时保留擦除值与具体类型的身份（`TypeId` + 类型名），
/// 适配器据此向下转型，失败时可报告实际到达的类型。
pub struct ErasedCommand {
    type_id: TypeId,
    type_name: &'static str,
    inner: Box<dyn Any + Send>,
}

impl ErasedCommand {
    pub fn new<C: Command>(command: C) -> Self {
        Self {
            type_id: TypeId::of::<C>(),
            type_name: type_name::<C>(),
            inner: Box::new(command),
        }
    }

    /// 从装箱的命令（可能已是 `dyn Command` / `dyn TypedCommand<R>`）擦除，
    /// 身份取自其运行时具体类型。
    pub fn from_boxed<T>(command: Box<T>) -> Self
    where
        T: ?Sized + Command,
    {
        Self {
            type_id: CommandIdentity::command_type_id(&*command),
            type_name: CommandIdentity::command_name(&*command),
            inner: CommandIdentity::into_any(command),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// 还原为具体命令类型；类型不符视为装配缺陷
    pub fn downcast<C: Command>(self) -> CommandResult<C> {
        let found = self.type_name;
        self.inner
            .downcast::<C>()
            .map(|cmd| *cmd)
            .map_err(|_| CommandError::TypeMismatch {
                expected: type_name::<C>(),
                found,
            })
    }
}

impl std::fmt::Debug for ErasedCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErasedCommand")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Ping(u32);
    impl Command for Ping {}

    #[derive(Debug)]
    struct Pong;
    impl Command for Pong {}

    #[test]
    fn boxed_dyn_command_keeps_concrete_identity() {
        let cmd: Box<dyn Command> = Box::new(Ping(7));
        let erased = ErasedCommand::from_boxed(cmd);

        assert_eq!(erased.type_id(), TypeId::of::<Ping>());
        assert!(erased.type_name().ends_with("Ping"));
        assert_eq!(erased.downcast::<Ping>().unwrap(), Ping(7));
    }

    #[test]
    fn downcast_to_other_command_is_type_mismatch() {
        let erased = ErasedCommand::new(Pong);
        match erased.downcast::<Ping>().unwrap_err() {
            CommandError::TypeMismatch { expected, found } => {
                assert!(expected.ends_with("Ping"));
                assert!(found.ends_with("Pong"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
