//! 调度身份（DispatchKey）
//!
//! 由“适配器种类 + 具体命令类型 (+ 返回类型)”组合而成，作为向定位器
//! 请求适配器实例的键。总线从命令的运行时类型推导，注册方从静态类型推导，
//! 两者对同一 `(C[, R])` 必然相等。
//!
use crate::command::{Command, ErasedCommand, TypedCommand};
use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// 适配器种类：无返回值 / 带返回值
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdapterKind {
    Void,
    Returning,
}

#[derive(Clone, Copy, Debug)]
pub struct DispatchKey {
    kind: AdapterKind,
    command: TypeId,
    command_name: &'static str,
    result: Option<(TypeId, &'static str)>,
}

impl DispatchKey {
    pub fn void<C: Command>() -> Self {
        Self {
            kind: AdapterKind::Void,
            command: TypeId::of::<C>(),
            command_name: type_name::<C>(),
            result: None,
        }
    }

    pub fn returning<C, R>() -> Self
    where
        C: TypedCommand<R>,
        R: Send + 'static,
    {
        Self {
            kind: AdapterKind::Returning,
            command: TypeId::of::<C>(),
            command_name: type_name::<C>(),
            result: Some((TypeId::of::<R>(), type_name::<R>())),
        }
    }

    /// 由已擦除命令的运行时类型推导（无返回值）
    pub fn of_void(command: &ErasedCommand) -> Self {
        Self {
            kind: AdapterKind::Void,
            command: command.type_id(),
            command_name: command.type_name(),
            result: None,
        }
    }

    /// 由已擦除命令的运行时类型推导（返回 `R`）
    pub fn of_returning<R: Send + 'static>(command: &ErasedCommand) -> Self {
        Self {
            kind: AdapterKind::Returning,
            command: command.type_id(),
            command_name: command.type_name(),
            result: Some((TypeId::of::<R>(), type_name::<R>())),
        }
    }

    pub fn kind(&self) -> AdapterKind {
        self.kind
    }

    pub fn command_type_id(&self) -> TypeId {
        self.command
    }

    pub fn command_name(&self) -> &'static str {
        self.command_name
    }

    pub fn result_type_id(&self) -> Option<TypeId> {
        self.result.map(|(id, _)| id)
    }

    pub fn result_name(&self) -> Option<&'static str> {
        self.result.map(|(_, name)| name)
    }
}

// 类型名仅用于诊断，不参与比较
impl PartialEq for DispatchKey {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.command == other.command
            && self.result_type_id() == other.result_type_id()
    }
}

impl Eq for DispatchKey {}

impl Hash for DispatchKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.command.hash(state);
        self.result_type_id().hash(state);
    }
}

impl fmt::Display for DispatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.result {
            Some((_, result)) => write!(f, "{} -> {}", self.command_name, result),
            None => write!(f, "{}", self.command_name),
        }
    }
}
