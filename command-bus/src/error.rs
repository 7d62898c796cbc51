//! 命令总线统一错误定义
//!
//! 分为三类：
//! - 解析失败（`HandlerNotFound`）与装配缺陷（`TypeMismatch`），均为致命错误；
//! - 处理器执行失败（`Validation` / `Rejected` / `Handler`），原样透传给调用方；
//! - 取消（`Cancelled`），由处理器在观察到取消信号时返回，与执行失败区分。
//!
use crate::command::Command;
use crate::dispatch_key::DispatchKey;
use std::any::type_name;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum CommandError {
    // --- 解析/装配 ---
    #[error("handler not found: {0}")]
    HandlerNotFound(DispatchKey),

    #[error("handler already registered: {0}")]
    AlreadyRegistered(DispatchKey),

    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    // --- 处理器执行 ---
    #[error("command cancelled: {0}")]
    Cancelled(&'static str),

    #[error("validation: {0}")]
    Validation(String),

    #[error("rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

impl CommandError {
    /// 处理器观察到取消信号时使用
    pub fn cancelled<C: Command>() -> Self {
        Self::Cancelled(type_name::<C>())
    }

    /// 解析失败或装配缺陷：不可恢复，调用方不应重试
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::HandlerNotFound(_) | Self::TypeMismatch { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

/// 统一 Result 类型别名
pub type CommandResult<T> = Result<T, CommandError>;
