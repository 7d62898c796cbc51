//! 进程内单分派命令总线（command-bus）
//!
//! 调用方只需构造命令并交给总线，由总线依据命令的运行时类型找到唯一的处理器：
//! - `command`：命令标记（`Command` / `TypedCommand<R>`）与类型擦除；
//! - `command_handler`：处理器契约，带协作式取消信号；
//! - `adapter`：将强类型处理器桥接为统一调用接口的适配器；
//! - `locator` / `registry`：定位器协议及其内存实现；
//! - `bus` / `locator_command_bus`：总线协议及基于定位器的实现。
//!
//! 典型用法：
//! 1. 为命令实现（或 derive）`Command`，有返回值时再实现 `TypedCommand<R>`；
//! 2. 为每个命令实现一个 `CommandHandler`，注册到 `HandlerRegistry`；
//! 3. 用注册表构建 `LocatorCommandBus`，通过 `dispatch*` 调度。
//!
pub mod adapter;
pub mod bus;
pub mod command;
pub mod command_handler;
pub mod dispatch_key;
pub mod error;
pub mod locator;
pub mod locator_command_bus;
pub mod registry;

pub use bus::CommandBus;
pub use command::{Command, TypedCommand};
pub use command_handler::CommandHandler;
pub use error::{CommandError, CommandResult};
pub use locator_command_bus::LocatorCommandBus;
pub use registry::HandlerRegistry;

#[cfg(feature = "derive")]
pub use command_bus_macros::Command;

pub use tokio_util::sync::CancellationToken;
