use proc_macro::TokenStream;

mod command;

/// 命令派生宏
/// - 为结构体/枚举实现 `::command_bus::command::Command`
/// - 支持参数：`#[command(result = Ty)]`，额外实现 `TypedCommand<Ty>`
///
/// ```ignore
/// #[derive(Debug, Command)]
/// #[command(result = i32)]
/// struct Add {
///     a: i32,
///     b: i32,
/// }
/// ```
#[proc_macro_derive(Command, attributes(command))]
pub fn derive_command(input: TokenStream) -> TokenStream {
    command::expand(input)
}
