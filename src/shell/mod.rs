//! Shell command execution and platform checks.

pub mod command;
pub mod platform;

pub use command::{
    execute, execute_check, execute_quiet, execute_streaming, quote_arg, CommandOptions,
    CommandResult, OutputCallback, OutputLine,
};
pub use platform::{is_ci, is_elevated, is_executable, parse_system_path, ToolLocator};
