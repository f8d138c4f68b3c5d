//! Subprocess execution and PATH helpers.

pub mod command;
pub mod path;

pub use command::{execute, execute_quiet, CommandOptions, CommandResult, Invocation};
pub use path::{clean_path, find_on_path, parse_system_path, resolve_tool_path};
