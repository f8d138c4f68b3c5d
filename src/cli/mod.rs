//! Command-line interface for autodep.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, CompletionsArgs, EnsureArgs, LocateArgs, ParseArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
