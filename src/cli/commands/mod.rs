//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations against one host directory.

pub mod completions;
pub mod dispatcher;
pub mod ensure;
pub mod locate;
pub mod manager;
pub mod parse;
pub mod registry;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
