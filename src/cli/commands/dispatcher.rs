//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// Returns a [`CommandResult`] carrying the exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    main_path: PathBuf,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given host directory.
    pub fn new(main_path: PathBuf) -> Self {
        Self { main_path }
    }

    /// Get the host directory.
    pub fn main_path(&self) -> &Path {
        &self.main_path
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Commands::Ensure(args) => {
                super::ensure::EnsureCommand::new(&self.main_path, args.clone()).execute(ui)
            }
            Commands::Locate(args) => {
                super::locate::LocateCommand::new(&self.main_path, args.clone()).execute(ui)
            }
            Commands::Parse(args) => {
                super::parse::ParseCommand::new(&self.main_path, args.clone()).execute(ui)
            }
            Commands::Registry => super::registry::RegistryCommand::new(&self.main_path).execute(ui),
            Commands::Manager => super::manager::ManagerCommand::new(&self.main_path).execute(ui),
            Commands::Completions(args) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
        }
    }
}
