//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::detection::PackageManager;

/// autodep - Install missing npm packages on demand and load them fresh.
#[derive(Debug, Parser)]
#[command(name = "autodep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Host directory holding package.json (defaults to the parent of the current directory)
    #[arg(short, long, global = true, env = "AUTODEP_MAIN_PATH")]
    pub main_path: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install a package if missing, then load it
    Ensure(EnsureArgs),

    /// Check whether a package is installed
    Locate(LocateArgs),

    /// Show how an identifier is resolved against the host manifest
    Parse(ParseArgs),

    /// Show the registry installs would use
    Registry,

    /// Show the package manager installs would use
    Manager,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `ensure` command.
#[derive(Debug, Clone, clap::Args)]
pub struct EnsureArgs {
    /// Package identifier (`name`, `name@range`, `@scope/name@range`, or a URL)
    pub identifier: String,

    /// Name to check and load instead of the parsed one
    #[arg(long, value_name = "NAME")]
    pub require_name: Option<String>,

    /// Extra variable for the install subprocess
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub env: Vec<(String, String)>,

    /// Message shown before installing
    #[arg(long)]
    pub msg: Option<String>,

    /// Only ensure the package is installed
    #[arg(long)]
    pub no_load: bool,

    /// Install attempts before giving up
    #[arg(long)]
    pub attempts: Option<u32>,

    /// Force a package manager
    #[arg(long, value_enum)]
    pub manager: Option<PackageManager>,
}

/// Arguments for the `locate` command.
#[derive(Debug, Clone, clap::Args)]
pub struct LocateArgs {
    /// Package name
    pub name: String,

    /// List the search directories
    #[arg(long)]
    pub paths: bool,
}

/// Arguments for the `parse` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ParseArgs {
    /// Package identifier
    pub identifier: String,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}
