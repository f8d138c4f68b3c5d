//! Error types for autodep operations.
//!
//! This module defines [`AutodepError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `AutodepError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `AutodepError::Other`) for unexpected errors
//! - Registry query failures have their own [`QueryError`](crate::registry::QueryError)
//!   because they are always recovered and never reach callers
//! - The orchestrator boundary converts every error into "no value"

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for autodep operations.
#[derive(Debug, Error)]
pub enum AutodepError {
    /// Failed to parse a settings file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid settings structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// The host's `package.json` does not exist.
    #[error("Host manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },

    /// The host's `package.json` is not valid JSON of the expected shape.
    #[error("Failed to parse manifest at {path}: {message}")]
    ManifestParseError { path: PathBuf, message: String },

    /// The selected package manager is not itself installed.
    #[error("No usable installer: '{manager}' is not installed. Install it and try again")]
    ManagerNotFound { manager: String },

    /// A package could not be located or loaded.
    #[error("Package '{name}' could not be loaded: {message}")]
    PackageNotFound { name: String, message: String },

    /// A subprocess could not be started or waited on.
    #[error("Command failed: {command}: {message}")]
    CommandFailed { command: String, message: String },

    /// A subprocess exceeded its time limit and was killed.
    #[error("Command timed out after {seconds}s: {command}")]
    CommandTimedOut { command: String, seconds: u64 },

    /// An argument given by the caller is unusable.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for autodep operations.
pub type Result<T> = std::result::Result<T, AutodepError>;
