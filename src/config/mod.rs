//! Settings loading and layering.
//!
//! - Schema definitions in [`schema`]
//! - File discovery, env overrides and validation in [`loader`]
//! - Deep merging in [`merger`]
//!
//! # Example
//!
//! ```
//! use autodep::config::load_settings;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join(".autodep.yml"), "attempts: 5").unwrap();
//!
//! let settings = load_settings(temp.path()).unwrap();
//! assert!(settings.attempts >= 1);
//! ```
//!
//! # Settings Locations
//!
//! Later layers win:
//! 1. Built-in defaults
//! 2. User global settings (`<config dir>/autodep/config.yml`)
//! 3. Project settings (`<main path>/.autodep.yml`)
//! 4. `AUTODEP_*` environment variables

pub mod loader;
pub mod merger;
pub mod schema;

pub use loader::{
    load_settings, load_settings_value, load_settings_with_env, validate, ConfigPaths,
    ENV_ATTEMPTS, ENV_DEFAULT_REGISTRY, ENV_MANAGER, ENV_REGISTRY_TIMEOUT, PROJECT_CONFIG_FILE,
};
pub use merger::{deep_merge, merge_layers};
pub use schema::{Settings, DEFAULT_REGISTRY_QUERY_TIMEOUT_SECS};
