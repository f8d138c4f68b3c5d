//! autodep - On-demand, self-healing npm dependency resolution.
//!
//! Given a package identifier, autodep checks whether the package is
//! installed where the host resolves modules, installs it with the host's
//! package manager when it is not, and then loads it fresh.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Settings loading and layering
//! - [`detection`] - Package manager detection
//! - [`error`] - Error types and result aliases
//! - [`installer`] - Install loop with bounded retries
//! - [`locator`] - Installed package lookup across search directories
//! - [`modules`] - Loading installed packages and cache eviction
//! - [`orchestrator`] - The `ensure_loaded` entry point
//! - [`registry`] - Registry URL resolution
//! - [`request`] - Identifier parsing against the host manifest
//! - [`shell`] - Subprocess execution and PATH lookup
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use autodep::request::{parse_request, HostManifest};
//!
//! let manifest = HostManifest::parse(
//!     r#"{"dependencies":{"left-pad":"1.3.0"}}"#,
//!     std::path::Path::new("package.json"),
//! )
//! .unwrap();
//! let request = parse_request("left-pad", &manifest).unwrap();
//! assert_eq!(request.install_spec, "left-pad@1.3.0");
//! ```
//!
//! For the full install-and-load flow, see [`orchestrator`].

pub mod cli;
pub mod config;
pub mod detection;
pub mod error;
pub mod installer;
pub mod locator;
pub mod modules;
pub mod orchestrator;
pub mod registry;
pub mod request;
pub mod shell;
pub mod ui;

pub use error::{AutodepError, Result};
pub use orchestrator::{ensure_loaded, EnsureOptions};
