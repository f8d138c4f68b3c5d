//! Package registry resolution.
//!
//! The registry an install uses is chosen fresh on every install, highest
//! precedence first:
//!
//! 1. `npm config get registry`, asked with inherited overrides cleared
//! 2. the `INIT_PACKAGE_REGISTRY` environment variable
//! 3. the default mirror
//!
//! The chosen URL is handed to the install subprocess through its own
//! environment. The host process environment is never written.

pub mod query;
pub mod resolver;

pub use query::{query_npm_registry, registry_query_command, registry_query_options, QueryError};
pub use resolver::{
    resolve_registry, RegistrySource, ResolvedRegistry, DEFAULT_REGISTRY, REGISTRY_CHILD_ENV,
    REGISTRY_ENV,
};
