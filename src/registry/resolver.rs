//! Registry precedence resolution.

use std::env::VarError;
use std::fmt;

use super::query::QueryError;

/// Host environment variable holding a fallback registry URL.
pub const REGISTRY_ENV: &str = "INIT_PACKAGE_REGISTRY";

/// Child environment variable the install subprocess reads its registry from.
pub const REGISTRY_CHILD_ENV: &str = "NPM_CONFIG_REGISTRY";

/// Mirror used when nothing else is configured.
pub const DEFAULT_REGISTRY: &str = "https://registry.npm.taobao.org/";

/// Which precedence tier produced the registry URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrySource {
    /// The package manager's own persisted configuration.
    ManagerConfig,
    /// The `INIT_PACKAGE_REGISTRY` environment variable.
    Environment,
    /// The configured default mirror.
    Default,
}

impl fmt::Display for RegistrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ManagerConfig => write!(f, "npm config"),
            Self::Environment => write!(f, "{}", REGISTRY_ENV),
            Self::Default => write!(f, "default"),
        }
    }
}

/// The registry an install will use. Resolved fresh for every install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRegistry {
    pub url: String,
    pub source: RegistrySource,
}

impl ResolvedRegistry {
    fn new(url: impl Into<String>, source: RegistrySource) -> Self {
        Self {
            url: url.into(),
            source,
        }
    }
}

/// Resolve the registry URL: manager config, then env var, then default.
///
/// `query` is best-effort; its error only selects the next tier.
pub fn resolve_registry<Q, F>(query: Q, env_fn: F, default: &str) -> ResolvedRegistry
where
    Q: FnOnce() -> Result<String, QueryError>,
    F: Fn(&str) -> Result<String, VarError>,
{
    let resolved = query()
        .inspect_err(|e| tracing::debug!("Registry query failed: {}", e))
        .ok()
        .map(|url| ResolvedRegistry::new(url, RegistrySource::ManagerConfig))
        .or_else(|| {
            env_fn(REGISTRY_ENV)
                .ok()
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
                .map(|url| ResolvedRegistry::new(url, RegistrySource::Environment))
        })
        .unwrap_or_else(|| ResolvedRegistry::new(default, RegistrySource::Default));

    tracing::debug!("Using registry {} ({})", resolved.url, resolved.source);
    resolved
}
