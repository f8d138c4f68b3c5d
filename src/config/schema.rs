//! Settings schema.

use serde::{Deserialize, Serialize};

use crate::detection::PackageManager;
use crate::installer::DEFAULT_ATTEMPTS;
use crate::registry::DEFAULT_REGISTRY;

/// Default limit for the `npm config get registry` query.
pub const DEFAULT_REGISTRY_QUERY_TIMEOUT_SECS: u64 = 10;

/// Tunables for resolution and installation.
///
/// ```yaml
/// attempts: 3
/// default_registry: https://registry.npm.taobao.org/
/// registry_query_timeout_secs: 10
/// manager: pnpm
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Install attempts before giving up.
    pub attempts: u32,

    /// Registry used when neither npm config nor the env var supply one.
    pub default_registry: String,

    /// Seconds to wait for the registry query.
    pub registry_query_timeout_secs: u64,

    /// Force a package manager instead of detecting one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<PackageManager>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            default_registry: DEFAULT_REGISTRY.to_string(),
            registry_query_timeout_secs: DEFAULT_REGISTRY_QUERY_TIMEOUT_SECS,
            manager: None,
        }
    }
}

impl Settings {
    /// Registry query limit as a duration.
    pub fn registry_query_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.registry_query_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.attempts, 3);
        assert_eq!(settings.default_registry, "https://registry.npm.taobao.org/");
        assert_eq!(settings.registry_query_timeout_secs, 10);
        assert_eq!(settings.manager, None);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let settings: Settings = serde_yaml::from_str("manager: yarn").unwrap();
        assert_eq!(settings.manager, Some(PackageManager::Yarn));
        assert_eq!(settings.attempts, 3);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<Settings, _> = serde_yaml::from_str("retries: 5");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_manager_is_rejected() {
        let result: Result<Settings, _> = serde_yaml::from_str("manager: bun");
        assert!(result.is_err());
    }
}
