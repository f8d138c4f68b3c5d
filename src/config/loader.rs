//! Settings discovery, layering, and validation.

use std::env::VarError;
use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::config::merger::merge_layers;
use crate::config::schema::Settings;
use crate::error::{AutodepError, Result};

/// Project settings file name, looked up in the host directory.
pub const PROJECT_CONFIG_FILE: &str = ".autodep.yml";

/// Environment overrides for individual settings.
pub const ENV_ATTEMPTS: &str = "AUTODEP_ATTEMPTS";
pub const ENV_DEFAULT_REGISTRY: &str = "AUTODEP_DEFAULT_REGISTRY";
pub const ENV_REGISTRY_TIMEOUT: &str = "AUTODEP_REGISTRY_TIMEOUT";
pub const ENV_MANAGER: &str = "AUTODEP_MANAGER";

/// Paths to settings files in priority order (later overrides earlier).
///
/// Merge order:
/// 1. Built-in defaults
/// 2. User global settings (`<config dir>/autodep/config.yml`)
/// 3. Project settings (`<main path>/.autodep.yml`)
/// 4. `AUTODEP_*` environment variables
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// User's global settings file.
    pub user_global: Option<PathBuf>,

    /// Project settings file.
    pub project: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover settings files for the given host directory.
    pub fn discover(main_path: &Path) -> Self {
        Self {
            user_global: Self::find_user_global(),
            project: Some(main_path.join(PROJECT_CONFIG_FILE)).filter(|p| p.exists()),
        }
    }

    fn find_user_global() -> Option<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "autodep")?;
        let path = dirs.config_dir().join("config.yml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Returns all existing settings paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.user_global.iter().chain(self.project.iter()).collect()
    }
}

/// Load settings for a host directory from files and the real environment.
pub fn load_settings(main_path: &Path) -> Result<Settings> {
    load_settings_with_env(&ConfigPaths::discover(main_path), |key: &str| {
        std::env::var(key)
    })
}

/// Load settings from explicit paths with a custom env var lookup function.
///
/// # Errors
///
/// Returns `ConfigParseError` if a file is not valid YAML for the schema.
/// Returns `ConfigValidationError` for unusable values.
pub fn load_settings_with_env<F>(paths: &ConfigPaths, env_fn: F) -> Result<Settings>
where
    F: Fn(&str) -> std::result::Result<String, VarError>,
{
    let defaults =
        serde_yaml::to_value(Settings::default()).map_err(|e| AutodepError::Other(e.into()))?;
    let mut layers = vec![defaults.clone()];
    let mut files = Vec::new();

    for path in paths.all_existing() {
        tracing::debug!("Loading settings from {}", path.display());
        let value = load_settings_value(path)?;
        layers.push(value.clone());
        files.push((path, value));
    }

    let merged = merge_layers(&layers);
    let mut settings: Settings = match serde_yaml::from_value(merged) {
        Ok(settings) => settings,
        Err(e) => return Err(blame_layer(&defaults, &files, e)),
    };

    apply_env_overrides(&mut settings, env_fn)?;
    validate(&settings)?;
    Ok(settings)
}

/// Attribute a schema error to the first file that fails on its own.
fn blame_layer(
    defaults: &Value,
    files: &[(&PathBuf, Value)],
    merged_err: serde_yaml::Error,
) -> AutodepError {
    for (path, value) in files {
        let alone = merge_layers(&[defaults.clone(), value.clone()]);
        if let Err(e) = serde_yaml::from_value::<Settings>(alone) {
            return AutodepError::ConfigParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            };
        }
    }
    AutodepError::ConfigParseError {
        path: files
            .last()
            .map(|(path, _)| path.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("<defaults>")),
        message: merged_err.to_string(),
    }
}

/// Load a settings file as raw YAML (for merging).
pub fn load_settings_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|e| AutodepError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn apply_env_overrides<F>(settings: &mut Settings, env_fn: F) -> Result<()>
where
    F: Fn(&str) -> std::result::Result<String, VarError>,
{
    let get = |key: &str| env_fn(key).ok().filter(|v| !v.trim().is_empty());

    if let Some(value) = get(ENV_ATTEMPTS) {
        settings.attempts = parse_number(ENV_ATTEMPTS, &value)?;
    }
    if let Some(value) = get(ENV_DEFAULT_REGISTRY) {
        settings.default_registry = value.trim().to_string();
    }
    if let Some(value) = get(ENV_REGISTRY_TIMEOUT) {
        settings.registry_query_timeout_secs = parse_number(ENV_REGISTRY_TIMEOUT, &value)?;
    }
    if let Some(value) = get(ENV_MANAGER) {
        settings.manager = Some(value.parse().map_err(|message| {
            AutodepError::ConfigValidationError {
                message: format!("{}: {}", ENV_MANAGER, message),
            }
        })?);
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AutodepError::ConfigValidationError {
            message: format!("{} must be a non-negative integer, got '{}'", key, value),
        })
}

/// Check settings values are usable.
pub fn validate(settings: &Settings) -> Result<()> {
    if settings.attempts == 0 {
        return Err(AutodepError::ConfigValidationError {
            message: "attempts must be at least 1".to_string(),
        });
    }
    if settings.default_registry.trim().is_empty() {
        return Err(AutodepError::ConfigValidationError {
            message: "default_registry must not be empty".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::PackageManager;
    use tempfile::TempDir;

    fn no_env(_: &str) -> std::result::Result<String, VarError> {
        Err(VarError::NotPresent)
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn no_files_gives_defaults() {
        let settings = load_settings_with_env(&ConfigPaths::default(), no_env).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn discover_finds_project_file() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), PROJECT_CONFIG_FILE, "attempts: 5");

        let paths = ConfigPaths::discover(temp.path());

        assert_eq!(paths.project, Some(temp.path().join(PROJECT_CONFIG_FILE)));
    }

    #[test]
    fn discover_skips_missing_project_file() {
        let temp = TempDir::new().unwrap();
        assert!(ConfigPaths::discover(temp.path()).project.is_none());
    }

    #[test]
    fn project_overrides_user_global() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths {
            user_global: Some(write(
                temp.path(),
                "global.yml",
                "attempts: 2\nmanager: yarn",
            )),
            project: Some(write(temp.path(), "project.yml", "attempts: 7")),
        };

        let settings = load_settings_with_env(&paths, no_env).unwrap();

        assert_eq!(settings.attempts, 7);
        assert_eq!(settings.manager, Some(PackageManager::Yarn));
    }

    #[test]
    fn env_overrides_files() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths {
            user_global: None,
            project: Some(write(temp.path(), "project.yml", "attempts: 7")),
        };
        let env = |key: &str| match key {
            ENV_ATTEMPTS => Ok("1".to_string()),
            ENV_MANAGER => Ok("pnpm".to_string()),
            ENV_DEFAULT_REGISTRY => Ok("https://mirror.example/".to_string()),
            _ => Err(VarError::NotPresent),
        };

        let settings = load_settings_with_env(&paths, env).unwrap();

        assert_eq!(settings.attempts, 1);
        assert_eq!(settings.manager, Some(PackageManager::Pnpm));
        assert_eq!(settings.default_registry, "https://mirror.example/");
    }

    #[test]
    fn empty_file_changes_nothing() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths {
            user_global: None,
            project: Some(write(temp.path(), "project.yml", "")),
        };

        let settings = load_settings_with_env(&paths, no_env).unwrap();

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths {
            user_global: None,
            project: Some(write(temp.path(), "project.yml", "attempts: [unclosed")),
        };

        let err = load_settings_with_env(&paths, no_env).unwrap_err();

        assert!(matches!(err, AutodepError::ConfigParseError { .. }));
    }

    #[test]
    fn unknown_key_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths {
            user_global: None,
            project: Some(write(temp.path(), "project.yml", "retries: 2")),
        };

        let err = load_settings_with_env(&paths, no_env).unwrap_err();

        assert!(matches!(err, AutodepError::ConfigParseError { .. }));
    }

    #[test]
    fn schema_error_names_the_offending_file() {
        let temp = TempDir::new().unwrap();
        let global = write(temp.path(), "global.yml", "retries: 2");
        let paths = ConfigPaths {
            user_global: Some(global.clone()),
            project: Some(write(temp.path(), "project.yml", "attempts: 4")),
        };

        let err = load_settings_with_env(&paths, no_env).unwrap_err();

        match err {
            AutodepError::ConfigParseError { path, message } => {
                assert_eq!(path, global);
                assert!(message.contains("retries"), "got: {message}");
            }
            other => panic!("expected ConfigParseError, got {other:?}"),
        }
    }

    #[test]
    fn bad_env_number_is_validation_error() {
        let env = |key: &str| match key {
            ENV_ATTEMPTS => Ok("lots".to_string()),
            _ => Err(VarError::NotPresent),
        };

        let err = load_settings_with_env(&ConfigPaths::default(), env).unwrap_err();

        assert!(matches!(err, AutodepError::ConfigValidationError { .. }));
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let env = |key: &str| match key {
            ENV_ATTEMPTS => Ok("0".to_string()),
            _ => Err(VarError::NotPresent),
        };

        let err = load_settings_with_env(&ConfigPaths::default(), env).unwrap_err();

        assert!(err.to_string().contains("attempts"));
    }
}
