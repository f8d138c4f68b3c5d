//! Package manager detection and validation.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AutodepError, Result};
use crate::locator::PackageLocator;
use crate::shell::Invocation;

/// Environment variable package managers set for the scripts they launch.
pub const USER_AGENT_ENV: &str = "npm_config_user_agent";

/// Supported package managers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Pnpm,
    Cnpm,
    Yarn,
}

impl PackageManager {
    /// Every supported manager.
    pub const ALL: [PackageManager; 4] = [Self::Npm, Self::Pnpm, Self::Cnpm, Self::Yarn];

    /// Package (and command) name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Cnpm => "cnpm",
            Self::Yarn => "yarn",
        }
    }

    /// Executable to spawn; Windows installs ship `.cmd` shims.
    pub fn program(&self) -> String {
        if cfg!(target_os = "windows") {
            format!("{}.cmd", self.name())
        } else {
            self.name().to_string()
        }
    }

    /// Subcommand that adds a package. `cnpm` has no `add`.
    pub fn install_verb(&self) -> &'static str {
        match self {
            Self::Npm | Self::Pnpm | Self::Yarn => "add",
            Self::Cnpm => "i",
        }
    }

    /// The install command for `spec`.
    ///
    /// Never carries `--registry` (some managers insist it match the
    /// lockfile) and never goes through `npx`, which prompts on newer npm.
    pub fn install_command(&self, spec: &str) -> Invocation {
        Invocation::new(self.program(), [self.install_verb(), spec])
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown package manager: {}", s))
    }
}

/// What decided the detected manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionSignal {
    /// Forced by settings.
    Configured,
    /// Parsed from the launching manager's user agent.
    UserAgent(String),
    /// A lockfile or install marker in the working directory.
    Lockfile(String),
    /// Nothing matched.
    Default,
}

impl fmt::Display for DetectionSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configured => write!(f, "configured"),
            Self::UserAgent(agent) => write!(f, "user agent '{}'", agent),
            Self::Lockfile(file) => write!(f, "found {}", file),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Result of package manager detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerDetection {
    pub manager: PackageManager,
    pub signal: DetectionSignal,
}

/// Lockfiles and install markers, checked in order.
const LOCKFILES: &[(&str, PackageManager)] = &[
    ("pnpm-lock.yaml", PackageManager::Pnpm),
    ("yarn.lock", PackageManager::Yarn),
    ("node_modules/.npminstall.done", PackageManager::Cnpm),
    ("package-lock.json", PackageManager::Npm),
];

/// Detects which package manager a working directory uses.
pub struct PackageManagerDetector;

impl PackageManagerDetector {
    /// Detect the manager for `working_dir` from the real environment.
    pub fn detect(working_dir: &Path, configured: Option<PackageManager>) -> ManagerDetection {
        Self::detect_with_env(working_dir, configured, &|key: &str| std::env::var(key))
    }

    /// Detect with a custom env var lookup function.
    ///
    /// Signals in order: configured manager, user agent, lockfiles, npm.
    pub fn detect_with_env(
        working_dir: &Path,
        configured: Option<PackageManager>,
        env_fn: &dyn Fn(&str) -> std::result::Result<String, std::env::VarError>,
    ) -> ManagerDetection {
        if let Some(manager) = configured {
            return ManagerDetection {
                manager,
                signal: DetectionSignal::Configured,
            };
        }

        if let Ok(agent) = env_fn(USER_AGENT_ENV) {
            if let Some(manager) = from_user_agent(&agent) {
                return ManagerDetection {
                    manager,
                    signal: DetectionSignal::UserAgent(agent),
                };
            }
        }

        for (file, manager) in LOCKFILES {
            if working_dir.join(file).exists() {
                return ManagerDetection {
                    manager: *manager,
                    signal: DetectionSignal::Lockfile(file.to_string()),
                };
            }
        }

        ManagerDetection {
            manager: PackageManager::Npm,
            signal: DetectionSignal::Default,
        }
    }
}

/// Parse the manager out of a user agent such as `pnpm/8.6.0 npm/? node/v18.16.0`.
fn from_user_agent(agent: &str) -> Option<PackageManager> {
    let re = regex::Regex::new(r"^\s*([A-Za-z]+)/").ok()?;
    let caps = re.captures(agent)?;
    caps.get(1)?.as_str().parse().ok()
}

/// Detect the manager and check it is itself installed.
///
/// # Errors
///
/// Returns `ManagerNotFound` when the detected manager is not a locally
/// present package. This is never downgraded to another manager.
pub fn select_manager(
    working_dir: &Path,
    configured: Option<PackageManager>,
    locator: &PackageLocator,
    env_fn: &dyn Fn(&str) -> std::result::Result<String, std::env::VarError>,
) -> Result<ManagerDetection> {
    let detection = PackageManagerDetector::detect_with_env(working_dir, configured, env_fn);
    tracing::debug!(
        "Selected package manager {} ({})",
        detection.manager,
        detection.signal
    );

    if !locator.has_package(detection.manager.name()) {
        return Err(AutodepError::ManagerNotFound {
            manager: detection.manager.name().to_string(),
        });
    }

    Ok(detection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::VarError;
    use std::fs;
    use tempfile::TempDir;

    fn no_env(_: &str) -> std::result::Result<String, VarError> {
        Err(VarError::NotPresent)
    }

    fn install(dir: &Path, name: &str) {
        let root = dir.join(name);
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("package.json"), r#"{"version":"1.0.0"}"#).unwrap();
    }

    #[test]
    fn install_commands_are_fixed_per_manager() {
        let spec = "left-pad@1.3.0";
        let args = |m: PackageManager| m.install_command(spec).args;

        assert_eq!(args(PackageManager::Npm), vec!["add", spec]);
        assert_eq!(args(PackageManager::Pnpm), vec!["add", spec]);
        assert_eq!(args(PackageManager::Cnpm), vec!["i", spec]);
        assert_eq!(args(PackageManager::Yarn), vec!["add", spec]);
    }

    #[test]
    fn install_commands_never_pass_registry() {
        for manager in PackageManager::ALL {
            let inv = manager.install_command("x");
            assert!(!inv.args.iter().any(|a| a.contains("registry")));
            assert!(!inv.program.starts_with("npx"));
        }
    }

    #[test]
    fn parses_manager_names() {
        assert_eq!("pnpm".parse::<PackageManager>(), Ok(PackageManager::Pnpm));
        assert_eq!("YARN".parse::<PackageManager>(), Ok(PackageManager::Yarn));
        assert!("bun".parse::<PackageManager>().is_err());
    }

    #[test]
    fn empty_project_defaults_to_npm() {
        let temp = TempDir::new().unwrap();

        let detection = PackageManagerDetector::detect_with_env(temp.path(), None, &no_env);

        assert_eq!(detection.manager, PackageManager::Npm);
        assert_eq!(detection.signal, DetectionSignal::Default);
    }

    #[test]
    fn detects_lockfiles() {
        let cases = [
            ("pnpm-lock.yaml", PackageManager::Pnpm),
            ("yarn.lock", PackageManager::Yarn),
            ("package-lock.json", PackageManager::Npm),
        ];
        for (file, expected) in cases {
            let temp = TempDir::new().unwrap();
            fs::write(temp.path().join(file), "").unwrap();

            let detection = PackageManagerDetector::detect_with_env(temp.path(), None, &no_env);

            assert_eq!(detection.manager, expected, "for {}", file);
        }
    }

    #[test]
    fn detects_cnpm_install_marker() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("node_modules")).unwrap();
        fs::write(temp.path().join("node_modules/.npminstall.done"), "").unwrap();

        let detection = PackageManagerDetector::detect_with_env(temp.path(), None, &no_env);

        assert_eq!(detection.manager, PackageManager::Cnpm);
    }

    #[test]
    fn pnpm_lock_beats_package_lock() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("package-lock.json"), "").unwrap();
        fs::write(temp.path().join("pnpm-lock.yaml"), "").unwrap();

        let detection = PackageManagerDetector::detect_with_env(temp.path(), None, &no_env);

        assert_eq!(detection.manager, PackageManager::Pnpm);
    }

    #[test]
    fn user_agent_beats_lockfiles() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("yarn.lock"), "").unwrap();
        let env = |key: &str| {
            if key == USER_AGENT_ENV {
                Ok("pnpm/8.6.0 npm/? node/v18.16.0 linux x64".to_string())
            } else {
                Err(VarError::NotPresent)
            }
        };

        let detection = PackageManagerDetector::detect_with_env(temp.path(), None, &env);

        assert_eq!(detection.manager, PackageManager::Pnpm);
        assert!(matches!(detection.signal, DetectionSignal::UserAgent(_)));
    }

    #[test]
    fn unknown_user_agent_is_ignored() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("yarn.lock"), "").unwrap();
        let env = |_: &str| Ok::<_, VarError>("bun/1.0.0".to_string());

        let detection = PackageManagerDetector::detect_with_env(temp.path(), None, &env);

        assert_eq!(detection.manager, PackageManager::Yarn);
    }

    #[test]
    fn configured_manager_beats_everything() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("yarn.lock"), "").unwrap();
        let env = |_: &str| Ok::<_, VarError>("pnpm/8.6.0".to_string());

        let detection = PackageManagerDetector::detect_with_env(
            temp.path(),
            Some(PackageManager::Cnpm),
            &env,
        );

        assert_eq!(detection.manager, PackageManager::Cnpm);
        assert_eq!(detection.signal, DetectionSignal::Configured);
    }

    #[test]
    fn select_manager_accepts_installed_manager() {
        let project = TempDir::new().unwrap();
        let modules = TempDir::new().unwrap();
        install(modules.path(), "npm");
        let locator = PackageLocator::new(vec![modules.path().to_path_buf()]);

        let detection = select_manager(project.path(), None, &locator, &no_env).unwrap();

        assert_eq!(detection.manager, PackageManager::Npm);
    }

    #[test]
    fn select_manager_rejects_missing_manager() {
        let project = TempDir::new().unwrap();
        let modules = TempDir::new().unwrap();
        install(modules.path(), "npm");
        let locator = PackageLocator::new(vec![modules.path().to_path_buf()]);

        let err = select_manager(
            project.path(),
            Some(PackageManager::Cnpm),
            &locator,
            &no_env,
        )
        .unwrap_err();

        assert!(matches!(err, AutodepError::ManagerNotFound { manager } if manager == "cnpm"));
    }
}
