//! Package installation with bounded retries.
//!
//! [`install_package`] selects the package manager, resolves the registry,
//! and runs the manager's install command until the expected package is
//! locally detectable or the attempt budget runs out. Subprocess output is
//! forwarded live to the console.
//!
//! Nothing is rolled back on failure. Whatever the manager left behind
//! (including a new entry in the host's `dependencies`) stays in place.

use std::collections::HashMap;
use std::env::VarError;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Settings;
use crate::detection::select_manager;
use crate::error::Result;
use crate::locator::PackageLocator;
use crate::registry::{
    query_npm_registry, resolve_registry, QueryError, ResolvedRegistry, REGISTRY_CHILD_ENV,
};
use crate::shell::{execute, CommandOptions, CommandResult, Invocation};

/// Install attempts when nothing else is configured.
pub const DEFAULT_ATTEMPTS: u32 = 3;

/// Mockable dependencies for the installer.
pub struct InstallerContext<'a> {
    /// Run an install command to completion.
    pub run_command: &'a dyn Fn(&Invocation, &CommandOptions) -> Result<CommandResult>,
    /// Ask the primary manager for its configured registry.
    pub query_registry: &'a dyn Fn(Duration) -> std::result::Result<String, QueryError>,
    /// Read a host environment variable.
    pub env_var: &'a dyn Fn(&str) -> std::result::Result<String, VarError>,
}

/// Build the default `InstallerContext` for production use.
pub fn default_context() -> InstallerContext<'static> {
    InstallerContext {
        run_command: &|invocation, options| execute(invocation, options),
        query_registry: &query_npm_registry,
        env_var: &|key| std::env::var(key),
    }
}

/// One package to install.
#[derive(Debug, Clone)]
pub struct InstallRequest<'a> {
    /// Directory the manager runs in (the host root).
    pub working_dir: &'a Path,
    /// Extra variables for the install subprocess.
    pub env: &'a HashMap<String, String>,
    /// What the manager is asked to add.
    pub package_spec: &'a str,
    /// Name whose presence proves the install worked.
    pub expected_name: &'a str,
    /// Maximum subprocess runs; at least one always happens.
    pub attempts: u32,
}

/// Result of an install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    /// Whether the final presence check passed.
    pub succeeded: bool,
    /// Version found by the final presence check.
    pub final_version: Option<String>,
    /// Subprocess runs made.
    pub attempts: u32,
}

/// Install a package, retrying until it is present.
///
/// # Errors
///
/// Returns `ManagerNotFound` before any subprocess runs when the detected
/// manager is not installed. Failed attempts are not errors; they show up
/// as an unsuccessful [`InstallOutcome`].
pub fn install_package(
    request: &InstallRequest<'_>,
    locator: &PackageLocator,
    settings: &Settings,
    ctx: &InstallerContext<'_>,
) -> Result<InstallOutcome> {
    let working_dir = normalize_separators(request.working_dir);
    let detection = select_manager(&working_dir, settings.manager, locator, ctx.env_var)?;

    let timeout = settings.registry_query_timeout();
    let registry = resolve_registry(
        || (ctx.query_registry)(timeout),
        ctx.env_var,
        &settings.default_registry,
    );

    let invocation = detection.manager.install_command(request.package_spec);
    let options = CommandOptions {
        cwd: Some(working_dir),
        env: child_env(request.env, &registry),
        env_remove: vec![REGISTRY_CHILD_ENV.to_lowercase()],
        ..Default::default()
    };

    let max_attempts = request.attempts.max(1);
    let mut attempts = 0;
    loop {
        attempts += 1;
        tracing::debug!(
            "Install attempt {}/{}: {} (registry {})",
            attempts,
            max_attempts,
            invocation,
            registry.url
        );

        match (ctx.run_command)(&invocation, &options) {
            Ok(result) if result.success => {}
            Ok(result) => tracing::warn!(
                "Install attempt {}/{} exited with code {:?}: {}",
                attempts,
                max_attempts,
                result.exit_code,
                invocation
            ),
            Err(e) => tracing::warn!("Install attempt {}/{} failed: {}", attempts, max_attempts, e),
        }

        if locator.has_package(request.expected_name) || attempts >= max_attempts {
            break;
        }
    }

    let final_version = locator.version_of(request.expected_name);
    Ok(InstallOutcome {
        succeeded: final_version.is_some(),
        final_version,
        attempts,
    })
}

/// Caller overrides, with the resolved registry on top.
///
/// A caller registry key in any letter case is dropped.
fn child_env(
    overrides: &HashMap<String, String>,
    registry: &ResolvedRegistry,
) -> HashMap<String, String> {
    let mut env: HashMap<String, String> = overrides
        .iter()
        .filter(|(key, _)| !key.eq_ignore_ascii_case(REGISTRY_CHILD_ENV))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    env.insert(REGISTRY_CHILD_ENV.to_string(), registry.url.clone());
    env
}

/// Use forward slashes on every platform.
fn normalize_separators(path: &Path) -> PathBuf {
    PathBuf::from(path.to_string_lossy().replace('\\', "/"))
}
