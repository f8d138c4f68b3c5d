//! `ensure_loaded`: make a package present, then load it fresh.
//!
//! The flow for one call:
//!
//! 1. Read the host manifest at `<main_path>/package.json`.
//! 2. Parse the identifier against it.
//! 3. Check whether the lookup name is already installed.
//! 4. If not, show the caller's message and run the installer.
//! 5. Evict the lookup name from the module registry and load it again.
//!
//! [`Orchestrator::try_ensure_loaded`] returns every failure.
//! [`Orchestrator::ensure_loaded`] logs failures and returns `None`.
//!
//! # Example
//!
//! ```
//! use autodep::installer::default_context;
//! use autodep::modules::PackageModules;
//! use autodep::orchestrator::{EnsureOptions, Orchestrator};
//! use autodep::ui::MockUI;
//! use tempfile::TempDir;
//!
//! let host = TempDir::new().unwrap();
//! let mut orchestrator = Orchestrator::new(PackageModules::new(), default_context());
//! let mut ui = MockUI::new();
//!
//! // No package.json in the host: reported, not raised.
//! let opts = EnsureOptions::new().main_path(host.path());
//! assert!(orchestrator.ensure_loaded("left-pad", &opts, &mut ui).is_none());
//! assert_eq!(ui.errors().len(), 1);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::{load_settings, Settings};
use crate::error::{AutodepError, Result};
use crate::installer::{default_context, install_package, InstallRequest, InstallerContext};
use crate::locator::PackageLocator;
use crate::modules::{LoadedPackage, ModuleRegistry, PackageModules};
use crate::request::{parse_request, HostManifest};
use crate::ui::{OutputMode, TerminalUI, UserInterface};

/// Options for one `ensure_loaded` call.
#[derive(Debug, Clone)]
pub struct EnsureOptions {
    /// Load and return the package after ensuring it (default true).
    pub get_require: bool,
    /// Name to check and load instead of the parsed one.
    pub require_name: Option<String>,
    /// Extra variables for the install subprocess.
    pub env: HashMap<String, String>,
    /// Shown before an install starts.
    pub msg: Option<String>,
    /// Host directory; defaults to the parent of the working directory.
    pub main_path: Option<PathBuf>,
    /// Install attempts; defaults to the configured value.
    pub attempts: Option<u32>,
}

impl Default for EnsureOptions {
    fn default() -> Self {
        Self {
            get_require: true,
            require_name: None,
            env: HashMap::new(),
            msg: None,
            main_path: None,
            attempts: None,
        }
    }
}

impl EnsureOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_require(mut self, get_require: bool) -> Self {
        self.get_require = get_require;
        self
    }

    pub fn require_name(mut self, name: impl Into<String>) -> Self {
        self.require_name = Some(name.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }

    pub fn main_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.main_path = Some(path.into());
        self
    }

    pub fn attempts(mut self, attempts: u32) -> Self {
        self.attempts = Some(attempts);
        self
    }
}

/// Drives ensure-then-load against a module registry.
pub struct Orchestrator<'a, M: ModuleRegistry> {
    modules: M,
    ctx: InstallerContext<'a>,
    settings: Option<Settings>,
    locator_for: &'a dyn Fn(&Path) -> PackageLocator,
}

impl<'a, M: ModuleRegistry> Orchestrator<'a, M> {
    /// Settings are loaded per host unless fixed with [`Self::with_settings`].
    pub fn new(modules: M, ctx: InstallerContext<'a>) -> Self {
        Self {
            modules,
            ctx,
            settings: None,
            locator_for: &PackageLocator::for_host,
        }
    }

    /// Use these settings instead of loading them.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Build locators with `locator_for` instead of host discovery.
    pub fn with_locator(mut self, locator_for: &'a dyn Fn(&Path) -> PackageLocator) -> Self {
        self.locator_for = locator_for;
        self
    }

    /// The module registry.
    pub fn modules(&self) -> &M {
        &self.modules
    }

    /// Ensure `identifier` is installed, then load it.
    ///
    /// Returns `Ok(None)` when `get_require` is off.
    ///
    /// # Errors
    ///
    /// Fails if the host manifest is missing or invalid, a URL identifier
    /// comes without `require_name`, the package manager is not installed,
    /// or the package cannot be loaded after installing.
    pub fn try_ensure_loaded(
        &mut self,
        identifier: &str,
        opts: &EnsureOptions,
        ui: &mut dyn UserInterface,
    ) -> Result<Option<M::Module>> {
        let main_path = match &opts.main_path {
            Some(path) => path.clone(),
            None => default_main_path()?,
        };

        let manifest = HostManifest::load(&main_path)?;
        let request = parse_request(identifier, &manifest)?;
        if request.is_opaque() && opts.require_name.is_none() {
            return Err(AutodepError::InvalidArgument {
                message: "require_name is required for URL identifiers".to_string(),
            });
        }
        let lookup_name = opts
            .require_name
            .as_deref()
            .unwrap_or(request.resolved_name.as_str());
        tracing::debug!(
            "Ensuring {} as {} (version {})",
            request.install_spec,
            lookup_name,
            request.source
        );

        let locator = (self.locator_for)(&main_path);
        if let Some(found) = locator.find(lookup_name) {
            tracing::debug!("{}@{} already present", found.name, found.version);
        } else {
            if let Some(msg) = &opts.msg {
                ui.message(msg);
            }

            let settings = self.settings_for(&main_path)?;
            let install = InstallRequest {
                working_dir: &main_path,
                env: &opts.env,
                package_spec: &request.install_spec,
                expected_name: lookup_name,
                attempts: opts.attempts.unwrap_or(settings.attempts),
            };
            let outcome = install_package(&install, &locator, &settings, &self.ctx)?;

            if outcome.succeeded {
                let version = outcome.final_version.as_deref().unwrap_or("?");
                tracing::debug!(
                    "Installed {}@{} after {} attempt(s)",
                    lookup_name,
                    version,
                    outcome.attempts
                );
                ui.success(&format!("Installed {}@{}", lookup_name, version));
            } else {
                tracing::warn!(
                    "{} still missing after {} install attempt(s)",
                    lookup_name,
                    outcome.attempts
                );
                ui.warning(&format!(
                    "{} still missing after {} install attempt(s)",
                    lookup_name, outcome.attempts
                ));
            }
        }

        if !opts.get_require {
            return Ok(None);
        }

        self.modules.evict(lookup_name);
        self.modules.load(lookup_name, &locator).map(Some)
    }

    /// Like [`Self::try_ensure_loaded`], but failures are logged and
    /// shown through `ui`, then reported as `None`.
    pub fn ensure_loaded(
        &mut self,
        identifier: &str,
        opts: &EnsureOptions,
        ui: &mut dyn UserInterface,
    ) -> Option<M::Module> {
        match self.try_ensure_loaded(identifier, opts, ui) {
            Ok(module) => module,
            Err(e) => {
                tracing::error!("Could not ensure {}: {}", identifier, e);
                ui.error(&format!("Could not ensure {}: {}", identifier, e));
                None
            }
        }
    }

    fn settings_for(&self, main_path: &Path) -> Result<Settings> {
        match &self.settings {
            Some(settings) => Ok(settings.clone()),
            None => load_settings(main_path),
        }
    }
}

/// Ensure and load a package with the built-in registry and terminal output.
pub fn ensure_loaded(identifier: &str, opts: &EnsureOptions) -> Option<LoadedPackage> {
    let mut ui = TerminalUI::new(OutputMode::Normal);
    Orchestrator::new(PackageModules::new(), default_context()).ensure_loaded(
        identifier,
        opts,
        &mut ui,
    )
}

/// Parent of the working directory, or the working directory at the root.
pub fn default_main_path() -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(cwd.parent().map(Path::to_path_buf).unwrap_or(cwd))
}
