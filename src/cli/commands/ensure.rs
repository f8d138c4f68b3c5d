//! Ensure command implementation.
//!
//! The `autodep ensure` command installs a package into the host when it
//! is missing and then loads it, printing what was loaded.

use std::path::{Path, PathBuf};

use crate::cli::args::EnsureArgs;
use crate::config::{load_settings, validate, Settings};
use crate::error::Result;
use crate::installer::default_context;
use crate::locator::PackageLocator;
use crate::modules::{LoadedPackage, PackageModules};
use crate::orchestrator::{EnsureOptions, Orchestrator};
use crate::request::{parse_request, HostManifest};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The ensure command implementation.
pub struct EnsureCommand {
    main_path: PathBuf,
    args: EnsureArgs,
}

impl EnsureCommand {
    pub fn new(main_path: &Path, args: EnsureArgs) -> Self {
        Self {
            main_path: main_path.to_path_buf(),
            args,
        }
    }

    /// Loaded settings with the command-line overrides applied.
    fn settings(&self) -> Result<Settings> {
        let mut settings = load_settings(&self.main_path)?;
        if let Some(attempts) = self.args.attempts {
            settings.attempts = attempts;
        }
        if let Some(manager) = self.args.manager {
            settings.manager = Some(manager);
        }
        validate(&settings)?;
        Ok(settings)
    }

    fn options(&self) -> EnsureOptions {
        let mut opts = EnsureOptions::new()
            .main_path(&self.main_path)
            .get_require(!self.args.no_load);
        opts.require_name = self.args.require_name.clone();
        opts.msg = self.args.msg.clone();
        opts.attempts = self.args.attempts;
        opts.env.extend(self.args.env.iter().cloned());
        opts
    }

    /// Name the package is looked up under after an unloaded ensure.
    fn lookup_name(&self) -> Result<String> {
        if let Some(name) = &self.args.require_name {
            return Ok(name.clone());
        }
        let manifest = HostManifest::load(&self.main_path)?;
        Ok(parse_request(&self.args.identifier, &manifest)?.resolved_name)
    }
}

impl Command for EnsureCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let settings = self.settings()?;
        let mut orchestrator =
            Orchestrator::new(PackageModules::new(), default_context()).with_settings(settings);

        match orchestrator.try_ensure_loaded(&self.args.identifier, &self.options(), ui)? {
            Some(pkg) => {
                show_loaded(&pkg, ui);
                Ok(CommandResult::success())
            }
            None => {
                let name = self.lookup_name()?;
                match PackageLocator::for_host(&self.main_path).find(&name) {
                    Some(found) => {
                        ui.show_value("package", &format!("{}@{}", found.name, found.version));
                        Ok(CommandResult::success())
                    }
                    None => {
                        ui.error(&format!("{} is not installed", name));
                        Ok(CommandResult::failure(1))
                    }
                }
            }
        }
    }
}

fn show_loaded(pkg: &LoadedPackage, ui: &mut dyn UserInterface) {
    ui.show_value("package", &format!("{}@{}", pkg.name, pkg.version));
    ui.show_value("entry", &pkg.entry.display().to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn args(identifier: &str) -> EnsureArgs {
        EnsureArgs {
            identifier: identifier.to_string(),
            require_name: None,
            env: vec![("NODE_ENV".to_string(), "test".to_string())],
            msg: Some("Installing...".to_string()),
            no_load: false,
            attempts: Some(2),
            manager: None,
        }
    }

    #[test]
    fn options_carry_flags() {
        let temp = TempDir::new().unwrap();
        let mut a = args("left-pad");
        a.no_load = true;
        a.require_name = Some("pad".to_string());

        let opts = EnsureCommand::new(temp.path(), a).options();

        assert!(!opts.get_require);
        assert_eq!(opts.require_name.as_deref(), Some("pad"));
        assert_eq!(opts.attempts, Some(2));
        assert_eq!(opts.env.get("NODE_ENV").map(String::as_str), Some("test"));
        assert_eq!(opts.main_path.as_deref(), Some(temp.path()));
    }

    #[test]
    fn present_package_is_loaded_without_install() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("package.json"), "{}").unwrap();
        let root = temp.path().join("node_modules").join("left-pad");
        fs::create_dir_all(&root).unwrap();
        fs::write(
            root.join("package.json"),
            r#"{"version":"1.3.0","main":"index.js"}"#,
        )
        .unwrap();
        let mut ui = MockUI::new();

        let result = EnsureCommand::new(temp.path(), args("left-pad"))
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert_eq!(ui.value("package"), Some("left-pad@1.3.0"));
        assert!(ui.messages().is_empty());
    }

    #[test]
    fn missing_host_manifest_is_an_error() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        let result = EnsureCommand::new(temp.path(), args("left-pad")).execute(&mut ui);

        assert!(result.is_err());
    }

    #[test]
    fn zero_attempts_flag_is_rejected() {
        let temp = TempDir::new().unwrap();
        let mut a = args("left-pad");
        a.attempts = Some(0);

        let err = EnsureCommand::new(temp.path(), a).settings().unwrap_err();

        assert!(err.to_string().contains("attempts"));
    }
}
