//! Locate command implementation.
//!
//! The `autodep locate` command reports whether a package is installed
//! where the host would resolve it.

use std::path::{Path, PathBuf};

use crate::cli::args::LocateArgs;
use crate::error::Result;
use crate::locator::PackageLocator;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The locate command implementation.
pub struct LocateCommand {
    main_path: PathBuf,
    args: LocateArgs,
}

impl LocateCommand {
    pub fn new(main_path: &Path, args: LocateArgs) -> Self {
        Self {
            main_path: main_path.to_path_buf(),
            args,
        }
    }

    fn report(&self, locator: &PackageLocator, ui: &mut dyn UserInterface) -> CommandResult {
        if self.args.paths {
            for dir in locator.search_dirs() {
                ui.show_value("search", &dir.display().to_string());
            }
        }

        match locator.find(&self.args.name) {
            Some(found) => {
                ui.show_value("version", &found.version);
                ui.show_value("root", &found.root.display().to_string());
                CommandResult::success()
            }
            None => {
                ui.error(&format!("{} is not installed", self.args.name));
                CommandResult::failure(1)
            }
        }
    }
}

impl Command for LocateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let locator = PackageLocator::for_host(&self.main_path);
        Ok(self.report(&locator, ui))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn command(dir: &Path, name: &str, paths: bool) -> LocateCommand {
        LocateCommand::new(
            dir,
            LocateArgs {
                name: name.to_string(),
                paths,
            },
        )
    }

    #[test]
    fn reports_installed_version() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("node_modules").join("left-pad");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("package.json"), r#"{"version":"1.3.0"}"#).unwrap();
        let locator = PackageLocator::new(vec![temp.path().join("node_modules")]);
        let mut ui = MockUI::new();

        let result = command(temp.path(), "left-pad", true).report(&locator, &mut ui);

        assert!(result.success);
        assert_eq!(ui.value("version"), Some("1.3.0"));
        assert_eq!(ui.values()[0].0, "search");
    }

    #[test]
    fn absent_package_fails() {
        let temp = TempDir::new().unwrap();
        let locator = PackageLocator::new(vec![temp.path().join("node_modules")]);
        let mut ui = MockUI::new();

        let result = command(temp.path(), "ghost", false).report(&locator, &mut ui);

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("ghost is not installed"));
        assert!(ui.values().is_empty());
    }
}
