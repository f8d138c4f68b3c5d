//! Manager command implementation.
//!
//! The `autodep manager` command shows which package manager an install
//! would run, why it was chosen, and whether it is installed.

use std::path::{Path, PathBuf};

use crate::config::load_settings;
use crate::detection::{ManagerDetection, PackageManagerDetector};
use crate::error::Result;
use crate::locator::PackageLocator;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The manager command implementation.
pub struct ManagerCommand {
    main_path: PathBuf,
}

impl ManagerCommand {
    pub fn new(main_path: &Path) -> Self {
        Self {
            main_path: main_path.to_path_buf(),
        }
    }
}

impl Command for ManagerCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let settings = load_settings(&self.main_path)?;
        let detection = PackageManagerDetector::detect(&self.main_path, settings.manager);
        let locator = PackageLocator::for_host(&self.main_path);
        Ok(report(&detection, &locator, ui))
    }
}

fn report(
    detection: &ManagerDetection,
    locator: &PackageLocator,
    ui: &mut dyn UserInterface,
) -> CommandResult {
    ui.show_value("manager", detection.manager.name());
    ui.show_value("signal", &detection.signal.to_string());

    match locator.version_of(detection.manager.name()) {
        Some(version) => {
            ui.show_value("installed", &version);
            CommandResult::success()
        }
        None => {
            ui.error(&format!("{} is not installed", detection.manager));
            CommandResult::failure(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{DetectionSignal, PackageManager};
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn installed_manager_succeeds() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("node_modules").join("yarn");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("package.json"), r#"{"version":"1.22.19"}"#).unwrap();
        let locator = PackageLocator::new(vec![temp.path().join("node_modules")]);
        let detection = ManagerDetection {
            manager: PackageManager::Yarn,
            signal: DetectionSignal::Lockfile("yarn.lock".to_string()),
        };
        let mut ui = MockUI::new();

        let result = report(&detection, &locator, &mut ui);

        assert!(result.success);
        assert_eq!(ui.value("manager"), Some("yarn"));
        assert_eq!(ui.value("installed"), Some("1.22.19"));
    }

    #[test]
    fn missing_manager_fails() {
        let temp = TempDir::new().unwrap();
        let locator = PackageLocator::new(vec![temp.path().to_path_buf()]);
        let detection = ManagerDetection {
            manager: PackageManager::Cnpm,
            signal: DetectionSignal::Configured,
        };
        let mut ui = MockUI::new();

        let result = report(&detection, &locator, &mut ui);

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("cnpm"));
    }
}
