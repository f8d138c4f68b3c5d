//! Parse command implementation.
//!
//! The `autodep parse` command shows how an identifier resolves against
//! the host manifest without installing anything.

use std::path::{Path, PathBuf};

use crate::cli::args::ParseArgs;
use crate::error::{AutodepError, Result};
use crate::request::{parse_request, HostManifest};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The parse command implementation.
pub struct ParseCommand {
    main_path: PathBuf,
    args: ParseArgs,
}

impl ParseCommand {
    pub fn new(main_path: &Path, args: ParseArgs) -> Self {
        Self {
            main_path: main_path.to_path_buf(),
            args,
        }
    }
}

impl Command for ParseCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let manifest = match HostManifest::load(&self.main_path) {
            Ok(manifest) => manifest,
            Err(AutodepError::ManifestNotFound { path }) => {
                ui.warning(&format!("No host manifest at {}", path.display()));
                HostManifest::default()
            }
            Err(e) => return Err(e),
        };

        let request = parse_request(&self.args.identifier, &manifest)?;

        ui.show_value("name", &request.resolved_name);
        ui.show_value("version", request.version.as_deref().unwrap_or("none"));
        ui.show_value("source", &request.source.to_string());
        ui.show_value("spec", &request.install_spec);
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn run(dir: &Path, identifier: &str) -> (Result<CommandResult>, MockUI) {
        let cmd = ParseCommand::new(
            dir,
            ParseArgs {
                identifier: identifier.to_string(),
            },
        );
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui);
        (result, ui)
    }

    #[test]
    fn explicit_version_wins_over_manifest() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("package.json"),
            r#"{"dependencies":{"@scope/tool":"^1.0.0"}}"#,
        )
        .unwrap();

        let (result, ui) = run(temp.path(), "@scope/tool@2.0.0");

        assert!(result.unwrap().success);
        assert_eq!(ui.value("name"), Some("@scope/tool"));
        assert_eq!(ui.value("spec"), Some("@scope/tool@2.0.0"));
    }

    #[test]
    fn missing_manifest_warns_and_parses_unpinned() {
        let temp = TempDir::new().unwrap();

        let (result, ui) = run(temp.path(), "left-pad");

        assert!(result.unwrap().success);
        assert!(ui.has_warning("No host manifest"));
        assert_eq!(ui.value("version"), Some("none"));
        assert_eq!(ui.value("spec"), Some("left-pad"));
    }

    #[test]
    fn invalid_manifest_is_an_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("package.json"), "{not json").unwrap();

        let (result, _) = run(temp.path(), "left-pad");

        assert!(matches!(
            result,
            Err(AutodepError::ManifestParseError { .. })
        ));
    }
}
