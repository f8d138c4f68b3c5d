//! Registry command implementation.
//!
//! The `autodep registry` command shows the registry an install would be
//! pointed at, and which precedence tier supplied it.

use std::path::{Path, PathBuf};

use crate::config::load_settings;
use crate::error::Result;
use crate::registry::{query_npm_registry, resolve_registry};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The registry command implementation.
pub struct RegistryCommand {
    main_path: PathBuf,
}

impl RegistryCommand {
    pub fn new(main_path: &Path) -> Self {
        Self {
            main_path: main_path.to_path_buf(),
        }
    }
}

impl Command for RegistryCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let settings = load_settings(&self.main_path)?;
        let timeout = settings.registry_query_timeout();

        let registry = resolve_registry(
            || query_npm_registry(timeout),
            |key: &str| std::env::var(key),
            &settings.default_registry,
        );

        ui.show_value("registry", &registry.url);
        ui.show_value("source", &registry.source.to_string());
        Ok(CommandResult::success())
    }
}
