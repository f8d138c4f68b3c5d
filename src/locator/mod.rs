//! Local package detection.
//!
//! The [`PackageLocator`] answers "is this package installed, and at which
//! version?" by probing `<dir>/<name>/package.json` across an ordered list
//! of search directories. Probing is read-only and never fails: anything
//! that cannot be read counts as absent.
//!
//! # Example
//!
//! ```
//! use autodep::locator::PackageLocator;
//! use std::fs;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let pkg = temp.path().join("node_modules").join("left-pad");
//! fs::create_dir_all(&pkg).unwrap();
//! fs::write(pkg.join("package.json"), r#"{"version": "1.3.0"}"#).unwrap();
//!
//! let locator = PackageLocator::new(vec![temp.path().join("node_modules")]);
//! assert_eq!(locator.version_of("left-pad"), Some("1.3.0".to_string()));
//! assert!(!locator.has_package("right-pad"));
//! ```

pub mod search_path;

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::shell::find_on_path;

pub use search_path::{global_module_dirs, module_search_paths, NODE_MODULES};

/// File name of a package manifest.
pub const PACKAGE_MANIFEST: &str = "package.json";

/// A package found in one of the search directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPackage {
    /// Package name as looked up.
    pub name: String,
    /// Version declared by the installed manifest.
    pub version: String,
    /// Directory holding the installed package.
    pub root: PathBuf,
}

/// Finds installed packages across ordered search directories.
#[derive(Debug, Clone, Default)]
pub struct PackageLocator {
    search_dirs: Vec<PathBuf>,
}

impl PackageLocator {
    /// Create a locator over explicit search directories.
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }

    /// Create the locator a host rooted at `host_root` resolves with.
    ///
    /// The runtime's global directories are only included when `node` is
    /// on PATH.
    pub fn for_host(host_root: &Path) -> Self {
        let node = find_on_path("node");
        Self::with_runtime(host_root, node.as_deref())
    }

    /// Create a host locator with an explicit runtime executable.
    pub fn with_runtime(host_root: &Path, node_executable: Option<&Path>) -> Self {
        let mut search_dirs = module_search_paths(host_root);
        if let Some(node) = node_executable {
            search_dirs.extend(global_module_dirs(node));
        }
        tracing::debug!("Module search directories: {:?}", search_dirs);
        Self { search_dirs }
    }

    /// Search directories in probe order.
    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Locate a package and read its installed version.
    ///
    /// The first directory holding `<name>/package.json` decides the
    /// answer; a manifest there without a readable `version` means absent.
    pub fn find(&self, name: &str) -> Option<LocalPackage> {
        if !is_valid_name(name) {
            return None;
        }

        let root = self
            .search_dirs
            .iter()
            .map(|dir| dir.join(name))
            .find(|root| root.join(PACKAGE_MANIFEST).is_file())?;

        let version = read_version(&root.join(PACKAGE_MANIFEST))?;

        Some(LocalPackage {
            name: name.to_string(),
            version,
            root,
        })
    }

    /// Installed version of a package, if present.
    pub fn version_of(&self, name: &str) -> Option<String> {
        self.find(name).map(|pkg| pkg.version)
    }

    /// Whether a package is present.
    pub fn has_package(&self, name: &str) -> bool {
        self.find(name).is_some()
    }
}

/// Package names are relative paths of plain segments (`left-pad`, `@scope/name`).
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && Path::new(name)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

fn read_version(manifest: &Path) -> Option<String> {
    let content = fs::read_to_string(manifest).ok()?;
    let value: serde_json::Value = serde_json::from_str(&content).ok()?;
    value
        .get("version")
        .and_then(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
