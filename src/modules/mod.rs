//! Loading installed packages, with a cache that can be evicted.
//!
//! A package installed during this process must be read fresh from disk,
//! so loads always go through [`ModuleRegistry::evict`] first.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use crate::error::{AutodepError, Result};
use crate::locator::{PackageLocator, PACKAGE_MANIFEST};

/// Entry file used when a manifest has no `main`.
pub const DEFAULT_ENTRY: &str = "index.js";

/// Host-side cache of loaded packages.
pub trait ModuleRegistry {
    /// What a successful load yields.
    type Module;

    /// Drop any cached entry for `name`. Returns whether one existed.
    fn evict(&mut self, name: &str) -> bool;

    /// Load `name` through the locator's search directories.
    fn load(&mut self, name: &str, locator: &PackageLocator) -> Result<Self::Module>;
}

/// An installed package read from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPackage {
    pub name: String,
    pub version: String,
    pub root: PathBuf,
    /// Resolved entry file (`main`, or `index.js`).
    pub entry: PathBuf,
    /// The installed `package.json`.
    pub manifest: Value,
}

impl LoadedPackage {
    /// Read the installed package for `name`.
    ///
    /// # Errors
    ///
    /// Returns `PackageNotFound` if no search directory holds a usable
    /// manifest for `name`.
    pub fn read(name: &str, locator: &PackageLocator) -> Result<Self> {
        let found = locator
            .find(name)
            .ok_or_else(|| AutodepError::PackageNotFound {
                name: name.to_string(),
                message: format!("not found in {} search directories", locator.search_dirs().len()),
            })?;

        let manifest_path = found.root.join(PACKAGE_MANIFEST);
        let content = fs::read_to_string(&manifest_path)?;
        let manifest: Value =
            serde_json::from_str(&content).map_err(|e| AutodepError::ManifestParseError {
                path: manifest_path,
                message: e.to_string(),
            })?;

        let entry = manifest
            .get("main")
            .and_then(Value::as_str)
            .filter(|main| !main.trim().is_empty())
            .unwrap_or(DEFAULT_ENTRY);

        Ok(Self {
            entry: found.root.join(entry),
            name: found.name,
            version: found.version,
            root: found.root,
            manifest,
        })
    }
}

/// Default registry: loaded packages keyed by name.
#[derive(Debug, Default)]
pub struct PackageModules {
    cache: HashMap<String, LoadedPackage>,
}

impl PackageModules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached entry for `name`, if loaded.
    pub fn cached(&self, name: &str) -> Option<&LoadedPackage> {
        self.cache.get(name)
    }
}

impl ModuleRegistry for PackageModules {
    type Module = LoadedPackage;

    fn evict(&mut self, name: &str) -> bool {
        self.cache.remove(name).is_some()
    }

    fn load(&mut self, name: &str, locator: &PackageLocator) -> Result<LoadedPackage> {
        if let Some(cached) = self.cache.get(name) {
            return Ok(cached.clone());
        }
        let loaded = LoadedPackage::read(name, locator)?;
        self.cache.insert(name.to_string(), loaded.clone());
        Ok(loaded)
    }
}
