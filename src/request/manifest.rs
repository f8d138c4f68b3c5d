//! The host's declared dependency maps.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::error::{AutodepError, Result};
use crate::locator::PACKAGE_MANIFEST;

/// Which declaration a pinned version was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredIn {
    /// `pluginDependencies`
    Plugin,
    /// `optionalDependencies`
    Optional,
    /// `dependencies`
    Regular,
}

impl DeclaredIn {
    /// The manifest field name.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Plugin => "pluginDependencies",
            Self::Optional => "optionalDependencies",
            Self::Regular => "dependencies",
        }
    }
}

/// Snapshot of the host `package.json` dependency sections.
///
/// Re-read from disk on every call; never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostManifest {
    #[serde(default, deserialize_with = "string_entries")]
    pub dependencies: BTreeMap<String, String>,

    #[serde(default, deserialize_with = "string_entries")]
    pub optional_dependencies: BTreeMap<String, String>,

    #[serde(default, deserialize_with = "string_entries")]
    pub plugin_dependencies: BTreeMap<String, String>,
}

impl HostManifest {
    /// Path of the manifest inside a host directory.
    pub fn path_in(main_path: &Path) -> PathBuf {
        main_path.join(PACKAGE_MANIFEST)
    }

    /// Read the manifest from `<main_path>/package.json`.
    ///
    /// # Errors
    ///
    /// Returns `ManifestNotFound` if the file doesn't exist.
    /// Returns `ManifestParseError` if the JSON is invalid.
    pub fn load(main_path: &Path) -> Result<Self> {
        let path = Self::path_in(main_path);
        let content = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AutodepError::ManifestNotFound { path: path.clone() }
            } else {
                AutodepError::Io(e)
            }
        })?;

        Self::parse(&content, &path)
    }

    /// Parse manifest JSON.
    ///
    /// `source_path` is only used for error reporting.
    pub fn parse(content: &str, source_path: &Path) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| AutodepError::ManifestParseError {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Version constraint declared for `name`, in precedence order:
    /// plugin, optional, then regular dependencies.
    pub fn declared_version(&self, name: &str) -> Option<(&str, DeclaredIn)> {
        [
            (&self.plugin_dependencies, DeclaredIn::Plugin),
            (&self.optional_dependencies, DeclaredIn::Optional),
            (&self.dependencies, DeclaredIn::Regular),
        ]
        .into_iter()
        .find_map(|(map, source)| {
            map.get(name)
                .filter(|v| !v.is_empty())
                .map(|v| (v.as_str(), source))
        })
    }
}

/// Keep string-valued entries, ignore everything else; `null` is empty.
fn string_entries<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, serde_json::Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(name, value)| value.as_str().map(|v| (name, v.to_string())))
        .collect())
}
