//! Package identifier parsing.

use crate::error::{AutodepError, Result};

use super::manifest::{DeclaredIn, HostManifest};

/// Marker that makes an identifier an opaque URL or tarball reference.
const SCHEME_SEPARATOR: &str = "://";

/// Where a request's version came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSource {
    /// Written into the identifier (`name@version`).
    Explicit,
    /// Taken from one of the host's dependency maps.
    Declared(DeclaredIn),
    /// No version anywhere; the registry decides.
    Unpinned,
    /// URL or tarball reference; never version-parsed.
    Opaque,
}

impl std::fmt::Display for VersionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Explicit => write!(f, "explicit"),
            Self::Declared(field) => write!(f, "{}", field.field()),
            Self::Unpinned => write!(f, "unpinned"),
            Self::Opaque => write!(f, "opaque"),
        }
    }
}

/// A parsed package request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequest {
    /// The identifier exactly as the caller supplied it.
    pub raw_identifier: String,
    /// Version to pin, from the identifier or the host manifest.
    pub version: Option<String>,
    /// Where `version` came from.
    pub source: VersionSource,
    /// Name used for lookup and load; never carries a version suffix.
    pub resolved_name: String,
    /// Argument handed to the package manager.
    pub install_spec: String,
}

impl PackageRequest {
    /// The version written into the identifier, if any.
    pub fn explicit_version(&self) -> Option<&str> {
        match self.source {
            VersionSource::Explicit => self.version.as_deref(),
            _ => None,
        }
    }

    /// Whether the identifier is a URL or tarball reference.
    pub fn is_opaque(&self) -> bool {
        self.source == VersionSource::Opaque
    }
}

/// Whether an identifier is an opaque install target.
pub fn is_opaque(identifier: &str) -> bool {
    identifier.contains(SCHEME_SEPARATOR)
}

/// Split `name@version` into its name and non-empty version.
///
/// A leading `@` belongs to the scope and is never a separator, so
/// `@scope/name@1.2.3` splits into `@scope/name` and `1.2.3`. The first
/// separator after the scope wins, which keeps alias specs such as
/// `name@npm:other@1.0.0` intact as the version.
pub fn split_identifier(identifier: &str) -> (&str, Option<&str>) {
    let search_from = usize::from(identifier.starts_with('@'));
    let separator = identifier[search_from..]
        .find('@')
        .map(|offset| offset + search_from);

    match separator {
        Some(at) if at > 0 => {
            let version = &identifier[at + 1..];
            (&identifier[..at], Some(version).filter(|v| !v.is_empty()))
        }
        _ => (identifier, None),
    }
}

/// Parse an identifier, pinning a declared version when none is given.
///
/// The manifest is only read, never changed.
///
/// # Errors
///
/// Returns `InvalidArgument` for an empty identifier.
pub fn parse_request(identifier: &str, manifest: &HostManifest) -> Result<PackageRequest> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(AutodepError::InvalidArgument {
            message: "package identifier is empty".to_string(),
        });
    }

    if is_opaque(identifier) {
        return Ok(PackageRequest {
            raw_identifier: identifier.to_string(),
            version: None,
            source: VersionSource::Opaque,
            resolved_name: identifier.to_string(),
            install_spec: identifier.to_string(),
        });
    }

    let (name, explicit) = split_identifier(identifier);
    let (version, source) = match explicit {
        Some(version) => (Some(version), VersionSource::Explicit),
        None => match manifest.declared_version(name) {
            Some((version, field)) => (Some(version), VersionSource::Declared(field)),
            None => (None, VersionSource::Unpinned),
        },
    };

    let install_spec = match version {
        Some(version) => format!("{}@{}", name, version),
        None => name.to_string(),
    };

    Ok(PackageRequest {
        raw_identifier: identifier.to_string(),
        version: version.map(str::to_string),
        source,
        resolved_name: name.to_string(),
        install_spec,
    })
}
