//! Package requests: identifier parsing and declared-version fallback.
//!
//! A caller asks for `left-pad`, `left-pad@1.3.0`, `@scope/name@1.2.3` or a
//! tarball URL. [`parse_request`] turns that into the name used for lookup
//! and the install spec handed to the package manager, pinning a version from the
//! host's [`HostManifest`] when the caller gave none.
//!
//! # Example
//!
//! ```
//! use autodep::request::{parse_request, HostManifest};
//! use std::path::Path;
//!
//! let manifest = HostManifest::parse(
//!     r#"{"dependencies": {"left-pad": "1.3.0"}}"#,
//!     Path::new("package.json"),
//! )
//! .unwrap();
//!
//! let req = parse_request("left-pad", &manifest).unwrap();
//! assert_eq!(req.install_spec, "left-pad@1.3.0");
//! assert_eq!(req.resolved_name, "left-pad");
//! ```

pub mod manifest;
pub mod parser;

pub use manifest::{DeclaredIn, HostManifest};
pub use parser::{is_opaque, parse_request, split_identifier, PackageRequest, VersionSource};
