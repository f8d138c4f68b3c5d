//! Module search directory construction.
//!
//! Mirrors how the Node runtime resolves bare specifiers: every ancestor of
//! the host root contributes its `node_modules`, nearest first, followed by
//! the two global install locations next to the `node` executable.

use std::path::{Path, PathBuf};

use crate::shell::clean_path;

/// Directory name that holds installed packages.
pub const NODE_MODULES: &str = "node_modules";

/// `node_modules` directories for `host_root` and each of its ancestors.
///
/// Ancestors that are themselves named `node_modules` are skipped, so a
/// host living inside a package tree never yields `node_modules/node_modules`.
pub fn module_search_paths(host_root: &Path) -> Vec<PathBuf> {
    let root = clean_path(host_root);
    root.ancestors()
        .filter(|dir| dir.file_name().is_none_or(|name| name != NODE_MODULES))
        .map(|dir| dir.join(NODE_MODULES))
        .collect()
}

/// Global install directories for the runtime at `node_executable`.
///
/// Returns `<bin>/node_modules` followed by `<bin>/../lib/node_modules`.
pub fn global_module_dirs(node_executable: &Path) -> Vec<PathBuf> {
    let Some(bin_dir) = node_executable.parent() else {
        return Vec::new();
    };

    vec![
        clean_path(&bin_dir.join(NODE_MODULES)),
        clean_path(&bin_dir.join("..").join("lib").join(NODE_MODULES)),
    ]
}
