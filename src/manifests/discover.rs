//! Manifest discovery.
//!
//! Walks the directory tree to find every manifest file, skipping VCS metadata
//! and configured excludes. Symlinked directories are not followed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::Ecosystem;
use crate::config::ScanConfig;

/// Discover manifest files under `root`, grouped by ecosystem.
///
/// Each ecosystem's list is sorted by path.
pub fn discover_manifests(root: &Path, config: &ScanConfig) -> BTreeMap<Ecosystem, Vec<PathBuf>> {
    let mut found: BTreeMap<Ecosystem, Vec<PathBuf>> = BTreeMap::new();

    for path in walk_files(root, config, |name| Ecosystem::from_file_name(name).is_some()) {
        if let Some(ecosystem) = Ecosystem::from_path(&path) {
            found.entry(ecosystem).or_default().push(path);
        }
    }

    for paths in found.values_mut() {
        paths.sort();
    }

    found
}

/// Every file under `root` whose name passes `keep`.
pub fn walk_files<F>(root: &Path, config: &ScanConfig, keep: F) -> Vec<PathBuf>
where
    F: Fn(&str) -> bool,
{
    let mut files = Vec::new();
    walk_recursive(root, root, config, &keep, &mut files);
    files
}

fn walk_recursive<F>(root: &Path, dir: &Path, config: &ScanConfig, keep: &F, found: &mut Vec<PathBuf>)
where
    F: Fn(&str) -> bool,
{
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(err) => {
            // Skip unreadable directories
            debug!(path = %dir.display(), error = %err, "skipping unreadable directory");
            return;
        }
    };

    let mut entries: Vec<_> = entries.flatten().collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };

        if file_type.is_dir() {
            if config.skips_dir(name, &relative_path(root, &path)) {
                continue;
            }
            walk_recursive(root, &path, config, keep, found);
        } else if (file_type.is_file() || path.is_file()) && keep(name) {
            found.push(path);
        }
    }
}

/// Root-relative path with `/` separators.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
