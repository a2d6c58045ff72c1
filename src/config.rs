//! Scan configuration.
//!
//! Read from an optional `.sca.toml` at the scanned root:
//!
//! ```toml
//! exclude = ["node_modules", "third_party/**"]
//! managed_versions = false
//! ```
//!
//! Command-line flags are layered on top with [`ScanConfig::with_excludes`]
//! and [`ScanConfig::with_managed_versions`].

use std::path::Path;

use serde::Deserialize;

use crate::manifests::ManagedVersions;
use crate::types::ScanError;

pub const CONFIG_FILE: &str = ".sca.toml";

/// Directories never descended into.
const VCS_DIRS: &[&str] = &[".git", ".svn", ".hg"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    /// Directory names or glob patterns (relative to the root) to skip.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether a Maven dependency without `<version>` may take its version
    /// from dependency management. Defaults to true.
    #[serde(default)]
    pub managed_versions: Option<bool>,
}

impl ScanConfig {
    /// Load `.sca.toml` from the given directory, or defaults if absent.
    pub fn load(dir: &Path) -> Result<Self, ScanError> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ScanError::Io {
            path: path.clone(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| ScanError::Config {
            path,
            message: e.to_string(),
        })
    }

    /// Append extra exclude patterns.
    pub fn with_excludes(mut self, extra: impl IntoIterator<Item = String>) -> Self {
        self.exclude.extend(extra);
        self
    }

    pub fn with_managed_versions(mut self, enabled: bool) -> Self {
        self.managed_versions = Some(enabled);
        self
    }

    pub fn managed_versions(&self) -> ManagedVersions {
        match self.managed_versions {
            Some(false) => ManagedVersions::Ignore,
            _ => ManagedVersions::Fallback,
        }
    }

    /// Whether a directory should be skipped during a walk.
    ///
    /// `name` is the directory's own name, `relative` its root-relative path
    /// with `/` separators.
    pub fn skips_dir(&self, name: &str, relative: &str) -> bool {
        if VCS_DIRS.contains(&name) {
            return true;
        }

        self.exclude.iter().any(|pattern| {
            pattern == name
                || pattern == relative
                || glob::Pattern::new(pattern)
                    .map(|p| p.matches(relative))
                    .unwrap_or(false)
        })
    }
}
