//! Manifest file parsing for dependency extraction.
//!
//! Every parser is a pure function from file content to a list of
//! [`Dependency`] records. Maven is the exception: its parser also reads the
//! repo-wide tables built by [`maven::MavenTables`].

mod analyze;
mod cargo;
mod composer;
mod discover;
mod ecosystem;
mod go;
mod gradle;
mod maven;
mod npm;
mod python;
mod ruby;
mod swift;
mod yarn;

pub use analyze::{Analysis, AnalysisRequest, Diagnostics, analyze_repository};
pub use discover::{discover_manifests, relative_path};
pub use ecosystem::Ecosystem;
pub use maven::ManagedVersions;

use std::collections::BTreeSet;
use std::fmt;

/// A dependency declared in a manifest file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    pub version: Version,
}

/// What a manifest says about a dependency's version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Version {
    /// No version declared, or one that could not be resolved.
    Absent,
    /// A version or constraint string, kept verbatim.
    Exact(String),
    /// A non-string value where a version was expected, as compact JSON.
    Structured(String),
    /// Go `replace` target.
    Replaced(String),
}

impl Dependency {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    pub fn exact(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::new(name, Version::Exact(version.into()))
    }

    pub fn unversioned(name: impl Into<String>) -> Self {
        Self::new(name, Version::Absent)
    }

    /// Build a record from an optional version, treating blank strings as absent.
    pub fn with_optional(name: impl Into<String>, version: Option<&str>) -> Self {
        match version.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => Self::exact(name, v),
            None => Self::unversioned(name),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Version::Absent => write!(f, "{}", self.name),
            Version::Exact(v) | Version::Structured(v) => write!(f, "{}@{}", self.name, v),
            Version::Replaced(target) => write!(f, "{} => {}", self.name, target),
        }
    }
}

/// Render records, dedupe by rendered form and sort lexicographically.
pub fn render_sorted<I>(deps: I) -> Vec<String>
where
    I: IntoIterator<Item = Dependency>,
{
    deps.into_iter()
        .map(|d| d.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
