//! Package ecosystems and the manifest file names that identify them.

use std::path::Path;

/// Package-manager families we recognise.
///
/// Ordering follows declaration order; it only matters for deterministic
/// iteration, the Analysis Result sorts by display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ecosystem {
    Go,
    Npm,
    Yarn,
    Python,
    Maven,
    Gradle,
    Composer,
    Ruby,
    Rust,
    Swift,
}

impl Ecosystem {
    pub const ALL: [Ecosystem; 10] = [
        Ecosystem::Go,
        Ecosystem::Npm,
        Ecosystem::Yarn,
        Ecosystem::Python,
        Ecosystem::Maven,
        Ecosystem::Gradle,
        Ecosystem::Composer,
        Ecosystem::Ruby,
        Ecosystem::Rust,
        Ecosystem::Swift,
    ];

    /// Stable tag used in logs.
    pub fn tag(&self) -> &'static str {
        match self {
            Ecosystem::Go => "go",
            Ecosystem::Npm => "node/npm",
            Ecosystem::Yarn => "node/yarn",
            Ecosystem::Python => "python",
            Ecosystem::Maven => "maven",
            Ecosystem::Gradle => "gradle",
            Ecosystem::Composer => "composer/php",
            Ecosystem::Ruby => "ruby",
            Ecosystem::Rust => "rust",
            Ecosystem::Swift => "swift",
        }
    }

    /// Name used as the key in the Analysis Result.
    pub fn display_name(&self) -> &'static str {
        match self {
            Ecosystem::Go => "Go",
            Ecosystem::Npm => "Node",
            Ecosystem::Yarn => "Yarn",
            Ecosystem::Python => "Python",
            Ecosystem::Maven => "Maven",
            Ecosystem::Gradle => "Gradle",
            Ecosystem::Composer => "Composer",
            Ecosystem::Ruby => "Ruby",
            Ecosystem::Rust => "Rust",
            Ecosystem::Swift => "Swift",
        }
    }

    /// Lower-cased manifest file names for this ecosystem.
    pub fn manifest_names(&self) -> &'static [&'static str] {
        match self {
            Ecosystem::Go => &["go.mod"],
            Ecosystem::Npm => &["package.json"],
            Ecosystem::Yarn => &["yarn.lock"],
            Ecosystem::Python => &["requirements.txt", "setup.py", "pipfile", "pyproject.toml"],
            Ecosystem::Maven => &["pom.xml"],
            Ecosystem::Gradle => &["build.gradle", "build.gradle.kts", "gradle.properties"],
            Ecosystem::Composer => &["composer.json"],
            Ecosystem::Ruby => &["gemfile"],
            Ecosystem::Rust => &["cargo.toml"],
            Ecosystem::Swift => &["package.swift"],
        }
    }

    /// Classify a file by its name, case-insensitively.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|eco| eco.manifest_names().contains(&lower.as_str()))
    }

    /// Classify a path by its final component.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_name()
            .and_then(|n| n.to_str())
            .and_then(Self::from_file_name)
    }
}

impl std::fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
