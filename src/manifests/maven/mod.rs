//! Maven `pom.xml` parsing.
//!
//! A POM rarely stands alone: versions come from `${property}` references
//! and from `<dependencyManagement>` blocks, often declared in a parent POM
//! elsewhere in the repository. [`MavenTables`] collects both across the
//! whole tree before any single POM is parsed.

mod placeholder;
mod pom;
mod tables;

pub use tables::MavenTables;

use super::Dependency;

/// Whether a dependency without `<version>` may take one from dependency management.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ManagedVersions {
    #[default]
    Fallback,
    Ignore,
}

/// Parse one POM against the repository-wide tables.
///
/// Coordinates missing a `groupId` or `artifactId` are dropped. A version
/// that still holds an unresolved `${...}` after substitution is treated as
/// absent. Malformed XML yields whatever was read before the error.
pub fn parse_pom(content: &str, tables: &MavenTables, policy: ManagedVersions) -> Vec<Dependency> {
    pom::extract(content)
        .dependencies
        .into_iter()
        .filter_map(|coord| {
            let key = coord.key()?;
            let raw = match (coord.version, policy) {
                (Some(v), _) => Some(v),
                (None, ManagedVersions::Fallback) => tables.managed_version(&key).map(str::to_string),
                (None, ManagedVersions::Ignore) => None,
            };
            let version = raw.and_then(|v| placeholder::concrete_version(&v, tables.properties()));
            Some(Dependency::with_optional(key, version.as_deref()))
        })
        .collect()
}
