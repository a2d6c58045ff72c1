//! Dependency aggregation across a whole repository.
//!
//! The Maven tables are built first, as one phase; after that every manifest
//! is parsed independently and in parallel. Results are merged into ordered
//! maps so the output does not depend on filesystem iteration order.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::discover::{discover_manifests, relative_path};
use super::maven::{self, ManagedVersions, MavenTables};
use super::{
    Dependency, Ecosystem, cargo, composer, go, gradle, npm, python, render_sorted, ruby, swift,
    yarn,
};
use crate::config::ScanConfig;
use crate::types::ScanError;

/// The dependency inventory of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub repo: String,
    /// Display names of the ecosystems found, sorted.
    #[serde(rename = "type")]
    pub types: Vec<String>,
    /// Ecosystem display name -> relative manifest path -> rendered dependencies.
    pub dependencies: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    /// Every manifest path, relative to the root, sorted.
    pub files: Vec<String>,
}

/// Side information about a scan, kept out of the JSON result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Manifests that were read but yielded no dependencies.
    pub empty_files: Vec<String>,
    /// Manifests that could not be read at all.
    pub unreadable_files: Vec<String>,
    pub maven_properties: usize,
    pub managed_versions: usize,
}

impl Diagnostics {
    /// Whether any manifest came back empty or unreadable.
    pub fn has_findings(&self) -> bool {
        !self.empty_files.is_empty() || !self.unreadable_files.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub analysis: Analysis,
    pub diagnostics: Diagnostics,
}

/// What to scan and how.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub root: PathBuf,
    /// Identifier written to the `repo` field.
    pub repo: String,
    pub config: ScanConfig,
}

/// Discover and parse every manifest under the request's root.
///
/// Fails only when the root itself is missing or unreadable; per-file
/// problems end up in [`Diagnostics`].
pub fn analyze_repository(request: &AnalysisRequest) -> Result<ScanOutcome, ScanError> {
    check_root(&request.root)?;

    let manifests = discover_manifests(&request.root, &request.config);
    info!(
        root = %request.root.display(),
        ecosystems = manifests.len(),
        files = manifests.values().map(Vec::len).sum::<usize>(),
        "manifests discovered"
    );

    Ok(compile(&request.root, &request.repo, &manifests, &request.config))
}

fn check_root(root: &Path) -> Result<(), ScanError> {
    let metadata = std::fs::metadata(root).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => ScanError::RootNotFound(root.to_path_buf()),
        _ => ScanError::Io {
            path: root.to_path_buf(),
            source,
        },
    })?;

    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    std::fs::read_dir(root).map_err(|source| ScanError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    Ok(())
}

/// Per-file parse result, before merging.
struct ParsedFile {
    ecosystem: Ecosystem,
    relative: String,
    /// `None` when the file could not be read.
    dependencies: Option<Vec<String>>,
}

/// Build the Analysis Result from already-discovered manifests.
///
/// Every listed file appears in the result, with an empty list when it
/// could not be read or declared nothing.
pub fn compile(
    root: &Path,
    repo: &str,
    manifests: &BTreeMap<Ecosystem, Vec<PathBuf>>,
    config: &ScanConfig,
) -> ScanOutcome {
    let has_maven = manifests
        .get(&Ecosystem::Maven)
        .is_some_and(|paths| !paths.is_empty());
    let tables = if has_maven {
        MavenTables::from_root(root, config)
    } else {
        MavenTables::default()
    };
    if has_maven {
        info!(
            properties = tables.property_count(),
            managed = tables.managed_count(),
            "maven aggregation done"
        );
    }

    let policy = config.managed_versions();
    let jobs: Vec<(Ecosystem, &PathBuf)> = manifests
        .iter()
        .flat_map(|(ecosystem, paths)| paths.iter().map(move |p| (*ecosystem, p)))
        .collect();

    let parsed: Vec<ParsedFile> = jobs
        .par_iter()
        .map(|(ecosystem, path)| parse_file(root, *ecosystem, path, &tables, policy))
        .collect();

    let mut dependencies: BTreeMap<String, BTreeMap<String, Vec<String>>> = BTreeMap::new();
    let mut files = BTreeSet::new();
    let mut diagnostics = Diagnostics {
        maven_properties: tables.property_count(),
        managed_versions: tables.managed_count(),
        ..Default::default()
    };

    for file in parsed {
        match &file.dependencies {
            None => diagnostics.unreadable_files.push(file.relative.clone()),
            Some(deps) if deps.is_empty() => diagnostics.empty_files.push(file.relative.clone()),
            Some(_) => {}
        }

        files.insert(file.relative.clone());
        dependencies
            .entry(file.ecosystem.display_name().to_string())
            .or_default()
            .insert(file.relative, file.dependencies.unwrap_or_default());
    }

    diagnostics.empty_files.sort();
    diagnostics.unreadable_files.sort();

    let analysis = Analysis {
        repo: repo.to_string(),
        types: dependencies.keys().cloned().collect(),
        dependencies,
        files: files.into_iter().collect(),
    };

    info!(
        files = analysis.files.len(),
        empty = diagnostics.empty_files.len(),
        unreadable = diagnostics.unreadable_files.len(),
        "scan complete"
    );

    ScanOutcome {
        analysis,
        diagnostics,
    }
}

fn parse_file(
    root: &Path,
    ecosystem: Ecosystem,
    path: &Path,
    tables: &MavenTables,
    policy: ManagedVersions,
) -> ParsedFile {
    let relative = relative_path(root, path);

    let dependencies = match std::fs::read(path) {
        Ok(bytes) => {
            let content = String::from_utf8_lossy(&bytes);
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let deps = render_sorted(parse_manifest(ecosystem, &file_name, &content, tables, policy));
            debug!(path = %relative, ecosystem = ecosystem.tag(), count = deps.len(), "parsed manifest");
            Some(deps)
        }
        Err(err) => {
            warn!(path = %relative, error = %err, "failed to read manifest");
            None
        }
    };

    ParsedFile {
        ecosystem,
        relative,
        dependencies,
    }
}

/// Route content to its ecosystem's parser.
fn parse_manifest(
    ecosystem: Ecosystem,
    file_name: &str,
    content: &str,
    tables: &MavenTables,
    policy: ManagedVersions,
) -> Vec<Dependency> {
    match ecosystem {
        Ecosystem::Go => go::parse_go_mod(content),
        Ecosystem::Npm => npm::parse_package_json(content),
        Ecosystem::Yarn => yarn::parse_yarn_lock(content),
        Ecosystem::Python => python::parse_python_manifest(file_name, content),
        Ecosystem::Maven => maven::parse_pom(content, tables, policy),
        Ecosystem::Gradle => gradle::parse_build_gradle(content),
        Ecosystem::Composer => composer::parse_composer_json(content),
        Ecosystem::Ruby => ruby::parse_gemfile(content),
        Ecosystem::Rust => cargo::parse_cargo_toml(content),
        Ecosystem::Swift => swift::parse_package_swift(content),
    }
}
