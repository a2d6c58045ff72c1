//! Repository-wide Maven aggregation.
//!
//! Every POM under the root contributes its `<properties>` and its managed
//! dependency versions to two tables. When several POMs define the same key,
//! the one visited first wins; visitation order is shallowest directory
//! first, then path order, so a parent POM at the root beats its modules.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};

use super::pom::{self, PomDocument};
use crate::config::ScanConfig;
use crate::manifests::discover::walk_files;

const POM_FILE: &str = "pom.xml";

/// Property and dependency-management tables for one scan.
///
/// Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct MavenTables {
    properties: HashMap<String, String>,
    managed: HashMap<String, String>,
}

impl MavenTables {
    /// Walk `root` for every pom.xml and aggregate them.
    pub fn from_root(root: &Path, config: &ScanConfig) -> Self {
        let poms = walk_files(root, config, |name| name.eq_ignore_ascii_case(POM_FILE));
        Self::from_poms(poms)
    }

    /// Aggregate the given POM files in visitation order.
    ///
    /// Files are read and extracted in parallel; the merge is sequential.
    /// Unreadable files contribute nothing.
    pub fn from_poms(mut paths: Vec<PathBuf>) -> Self {
        paths.sort_by(|a, b| visit_order(a, b));

        let documents: Vec<PomDocument> = paths
            .par_iter()
            .map(|path| match std::fs::read_to_string(path) {
                Ok(content) => pom::extract(&content),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "failed to read pom.xml");
                    PomDocument::default()
                }
            })
            .collect();

        let tables = Self::from_documents(documents);
        debug!(
            poms = paths.len(),
            properties = tables.properties.len(),
            managed = tables.managed.len(),
            "aggregated maven tables"
        );
        tables
    }

    /// Merge extracted documents, earliest first.
    pub fn from_documents<I>(documents: I) -> Self
    where
        I: IntoIterator<Item = PomDocument>,
    {
        documents
            .into_iter()
            .fold(Self::default(), |tables, doc| Self {
                managed: first_writer_wins(tables.managed, doc.managed_versions()),
                properties: first_writer_wins(tables.properties, doc.properties),
            })
    }

    /// Managed version for `group:artifact`.
    pub fn managed_version(&self, key: &str) -> Option<&str> {
        self.managed.get(key).map(String::as_str)
    }

    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn managed_count(&self) -> usize {
        self.managed.len()
    }
}

/// Merge policy: an existing key is never overwritten.
fn first_writer_wins<I>(mut table: HashMap<String, String>, entries: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    for (key, value) in entries {
        table.entry(key).or_insert(value);
    }
    table
}

/// Shallower paths first, then lexicographic.
fn visit_order(a: &Path, b: &Path) -> Ordering {
    a.components()
        .count()
        .cmp(&b.components().count())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn property<'a>(tables: &'a MavenTables, key: &str) -> Option<&'a str> {
        tables.properties().get(key).map(String::as_str)
    }

    fn pom_with_property(key: &str, value: &str) -> String {
        format!("<project><properties><{key}>{value}</{key}></properties></project>")
    }

    #[test]
    fn test_first_writer_wins() {
        let merged = first_writer_wins(
            HashMap::from([("x".to_string(), "1".to_string())]),
            vec![
                ("x".to_string(), "2".to_string()),
                ("y".to_string(), "3".to_string()),
                ("y".to_string(), "4".to_string()),
            ],
        );
        assert_eq!(merged["x"], "1");
        assert_eq!(merged["y"], "3");
    }

    #[test]
    fn test_visit_order() {
        let mut paths = vec![
            PathBuf::from("/r/b/pom.xml"),
            PathBuf::from("/r/a/deep/pom.xml"),
            PathBuf::from("/r/pom.xml"),
            PathBuf::from("/r/a/pom.xml"),
        ];
        paths.sort_by(|a, b| visit_order(a, b));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/r/pom.xml"),
                PathBuf::from("/r/a/pom.xml"),
                PathBuf::from("/r/b/pom.xml"),
                PathBuf::from("/r/a/deep/pom.xml"),
            ]
        );
    }

    #[test]
    fn test_conflicting_property_root_wins() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        fs::create_dir_all(root.join("a-module")).unwrap();
        fs::write(root.join("a-module/pom.xml"), pom_with_property("x", "module")).unwrap();
        fs::write(root.join("pom.xml"), pom_with_property("x", "root")).unwrap();

        let tables = MavenTables::from_root(root, &ScanConfig::default());
        assert_eq!(property(&tables, "x"), Some("root"));
    }

    #[test]
    fn test_conflicting_property_same_depth_is_path_ordered() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        for (dir, value) in [("zeta", "z"), ("alpha", "a"), ("mid", "m")] {
            fs::create_dir_all(root.join(dir)).unwrap();
            fs::write(root.join(dir).join("pom.xml"), pom_with_property("x", value)).unwrap();
        }

        let tables = MavenTables::from_root(root, &ScanConfig::default());
        assert_eq!(property(&tables, "x"), Some("a"));
    }

    #[test]
    fn test_managed_versions_collected() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        fs::write(
            root.join("pom.xml"),
            r#"
<project>
    <dependencyManagement>
        <dependencies>
            <dependency>
                <groupId>org.slf4j</groupId>
                <artifactId>slf4j-api</artifactId>
                <version>2.0.9</version>
            </dependency>
            <dependency>
                <groupId>org.unversioned</groupId>
                <artifactId>thing</artifactId>
            </dependency>
            <dependency>
                <artifactId>no-group</artifactId>
                <version>1</version>
            </dependency>
        </dependencies>
    </dependencyManagement>
    <dependencies>
        <dependency>
            <groupId>junit</groupId>
            <artifactId>junit</artifactId>
            <version>4.13.2</version>
        </dependency>
    </dependencies>
</project>
"#,
        )
        .unwrap();

        let tables = MavenTables::from_root(root, &ScanConfig::default());
        assert_eq!(tables.managed_count(), 1);
        assert_eq!(tables.managed_version("org.slf4j:slf4j-api"), Some("2.0.9"));
        assert_eq!(tables.managed_version("junit:junit"), None);
    }

    #[test]
    fn test_malformed_pom_contributes_nothing() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        fs::create_dir_all(root.join("broken")).unwrap();
        fs::write(root.join("broken/pom.xml"), "<project><properties><x>1</y>").unwrap();
        fs::create_dir_all(root.join("ok")).unwrap();
        fs::write(root.join("ok/pom.xml"), pom_with_property("y", "2")).unwrap();

        let tables = MavenTables::from_root(root, &ScanConfig::default());
        assert_eq!(property(&tables, "x"), None);
        assert_eq!(property(&tables, "y"), Some("2"));
    }

    #[test]
    fn test_skips_vcs_metadata() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join(".git/pom.xml"), pom_with_property("x", "git")).unwrap();

        let tables = MavenTables::from_root(root, &ScanConfig::default());
        assert_eq!(tables.property_count(), 0);
    }
}
