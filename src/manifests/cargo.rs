//! Cargo manifest parsing (Cargo.toml).
//!
//! Reads the dependency tables of a single manifest. Workspace inheritance is
//! not followed: `foo = { workspace = true }` renders as a bare name.

use super::Dependency;

const SECTIONS: &[&str] = &["dependencies", "dev-dependencies", "build-dependencies"];

/// Parse dependencies from Cargo.toml content.
pub fn parse_cargo_toml(content: &str) -> Vec<Dependency> {
    let Ok(toml) = content.parse::<toml::Value>() else {
        return vec![];
    };

    let mut deps = extract_deps(&toml);

    // [workspace.dependencies]
    if let Some(workspace) = toml.get("workspace") {
        deps.extend(extract_deps(workspace));
    }

    // [target.'cfg(...)'.dependencies]
    if let Some(targets) = toml.get("target").and_then(|t| t.as_table()) {
        for target in targets.values() {
            deps.extend(extract_deps(target));
        }
    }

    deps
}

/// Extract dependencies from every dependency section of a table.
fn extract_deps(table: &toml::Value) -> Vec<Dependency> {
    SECTIONS
        .iter()
        .filter_map(|section| table.get(section).and_then(|v| v.as_table()))
        .flatten()
        .map(|(name, value)| Dependency::with_optional(name, extract_version(value)))
        .collect()
}

/// Extract version string from a dependency value.
fn extract_version(value: &toml::Value) -> Option<&str> {
    match value {
        toml::Value::String(v) => Some(v.as_str()),
        toml::Value::Table(t) => t.get("version").and_then(|v| v.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifests::render_sorted;

    #[test]
    fn test_dependency_sections() {
        let content = r#"
[package]
name = "demo"
version = "0.1.0"

[dependencies]
serde = { version = "1.0", features = ["derive"] }
anyhow = "1"
local-crate = { path = "../local" }
forked = { git = "https://github.com/a/forked" }

[dev-dependencies]
tempfile = "3.15"

[build-dependencies]
cc = "1.0"
"#;
        assert_eq!(
            render_sorted(parse_cargo_toml(content)),
            vec![
                "anyhow@1",
                "cc@1.0",
                "forked",
                "local-crate",
                "serde@1.0",
                "tempfile@3.15"
            ]
        );
    }

    #[test]
    fn test_workspace_and_target_tables() {
        let content = r#"
[workspace]
members = ["crates/*"]

[workspace.dependencies]
tokio = { version = "1.43", features = ["full"] }

[dependencies]
tokio = { workspace = true }

[target.'cfg(windows)'.dependencies]
winapi = "0.3"
"#;
        assert_eq!(
            render_sorted(parse_cargo_toml(content)),
            vec!["tokio", "tokio@1.43", "winapi@0.3"]
        );
    }

    #[test]
    fn test_invalid_toml_is_empty() {
        assert!(parse_cargo_toml("[dependencies\nserde = ").is_empty());
    }
}
