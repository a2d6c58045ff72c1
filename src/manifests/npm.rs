//! npm manifest parsing (package.json).
//!
//! Reads `dependencies` and `devDependencies`. Versions are kept as declared;
//! range cleaning is a consumer's job.

use serde_json::Value;

use super::{Dependency, Version};

const SECTIONS: &[&str] = &["dependencies", "devDependencies"];

/// Parse dependencies from package.json content.
/// Invalid JSON yields no dependencies.
pub fn parse_package_json(content: &str) -> Vec<Dependency> {
    let Ok(pkg) = serde_json::from_str::<Value>(content) else {
        return vec![];
    };

    SECTIONS
        .iter()
        .filter_map(|section| pkg.get(section).and_then(Value::as_object))
        .flatten()
        .map(|(name, spec)| Dependency::new(name.clone(), version_of(spec)))
        .collect()
}

/// Map a JSON value to a version, keeping non-string values tagged.
pub(super) fn version_of(value: &Value) -> Version {
    match value {
        Value::String(s) => Version::Exact(s.clone()),
        Value::Null => Version::Absent,
        other => Version::Structured(other.to_string()),
    }
}
