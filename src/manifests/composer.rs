//! Composer manifest parsing (composer.json).

use serde_json::Value;

use super::Dependency;
use super::npm::version_of;

const SECTIONS: &[&str] = &["require", "require-dev"];

/// Parse dependencies from composer.json content.
/// Platform requirements (php, extensions, libraries) are not packages.
pub fn parse_composer_json(content: &str) -> Vec<Dependency> {
    let Ok(manifest) = serde_json::from_str::<Value>(content) else {
        return vec![];
    };

    SECTIONS
        .iter()
        .filter_map(|section| manifest.get(section).and_then(Value::as_object))
        .flatten()
        .filter(|(name, _)| !is_platform(name))
        .map(|(name, spec)| Dependency::new(name.clone(), version_of(spec)))
        .collect()
}

fn is_platform(name: &str) -> bool {
    let name = name.to_lowercase();
    name == "php"
        || name.starts_with("php-")
        || name.starts_with("ext-")
        || name.starts_with("lib-")
        || name.starts_with("composer-")
}
