//! Yarn lockfile parsing (yarn.lock, classic v1 and Berry).
//!
//! Each unindented `spec[, spec]:` header opens an entry; the indented
//! `version` line inside it is the resolved version.

use super::Dependency;

/// Parse resolved packages from yarn.lock content.
pub fn parse_yarn_lock(content: &str) -> Vec<Dependency> {
    let mut deps = Vec::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        if !line.starts_with(char::is_whitespace) {
            current = line
                .trim_end()
                .strip_suffix(':')
                .and_then(package_name);
            continue;
        }

        let Some(name) = current.as_ref() else {
            continue;
        };

        if let Some(version) = version_line(line) {
            deps.push(Dependency::exact(name.clone(), version));
            current = None;
        }
    }

    deps
}

/// Extract the package name from an entry header.
fn package_name(header: &str) -> Option<String> {
    let spec = header.split(',').next()?.trim().trim_matches('"');

    if spec == "__metadata" || spec.contains("@workspace:") {
        return None;
    }

    // Skip the leading '@' of scoped packages when looking for the separator.
    let idx = spec
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '@')
        .map(|(i, _)| i)?;

    Some(spec[..idx].to_string())
}

/// `  version "1.2.3"` (v1) or `  version: 1.2.3` (Berry).
fn version_line(line: &str) -> Option<String> {
    let rest = line.trim().strip_prefix("version")?;
    if !rest.starts_with([' ', ':']) {
        return None;
    }

    let version = rest.trim_start_matches(':').trim().trim_matches('"');
    (!version.is_empty()).then(|| version.to_string())
}
