//! `${name}` substitution against the aggregated property table.

use std::collections::HashMap;

const OPEN: &str = "${";

/// Replace every `${name}` found in `properties`, leaving unknown ones intact.
///
/// Single pass: text produced by a substitution is not scanned again.
pub fn resolve(value: &str, properties: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + OPEN.len()..];

        match after.find('}') {
            Some(end) if end > 0 => {
                let name = &after[..end];
                match properties.get(name) {
                    Some(resolved) => out.push_str(resolved),
                    None => out.push_str(&rest[start..start + OPEN.len() + end + 1]),
                }
                rest = &after[end + 1..];
            }
            _ => {
                out.push_str(OPEN);
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Resolve a raw version; anything still carrying a placeholder is unusable.
pub fn concrete_version(raw: &str, properties: &HashMap<String, String>) -> Option<String> {
    let resolved = resolve(raw, properties);
    let resolved = resolved.trim();
    (!resolved.is_empty() && !resolved.contains(OPEN)).then(|| resolved.to_string())
}
