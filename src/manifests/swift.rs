//! Swift Package Manager manifest parsing (Package.swift).
//!
//! Finds every `.package(...)` call with balanced parentheses, then reads the
//! package identity and its version requirement from the argument list.

use anyhow::Result;
use regex::Regex;
use url::Url;

use super::Dependency;

const CALL: &str = ".package(";

/// Parse package dependencies from Package.swift content.
pub fn parse_package_swift(content: &str) -> Vec<Dependency> {
    let Ok(patterns) = Patterns::new() else {
        return vec![];
    };

    let code = strip_line_comments(content);
    package_calls(&code)
        .iter()
        .filter_map(|args| patterns.dependency(args))
        .collect()
}

fn strip_line_comments(content: &str) -> String {
    content
        .lines()
        .filter(|l| !l.trim_start().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Argument text of each `.package(...)` call.
fn package_calls(code: &str) -> Vec<&str> {
    let mut calls = Vec::new();
    let mut rest = code;

    while let Some(idx) = rest.find(CALL) {
        let tail = &rest[idx + CALL.len()..];
        let mut depth = 1usize;
        let close = tail.char_indices().find_map(|(i, c)| {
            match c {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
            (depth == 0).then_some(i)
        });

        let Some(close) = close else {
            break;
        };
        calls.push(&tail[..close]);
        rest = &tail[close + 1..];
    }

    calls
}

/// Compiled once per manifest, shared by every `.package(...)` call.
struct Patterns {
    name: Regex,
    url: Regex,
    path: Regex,
    id: Regex,
    labeled: Regex,
    member: Regex,
    range: Regex,
}

impl Patterns {
    fn new() -> Result<Self> {
        Ok(Self {
            name: string_arg("name")?,
            url: string_arg("url")?,
            path: string_arg("path")?,
            id: string_arg("id")?,
            labeled: Regex::new(r#"\b(?:from|exact|branch|revision):\s*"([^"]+)""#)?,
            member: Regex::new(r#"\.(?:exact|branch|revision)\(\s*"([^"]+)""#)?,
            range: Regex::new(r#""([^"]+)"\s*(\.\.[<.])\s*"([^"]+)""#)?,
        })
    }

    fn dependency(&self, args: &str) -> Option<Dependency> {
        let capture = |re: &Regex| re.captures(args).map(|c| c[1].to_string());

        let name = match capture(&self.name) {
            Some(name) => name,
            None => match (capture(&self.url), capture(&self.path), capture(&self.id)) {
                (Some(url), _, _) => last_segment(&url)?,
                (None, Some(path), _) => last_segment(&path)?,
                (None, None, Some(id)) => id,
                _ => return None,
            },
        };

        Some(Dependency::with_optional(name, self.requirement(args).as_deref()))
    }

    /// `from:`/`exact:`/`branch:`/`revision:` labels (also inside
    /// `.upToNextMajor(from:)`), the `.exact("…")` family, or a literal range.
    fn requirement(&self, args: &str) -> Option<String> {
        if let Some(caps) = self.labeled.captures(args).or_else(|| self.member.captures(args)) {
            return Some(caps[1].to_string());
        }

        self.range
            .captures(args)
            .map(|c| format!("{}{}{}", &c[1], &c[2], &c[3]))
    }
}

/// `key: "value"` inside a call's argument list.
fn string_arg(key: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(r#"\b{}:\s*"([^"]+)""#, key))?)
}

/// "https://github.com/apple/swift-nio.git" -> "swift-nio"
fn last_segment(location: &str) -> Option<String> {
    let segment = match Url::parse(location) {
        Ok(url) => url
            .path_segments()
            .and_then(|mut s| s.rfind(|seg| !seg.is_empty()))
            .map(str::to_string),
        Err(_) => location
            .trim_end_matches('/')
            .rsplit(['/', ':'])
            .next()
            .map(str::to_string),
    }?;

    let name = segment.trim_end_matches(".git");
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifests::render_sorted;

    #[test]
    fn test_package_requirements() {
        let content = r#"
// swift-tools-version:5.9
import PackageDescription

let package = Package(
    name: "Demo",
    dependencies: [
        .package(url: "https://github.com/apple/swift-nio.git", from: "2.62.0"),
        .package(url: "https://github.com/vapor/vapor", .upToNextMajor(from: "4.89.0")),
        .package(url: "https://github.com/pointfreeco/swift-case-paths.git", exact: "1.2.2"),
        .package(url: "https://github.com/apple/swift-log.git", "1.0.0"..<"2.0.0"),
        .package(url: "git@github.com:org/internal-kit.git", branch: "main"),
        .package(name: "Legacy", url: "https://example.com/legacy.git", .exact("0.9.1")),
        .package(path: "../LocalKit"),
        // .package(url: "https://github.com/commented/out.git", from: "1.0.0"),
    ],
    targets: [
        .target(name: "Demo", dependencies: [.product(name: "NIO", package: "swift-nio")]),
    ]
)
"#;
        assert_eq!(
            render_sorted(parse_package_swift(content)),
            vec![
                "Legacy@0.9.1",
                "LocalKit",
                "internal-kit@main",
                "swift-case-paths@1.2.2",
                "swift-log@1.0.0..<2.0.0",
                "swift-nio@2.62.0",
                "vapor@4.89.0",
            ]
        );
    }

    #[test]
    fn test_registry_identity() {
        let content = r#".package(id: "mona.LinkedList", from: "1.1.0")"#;
        assert_eq!(render_sorted(parse_package_swift(content)), vec!["mona.LinkedList@1.1.0"]);
    }

    #[test]
    fn test_unbalanced_call_is_ignored() {
        let content = r#".package(url: "https://github.com/a/b.git", from: "1.0.0""#;
        assert!(parse_package_swift(content).is_empty());
    }

    #[test]
    fn test_one_pattern_set_serves_every_call() {
        let patterns = Patterns::new().unwrap();
        let code = r#"
.package(url: "https://github.com/a/one.git", from: "1.0.0"),
.package(path: "../Two"),
.package(id: "scope.Three", exact: "3.0.0"),
"#;
        let deps: Vec<String> = package_calls(code)
            .iter()
            .filter_map(|args| patterns.dependency(args))
            .map(|d| d.to_string())
            .collect();
        assert_eq!(deps, vec!["one@1.0.0", "Two", "scope.Three@3.0.0"]);
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("https://github.com/a/b.git/"), Some("b".to_string()));
        assert_eq!(last_segment("git@github.com:org/kit.git"), Some("kit".to_string()));
        assert_eq!(last_segment("../Local"), Some("Local".to_string()));
    }
}
