//! Gradle build script parsing (build.gradle, build.gradle.kts).
//!
//! Two notations are scanned independently over the same text:
//! - string: `implementation 'group:artifact:version'` / `implementation("g:a:v")`
//! - map: `implementation group: 'g', name: 'a', version: 'v'`
//!
//! Duplicates across notations collapse once rendered.

use anyhow::Result;
use regex::Regex;

use super::Dependency;

const STRING_CONFIGURATIONS: &str = "implementation|api|compile|compileOnly|runtimeOnly|runtime|\
testImplementation|testCompile|testRuntimeOnly|testRuntime";

const MAP_CONFIGURATIONS: &str =
    "implementation|api|compile|testImplementation|testCompile|runtimeOnly|testRuntimeOnly";

/// Parse dependencies from a Gradle build script.
pub fn parse_build_gradle(content: &str) -> Vec<Dependency> {
    let mut deps = parse_string_notation(content).unwrap_or_default();
    deps.extend(parse_map_notation(content).unwrap_or_default());
    deps
}

fn parse_string_notation(content: &str) -> Result<Vec<Dependency>> {
    let re = Regex::new(&format!(
        r#"(?m)^\s*(?:{})\s*\(?['"]([^'")]+)['"]\)?"#,
        STRING_CONFIGURATIONS
    ))?;

    let deps = re
        .captures_iter(content)
        .filter_map(|caps| coordinate(&caps[1]))
        .collect();

    Ok(deps)
}

/// "group:artifact[:version[:classifier]]"
fn coordinate(notation: &str) -> Option<Dependency> {
    let mut parts = notation.splitn(3, ':');
    let group = parts.next()?;
    let artifact = parts.next()?;
    Some(Dependency::with_optional(
        format!("{}:{}", group, artifact),
        parts.next(),
    ))
}

fn parse_map_notation(content: &str) -> Result<Vec<Dependency>> {
    let re_line = Regex::new(&format!(
        r"(?m)^[ \t]*(?:{})[ \t(]+([^\n]+)",
        MAP_CONFIGURATIONS
    ))?;
    let re_group = map_key("group")?;
    let re_name = map_key("name")?;
    let re_version = map_key("version")?;

    let mut deps = Vec::new();
    for caps in re_line.captures_iter(content) {
        let line = &caps[1];
        let value = |re: &Regex| re.captures(line).map(|c| c[1].to_string());

        if let (Some(group), Some(name)) = (value(&re_group), value(&re_name)) {
            let version = value(&re_version);
            deps.push(Dependency::with_optional(
                format!("{}:{}", group, name),
                version.as_deref(),
            ));
        }
    }

    Ok(deps)
}

/// Matches `key: 'v'` (Groovy) or `key = "v"` (Kotlin DSL).
fn map_key(key: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(r#"\b{}\s*[:=]\s*['"]([^'"]+)['"]"#, key))?)
}
