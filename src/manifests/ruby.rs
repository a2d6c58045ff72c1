//! Bundler manifest parsing (Gemfile).

use anyhow::Result;
use regex::Regex;

use super::Dependency;

/// Parse `gem "name", "constraint", ...` declarations from a Gemfile.
/// Keyword options (`require:`, `git:`, `group:`) end the constraint list.
pub fn parse_gemfile(content: &str) -> Vec<Dependency> {
    gems(content).unwrap_or_default()
}

fn gems(content: &str) -> Result<Vec<Dependency>> {
    let re_gem = Regex::new(
        r#"(?m)^[ \t]*gem[ \t(]+['"]([^'"]+)['"]((?:[ \t]*,[ \t]*['"][^'"]*['"])*)"#,
    )?;
    let re_constraint = Regex::new(r#"['"]([^'"]*)['"]"#)?;

    let deps = re_gem
        .captures_iter(content)
        .map(|caps| {
            let constraints: Vec<&str> = re_constraint
                .captures_iter(caps.get(2).map_or("", |m| m.as_str()))
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str().trim())
                .filter(|c| !c.is_empty())
                .collect();
            Dependency::with_optional(&caps[1], Some(constraints.join(", ").as_str()))
        })
        .collect();

    Ok(deps)
}
