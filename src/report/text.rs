//! Human-readable scan report.

use std::fmt::Write;

use crate::manifests::{Analysis, Diagnostics};

const RULE_WIDTH: usize = 60;

/// Render the report as one string, ending in a newline.
pub fn render(analysis: &Analysis, diagnostics: &Diagnostics) -> String {
    let mut out = String::new();

    let title = format!(" SCA Scan: {} ", analysis.repo);
    let border = "=".repeat(title.chars().count());
    let _ = writeln!(out, "\n{}\n{}\n{}\n", border, title, border);
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

    let types = if analysis.types.is_empty() {
        "(none)".to_string()
    } else {
        analysis.types.join(", ")
    };
    let _ = writeln!(out, "Types: {}\n", types);

    out.push_str("Dependencies:\n");
    if analysis.dependencies.is_empty() {
        out.push_str("  (none)\n");
    }
    for (ecosystem, files) in &analysis.dependencies {
        let _ = writeln!(out, "- {}:", ecosystem);
        for (file, deps) in files {
            let _ = writeln!(out, "  {}:", file);
            write_dependencies(&mut out, deps);
        }
    }

    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    out.push_str("Files:\n");
    for file in &analysis.files {
        let _ = writeln!(out, "  - {}", file);
    }

    if diagnostics.has_findings() {
        out.push('\n');
        if !diagnostics.empty_files.is_empty() {
            let _ = writeln!(out, "No dependencies found in {} file(s):", diagnostics.empty_files.len());
            for file in &diagnostics.empty_files {
                let _ = writeln!(out, "  - {}", file);
            }
        }
        if !diagnostics.unreadable_files.is_empty() {
            let _ = writeln!(out, "Could not read {} file(s):", diagnostics.unreadable_files.len());
            for file in &diagnostics.unreadable_files {
                let _ = writeln!(out, "  - {}", file);
            }
        }
    }

    let _ = writeln!(out, "\n{}", "=".repeat(RULE_WIDTH));
    out.push_str("Scan complete.\n");
    out
}

/// One line per dependency, with versions lined up in a column.
fn write_dependencies(out: &mut String, deps: &[String]) {
    if deps.is_empty() {
        out.push_str("    (none)\n");
        return;
    }

    let rows: Vec<(&str, Option<(&str, &str)>)> = deps.iter().map(|d| split_rendered(d)).collect();
    let width = rows
        .iter()
        .filter(|(_, rest)| rest.is_some())
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0);

    for (name, rest) in rows {
        match rest {
            Some((sep, version)) => {
                let _ = writeln!(out, "    - {:<width$}  {}  {}", name, sep, version, width = width);
            }
            None => {
                let _ = writeln!(out, "    - {}", name);
            }
        }
    }
}

/// Split a rendered dependency into name, separator and version.
///
/// A leading `@` belongs to the name (npm scopes), so the version separator
/// is the first `@` after position zero.
fn split_rendered(dep: &str) -> (&str, Option<(&str, &str)>) {
    if let Some((name, target)) = dep.split_once(" => ") {
        return (name, Some(("=>", target)));
    }

    match dep.char_indices().skip(1).find(|(_, c)| *c == '@') {
        Some((i, _)) => (&dep[..i], Some(("@", &dep[i + 1..]))),
        None => (dep, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn analysis() -> Analysis {
        Analysis {
            repo: "demo".to_string(),
            types: vec!["Go".to_string(), "Node".to_string()],
            dependencies: BTreeMap::from([
                (
                    "Go".to_string(),
                    BTreeMap::from([(
                        "go.mod".to_string(),
                        vec![
                            "example.com/a => ../a".to_string(),
                            "github.com/x/y@v1.2.3".to_string(),
                        ],
                    )]),
                ),
                (
                    "Node".to_string(),
                    BTreeMap::from([
                        (
                            "package.json".to_string(),
                            vec!["@babel/core@^7.0.0".to_string(), "left-pad".to_string()],
                        ),
                        ("web/package.json".to_string(), vec![]),
                    ]),
                ),
            ]),
            files: vec![
                "go.mod".to_string(),
                "package.json".to_string(),
                "web/package.json".to_string(),
            ],
        }
    }

    #[test]
    fn test_split_rendered() {
        assert_eq!(split_rendered("a@1"), ("a", Some(("@", "1"))));
        assert_eq!(split_rendered("@scope/pkg@2"), ("@scope/pkg", Some(("@", "2"))));
        assert_eq!(split_rendered("@scope/pkg"), ("@scope/pkg", None));
        assert_eq!(split_rendered("org.a:b@9.9"), ("org.a:b", Some(("@", "9.9"))));
        assert_eq!(split_rendered("m => ../m"), ("m", Some(("=>", "../m"))));
    }

    #[test]
    fn test_render_sections() {
        let diagnostics = Diagnostics {
            empty_files: vec!["web/package.json".to_string()],
            ..Default::default()
        };
        let out = render(&analysis(), &diagnostics);

        assert!(out.contains(" SCA Scan: demo "));
        assert!(out.contains("Types: Go, Node"));
        assert!(out.contains("- Go:\n  go.mod:\n"));
        assert!(out.contains("    - github.com/x/y  @  v1.2.3\n"));
        assert!(out.contains("    - example.com/a   =>  ../a\n"));
        assert!(out.contains("    - left-pad\n"));
        assert!(out.contains("  web/package.json:\n    (none)\n"));
        assert!(out.contains("No dependencies found in 1 file(s):"));
        assert!(out.ends_with("Scan complete.\n"));
    }

    #[test]
    fn test_render_empty() {
        let empty = Analysis {
            repo: "nothing".to_string(),
            types: vec![],
            dependencies: BTreeMap::new(),
            files: vec![],
        };
        let out = render(&empty, &Diagnostics::default());
        assert!(out.contains("Types: (none)"));
        assert!(out.contains("Dependencies:\n  (none)\n"));
        assert!(!out.contains("No dependencies found"));
    }
}
