//! Python manifest parsing (requirements.txt, setup.py, Pipfile, pyproject.toml).
//!
//! Each file name has its own extraction path; all of them funnel requirement
//! strings through [`parse_pep508`].

use anyhow::Result;
use regex::Regex;

use super::Dependency;

/// Parse dependencies from a Python manifest, dispatching on its file name.
pub fn parse_python_manifest(file_name: &str, content: &str) -> Vec<Dependency> {
    match file_name.to_lowercase().as_str() {
        "requirements.txt" => parse_requirements(content),
        "setup.py" => parse_setup_py(content).unwrap_or_default(),
        "pipfile" => parse_pipfile(content),
        "pyproject.toml" => parse_pyproject(content),
        _ => vec![],
    }
}

fn parse_requirements(content: &str) -> Vec<Dependency> {
    logical_lines(content)
        .iter()
        .map(|l| requirement_part(l))
        .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with('-'))
        .filter_map(parse_pep508)
        .collect()
}

/// Join `\`-continued lines, as pip-compile writes them for `--hash` options.
fn logical_lines(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending = String::new();

    for line in content.lines() {
        match line.trim_end().strip_suffix('\\') {
            Some(head) => {
                pending.push_str(head);
                pending.push(' ');
            }
            None => {
                pending.push_str(line);
                lines.push(std::mem::take(&mut pending));
            }
        }
    }
    if !pending.trim().is_empty() {
        lines.push(pending);
    }

    lines
}

/// The requirement itself, without a trailing comment or per-line options.
fn requirement_part(line: &str) -> &str {
    let line = line.split(" #").next().unwrap_or_default();
    let line = line.split(" --").next().unwrap_or_default();
    line.trim()
}

/// Requirement strings inside the list-valued `setup()` keywords.
fn parse_setup_py(content: &str) -> Result<Vec<Dependency>> {
    let re_list = Regex::new(r"\b(?:install_requires|tests_require|setup_requires)\s*=\s*\[")?;
    let re_extras = Regex::new(r"\bextras_require\s*=\s*\{")?;

    let mut deps = Vec::new();
    for m in re_list.find_iter(content).chain(re_extras.find_iter(content)) {
        // The match ends just past the opening bracket
        let opener = content[..m.end()].chars().last().unwrap_or('[');
        deps.extend(
            list_literals(&content[m.end()..], opener)
                .iter()
                .filter_map(|item| parse_pep508(item)),
        );
    }

    Ok(deps)
}

/// String literals that sit directly inside a `[...]` list, scanning from just
/// after `opener` until it is closed. Brackets inside quotes do not count, so
/// `"requests[security]>=2"` stays one item.
fn list_literals(text: &str, opener: char) -> Vec<String> {
    let mut items = Vec::new();
    let mut stack = vec![opener];
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '[' | '{' | '(' => stack.push(c),
            ']' | '}' | ')' => {
                stack.pop();
                if stack.is_empty() {
                    break;
                }
            }
            '\'' | '"' => {
                let literal: String = chars.by_ref().take_while(|&q| q != c).collect();
                if stack.last() == Some(&'[') {
                    items.push(literal);
                }
            }
            '#' => {
                // comment until end of line
                chars.by_ref().take_while(|&n| n != '\n').for_each(drop);
            }
            _ => {}
        }
    }

    items
}

fn parse_pipfile(content: &str) -> Vec<Dependency> {
    let Ok(toml) = content.parse::<toml::Value>() else {
        return vec![];
    };

    ["packages", "dev-packages"]
        .iter()
        .filter_map(|section| toml.get(section).and_then(|v| v.as_table()))
        .flatten()
        .map(|(name, value)| table_dependency(name, value))
        .collect()
}

fn parse_pyproject(content: &str) -> Vec<Dependency> {
    let Ok(toml) = content.parse::<toml::Value>() else {
        return vec![];
    };

    let mut deps = Vec::new();
    let project = toml.get("project");

    // PEP 621: [project] dependencies and optional-dependencies
    if let Some(list) = project
        .and_then(|p| p.get("dependencies"))
        .and_then(|d| d.as_array())
    {
        deps.extend(requirement_array(list));
    }

    if let Some(groups) = project
        .and_then(|p| p.get("optional-dependencies"))
        .and_then(|d| d.as_table())
    {
        for list in groups.values().filter_map(|v| v.as_array()) {
            deps.extend(requirement_array(list));
        }
    }

    // Poetry: [tool.poetry.dependencies] and [tool.poetry.group.<name>.dependencies]
    let poetry = toml.get("tool").and_then(|t| t.get("poetry"));
    let mut tables: Vec<&toml::value::Table> = poetry
        .and_then(|p| p.get("dependencies"))
        .and_then(|d| d.as_table())
        .into_iter()
        .collect();

    if let Some(groups) = poetry.and_then(|p| p.get("group")).and_then(|g| g.as_table()) {
        tables.extend(
            groups
                .values()
                .filter_map(|g| g.get("dependencies"))
                .filter_map(|d| d.as_table()),
        );
    }

    for table in tables {
        deps.extend(
            table
                .iter()
                .filter(|(name, _)| name.as_str() != "python")
                .map(|(name, value)| table_dependency(name, value)),
        );
    }

    deps
}

fn requirement_array(list: &[toml::Value]) -> impl Iterator<Item = Dependency> + '_ {
    list.iter()
        .filter_map(|v| v.as_str())
        .filter_map(parse_pep508)
}

/// Pipfile / Poetry entry: `name = "spec"` or `name = { version = "spec", ... }`.
/// `"*"` means any version.
fn table_dependency(name: &str, value: &toml::Value) -> Dependency {
    let version = match value {
        toml::Value::String(v) => Some(v.as_str()),
        toml::Value::Table(t) => t.get("version").and_then(|v| v.as_str()),
        _ => None,
    };

    Dependency::with_optional(name, version.map(unpin).filter(|v| v.trim() != "*"))
}

/// `==1.2.3` -> `1.2.3`; ranges and other operators are kept.
fn unpin(specifier: &str) -> &str {
    match specifier.trim().strip_prefix("==") {
        Some(pinned) if !pinned.contains(',') => pinned.trim(),
        _ => specifier,
    }
}

/// Parse a PEP 508 requirement: "package==1.2.3", "package[extra]>=1.0,<2 ; marker".
///
/// An `==` pin renders as the bare version, any other specifier keeps its
/// operator, no specifier means no version.
fn parse_pep508(spec: &str) -> Option<Dependency> {
    let spec = spec.split(';').next()?.trim(); // Remove env markers
    if spec.is_empty() {
        return None;
    }

    // URL requirements: "name @ https://..."
    if let Some((name, _)) = spec.split_once(" @ ") {
        return Some(Dependency::unversioned(clean_name(name)?));
    }

    let split = spec
        .find(['=', '<', '>', '~', '!', ' ', '('])
        .unwrap_or(spec.len());
    let name = clean_name(&spec[..split])?;

    let specifier: String = spec[split..]
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '(' && *c != ')')
        .collect();

    Some(Dependency::with_optional(name, Some(unpin(&specifier))))
}

/// Strip extras: "package[extra]" -> "package"
fn clean_name(raw: &str) -> Option<String> {
    let name = raw.split('[').next()?.trim();
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    valid.then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifests::render_sorted;

    #[test]
    fn test_parse_pep508() {
        let dep = parse_pep508("requests==2.28.0").unwrap();
        assert_eq!(dep.to_string(), "requests@2.28.0");

        let dep = parse_pep508("numpy>=1.20.0").unwrap();
        assert_eq!(dep.to_string(), "numpy@>=1.20.0");

        let dep = parse_pep508("torch[cuda]>=2.0.0 ; sys_platform == 'linux'").unwrap();
        assert_eq!(dep.to_string(), "torch@>=2.0.0");

        let dep = parse_pep508("Django >= 4.2, < 5").unwrap();
        assert_eq!(dep.to_string(), "Django@>=4.2,<5");

        let dep = parse_pep508("flask").unwrap();
        assert_eq!(dep.to_string(), "flask");

        let dep = parse_pep508("pkg @ https://example.com/pkg.whl").unwrap();
        assert_eq!(dep.to_string(), "pkg");
    }

    #[test]
    fn test_requirements_txt() {
        let content = r#"
# pinned
requests==2.31.0
-r base.txt
--index-url https://pypi.example.com/simple
-e git+https://github.com/a/b.git#egg=b
urllib3>=1.26 # inline comment
black
"#;
        assert_eq!(
            render_sorted(parse_python_manifest("requirements.txt", content)),
            vec!["black", "requests@2.31.0", "urllib3@>=1.26"]
        );
    }

    #[test]
    fn test_requirements_with_hash_continuations() {
        let content = r#"
# pip-compile --generate-hashes
requests==2.31.0 \
    --hash=sha256:58cd2187c01e70e6e26505bca751777aa9f2ee0b7f4300988b709f44e013003f \
    --hash=sha256:942c5a758f98d790eaed1a29cb6eefc7ffb0d1cf7af05c3d2791656dbd6ad1e1
    # via -r requirements.in
flask==3.0.0 \
    --hash=sha256:abc
idna>=3.4 --hash=sha256:def
"#;
        assert_eq!(
            render_sorted(parse_python_manifest("requirements.txt", content)),
            vec!["flask@3.0.0", "idna@>=3.4", "requests@2.31.0"]
        );
    }

    #[test]
    fn test_setup_py_extras_in_requirements() {
        let content = r#"
setup(
    install_requires=["requests[security]>=2.0", "click>=8.0", "rich"],
    extras_require={
        "docs": ["sphinx[rtd]>=7", 'furo'],  # theme
        "test": ["pytest"],
    },
    tests_require=[
        # pinned for CI
        "coverage[toml]==7.4.0",
    ],
)
"#;
        assert_eq!(
            render_sorted(parse_python_manifest("setup.py", content)),
            vec![
                "click@>=8.0",
                "coverage@7.4.0",
                "furo",
                "pytest",
                "requests@>=2.0",
                "rich",
                "sphinx@>=7",
            ]
        );
    }

    #[test]
    fn test_pins_render_alike_across_formats() {
        let requirements = parse_python_manifest("requirements.txt", "django==4.2.7\n");
        let pipfile = parse_python_manifest("Pipfile", "[packages]\ndjango = \"==4.2.7\"\n");
        let poetry = parse_python_manifest(
            "pyproject.toml",
            "[tool.poetry.dependencies]\ndjango = { version = \"==4.2.7\" }\n",
        );

        assert_eq!(render_sorted(requirements), vec!["django@4.2.7"]);
        assert_eq!(render_sorted(pipfile), vec!["django@4.2.7"]);
        assert_eq!(render_sorted(poetry), vec!["django@4.2.7"]);
    }

    #[test]
    fn test_setup_py() {
        let content = r#"
from setuptools import setup

setup(
    name="demo",
    install_requires=[
        "click>=8.0",
        'rich==13.7.0',
    ],
    extras_require={
        "dev": ["pytest>=7", "mypy"],
    },
)
"#;
        assert_eq!(
            render_sorted(parse_python_manifest("setup.py", content)),
            vec!["click@>=8.0", "mypy", "pytest@>=7", "rich@13.7.0"]
        );
    }

    #[test]
    fn test_pipfile() {
        let content = r#"
[[source]]
url = "https://pypi.org/simple"

[packages]
requests = "*"
django = "==4.2.7"
celery = { version = ">=5.3", extras = ["redis"] }

[dev-packages]
pytest = "*"
"#;
        assert_eq!(
            render_sorted(parse_python_manifest("Pipfile", content)),
            vec!["celery@>=5.3", "django@4.2.7", "pytest", "requests"]
        );
    }

    #[test]
    fn test_pyproject_pep621_and_poetry() {
        let content = r#"
[project]
name = "demo"
dependencies = ["httpx>=0.27", "pydantic==2.6.0"]

[project.optional-dependencies]
test = ["pytest"]

[tool.poetry.dependencies]
python = "^3.11"
fastapi = "^0.110"

[tool.poetry.group.dev.dependencies]
ruff = { version = "^0.3" }
"#;
        assert_eq!(
            render_sorted(parse_python_manifest("pyproject.toml", content)),
            vec![
                "fastapi@^0.110",
                "httpx@>=0.27",
                "pydantic@2.6.0",
                "pytest",
                "ruff@^0.3"
            ]
        );
    }

    #[test]
    fn test_malformed_toml_is_empty() {
        assert!(parse_python_manifest("pyproject.toml", "[project\nname=").is_empty());
        assert!(parse_python_manifest("Pipfile", "[packages").is_empty());
    }
}
