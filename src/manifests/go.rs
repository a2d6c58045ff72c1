//! Go module parsing (go.mod).
//!
//! Line-based state machine: `require` and `replace` directives, either on a
//! single line or grouped in a parenthesised block. Inline `//` comments are
//! stripped before matching, so `// indirect` requirements are kept.

use super::{Dependency, Version};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Require,
    Replace,
}

/// Parse dependencies from go.mod content.
pub fn parse_go_mod(content: &str) -> Vec<Dependency> {
    let mut deps = Vec::new();
    let mut block = Block::None;

    for raw in content.lines() {
        let line = strip_comment(raw);
        if line.is_empty() {
            continue;
        }

        if let Some(opened) = block_start(line) {
            block = opened;
            continue;
        }

        match block {
            Block::Require | Block::Replace if line.starts_with(')') => {
                block = Block::None;
            }
            Block::Require => deps.extend(parse_require(line)),
            Block::Replace => deps.extend(parse_replace(line)),
            Block::None => {
                if let Some(rest) = line.strip_prefix("require ") {
                    deps.extend(parse_require(rest));
                } else if let Some(rest) = line.strip_prefix("replace ") {
                    deps.extend(parse_replace(rest));
                }
            }
        }
    }

    deps
}

fn strip_comment(raw: &str) -> &str {
    let line = raw.trim();
    match line.find("//") {
        Some(idx) => line[..idx].trim(),
        None => line,
    }
}

fn block_start(line: &str) -> Option<Block> {
    let (keyword, rest) = if let Some(rest) = line.strip_prefix("require") {
        (Block::Require, rest)
    } else if let Some(rest) = line.strip_prefix("replace") {
        (Block::Replace, rest)
    } else {
        return None;
    };

    (rest.trim() == "(").then_some(keyword)
}

/// Parse "github.com/gin-gonic/gin v1.9.1"
fn parse_require(line: &str) -> Option<Dependency> {
    let mut parts = line.split_whitespace();
    let module = parts.next()?;
    let version = parts.next()?;
    Some(Dependency::exact(module, version))
}

/// Parse "old [v] => new [v]" or the arrow-less "old new".
fn parse_replace(line: &str) -> Option<Dependency> {
    let (from, to) = match line.split_once("=>") {
        Some((left, right)) => (
            left.split_whitespace().next()?,
            right.split_whitespace().next()?,
        ),
        None => {
            let mut parts = line.split_whitespace();
            (parts.next()?, parts.next()?)
        }
    };

    Some(Dependency::new(from, Version::Replaced(to.to_string())))
}
