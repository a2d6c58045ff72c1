use anyhow::{Context, Result};

use crate::manifests::Analysis;

/// Pretty JSON with exactly the `repo`, `type`, `dependencies` and `files` fields.
pub fn render(analysis: &Analysis) -> Result<String> {
    serde_json::to_string_pretty(analysis).context("Failed to serialize analysis")
}
