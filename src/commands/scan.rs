//! Scan command - inventory every declared dependency in a tree.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::config::ScanConfig;
use crate::manifests::{AnalysisRequest, analyze_repository};
use crate::report::{self, Format};
use crate::source;

/// Clone target (and rescan target with --skip-clone) when `--repo` is given without a path.
const DEFAULT_CLONE_DIR: &str = "repo";

#[derive(Args)]
pub struct ScanCmd {
    /// Directory to scan, or clone target with --repo (default: current directory, or ./repo with --repo)
    pub path: Option<PathBuf>,

    /// Git repository URL to clone (shallow) before scanning
    #[arg(long, env = "SCA_REPO")]
    pub repo: Option<String>,

    /// Scan the existing directory even when --repo is given
    #[arg(long)]
    pub skip_clone: bool,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Do not fill missing Maven versions from dependencyManagement
    #[arg(long)]
    pub no_managed_versions: bool,

    /// Directory name or glob to skip (repeatable)
    #[arg(long, short = 'e')]
    pub exclude: Vec<String>,
}

impl ScanCmd {
    pub async fn run(&self) -> Result<()> {
        let dir = self.target_dir();

        let tree = source::acquire(self.repo.as_deref(), &dir, self.skip_clone)
            .await
            .with_context(|| format!("Failed to prepare {}", dir.display()))?;
        let root = tree.root().to_path_buf();

        let config = self.config(&root)?;
        let request = AnalysisRequest {
            repo: tree.identifier(),
            root,
            config,
        };

        // The engine is synchronous and fans out on rayon
        let outcome = tokio::task::spawn_blocking(move || analyze_repository(&request))
            .await
            .context("Scan task panicked")?
            .context("Scan failed")?;

        info!(
            ecosystems = outcome.analysis.types.len(),
            files = outcome.analysis.files.len(),
            "rendering report"
        );

        let rendered = match self.format {
            Format::Json => report::json::render(&outcome.analysis)?,
            Format::Text => report::text::render(&outcome.analysis, &outcome.diagnostics),
        };
        println!("{}", rendered.trim_end());

        Ok(())
    }

    fn target_dir(&self) -> PathBuf {
        match (&self.path, &self.repo) {
            (Some(path), _) => path.clone(),
            (None, Some(_)) => PathBuf::from(DEFAULT_CLONE_DIR),
            (None, None) => PathBuf::from("."),
        }
    }

    /// `.sca.toml` from the scanned root, with flags layered on top.
    fn config(&self, root: &std::path::Path) -> Result<ScanConfig> {
        let mut config = if root.is_dir() {
            ScanConfig::load(root).context("Failed to load scan config")?
        } else {
            ScanConfig::default()
        };

        config = config.with_excludes(self.exclude.iter().cloned());
        if self.no_managed_versions {
            config = config.with_managed_versions(false);
        }
        Ok(config)
    }
}
