//! Detect command - list manifests per ecosystem without parsing them.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::config::ScanConfig;
use crate::manifests::{discover_manifests, relative_path};

#[derive(Args)]
pub struct DetectCmd {
    /// Directory to scan (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

impl DetectCmd {
    pub async fn run(&self) -> Result<()> {
        if !self.path.is_dir() {
            anyhow::bail!("Not a directory: {}", self.path.display());
        }

        let config = ScanConfig::load(&self.path).context("Failed to load scan config")?;
        let found = discover_manifests(&self.path, &config);

        if found.is_empty() {
            println!("No manifests found in {}", self.path.display());
            return Ok(());
        }

        for (ecosystem, paths) in &found {
            println!("{} ({}):", ecosystem.display_name(), ecosystem.tag());
            for path in paths {
                println!("  {}", relative_path(&self.path, path));
            }
        }

        let total: usize = found.values().map(Vec::len).sum();
        println!("\n{} manifests", total);

        Ok(())
    }
}
