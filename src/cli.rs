//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::{DetectCmd, ScanCmd};

#[derive(Parser)]
#[command(name = "sca")]
#[command(about = "Inventory declared third-party dependencies across package ecosystems")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan a directory (or a fresh clone) and report its dependencies
    Scan(ScanCmd),

    /// List detected manifest files per ecosystem
    Detect(DetectCmd),
}

impl Command {
    pub async fn execute(&self) -> anyhow::Result<()> {
        match self {
            Command::Scan(cmd) => cmd.run().await,
            Command::Detect(cmd) => cmd.run().await,
        }
    }
}
