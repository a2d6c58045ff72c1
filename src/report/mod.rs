//! Rendering of an [`Analysis`](crate::manifests::Analysis) for humans or machines.

pub mod json;
pub mod text;

use clap::ValueEnum;

/// Output format of `sca scan`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human-readable report
    #[default]
    Text,
    /// The analysis as pretty-printed JSON
    Json,
}
