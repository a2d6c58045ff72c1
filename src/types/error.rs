use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced to the caller of a scan.
///
/// Per-manifest problems (unreadable file, malformed content) never show up
/// here; they shrink that file's dependency list and land in the scan
/// diagnostics instead.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("repository root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("repository root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("invalid repository URL: {0}")]
    InvalidRepoUrl(String),

    #[error("git clone of {url} failed: {message}")]
    CloneFailed { url: String, message: String },

    #[error("refusing to remove unsafe path: {}", .0.display())]
    UnsafeRemoval(PathBuf),
}
