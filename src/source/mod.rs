//! Where the scanned tree comes from: an existing directory or a fresh clone.

mod git;

pub use git::{clone_repository, remove_path};

use std::path::{Path, PathBuf};

use tracing::info;

use crate::types::ScanError;

/// A tree ready to be scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceTree {
    Local(PathBuf),
    Cloned { url: String, dir: PathBuf },
}

impl SourceTree {
    pub fn root(&self) -> &Path {
        match self {
            SourceTree::Local(path) => path,
            SourceTree::Cloned { dir, .. } => dir,
        }
    }

    /// The `repo` value of the analysis.
    pub fn identifier(&self) -> String {
        match self {
            SourceTree::Local(path) => repo_identifier(None, path),
            SourceTree::Cloned { url, dir } => repo_identifier(Some(url), dir),
        }
    }
}

/// The URL when one was given, otherwise the root directory's base name.
pub fn repo_identifier(url: Option<&str>, root: &Path) -> String {
    if let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) {
        return url.to_string();
    }

    // "." and ".." have no file name of their own
    let resolved = match root.file_name() {
        Some(_) => root.to_path_buf(),
        None => root.canonicalize().unwrap_or_else(|_| root.to_path_buf()),
    };

    resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}

/// Produce a scannable tree.
///
/// With a URL and `skip_clone == false`, `dir` is cleared and the repository
/// is cloned into it. Otherwise `dir` is used as it is, and the URL (if any)
/// only names the result.
pub async fn acquire(url: Option<&str>, dir: &Path, skip_clone: bool) -> Result<SourceTree, ScanError> {
    let Some(url) = url else {
        return Ok(SourceTree::Local(dir.to_path_buf()));
    };

    if !skip_clone {
        if tokio::fs::try_exists(dir).await.unwrap_or(false) {
            info!(dir = %dir.display(), "target directory exists; removing");
            remove_path(dir).await?;
        }
        clone_repository(url, dir).await?;
    }

    Ok(SourceTree::Cloned {
        url: url.to_string(),
        dir: dir.to_path_buf(),
    })
}
