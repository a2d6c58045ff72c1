//! Shallow clones and the guarded cleanup that precedes them.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};
use url::Url;

use crate::types::ScanError;

/// Check that `raw` looks like something `git clone` accepts as a remote.
///
/// Accepts absolute URLs (`https://`, `ssh://`, `file://`, `git://`),
/// scp-style `user@host:path` remotes and existing local paths. Anything
/// starting with `-` is rejected so it cannot be read as a git option.
pub fn validate_repo_url(raw: &str) -> Result<(), ScanError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('-') {
        return Err(ScanError::InvalidRepoUrl(raw.to_string()));
    }

    if Url::parse(trimmed).is_ok() || is_scp_like(trimmed) || Path::new(trimmed).exists() {
        Ok(())
    } else {
        Err(ScanError::InvalidRepoUrl(raw.to_string()))
    }
}

/// `git@github.com:org/repo.git`
fn is_scp_like(raw: &str) -> bool {
    let Some((host, path)) = raw.split_once(':') else {
        return false;
    };
    !host.is_empty() && !path.is_empty() && !host.contains('/') && !path.starts_with("//")
}

/// `git clone --depth 1 <url> <dir>`.
pub async fn clone_repository(url: &str, dir: &Path) -> Result<(), ScanError> {
    validate_repo_url(url)?;

    info!(url, dir = %dir.display(), "cloning repository");
    let output = Command::new("git")
        .args(["clone", "--depth", "1", "--"])
        .arg(url)
        .arg(dir)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| ScanError::CloneFailed {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ScanError::CloneFailed {
            url: url.to_string(),
            message: match stderr.trim() {
                "" => output.status.to_string(),
                msg => msg.to_string(),
            },
        });
    }

    debug!(dir = %dir.display(), "clone finished");
    Ok(())
}

/// Recursively delete `path`, refusing anything that looks like a mistake.
///
/// Rejected: the empty path, `/`, `.`, `..`, and the current working
/// directory (or any of its ancestors). A missing path is not an error.
pub async fn remove_path(path: &Path) -> Result<(), ScanError> {
    check_removable(path)?;

    let metadata = match tokio::fs::symlink_metadata(path).await {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(ScanError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let result = if metadata.is_dir() {
        tokio::fs::remove_dir_all(path).await
    } else {
        tokio::fs::remove_file(path).await
    };

    result.map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), "removed");
    Ok(())
}

fn check_removable(path: &Path) -> Result<(), ScanError> {
    let unsafe_path = || ScanError::UnsafeRemoval(path.to_path_buf());

    let raw = path.to_string_lossy();
    if matches!(raw.trim(), "" | "/" | "." | "..") {
        return Err(unsafe_path());
    }

    let (Ok(target), Ok(cwd)) = (absolute(path), std::env::current_dir()) else {
        return Ok(());
    };
    if target.parent().is_none() || cwd.starts_with(&target) {
        return Err(unsafe_path());
    }

    Ok(())
}

/// Canonical form when the path exists, else the lexical absolute path.
fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    path.canonicalize().or_else(|_| std::path::absolute(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_repo_url() {
        assert!(validate_repo_url("https://github.com/org/repo.git").is_ok());
        assert!(validate_repo_url("ssh://git@github.com/org/repo.git").is_ok());
        assert!(validate_repo_url("git@github.com:org/repo.git").is_ok());

        assert!(validate_repo_url("").is_err());
        assert!(validate_repo_url("--upload-pack=evil").is_err());
        assert!(validate_repo_url("not a url/at all").is_err());
    }

    #[test]
    fn test_check_removable_rejects_dangerous_paths() {
        for p in ["", "/", ".", ".."] {
            assert!(
                matches!(check_removable(Path::new(p)), Err(ScanError::UnsafeRemoval(_))),
                "{p:?} should be refused"
            );
        }

        let cwd = std::env::current_dir().unwrap();
        assert!(check_removable(&cwd).is_err());
        if let Some(parent) = cwd.parent() {
            assert!(check_removable(parent).is_err());
        }
    }

    #[tokio::test]
    async fn test_remove_path_deletes_tree() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("checkout");
        std::fs::create_dir_all(target.join("nested/deeper")).unwrap();
        std::fs::write(target.join("nested/deeper/file.txt"), "x").unwrap();

        remove_path(&target).await.unwrap();
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_remove_missing_path_is_ok() {
        let tmp = TempDir::new().unwrap();
        remove_path(&tmp.path().join("never-created")).await.unwrap();
    }

    #[tokio::test]
    async fn test_clone_rejects_invalid_url() {
        let tmp = TempDir::new().unwrap();
        let err = clone_repository("-oops", &tmp.path().join("dst")).await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidRepoUrl(_)));
    }
}
