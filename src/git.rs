//! Obtains a local checkout with the `git` CLI before analysis.

use crate::error::AnalyzerError;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

/// Directory a URL clones into by default: its last segment without `.git`.
pub fn default_clone_target(url: &str) -> PathBuf {
    let name = url
        .trim_end_matches('/')
        .rsplit(|c: char| c == '/' || c == ':')
        .next()
        .unwrap_or(url);
    PathBuf::from(name.strip_suffix(".git").unwrap_or(name))
}

/// Clone `url` into `target` (or the default target). With `force`, an
/// existing target is removed first.
pub fn clone_repository(url: &str, target: Option<&Path>, force: bool) -> Result<PathBuf, AnalyzerError> {
    let target = target
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_clone_target(url));

    if target.exists() {
        if !force {
            return Err(AnalyzerError::TargetExists(target));
        }

        let removed = if target.is_dir() {
            fs::remove_dir_all(&target)
        } else {
            fs::remove_file(&target)
        };
        removed.map_err(|e| AnalyzerError::CloneFailed {
            url: url.to_string(),
            reason: format!("could not remove {}: {}", target.display(), e),
        })?;
    }

    info!("Cloning {} into {}", url, target.display());
    let output = Command::new("git")
        .arg("clone")
        .arg(url)
        .arg(&target)
        .output()
        .map_err(|e| AnalyzerError::CloneFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AnalyzerError::CloneFailed {
            url: url.to_string(),
            reason: stderr.trim().to_string(),
        });
    }

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_clone_target() {
        assert_eq!(
            default_clone_target("https://github.com/terraform-aws-modules/terraform-aws-vpc.git"),
            PathBuf::from("terraform-aws-vpc")
        );
        assert_eq!(
            default_clone_target("https://example.com/org/project/"),
            PathBuf::from("project")
        );
        assert_eq!(default_clone_target("git@github.com:org.git"), PathBuf::from("org"));
    }

    #[test]
    fn test_existing_target_without_force() {
        let dir = tempfile::tempdir().unwrap();

        let err = clone_repository("https://example.invalid/repo.git", Some(dir.path()), false).unwrap_err();
        assert!(matches!(err, AnalyzerError::TargetExists(_)));
        assert!(dir.path().exists());
    }
}
