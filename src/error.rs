use std::path::PathBuf;
use thiserror::Error;

/// Repository-level failures. Anything that goes wrong for a single file is
/// logged and skipped instead.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Repository path does not exist: {}", .0.display())]
    RepositoryNotFound(PathBuf),

    #[error("Failed to clone {url}: {reason}")]
    CloneFailed { url: String, reason: String },

    #[error("Clone target already exists: {}", .0.display())]
    TargetExists(PathBuf),

    #[error("Invalid import pattern for {language}: {source}")]
    InvalidPattern {
        language: String,
        #[source]
        source: regex::Error,
    },
}
