//! Turns raw import strings into absolute file paths inside the repository.
//!
//! Resolution is heuristic. For a source file the resolver probes its own
//! directory first and the repository root second, and the first existing
//! candidate wins:
//!
//! 1. `base/candidate + ext` for every known source extension
//! 2. `base/candidate/<index file>` for package-style languages
//! 3. for imports starting with `.`, the raw import as a plain path from the
//!    source directory (file or directory)
//!
//! Anything else is unresolved and the caller drops it. Candidates that
//! climb above the repository root are skipped at every step.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Extensions probed for a direct file hit, in precedence order.
pub const SOURCE_EXTENSIONS: [&str; 8] = [".py", ".js", ".tsx", ".jsx", ".ts", ".java", ".go", ".tf"];

/// Index files that stand in for a package directory (python, javascript).
pub const PACKAGE_INDEX_FILES: [&str; 2] = ["__init__.py", "index.js"];

#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

struct Candidate {
    path: PathBuf,
    /// False when the import names a directory only, e.g. `.` or `..`.
    names_file: bool,
}

impl PathResolver {
    /// `root` should already be absolute; the analyzer canonicalizes it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `raw_import`, found in the file at `source_rel` (relative to the
    /// repository root), to an absolute path.
    pub fn resolve(&self, source_rel: &Path, raw_import: &str) -> Option<PathBuf> {
        let raw_import = raw_import.trim();
        if raw_import.is_empty() {
            return None;
        }

        let source_dir = normalize(&self.root.join(source_rel))
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());

        let candidate = candidate_path(raw_import);
        let bases = [
            normalize(&source_dir.join(&candidate.path)),
            normalize(&self.root.join(&candidate.path)),
        ];

        if candidate.names_file {
            for base in &bases {
                for ext in SOURCE_EXTENSIONS {
                    let path = with_suffix(base, ext);
                    if self.contains(&path) && path.is_file() {
                        return Some(path);
                    }
                }
            }
        }

        for base in &bases {
            for index_file in PACKAGE_INDEX_FILES {
                let path = base.join(index_file);
                if self.contains(&path) && path.is_file() {
                    return Some(path);
                }
            }
        }

        if raw_import.starts_with('.') {
            let path = normalize(&source_dir.join(raw_import));
            if self.contains(&path) && path.exists() {
                return Some(path);
            }
        }

        debug!(
            "Unresolved import {} from {}",
            raw_import,
            source_rel.display()
        );
        None
    }

    /// Paths climbing above the root through `..` are never results.
    fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
    }
}

/// Imports that already contain `/` are paths. Anything else is dotted
/// module notation, where leading dots climb directories.
fn candidate_path(raw_import: &str) -> Candidate {
    if raw_import.contains('/') {
        let trimmed = raw_import.trim_start_matches('/');
        return Candidate {
            path: PathBuf::from(trimmed),
            names_file: !trimmed.is_empty() && !trimmed.ends_with('/'),
        };
    }

    let rest = raw_import.trim_start_matches('.');
    let leading_dots = raw_import.len() - rest.len();

    let mut path = PathBuf::new();
    for _ in 1..leading_dots {
        path.push("..");
    }
    for segment in rest.split('.').filter(|s| !s.is_empty()) {
        path.push(segment);
    }

    Candidate {
        names_file: !rest.is_empty(),
        path,
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_os_string();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Lexically fold `.` and `..` components without touching the filesystem.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}
