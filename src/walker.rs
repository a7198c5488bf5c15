use crate::config::{is_ignored_dir_name, Config};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Path relative to the repository root.
    pub relative: PathBuf,
}

impl WalkedFile {
    pub fn file_name(&self) -> &str {
        self.relative
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }

    /// Forward-slash relative path, used as the key in maps and reports.
    pub fn relative_key(&self) -> String {
        relative_key(&self.relative)
    }

    /// Directory names from the root down to the file's parent.
    pub fn parent_components(&self) -> Vec<String> {
        self.relative
            .parent()
            .map(|parent| {
                parent
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Lowercase extension with its leading dot, if the file has one.
    pub fn extension(&self) -> Option<String> {
        self.relative
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
    }
}

pub fn relative_key(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Walks the repository, pruning ignored directories as it descends.
pub struct RepoWalker {
    root: PathBuf,
    ignored_dirs: Vec<String>,
    respect_gitignore: bool,
}

impl RepoWalker {
    pub fn new(root: impl Into<PathBuf>, config: &Config) -> Self {
        Self {
            root: root.into(),
            ignored_dirs: config.ignored_dirs.clone(),
            respect_gitignore: config.respect_gitignore,
        }
    }

    /// Every regular file under the root, in sorted walk order (siblings by
    /// name, directories descended in place). Entries that cannot
    /// be read are logged and skipped.
    pub fn files(&self) -> Vec<WalkedFile> {
        let ignored = self.ignored_dirs.clone();

        let mut walker_builder = WalkBuilder::new(&self.root);
        walker_builder
            .standard_filters(false)
            .hidden(false)
            .git_ignore(self.respect_gitignore)
            .require_git(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                entry.depth() == 0
                    || !is_dir
                    || !is_ignored_dir_name(&ignored, &entry.file_name().to_string_lossy())
            });

        let mut files = Vec::new();
        for result in walker_builder.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            // Links to files are listed in place; links to directories are
            // never descended.
            let is_file = entry
                .file_type()
                .is_some_and(|ft| ft.is_file() || (ft.is_symlink() && entry.path().is_file()));
            if !is_file {
                continue;
            }

            let path = entry.path().to_path_buf();
            let relative = path.strip_prefix(&self.root).unwrap_or(&path).to_path_buf();
            files.push(WalkedFile { path, relative });
        }

        files
    }
}
