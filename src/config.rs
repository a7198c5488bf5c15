use serde::{Deserialize, Serialize};
use std::{
    env,
    path::{Path, PathBuf},
};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub target_directory: PathBuf,
    pub ignored_dirs: Vec<String>,
    pub respect_gitignore: bool,
    pub max_file_size: u64,
    pub report: ReportConfig,
    pub visualization: VisualizationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Levels of the tree listing, counted from the top level: entries directly
    /// under the root are level 1, so the default of 6 lists six levels.
    pub tree_depth: usize,
    pub top_files: usize,
    pub max_listed_variables: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizationConfig {
    pub max_dependency_nodes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_directory: PathBuf::from("."),
            ignored_dirs: vec![
                ".git".to_string(),
                "node_modules".to_string(),
                "__pycache__".to_string(),
                "venv".to_string(),
                ".env".to_string(),
                ".venv".to_string(),
            ],
            respect_gitignore: false,
            max_file_size: 10 * 1024 * 1024, // 10MB
            report: ReportConfig::default(),
            visualization: VisualizationConfig::default(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            tree_depth: 6,
            top_files: 5,
            max_listed_variables: 10,
        }
    }
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            max_dependency_nodes: 50,
        }
    }
}

impl Config {
    /// Get the default config file path (~/.repo-summarizer.toml)
    pub fn default_config_path() -> crate::Result<PathBuf> {
        let home_dir = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map_err(|_| anyhow::anyhow!("Could not determine home directory"))?;
        Ok(PathBuf::from(home_dir).join(".repo-summarizer.toml"))
    }

    /// Load config from the default location, falling back to defaults if it doesn't exist
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            info!("Loading configuration from {}", config_path.display());
            Self::from_file(&config_path)
        } else {
            info!(
                "No config file found at {}, using defaults",
                config_path.display()
            );
            Ok(Self::default())
        }
    }

    /// Load config from a specific file path
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to a file
    pub fn to_file(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Whether a directory with this name is skipped by every walk.
    /// Any dot-prefixed name counts, on top of the configured list.
    pub fn is_ignored_dir(&self, name: &str) -> bool {
        is_ignored_dir_name(&self.ignored_dirs, name)
    }

    /// Create a config file with all available options documented
    pub fn create_documented_config() -> String {
        r#"# repo-summarizer configuration file

# Directory to analyze (defaults to current directory)
target_directory = "."

# Directory names skipped at every depth. Any directory whose name starts
# with a dot is skipped as well.
ignored_dirs = [
    ".git",
    "node_modules",
    "__pycache__",
    "venv",
    ".env",
    ".venv"
]

# Also honour .gitignore files while walking
respect_gitignore = false

# Files larger than this (in bytes) contribute no dependencies
max_file_size = 10485760

[report]
# Depth of the indented tree listing in the text report, counted from the
# top level (entries directly under the root are level 1)
tree_depth = 6

# Number of files listed under "Most connected files"
top_files = 5

# Referenced Terraform variables are listed by name only up to this count
max_listed_variables = 10

[visualization]
# Dependency graphs with more nodes than this are not rendered
max_dependency_nodes = 50
"#
        .to_string()
    }
}

pub(crate) fn is_ignored_dir_name(ignored: &[String], name: &str) -> bool {
    name.starts_with('.') || ignored.iter().any(|dir| dir == name)
}
