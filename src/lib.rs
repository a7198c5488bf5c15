pub mod analyzer;
pub mod config;
pub mod dependencies;
pub mod error;
pub mod git;
pub mod graph;
pub mod language;
pub mod parser;
pub mod reporter;
pub mod resolver;
pub mod structure;
pub mod summary;
pub mod terraform;
pub mod walker;

pub use analyzer::Analyzer;
pub use config::Config;
pub use dependencies::{DependencyMap, DependencyToken};
pub use error::AnalyzerError;
pub use language::{classify, Language};
pub use parser::{ImportExtractor, ImportParser};
pub use reporter::Reporter;
pub use resolver::PathResolver;
pub use structure::{FileEntry, Node, RepoTree};
pub use summary::Summary;

pub type Result<T> = anyhow::Result<T>;
