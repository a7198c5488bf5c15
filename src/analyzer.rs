use crate::{
    config::Config,
    dependencies::{DependencyExtractor, DependencyMap},
    error::AnalyzerError,
    parser::ImportParser,
    resolver::PathResolver,
    structure::RepoTree,
    summary::{count_file_types, Summary},
    terraform::TerraformExtractor,
    walker::RepoWalker,
};
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Runs the analysis passes over one repository. Every call walks the
/// filesystem again; nothing is cached between calls.
pub struct Analyzer {
    config: Config,
    root: PathBuf,
    parser: ImportParser,
    terraform: TerraformExtractor,
}

impl Analyzer {
    /// Fails with [`AnalyzerError::RepositoryNotFound`] when the target
    /// directory does not exist.
    pub fn new(config: Config) -> Result<Self> {
        let target = &config.target_directory;
        if !target.is_dir() {
            return Err(AnalyzerError::RepositoryNotFound(target.clone()).into());
        }

        let root = target
            .canonicalize()
            .map_err(|_| AnalyzerError::RepositoryNotFound(target.clone()))?;

        Ok(Self {
            config,
            root,
            parser: ImportParser::new()?,
            terraform: TerraformExtractor::new(),
        })
    }

    pub fn with_parser(mut self, parser: ImportParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn walker(&self) -> RepoWalker {
        RepoWalker::new(&self.root, &self.config)
    }

    /// First pass: dependencies of every recognized file.
    pub fn analyze_dependencies(&self) -> DependencyMap {
        let files = self.walker().files();
        let resolver = PathResolver::new(&self.root);
        let extractor = DependencyExtractor::new(&self.parser, &self.terraform, &resolver);

        let dependencies = extractor.build_map(&files, self.config.max_file_size);
        info!(
            "Dependency pass: {} files scanned, {} with dependencies",
            files.len(),
            dependencies.len()
        );
        dependencies
    }

    /// Second pass: the directory tree with dependencies attached.
    pub fn build_structure(&self, dependencies: &DependencyMap) -> RepoTree {
        let files = self.walker().files();
        let tree = RepoTree::build(&files, dependencies);
        info!("Structure pass: {} files placed", tree.file_count());
        tree
    }

    /// Extension histogram over a fresh walk, counting every file.
    pub fn count_file_types(&self) -> BTreeMap<String, usize> {
        count_file_types(&self.walker().files())
    }

    pub fn generate_summary(&self) -> Summary {
        info!("Analyzing repository at {}", self.root.display());

        let dependencies = self.analyze_dependencies();
        let structure = self.build_structure(&dependencies);
        let file_types = self.count_file_types();

        Summary::new(structure, file_types)
    }
}
