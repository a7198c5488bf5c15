use crate::language::{classify, Language};
use crate::parser::ImportParser;
use crate::resolver::PathResolver;
use crate::terraform::TerraformExtractor;
use crate::walker::WalkedFile;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One edge out of a file. Plain imports become `File`; the other variants
/// come from Terraform blocks and references.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DependencyToken {
    File(PathBuf),
    Module { name: String, source: PathBuf },
    Resource { resource_type: String, name: String },
    Data { data_type: String, name: String },
    Var(String),
}

impl DependencyToken {
    pub fn is_file(&self) -> bool {
        matches!(self, DependencyToken::File(_))
    }

    pub fn as_file(&self) -> Option<&Path> {
        match self {
            DependencyToken::File(path) => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for DependencyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyToken::File(path) => write!(f, "{}", path.display()),
            DependencyToken::Module { name, source } => {
                write!(f, "module:{}:{}", name, source.display())
            }
            DependencyToken::Resource { resource_type, name } => {
                write!(f, "resource:{}:{}", resource_type, name)
            }
            DependencyToken::Data { data_type, name } => write!(f, "data:{}:{}", data_type, name),
            DependencyToken::Var(name) => write!(f, "var:{}", name),
        }
    }
}

impl Serialize for DependencyToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Relative path (forward slashes) → dependencies, for files that have any.
pub type DependencyMap = BTreeMap<String, Vec<DependencyToken>>;

pub struct DependencyExtractor<'a> {
    parser: &'a ImportParser,
    terraform: &'a TerraformExtractor,
    resolver: &'a PathResolver,
}

impl<'a> DependencyExtractor<'a> {
    pub fn new(
        parser: &'a ImportParser,
        terraform: &'a TerraformExtractor,
        resolver: &'a PathResolver,
    ) -> Self {
        Self {
            parser,
            terraform,
            resolver,
        }
    }

    /// Dependencies of a single file. Generic imports come first, then the
    /// Terraform tokens; unresolved imports are dropped.
    pub fn analyze_file(&self, language: Language, source_rel: &Path, content: &str) -> Vec<DependencyToken> {
        let mut tokens: Vec<DependencyToken> = self
            .parser
            .extract_raw_imports(language, content)
            .iter()
            .filter_map(|raw| self.resolver.resolve(source_rel, raw))
            .map(DependencyToken::File)
            .collect();

        if language == Language::Terraform {
            tokens.extend(self.terraform.extract(source_rel, content, self.resolver));
        }

        tokens
    }

    /// Read, classify and analyze every walked file, then fold the results
    /// into a map. Files without dependencies are left out.
    pub fn build_map(&self, files: &[WalkedFile], max_file_size: u64) -> DependencyMap {
        files
            .iter()
            .filter_map(|file| {
                let language = classify(file.file_name())?;
                let content = read_source(&file.path, max_file_size)?;
                let tokens = self.analyze_file(language, &file.relative, &content);
                debug!(
                    "{} ({}): {} dependencies",
                    file.relative_key(),
                    language,
                    tokens.len()
                );
                (!tokens.is_empty()).then(|| (file.relative_key(), tokens))
            })
            .fold(DependencyMap::new(), |mut map, (key, tokens)| {
                map.entry(key).or_default().extend(tokens);
                map
            })
    }
}

/// Whole-file read. Oversized, unreadable and non-UTF-8 files yield `None`.
fn read_source(path: &Path, max_file_size: u64) -> Option<String> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.len() > max_file_size => {
            debug!("Skipping {} ({} bytes)", path.display(), metadata.len());
            return None;
        }
        Ok(_) => {}
        Err(e) => {
            warn!("Could not stat {}: {}", path.display(), e);
            return None;
        }
    }

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Could not read {}: {}", path.display(), e);
            return None;
        }
    };

    match String::from_utf8(bytes) {
        Ok(content) => Some(content),
        Err(_) => {
            debug!("Skipping non-UTF-8 file {}", path.display());
            None
        }
    }
}
