//! Terraform-specific references: module blocks, resource and data
//! declarations, and `var.*` uses.

use crate::dependencies::DependencyToken;
use crate::resolver::PathResolver;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::debug;

static MODULE_BLOCK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bmodule\s+"([^"]+)"\s*\{([^}]*)\}"#).expect("Invalid module block regex"));

static MODULE_SOURCE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"source\s*=\s*"([^"]+)""#).expect("Invalid module source regex"));

static RESOURCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bresource\s+"([^"]+)"\s+"([^"]+)"\s*\{"#).expect("Invalid resource regex")
});

static DATA_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bdata\s+"([^"]+)"\s+"([^"]+)"\s*\{"#).expect("Invalid data source regex"));

static VAR_REFERENCE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bvar\.([a-zA-Z0-9_-]+)").expect("Invalid variable reference regex"));

#[derive(Debug, Default, Clone, Copy)]
pub struct TerraformExtractor;

impl TerraformExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Modules, resources, data sources and variable references, in that
    /// order. A module whose source cannot be resolved is left out.
    pub fn extract(&self, source_rel: &Path, content: &str, resolver: &PathResolver) -> Vec<DependencyToken> {
        let mut tokens = Vec::new();

        for block in MODULE_BLOCK_REGEX.captures_iter(content) {
            let name = &block[1];
            let Some(source) = MODULE_SOURCE_REGEX.captures(&block[2]) else {
                continue;
            };

            match resolver.resolve(source_rel, &source[1]) {
                Some(resolved) => tokens.push(DependencyToken::Module {
                    name: name.to_string(),
                    source: resolved,
                }),
                None => debug!("Module {} source {} not found locally", name, &source[1]),
            }
        }

        tokens.extend(RESOURCE_REGEX.captures_iter(content).map(|c| DependencyToken::Resource {
            resource_type: c[1].to_string(),
            name: c[2].to_string(),
        }));

        tokens.extend(DATA_REGEX.captures_iter(content).map(|c| DependencyToken::Data {
            data_type: c[1].to_string(),
            name: c[2].to_string(),
        }));

        tokens.extend(
            VAR_REFERENCE_REGEX
                .captures_iter(content)
                .map(|c| DependencyToken::Var(c[1].to_string())),
        );

        tokens
    }
}
