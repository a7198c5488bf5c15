use crate::error::AnalyzerError;
use crate::language::Language;
use anyhow::Result;
use regex::Regex;
use std::collections::HashMap;

/// Pulls raw import strings out of file content. One implementation per
/// language keeps new languages out of the resolver and graph builder.
pub trait ImportExtractor: Send + Sync {
    fn extract(&self, content: &str) -> Vec<String>;
}

/// Regex-driven extractor. Collects capture group 1 of every match, pattern
/// by pattern, in the order matches occur in the content.
pub struct PatternExtractor {
    patterns: Vec<Regex>,
}

impl PatternExtractor {
    pub fn new(patterns: Vec<Regex>) -> Self {
        Self { patterns }
    }

    pub fn for_language(language: Language) -> Result<Self> {
        let patterns = language
            .import_patterns()
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| AnalyzerError::InvalidPattern {
                    language: language.to_string(),
                    source,
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self::new(patterns))
    }
}

impl ImportExtractor for PatternExtractor {
    fn extract(&self, content: &str) -> Vec<String> {
        let mut imports = Vec::new();

        for pattern in &self.patterns {
            for captures in pattern.captures_iter(content) {
                if let Some(module) = captures.get(1) {
                    imports.push(module.as_str().to_string());
                }
            }
        }

        imports
    }
}

pub struct ImportParser {
    extractors: HashMap<Language, Box<dyn ImportExtractor>>,
}

impl ImportParser {
    pub fn new() -> Result<Self> {
        let mut extractors: HashMap<Language, Box<dyn ImportExtractor>> = HashMap::new();

        for language in Language::ALL {
            extractors.insert(language, Box::new(PatternExtractor::for_language(language)?));
        }

        Ok(Self { extractors })
    }

    /// Replace the extractor used for a language.
    pub fn with_extractor(mut self, language: Language, extractor: Box<dyn ImportExtractor>) -> Self {
        self.extractors.insert(language, extractor);
        self
    }

    pub fn extract_raw_imports(&self, language: Language, content: &str) -> Vec<String> {
        self.extractors
            .get(&language)
            .map(|extractor| extractor.extract(content))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ImportParser {
        ImportParser::new().unwrap()
    }

    #[test]
    fn test_python_imports_in_pattern_then_match_order() {
        let content = "import os\nfrom pkg.util import helper\n";
        let imports = parser().extract_raw_imports(Language::Python, content);

        // First pattern yields every from/import word, second only `from X import`.
        assert_eq!(imports, vec!["os", "pkg.util", "helper", "pkg.util"]);
    }

    #[test]
    fn test_javascript_imports() {
        let content = r#"
import React from 'react';
const util = require("./util");
import './styles.css';
"#;
        let imports = parser().extract_raw_imports(Language::JavaScript, content);

        assert!(imports.contains(&"./util".to_string()));
        assert!(imports.contains(&"./styles.css".to_string()));
        assert!(imports.contains(&"react".to_string()));
    }

    #[test]
    fn test_java_and_go_imports() {
        let java = parser().extract_raw_imports(Language::Java, "import com.acme.Service;\n");
        assert_eq!(java, vec!["com.acme.Service"]);

        let go = parser().extract_raw_imports(Language::Go, "import \"fmt\"\nimport (\n\t\"os\"\n)\n");
        assert_eq!(go, vec!["os", "fmt"]);
    }

    #[test]
    fn test_terraform_sources() {
        let content = "module \"vpc\" {\n  source = \"./modules/vpc\"\n}\n";
        let imports = parser().extract_raw_imports(Language::Terraform, content);

        assert_eq!(imports, vec!["./modules/vpc", "vpc"]);
    }

    #[test]
    fn test_no_matches_is_empty() {
        let imports = parser().extract_raw_imports(Language::Python, "x = 1\n");
        assert!(imports.is_empty());
    }

    struct Fixed;

    impl ImportExtractor for Fixed {
        fn extract(&self, _content: &str) -> Vec<String> {
            vec!["fixed".to_string()]
        }
    }

    #[test]
    fn test_custom_extractor_replaces_default() {
        let parser = parser().with_extractor(Language::Go, Box::new(Fixed));
        assert_eq!(parser.extract_raw_imports(Language::Go, ""), vec!["fixed"]);
    }
}
