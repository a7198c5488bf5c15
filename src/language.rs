use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Languages whose imports are extracted. Files in any other language are
/// still part of the tree, they just never carry dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    Java,
    Go,
    Terraform,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Python,
        Language::JavaScript,
        Language::Java,
        Language::Go,
        Language::Terraform,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Java => "java",
            Language::Go => "go",
            Language::Terraform => "terraform",
        }
    }

    /// Extensions (lowercase, without the dot) mapped to this language.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &["py"],
            Language::JavaScript => &["js", "jsx", "ts", "tsx"],
            Language::Java => &["java"],
            Language::Go => &["go"],
            Language::Terraform => &["tf", "tfvars"],
        }
    }

    /// Regular expressions for this language's import statements. Group 1 of
    /// each pattern is the raw import; order here is extraction order.
    pub fn import_patterns(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &[
                r"(?:from|import)\s+([\w.]+)",
                r"(?:from)\s+([\w.]+)(?:\s+import)",
            ],
            Language::JavaScript => &[
                r#"(?:import|require)\s*\(?['"](.+?)['"]"#,
                r#"(?:from)\s+['"](.+?)['"]"#,
            ],
            Language::Java => &[r"import\s+([\w.]+)(?:;|\s)"],
            Language::Go => &[
                r#"import\s+\(\s*['"](.+?)['"]"#,
                r#"import\s+['"](.+?)['"]"#,
            ],
            Language::Terraform => &[
                r#"source\s*=\s*["'](.+?)["']"#,
                r#"module\s+["'](.+?)["']"#,
                r#"terraform\s*\{\s*.*?source\s*=\s*["'](.+?)["']"#,
            ],
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a file by its extension, case-insensitively.
pub fn classify(file_name: &str) -> Option<Language> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())?;

    Language::ALL
        .into_iter()
        .find(|lang| lang.extensions().contains(&extension.as_str()))
}
