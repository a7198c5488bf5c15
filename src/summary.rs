use crate::structure::RepoTree;
use crate::walker::WalkedFile;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub file_count: usize,
    pub directory_count: usize,
    pub file_types: BTreeMap<String, usize>,
    pub structure: RepoTree,
}

impl Summary {
    pub fn new(structure: RepoTree, file_types: BTreeMap<String, usize>) -> Self {
        Self {
            file_count: structure.file_count(),
            directory_count: structure.directory_count(),
            file_types,
            structure,
        }
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn export_json(&self, path: &Path) -> crate::Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Extensions sorted by descending count, ties by extension.
    pub fn file_types_by_count(&self) -> Vec<(&str, usize)> {
        let mut types: Vec<(&str, usize)> = self
            .file_types
            .iter()
            .map(|(ext, count)| (ext.as_str(), *count))
            .collect();
        types.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        types
    }

    pub fn has_terraform(&self) -> bool {
        self.file_types.contains_key(".tf")
    }
}

/// Histogram of lowercase extensions over every walked file. Files without
/// an extension are not counted.
pub fn count_file_types(files: &[WalkedFile]) -> BTreeMap<String, usize> {
    let mut extensions = BTreeMap::new();

    for ext in files.iter().filter_map(WalkedFile::extension) {
        *extensions.entry(ext).or_insert(0) += 1;
    }

    extensions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependencies::DependencyMap;
    use std::path::PathBuf;

    fn walked(relative: &str) -> WalkedFile {
        WalkedFile {
            path: PathBuf::from("/repo").join(relative),
            relative: PathBuf::from(relative),
        }
    }

    #[test]
    fn test_histogram_skips_extensionless_files() {
        let files: Vec<WalkedFile> = ["a.tf", "b.tf", "mod/c.TF", "README.md", "docs/x.md", "LICENSE"]
            .into_iter()
            .map(walked)
            .collect();

        let types = count_file_types(&files);
        assert_eq!(types.len(), 2);
        assert_eq!(types[".tf"], 3);
        assert_eq!(types[".md"], 2);
    }

    #[test]
    fn test_summary_json_layout() {
        let files = vec![walked("main.tf"), walked("modules/vpc/main.tf")];
        let tree = RepoTree::build(&files, &DependencyMap::new());
        let summary = Summary::new(tree, count_file_types(&files));

        assert_eq!(summary.file_count, 2);
        assert_eq!(summary.directory_count, 2);
        assert!(summary.has_terraform());

        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["file_types"], serde_json::json!({".tf": 2}));
        assert_eq!(json["structure"]["modules"]["vpc"]["main.tf"], serde_json::json!({}));

        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert!(keys.contains(&&"file_count".to_string()));
        assert!(keys.contains(&&"directory_count".to_string()));
    }

    #[test]
    fn test_file_types_by_count() {
        let mut file_types = BTreeMap::new();
        file_types.insert(".md".to_string(), 2);
        file_types.insert(".py".to_string(), 5);
        file_types.insert(".js".to_string(), 2);
        let summary = Summary::new(RepoTree::new(), file_types);

        assert_eq!(
            summary.file_types_by_count(),
            vec![(".py", 5), (".js", 2), (".md", 2)]
        );
    }
}
