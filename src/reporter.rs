use crate::{
    config::ReportConfig,
    dependencies::DependencyToken,
    structure::{Node, RepoTree},
    summary::Summary,
};
use anyhow::Result;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Terraform declarations gathered across the whole tree.
#[derive(Debug, Default)]
pub struct TerraformOverview {
    pub modules: BTreeMap<String, String>,
    pub resources: BTreeMap<String, Vec<String>>,
    pub data_sources: BTreeMap<String, Vec<String>>,
    pub variables: BTreeSet<String>,
}

impl TerraformOverview {
    pub fn from_tree(tree: &RepoTree) -> Self {
        let mut overview = Self::default();

        for (_, entry) in tree.files() {
            for dep in &entry.dependencies {
                match dep {
                    DependencyToken::Module { name, source } => {
                        overview
                            .modules
                            .insert(name.clone(), source.display().to_string());
                    }
                    DependencyToken::Resource { resource_type, name } => {
                        overview
                            .resources
                            .entry(resource_type.clone())
                            .or_default()
                            .push(name.clone());
                    }
                    DependencyToken::Data { data_type, name } => {
                        overview
                            .data_sources
                            .entry(data_type.clone())
                            .or_default()
                            .push(name.clone());
                    }
                    DependencyToken::Var(name) => {
                        overview.variables.insert(name.clone());
                    }
                    DependencyToken::File(_) => {}
                }
            }
        }

        overview
    }
}

pub struct Reporter {
    config: ReportConfig,
}

impl Reporter {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Plain-text report for humans and for agents that read the summary
    /// alongside the JSON.
    pub fn render(&self, summary: &Summary) -> String {
        let mut output = Vec::new();

        output.push("=== Repository Summary ===".to_string());
        output.push(format!("Total files: {}", summary.file_count));
        output.push(format!("Total directories: {}", summary.directory_count));

        output.push(String::new());
        output.push("File types:".to_string());
        for (ext, count) in summary.file_types_by_count() {
            output.push(format!("  {}: {}", ext, count));
        }

        output.push(String::new());
        output.push("Top-level structure:".to_string());
        self.render_tree(&summary.structure, 1, &mut output);

        output.push(String::new());
        output.push("Most connected files (with most dependencies):".to_string());
        for (path, count) in self.most_connected(&summary.structure) {
            output.push(format!("  {}: {} dependencies", path, count));
        }

        if summary.has_terraform() {
            output.extend(self.render_terraform(&TerraformOverview::from_tree(&summary.structure)));
        }

        let mut report = output.join("\n");
        report.push('\n');
        report
    }

    fn render_tree(&self, tree: &RepoTree, depth: usize, output: &mut Vec<String>) {
        let indent = "  ".repeat(depth);

        for (name, node) in tree.children() {
            match node {
                Node::File(entry) => {
                    let deps = entry.dependencies.len();
                    if deps > 0 {
                        output.push(format!("{}F {} [{} deps]", indent, name, deps));
                    } else {
                        output.push(format!("{}F {}", indent, name));
                    }
                }
                Node::Directory(subtree) => {
                    output.push(format!("{}D {}/", indent, name));
                    if depth < self.config.tree_depth {
                        self.render_tree(subtree, depth + 1, output);
                    } else if !subtree.is_empty() {
                        output.push(format!("{}  ...", indent));
                    }
                }
            }
        }
    }

    /// Files with the most dependency tokens, ties in path order.
    pub fn most_connected(&self, tree: &RepoTree) -> Vec<(String, usize)> {
        let mut files: Vec<(String, usize)> = tree
            .files()
            .into_iter()
            .filter(|(_, entry)| !entry.dependencies.is_empty())
            .map(|(path, entry)| (path, entry.dependencies.len()))
            .collect();

        files.sort_by(|a, b| b.1.cmp(&a.1));
        files.truncate(self.config.top_files);
        files
    }

    fn render_terraform(&self, overview: &TerraformOverview) -> Vec<String> {
        let mut output = vec![String::new(), "=== Terraform Summary ===".to_string()];

        if !overview.modules.is_empty() {
            output.push(String::new());
            output.push("Modules:".to_string());
            for (name, source) in &overview.modules {
                output.push(format!("  {}: {}", name, source));
            }
        }

        if !overview.resources.is_empty() {
            output.push(String::new());
            output.push("Resources:".to_string());
            for (resource_type, names) in &overview.resources {
                output.push(format!("  {}: {} resources", resource_type, names.len()));
            }
        }

        if !overview.data_sources.is_empty() {
            output.push(String::new());
            output.push("Data Sources:".to_string());
            for (data_type, names) in &overview.data_sources {
                output.push(format!("  {}: {} instances", data_type, names.len()));
            }
        }

        if !overview.variables.is_empty() {
            output.push(String::new());
            output.push(format!("Variables Referenced: {}", overview.variables.len()));
            if overview.variables.len() <= self.config.max_listed_variables {
                for var in &overview.variables {
                    output.push(format!("  var.{}", var));
                }
            }
        }

        output
    }

    pub fn export(&self, summary: &Summary, path: &Path) -> Result<()> {
        fs::write(path, self.render(summary))?;
        Ok(())
    }

    /// Write the JSON summary and the text report, returning the paths written.
    pub fn export_all(&self, summary: &Summary, json_path: &Path, report_path: &Path) -> Result<Vec<PathBuf>> {
        for path in [json_path, report_path] {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
        }

        summary.export_json(json_path)?;
        self.export(summary, report_path)?;

        Ok(vec![json_path.to_path_buf(), report_path.to_path_buf()])
    }
}
