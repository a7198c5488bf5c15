//! End-to-end analysis over small fixture repositories.

use repo_summarizer::{Analyzer, Config, DependencyToken, Node, Reporter};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn repo(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (path, content) in files {
        let path = dir.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

fn analyzer(dir: &Path) -> Analyzer {
    let config = Config {
        target_directory: dir.to_path_buf(),
        ..Config::default()
    };
    Analyzer::new(config).unwrap()
}

fn dependencies_of(analyzer: &Analyzer, path: &str) -> Vec<DependencyToken> {
    analyzer
        .analyze_dependencies()
        .get(path)
        .cloned()
        .unwrap_or_default()
}

#[test]
fn files_without_matches_have_no_entry() {
    let dir = repo(&[("app.py", "print('hello')\n"), ("lib.go", "package lib\n")]);
    let analyzer = analyzer(dir.path());

    assert!(analyzer.analyze_dependencies().is_empty());

    let summary = analyzer.generate_summary();
    match summary.structure.get("app.py") {
        Some(Node::File(entry)) => assert!(entry.dependencies.is_empty()),
        other => panic!("expected file node, got {:?}", other),
    }
}

#[test]
fn import_next_to_source_wins_over_root() {
    let dir = repo(&[
        ("helpers.py", ""),
        ("pkg/helpers.py", ""),
        ("pkg/main.py", "import helpers\n"),
    ]);
    let analyzer = analyzer(dir.path());

    let deps = dependencies_of(&analyzer, "pkg/main.py");
    assert_eq!(
        deps,
        vec![DependencyToken::File(analyzer.root().join("pkg/helpers.py"))]
    );
}

#[test]
fn unresolved_imports_are_dropped() {
    let dir = repo(&[
        ("src/index.js", "import React from 'react';\nimport { a } from './a';\n"),
        ("src/a.js", "export const a = 1;\n"),
    ]);
    let analyzer = analyzer(dir.path());

    let deps = dependencies_of(&analyzer, "src/index.js");
    assert_eq!(deps, vec![DependencyToken::File(analyzer.root().join("src/a.js"))]);
}

#[test]
fn terraform_scenario() {
    let main_tf = r#"
module "vpc" { source = "./modules/vpc" }

resource "aws_vpc" "main" {
  cidr_block = var.cidr_block
}

data "aws_ami" "ubuntu" {
  owners = [var.cidr_block]
}
"#;
    let dir = repo(&[("main.tf", main_tf), ("modules/vpc/main.tf", "")]);
    let analyzer = analyzer(dir.path());

    let typed: Vec<String> = dependencies_of(&analyzer, "main.tf")
        .iter()
        .filter(|dep| !dep.is_file())
        .map(ToString::to_string)
        .collect();

    assert_eq!(
        typed,
        vec![
            format!("module:vpc:{}", analyzer.root().join("modules/vpc").display()),
            "resource:aws_vpc:main".to_string(),
            "data:aws_ami:ubuntu".to_string(),
            "var:cidr_block".to_string(),
            "var:cidr_block".to_string(),
        ]
    );
}

#[test]
fn terraform_module_without_local_source_is_omitted() {
    let dir = repo(&[("main.tf", "module \"vpc\" { source = \"./modules/vpc\" }\n")]);
    let analyzer = analyzer(dir.path());

    assert!(dependencies_of(&analyzer, "main.tf").is_empty());
}

#[test]
fn generic_imports_precede_terraform_tokens() {
    let dir = repo(&[
        ("main.tf", "module \"net\" { source = \"./net\" }\n"),
        ("net/main.tf", ""),
    ]);
    let analyzer = analyzer(dir.path());

    // The bare module name `net` is not a relative path, so only the
    // `source` string resolves as a plain import.
    let deps = dependencies_of(&analyzer, "main.tf");
    let net = analyzer.root().join("net");
    assert_eq!(
        deps,
        vec![
            DependencyToken::File(net.clone()),
            DependencyToken::Module {
                name: "net".to_string(),
                source: net,
            },
        ]
    );
}

#[test]
fn file_type_histogram() {
    let dir = repo(&[
        ("main.tf", ""),
        ("variables.tf", ""),
        ("modules/vpc/main.tf", ""),
        ("README.md", ""),
        ("docs/usage.md", ""),
        ("LICENSE", ""),
    ]);
    let summary = analyzer(dir.path()).generate_summary();

    let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
    assert_eq!(json["file_types"], serde_json::json!({".tf": 3, ".md": 2}));
    assert_eq!(summary.file_count, 6);
}

#[test]
fn ignored_directories_contribute_nothing() {
    let dir = repo(&[
        (".git/hooks/update.py", "import main\n"),
        ("node_modules/pkg/index.js", "require('./x')\n"),
        ("main.py", ""),
    ]);
    let analyzer = analyzer(dir.path());
    let summary = analyzer.generate_summary();

    assert_eq!(summary.file_count, 1);
    assert_eq!(summary.directory_count, 0);
    assert_eq!(summary.file_types.get(".py"), Some(&1));
    assert!(summary.file_types.get(".js").is_none());
    assert!(analyzer.analyze_dependencies().is_empty());
}

#[test]
fn binary_files_are_skipped() {
    let dir = repo(&[("ok.py", "import data\n"), ("data.py", "")]);
    fs::write(dir.path().join("blob.py"), [0xffu8, 0xfe, 0x00, 0x69]).unwrap();
    let analyzer = analyzer(dir.path());

    let deps = analyzer.analyze_dependencies();
    assert_eq!(deps.len(), 1);
    assert!(deps.contains_key("ok.py"));
    assert_eq!(analyzer.generate_summary().file_count, 3);
}

#[test]
fn structure_leaves_are_files_and_branches_are_directories() {
    let dir = repo(&[
        ("src/app.py", "from src import util\n"),
        ("src/util.py", ""),
        ("dependencies/readme.txt", ""),
    ]);
    let summary = analyzer(dir.path()).generate_summary();
    let json = serde_json::to_value(&summary.structure).unwrap();

    fn check(value: &serde_json::Value) {
        let object = value.as_object().unwrap();
        if object.contains_key("dependencies") && object["dependencies"].is_array() {
            assert_eq!(object.len(), 1);
            return;
        }
        for child in object.values() {
            check(child);
        }
    }
    check(&json);

    assert!(json["src"]["app.py"]["dependencies"].is_array());
    assert!(json["dependencies"]["readme.txt"].is_object());
    assert_eq!(summary.directory_count, 2);
}

#[test]
fn summaries_are_byte_identical_across_runs() {
    let dir = repo(&[
        ("b/z.py", "import a.y\n"),
        ("a/y.py", "from . import x\n"),
        ("a/__init__.py", ""),
        ("main.tf", "resource \"null_resource\" \"n\" {}\nvalue = var.v\n"),
        ("web/app.tsx", "import x from './lib';\n"),
        ("web/lib/index.js", ""),
    ]);

    let first = analyzer(dir.path()).generate_summary().to_json().unwrap();
    let second = analyzer(dir.path()).generate_summary().to_json().unwrap();
    assert_eq!(first, second);
}

#[test]
fn report_lists_terraform_section() {
    let dir = repo(&[(
        "main.tf",
        "resource \"aws_s3_bucket\" \"logs\" {\n  bucket = var.bucket\n}\n",
    )]);
    let analyzer = analyzer(dir.path());
    let summary = analyzer.generate_summary();

    let report = Reporter::new(analyzer.config().report.clone()).render(&summary);
    assert!(report.contains("Total files: 1"));
    assert!(report.contains("  F main.tf [2 deps]"));
    assert!(report.contains("  main.tf: 2 dependencies"));
    assert!(report.contains("aws_s3_bucket: 1 resources"));
    assert!(report.contains("  var.bucket"));
}

#[test]
fn missing_repository_is_an_error() {
    let config = Config {
        target_directory: PathBuf::from("/no/such/repository/here"),
        ..Config::default()
    };
    assert!(Analyzer::new(config).is_err());
}

#[test]
fn imports_never_resolve_outside_the_repository() {
    let outer = repo(&[
        ("shared/config.js", ""),
        ("repo/main.js", "const c = require('../shared/config');\n"),
        ("repo/src/app.js", "const c = require('../../shared/config');\nconst m = require('../main');\n"),
    ]);
    let analyzer = analyzer(&outer.path().join("repo"));

    let deps = analyzer.analyze_dependencies();
    assert!(!deps.contains_key("main.js"));
    assert_eq!(
        deps.get("src/app.js"),
        Some(&vec![DependencyToken::File(analyzer.root().join("main.js"))])
    );
}

#[cfg(unix)]
#[test]
fn symlinked_files_are_counted() {
    let dir = repo(&[("real.py", "import os\n")]);
    std::os::unix::fs::symlink(dir.path().join("real.py"), dir.path().join("alias.py")).unwrap();

    let summary = analyzer(dir.path()).generate_summary();
    assert_eq!(summary.file_count, 2);
    assert_eq!(summary.file_types.get(".py"), Some(&2));
    assert!(matches!(summary.structure.get("alias.py"), Some(Node::File(_))));
}
