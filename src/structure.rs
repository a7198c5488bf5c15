use crate::dependencies::{DependencyMap, DependencyToken};
use crate::walker::WalkedFile;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileEntry {
    pub dependencies: Vec<DependencyToken>,
}

impl FileEntry {
    pub fn new(dependencies: Vec<DependencyToken>) -> Self {
        Self { dependencies }
    }
}

impl Serialize for FileEntry {
    /// `{}` without dependencies, `{"dependencies": [...]}` otherwise.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.dependencies.is_empty() {
            serializer.serialize_map(Some(0))?.end()
        } else {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry("dependencies", &self.dependencies)?;
            map.end()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Directory(RepoTree),
    File(FileEntry),
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Directory(tree) => tree.serialize(serializer),
            Node::File(entry) => entry.serialize(serializer),
        }
    }
}

/// A directory: child name → node. The root has no name of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RepoTree {
    children: BTreeMap<String, Node>,
}

impl RepoTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the tree from a walk, attaching dependencies from `dependencies`
    /// (empty when a file has no entry there).
    pub fn build(files: &[WalkedFile], dependencies: &DependencyMap) -> Self {
        let mut tree = Self::new();

        for file in files {
            let deps = dependencies
                .get(&file.relative_key())
                .cloned()
                .unwrap_or_default();
            tree.insert_file(&file.parent_components(), file.file_name(), FileEntry::new(deps));
        }

        tree
    }

    /// Place a file, creating intermediate directories. Returns false when a
    /// path segment is already taken by a file.
    pub fn insert_file(&mut self, dirs: &[String], name: &str, entry: FileEntry) -> bool {
        let mut current = self;
        for dir in dirs {
            let node = current
                .children
                .entry(dir.clone())
                .or_insert_with(|| Node::Directory(RepoTree::new()));
            match node {
                Node::Directory(tree) => current = tree,
                Node::File(_) => return false,
            }
        }

        current.children.insert(name.to_string(), Node::File(entry));
        true
    }

    pub fn children(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.children.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Look up a node by forward-slash relative path.
    pub fn get(&self, path: &str) -> Option<&Node> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let first = segments.next()?;
        let mut node = self.children.get(first)?;

        for segment in segments {
            match node {
                Node::Directory(tree) => node = tree.children.get(segment)?,
                Node::File(_) => return None,
            }
        }

        Some(node)
    }

    pub fn file_count(&self) -> usize {
        self.children
            .values()
            .map(|node| match node {
                Node::File(_) => 1,
                Node::Directory(tree) => tree.file_count(),
            })
            .sum()
    }

    pub fn directory_count(&self) -> usize {
        self.children
            .values()
            .map(|node| match node {
                Node::File(_) => 0,
                Node::Directory(tree) => 1 + tree.directory_count(),
            })
            .sum()
    }

    /// Every file in pre-order with its forward-slash relative path.
    pub fn files(&self) -> Vec<(String, &FileEntry)> {
        let mut files = Vec::new();
        self.collect_files("", &mut files);
        files
    }

    fn collect_files<'a>(&'a self, prefix: &str, files: &mut Vec<(String, &'a FileEntry)>) {
        for (name, node) in &self.children {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", prefix, name)
            };

            match node {
                Node::File(entry) => files.push((path, entry)),
                Node::Directory(tree) => tree.collect_files(&path, files),
            }
        }
    }
}
