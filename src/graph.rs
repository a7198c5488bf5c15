//! Graph views of an analyzed repository, for visualization.
//!
//! Two graphs are derived from the summary's tree: the directory structure
//! (`Contains` edges from a synthetic `.` root) and the file dependency graph
//! (`DependsOn` edges from `File` tokens only). Both are exported through
//! [`GraphExport`] or rendered as Graphviz DOT.

use crate::config::VisualizationConfig;
use crate::structure::{Node, RepoTree};
use crate::summary::Summary;
use crate::walker::relative_key;
use anyhow::Result;
use petgraph::dot::{Config as DotConfig, Dot};
use petgraph::visit::EdgeRef;
use petgraph::{graph::NodeIndex, Directed, Direction, Graph};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub type RepoGraph = Graph<GraphNode, EdgeType, Directed>;

#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub node_type: NodeType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeType {
    Directory,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EdgeType {
    Contains,
    DependsOn,
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeType::Contains => f.write_str("contains"),
            EdgeType::DependsOn => f.write_str("depends on"),
        }
    }
}

pub struct GraphBuilder {
    graph: RepoGraph,
    node_map: HashMap<String, NodeIndex>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            node_map: HashMap::new(),
        }
    }

    fn add_node(&mut self, id: &str, node_type: NodeType) -> NodeIndex {
        if let Some(&index) = self.node_map.get(id) {
            return index;
        }

        let label = Path::new(id)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| id.to_string());

        let index = self.graph.add_node(GraphNode {
            id: id.to_string(),
            label,
            node_type,
        });
        self.node_map.insert(id.to_string(), index);
        index
    }

    /// Directory/file hierarchy rooted at a `.` node.
    pub fn structure_graph(mut self, tree: &RepoTree) -> RepoGraph {
        let root = self.add_node(".", NodeType::Directory);
        self.add_children(tree, root, "");
        self.graph
    }

    fn add_children(&mut self, tree: &RepoTree, parent: NodeIndex, prefix: &str) {
        for (name, node) in tree.children() {
            let id = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", prefix, name)
            };

            match node {
                Node::File(_) => {
                    let index = self.add_node(&id, NodeType::File);
                    self.graph.add_edge(parent, index, EdgeType::Contains);
                }
                Node::Directory(subtree) => {
                    let index = self.add_node(&id, NodeType::Directory);
                    self.graph.add_edge(parent, index, EdgeType::Contains);
                    self.add_children(subtree, index, &id);
                }
            }
        }
    }

    /// File-to-file edges. Typed Terraform tokens are not files and are
    /// left out; targets inside `root` are keyed by relative path.
    pub fn dependency_graph(mut self, tree: &RepoTree, root: &Path) -> RepoGraph {
        for (path, entry) in tree.files() {
            if !entry.dependencies.iter().any(|dep| dep.is_file()) {
                continue;
            }

            let source = self.add_node(&path, NodeType::File);
            for target in entry.dependencies.iter().filter_map(|dep| dep.as_file()) {
                let target_id = target
                    .strip_prefix(root)
                    .map(relative_key)
                    .unwrap_or_else(|_| target.display().to_string());
                let target = self.add_node(&target_id, NodeType::File);
                self.graph.add_edge(source, target, EdgeType::DependsOn);
            }
        }

        self.graph
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Top-down layout: each node sits at `y = -depth`, and `x` counts the nodes
/// already placed on that depth in pre-order. Roots are nodes without
/// incoming edges (or the first node of a graph that is all cycles).
pub fn hierarchical_layout(graph: &RepoGraph) -> HashMap<NodeIndex, Position> {
    let mut positions = HashMap::new();
    let mut width_used: HashMap<usize, usize> = HashMap::new();
    let mut visited = HashSet::new();

    let mut roots: Vec<NodeIndex> = graph
        .node_indices()
        .filter(|&n| graph.neighbors_directed(n, Direction::Incoming).next().is_none())
        .collect();
    if roots.is_empty() {
        roots.extend(graph.node_indices().next());
    }

    for root in roots {
        place(graph, root, 0, &mut width_used, &mut visited, &mut positions);
    }

    // Nodes only reachable through cycles.
    for node in graph.node_indices() {
        if !visited.contains(&node) {
            place(graph, node, 0, &mut width_used, &mut visited, &mut positions);
        }
    }

    positions
}

fn place(
    graph: &RepoGraph,
    node: NodeIndex,
    depth: usize,
    width_used: &mut HashMap<usize, usize>,
    visited: &mut HashSet<NodeIndex>,
    positions: &mut HashMap<NodeIndex, Position>,
) {
    if !visited.insert(node) {
        return;
    }

    let column = width_used.entry(depth).or_insert(0);
    positions.insert(
        node,
        Position {
            x: *column as f64,
            y: -(depth as f64),
        },
    );
    *column += 1;

    // petgraph yields the newest edge first; walk children in insertion order.
    let mut children: Vec<NodeIndex> = graph.neighbors_directed(node, Direction::Outgoing).collect();
    children.reverse();
    for child in children {
        place(graph, child, depth + 1, width_used, visited, positions);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphExport {
    pub nodes: Vec<ExportNode>,
    pub edges: Vec<ExportEdge>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportNode {
    pub id: String,
    pub label: String,
    pub node_type: NodeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportEdge {
    pub source: String,
    pub target: String,
    pub edge_type: EdgeType,
}

impl GraphExport {
    pub fn new(graph: &RepoGraph, layout: Option<&HashMap<NodeIndex, Position>>) -> Self {
        let nodes = graph
            .node_indices()
            .map(|index| {
                let node = &graph[index];
                ExportNode {
                    id: node.id.clone(),
                    label: node.label.clone(),
                    node_type: node.node_type,
                    position: layout.and_then(|l| l.get(&index).copied()),
                }
            })
            .collect();

        let edges = graph
            .edge_references()
            .map(|edge| ExportEdge {
                source: graph[edge.source()].id.clone(),
                target: graph[edge.target()].id.clone(),
                edge_type: *edge.weight(),
            })
            .collect();

        Self { nodes, edges }
    }
}

pub fn render_dot(graph: &RepoGraph) -> String {
    format!("{}", Dot::with_config(graph, &[DotConfig::EdgeNoLabel]))
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub avg_degree: f64,
}

impl GraphStats {
    pub fn of(graph: &RepoGraph) -> Self {
        let total_nodes = graph.node_count();
        let total_edges = graph.edge_count();

        Self {
            total_nodes,
            total_edges,
            avg_degree: if total_nodes > 0 {
                total_edges as f64 / total_nodes as f64
            } else {
                0.0
            },
        }
    }
}

/// Write DOT and JSON renderings of both graphs into `output_dir`. The
/// dependency graph is skipped when empty or larger than the configured cap.
pub fn write_visualizations(
    summary: &Summary,
    root: &Path,
    config: &VisualizationConfig,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;
    let mut written = Vec::new();

    let structure = GraphBuilder::new().structure_graph(&summary.structure);
    let layout = hierarchical_layout(&structure);
    written.extend(write_graph(&structure, Some(&layout), output_dir, "repo_structure")?);

    let dependencies = GraphBuilder::new().dependency_graph(&summary.structure, root);
    let stats = GraphStats::of(&dependencies);
    if stats.total_nodes == 0 {
        info!("No dependencies found to visualize");
    } else if stats.total_nodes > config.max_dependency_nodes {
        info!(
            "Too many dependencies to visualize clearly ({} nodes, {} edges, {:.2} average degree)",
            stats.total_nodes, stats.total_edges, stats.avg_degree
        );
    } else {
        written.extend(write_graph(&dependencies, None, output_dir, "dependencies")?);
    }

    Ok(written)
}

fn write_graph(
    graph: &RepoGraph,
    layout: Option<&HashMap<NodeIndex, Position>>,
    output_dir: &Path,
    stem: &str,
) -> Result<Vec<PathBuf>> {
    let dot_path = output_dir.join(format!("{}.dot", stem));
    fs::write(&dot_path, render_dot(graph))?;

    let json_path = output_dir.join(format!("{}.json", stem));
    fs::write(&json_path, serde_json::to_string_pretty(&GraphExport::new(graph, layout))?)?;

    Ok(vec![dot_path, json_path])
}
