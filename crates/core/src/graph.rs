//! The plugin project's resolved runtime dependency graph
//!
//! Nodes are identified by their [`NodeIndex`], not by their coordinate: the
//! host may hand over two distinct nodes for the same library.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use besu_dist_protocol::{
    DependencyCoordinate, ModuleId, ResolvedArtifact, ResolvedGraphDocument,
};
use petgraph::prelude::*;

use crate::types::{BesuDistError, BesuDistResult};

/// One resolved module and the files it contributes to the runtime classpath
#[derive(Debug, Clone)]
pub struct ResolvedModule {
    pub coordinate: DependencyCoordinate,
    pub artifacts: Vec<ResolvedArtifact>,
}

impl ResolvedModule {
    pub fn module_id(&self) -> ModuleId {
        self.coordinate.module_id()
    }
}

#[derive(Debug, Default, Clone)]
pub struct ResolvedGraph {
    graph: DiGraph<ResolvedModule, ()>,
    first_level: Vec<NodeIndex>,
}

impl ResolvedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node whose artifacts are `files`, all sharing the node's coordinate.
    pub fn add_node(&mut self, coordinate: DependencyCoordinate, files: Vec<PathBuf>) -> NodeIndex {
        let artifacts = files
            .into_iter()
            .map(|file| ResolvedArtifact {
                coordinate: coordinate.clone(),
                file,
            })
            .collect();
        self.graph.add_node(ResolvedModule {
            coordinate,
            artifacts,
        })
    }

    pub fn add_first_level(&mut self, node: NodeIndex) {
        if !self.first_level.contains(&node) {
            self.first_level.push(node);
        }
    }

    pub fn add_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        self.graph.update_edge(parent, child, ());
    }

    pub fn first_level(&self) -> &[NodeIndex] {
        &self.first_level
    }

    pub fn module(&self, node: NodeIndex) -> &ResolvedModule {
        &self.graph[node]
    }

    pub fn children(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(node)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Visit every node reachable from the first-level dependencies exactly once.
    ///
    /// Uses an explicit stack and a visited set local to the call, so cycles and
    /// deep graphs are both fine.
    pub fn walk(&self, mut visit: impl FnMut(NodeIndex, &ResolvedModule)) {
        let mut visited = HashSet::new();
        let mut stack: Vec<NodeIndex> = self.first_level.iter().rev().copied().collect();

        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }

            visit(node, &self.graph[node]);

            for child in self.graph.neighbors(node) {
                if !visited.contains(&child) {
                    stack.push(child);
                }
            }
        }
    }

    /// Build the graph from the host's JSON export.
    pub fn from_document(document: ResolvedGraphDocument) -> BesuDistResult<Self> {
        let mut graph = Self::new();
        let mut ids = HashMap::new();
        let mut indices = Vec::with_capacity(document.nodes.len());

        for node in &document.nodes {
            let coordinate =
                DependencyCoordinate::new(&node.group, &node.name, &node.version);
            let index = graph.graph.add_node(ResolvedModule {
                artifacts: node
                    .artifacts
                    .iter()
                    .map(|artifact| ResolvedArtifact {
                        coordinate: coordinate.clone().with_classifier(artifact.classifier.clone()),
                        file: artifact.file.clone(),
                    })
                    .collect(),
                coordinate,
            });
            if ids.insert(node.id.as_str(), index).is_some() {
                return Err(BesuDistError::Graph(format!(
                    "Node id '{}' is declared more than once",
                    node.id
                )));
            }
            indices.push(index);
        }

        let lookup = |id: &str, referenced_by: &str| {
            ids.get(id).copied().ok_or_else(|| {
                BesuDistError::Graph(format!(
                    "{} references unknown node '{}'",
                    referenced_by, id
                ))
            })
        };

        for (node, &parent) in document.nodes.iter().zip(&indices) {
            for child in &node.children {
                let child = lookup(child, &format!("Node '{}'", node.id))?;
                graph.add_child(parent, child);
            }
        }

        for id in &document.first_level {
            let node = lookup(id, "firstLevel")?;
            graph.add_first_level(node);
        }

        Ok(graph)
    }

    /// Read a [`ResolvedGraphDocument`] from a JSON file.
    pub fn load(path: &Path) -> BesuDistResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BesuDistError::Graph(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let document: ResolvedGraphDocument = serde_json::from_str(&content)
            .map_err(|e| BesuDistError::parse(path.display().to_string(), e))?;
        Self::from_document(document)
    }
}
