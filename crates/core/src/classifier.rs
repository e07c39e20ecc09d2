//! Runtime classpath classification
//!
//! Splits the plugin's resolved runtime graph into the modules Besu already
//! ships and the ones the plugin has to bring along. Only the latter end up in
//! the distribution and the generated artifact catalog.

use std::collections::BTreeMap;
use std::path::PathBuf;

use besu_dist_protocol::{DependencyCoordinate, ModuleId, ProvidedDependency};
use petgraph::graph::NodeIndex;
use tracing::{debug, info};

use crate::coordinates::CoordinateRemapper;
use crate::graph::{ResolvedGraph, ResolvedModule};

/// Why a module was or was not kept on the plugin's classpath
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Pre-rename coordinate of a module Besu ships under its new name
    OldCoordinate,
    /// Matched a provided catalog entry
    Provided(ModuleId),
    PluginOnly,
}

impl Classification {
    pub fn is_provided(&self) -> bool {
        !matches!(self, Classification::PluginOnly)
    }
}

/// A runtime file that only the plugin provides, with the node it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginOnlyArtifact {
    pub node: NodeIndex,
    pub coordinate: DependencyCoordinate,
}

/// Plugin-only runtime files keyed by path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationResult {
    pub plugin_only: BTreeMap<PathBuf, PluginOnlyArtifact>,
    pub provided_nodes: usize,
}

impl ClassificationResult {
    pub fn is_plugin_only(&self, file: &std::path::Path) -> bool {
        self.plugin_only.contains_key(file)
    }

    pub fn len(&self) -> usize {
        self.plugin_only.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugin_only.is_empty()
    }
}

/// Every runtime file of the graph with its `group:name:version`
pub type RuntimeInventory = BTreeMap<PathBuf, String>;

pub struct RuntimeClasspathClassifier<'a> {
    remapper: &'a CoordinateRemapper,
    provided: &'a [ProvidedDependency],
}

impl<'a> RuntimeClasspathClassifier<'a> {
    pub fn new(remapper: &'a CoordinateRemapper, provided: &'a [ProvidedDependency]) -> Self {
        Self { remapper, provided }
    }

    /// Decide whether `module` is already on Besu's classpath.
    ///
    /// A module counts as provided when its id is a prefix of a provided
    /// entry's id: `com.example:foo` is covered by `com.example:foo-extras`,
    /// while `com.example:foobar` is not covered by `com.example:foo`.
    pub fn classify_module(&self, module: &ModuleId) -> Classification {
        if self.remapper.is_old_module(module) {
            return Classification::OldCoordinate;
        }

        self.provided
            .iter()
            .map(|dependency| dependency.coordinate.module_id())
            .find(|provided| provided.as_str().starts_with(module.as_str()))
            .map(Classification::Provided)
            .unwrap_or(Classification::PluginOnly)
    }

    pub fn classify(&self, graph: &ResolvedGraph) -> ClassificationResult {
        info!("Collecting plugin-only runtime artifacts");

        let mut result = ClassificationResult::default();
        graph.walk(|node, module| match self.classify_module(&module.module_id()) {
            Classification::OldCoordinate => {
                debug!("{} is an old Besu coordinate, skipping", module.coordinate);
                result.provided_nodes += 1;
            }
            Classification::Provided(by) => {
                debug!("{} is provided by Besu ({})", module.coordinate, by);
                result.provided_nodes += 1;
            }
            Classification::PluginOnly => record_plugin_only(&mut result, node, module),
        });

        info!(
            "Found {} plugin-only runtime artifacts ({} modules provided by Besu)",
            result.plugin_only.len(),
            result.provided_nodes
        );
        result
    }
}

fn record_plugin_only(result: &mut ClassificationResult, node: NodeIndex, module: &ResolvedModule) {
    let coordinate = DependencyCoordinate::new(
        &module.coordinate.group,
        &module.coordinate.name,
        &module.coordinate.version,
    );

    for artifact in &module.artifacts {
        debug!(
            "{} is plugin-only, keeping {}",
            module.coordinate,
            artifact.file.display()
        );
        result.plugin_only.insert(
            artifact.file.clone(),
            PluginOnlyArtifact {
                node,
                coordinate: coordinate.clone(),
            },
        );
    }
}

/// All runtime files reachable in `graph`, regardless of classification.
pub fn inventory(graph: &ResolvedGraph) -> RuntimeInventory {
    let mut inventory = RuntimeInventory::new();
    graph.walk(|_, module| {
        let coordinate = format!(
            "{}:{}:{}",
            module.coordinate.group, module.coordinate.name, module.coordinate.version
        );
        for artifact in &module.artifacts {
            inventory.insert(artifact.file.clone(), coordinate.clone());
        }
    });
    inventory
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provided(group: &str, name: &str) -> ProvidedDependency {
        ProvidedDependency {
            coordinate: DependencyCoordinate::new(group, name, "1.0"),
            filename: format!("{}-1.0.jar", name),
        }
    }

    fn remapper() -> CoordinateRemapper {
        CoordinateRemapper::parse(
            "org.hyperledger.besu.internal:besu-ethereum-core org.hyperledger.besu.internal:core\n",
            "test",
        )
        .unwrap()
    }

    fn jar(name: &str) -> PathBuf {
        PathBuf::from(format!("/repo/{}.jar", name))
    }

    #[test]
    fn test_prefix_match_counts_as_provided() {
        let remapper = remapper();
        let provided = vec![provided("com.example", "foo-extras")];
        let classifier = RuntimeClasspathClassifier::new(&remapper, &provided);

        assert_eq!(
            classifier.classify_module(&ModuleId::new("com.example", "foo")),
            Classification::Provided(ModuleId::new("com.example", "foo-extras"))
        );
    }

    #[test]
    fn test_longer_name_is_not_provided_by_shorter_entry() {
        let remapper = remapper();
        let provided = vec![provided("com.example", "foo")];
        let classifier = RuntimeClasspathClassifier::new(&remapper, &provided);

        assert_eq!(
            classifier.classify_module(&ModuleId::new("com.example", "foobar")),
            Classification::PluginOnly
        );
    }

    #[test]
    fn test_old_coordinate_is_always_provided() {
        let remapper = remapper();
        let classifier = RuntimeClasspathClassifier::new(&remapper, &[]);

        let mut graph = ResolvedGraph::new();
        let old = graph.add_node(
            DependencyCoordinate::new("org.hyperledger.besu.internal", "core", "23.1.0"),
            vec![jar("core-23.1.0")],
        );
        graph.add_first_level(old);

        let result = classifier.classify(&graph);
        assert!(result.is_empty());
        assert_eq!(result.provided_nodes, 1);
    }

    #[test]
    fn test_shared_transitive_node_visited_once() {
        let remapper = remapper();
        let classifier = RuntimeClasspathClassifier::new(&remapper, &[]);

        let mut graph = ResolvedGraph::new();
        let a = graph.add_node(DependencyCoordinate::new("g", "a", "1"), vec![jar("a")]);
        let b = graph.add_node(DependencyCoordinate::new("g", "b", "1"), vec![jar("b")]);
        let shared = graph.add_node(
            DependencyCoordinate::new("g", "shared", "1"),
            vec![jar("shared")],
        );
        graph.add_child(a, shared);
        graph.add_child(b, shared);
        graph.add_first_level(a);
        graph.add_first_level(b);

        let result = classifier.classify(&graph);
        assert_eq!(result.len(), 3);
        assert_eq!(result.plugin_only[&jar("shared")].node, shared);

        let mut visits = 0;
        graph.walk(|node, _| {
            if node == shared {
                visits += 1;
            }
        });
        assert_eq!(visits, 1);
    }

    #[test]
    fn test_children_of_provided_nodes_are_still_walked() {
        let remapper = remapper();
        let provided = vec![provided("io.vertx", "vertx-core")];
        let classifier = RuntimeClasspathClassifier::new(&remapper, &provided);

        let mut graph = ResolvedGraph::new();
        let vertx = graph.add_node(
            DependencyCoordinate::new("io.vertx", "vertx-core", "4.5.0"),
            vec![jar("vertx-core")],
        );
        let extra = graph.add_node(
            DependencyCoordinate::new("com.acme", "extra", "2.0"),
            vec![jar("extra")],
        );
        graph.add_child(vertx, extra);
        graph.add_first_level(vertx);

        let result = classifier.classify(&graph);
        assert_eq!(result.plugin_only.keys().collect::<Vec<_>>(), vec![&jar("extra")]);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let remapper = remapper();
        let provided = vec![provided("g", "b")];
        let classifier = RuntimeClasspathClassifier::new(&remapper, &provided);

        let mut graph = ResolvedGraph::new();
        let a = graph.add_node(DependencyCoordinate::new("g", "a", "1"), vec![jar("a")]);
        let b = graph.add_node(DependencyCoordinate::new("g", "b", "1"), vec![jar("b")]);
        let c = graph.add_node(DependencyCoordinate::new("g", "c", "1"), vec![jar("c")]);
        graph.add_child(a, b);
        graph.add_child(b, c);
        graph.add_child(c, a);
        graph.add_first_level(a);

        let first = classifier.classify(&graph);
        let second = classifier.classify(&graph);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_all_files_of_a_node_share_its_coordinate() {
        let remapper = remapper();
        let classifier = RuntimeClasspathClassifier::new(&remapper, &[]);

        let mut graph = ResolvedGraph::new();
        let node = graph.add_node(
            DependencyCoordinate::new("io.netty", "netty-tcnative", "2.0"),
            vec![jar("netty-tcnative"), jar("netty-tcnative-linux")],
        );
        graph.add_first_level(node);

        let result = classifier.classify(&graph);
        assert_eq!(result.len(), 2);
        assert!(result
            .plugin_only
            .values()
            .all(|artifact| artifact.coordinate.to_string() == "io.netty:netty-tcnative:2.0"));
    }

    #[test]
    fn test_inventory_covers_provided_nodes() {
        let mut graph = ResolvedGraph::new();
        let a = graph.add_node(DependencyCoordinate::new("g", "a", "1"), vec![jar("a")]);
        let b = graph.add_node(DependencyCoordinate::new("g", "b", "2"), vec![jar("b")]);
        graph.add_child(a, b);
        graph.add_first_level(a);

        let inventory = inventory(&graph);
        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory[&jar("b")], "g:b:2");
    }
}
