//! Wire documents exchanged with the host application and the host build tool.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::{DependencyCoordinate, ProvidedDependency};

/// One entry of the host's `META-INF/besu-artifacts-catalog.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidedCatalogEntry {
    pub group: String,
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    pub filename: String,
}

impl From<ProvidedCatalogEntry> for ProvidedDependency {
    fn from(entry: ProvidedCatalogEntry) -> Self {
        Self {
            coordinate: DependencyCoordinate::new(entry.group, entry.name, entry.version)
                .with_classifier(entry.classifier),
            filename: entry.filename,
        }
    }
}

/// The generated catalog of plugin-only runtime artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactCatalogDocument {
    pub besu_version: String,
    pub dependencies: Vec<ArtifactCatalogEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtifactCatalogEntry {
    pub group: String,
    pub name: String,
    pub version: String,
    pub filename: String,
}

/// The plugin project's resolved runtime graph as exported by the host build tool.
///
/// Node ids are opaque and only need to be unique within one document. Two nodes
/// may carry the same coordinate; they are still distinct nodes.
///
/// ```rust
/// # use besu_dist_protocol::ResolvedGraphDocument;
/// let doc: ResolvedGraphDocument = serde_json::from_str(r#"{
///     "firstLevel": ["a"],
///     "nodes": [
///         { "id": "a", "group": "g", "name": "a", "version": "1",
///           "artifacts": [{ "file": "/repo/a-1.jar" }], "children": [] }
///     ]
/// }"#).unwrap();
/// assert_eq!(doc.nodes.len(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedGraphDocument {
    pub first_level: Vec<String>,
    #[serde(default)]
    pub nodes: Vec<ResolvedNodeMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedNodeMessage {
    pub id: String,
    pub group: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub artifacts: Vec<ResolvedArtifactMessage>,
    #[serde(default)]
    pub children: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedArtifactMessage {
    pub file: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
}
