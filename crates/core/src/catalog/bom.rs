//! Managed dependencies of the Besu bill of materials

use besu_dist_protocol::DependencyCoordinate;
use serde::Deserialize;

use crate::types::{BesuDistError, BesuDistResult};

#[derive(Debug, Deserialize)]
struct PomDocument {
    #[serde(rename = "dependencyManagement")]
    dependency_management: Option<DependencyManagement>,
}

#[derive(Debug, Deserialize)]
struct DependencyManagement {
    dependencies: Option<ManagedDependencies>,
}

#[derive(Debug, Default, Deserialize)]
struct ManagedDependencies {
    #[serde(default)]
    dependency: Vec<ManagedDependency>,
}

#[derive(Debug, Deserialize)]
struct ManagedDependency {
    #[serde(rename = "groupId")]
    group_id: Option<String>,
    #[serde(rename = "artifactId")]
    artifact_id: Option<String>,
    version: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    classifier: Option<String>,
}

impl ManagedDependency {
    /// Imported BOMs are descriptors, not libraries
    fn is_bom(&self) -> bool {
        self.kind.as_deref().map(str::trim) == Some("pom")
    }

    fn into_coordinate(self, index: usize) -> BesuDistResult<DependencyCoordinate> {
        let container = format!(
            "dependencyManagement/dependencies/dependency[{}]{}",
            index,
            self.artifact_id
                .as_deref()
                .map(|a| format!(" ({})", a.trim()))
                .unwrap_or_default()
        );
        let required = |value: Option<String>, element: &str| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| BesuDistError::missing(element, container.clone()))
        };

        let group = required(self.group_id, "groupId")?;
        let name = required(self.artifact_id, "artifactId")?;
        let version = required(self.version, "version")?;
        let classifier = self
            .classifier
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(DependencyCoordinate::new(group, name, version).with_classifier(classifier))
    }
}

/// Parse every managed dependency of a BOM, skipping nested BOM imports.
pub fn parse_bom(xml: &str, document: &str) -> BesuDistResult<Vec<DependencyCoordinate>> {
    let pom: PomDocument =
        quick_xml::de::from_str(xml).map_err(|e| BesuDistError::parse(document, e))?;

    let dependency_management = pom
        .dependency_management
        .ok_or_else(|| BesuDistError::missing("dependencyManagement", "project"))?;
    let dependencies = dependency_management
        .dependencies
        .ok_or_else(|| BesuDistError::missing("dependencies", "dependencyManagement"))?;

    dependencies
        .dependency
        .into_iter()
        .enumerate()
        .filter(|(_, dependency)| !dependency.is_bom())
        .map(|(index, dependency)| dependency.into_coordinate(index))
        .collect()
}
