//! Result types for plugin project operations
//!
//! Everything the manager hands back to the command line lives here, so the
//! CLI only has to deal with presentation.

use std::path::PathBuf;

use besu_dist_protocol::DependencyCoordinate;
use serde::Serialize;

use crate::classifier::ClassificationResult;
use crate::declarations::DependencyPlan;
use crate::distribution::DistributionPlan;

/// Outcome of reconciling the plugin's dependencies with a Besu release
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependenciesResult {
    pub besu_version: String,
    pub bom_count: usize,
    pub provided_count: usize,
    pub merged: Vec<DependencyCoordinate>,
    pub plan: DependencyPlan,
}

/// Outcome of classifying the runtime classpath and writing the catalog
#[derive(Debug, Clone)]
pub struct CollectResult {
    pub besu_version: String,
    pub catalog_path: PathBuf,
    pub runtime_files: usize,
    pub classification: ClassificationResult,
}

#[derive(Debug, Clone)]
pub struct DistResult {
    pub collect: CollectResult,
    pub plan: DistributionPlan,
    /// Set when the distribution was installed
    pub install_dir: Option<PathBuf>,
}
