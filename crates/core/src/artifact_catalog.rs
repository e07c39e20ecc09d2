//! The plugin artifacts catalog
//!
//! A JSON document listing every runtime file the plugin ships on its own,
//! published next to the distribution so Besu can check the plugin's classpath
//! against its own.

use std::path::{Path, PathBuf};

use besu_dist_protocol::{ArtifactCatalogDocument, ArtifactCatalogEntry};
use tracing::info;

use crate::classifier::ClassificationResult;
use crate::types::{BesuDistError, BesuDistResult};

/// Location of the catalog below the build directory
pub const PLUGIN_ARTIFACTS_CATALOG_RELATIVE_PATH: &str =
    "reports/dependencies/plugin-artifacts-catalog.json";

/// Location of the catalog inside the distribution
pub const PLUGIN_ARTIFACTS_CATALOG_DIST_PATH: &str = "META-INF/plugin-artifacts-catalog.json";

pub fn catalog_path(build_dir: &Path) -> PathBuf {
    build_dir.join(PLUGIN_ARTIFACTS_CATALOG_RELATIVE_PATH)
}

/// One entry per plugin-only file, sorted by group, name, version and file name.
pub fn catalog_document(
    result: &ClassificationResult,
    besu_version: &str,
) -> ArtifactCatalogDocument {
    let mut dependencies: Vec<ArtifactCatalogEntry> = result
        .plugin_only
        .iter()
        .map(|(file, artifact)| ArtifactCatalogEntry {
            group: artifact.coordinate.group.clone(),
            name: artifact.coordinate.name.clone(),
            version: artifact.coordinate.version.clone(),
            filename: file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string()),
        })
        .collect();
    dependencies.sort();

    ArtifactCatalogDocument {
        besu_version: besu_version.to_string(),
        dependencies,
    }
}

pub fn emit(result: &ClassificationResult, besu_version: &str) -> BesuDistResult<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(&catalog_document(result, besu_version))?)
}

/// Write the catalog below `build_dir`, replacing any previous one.
pub fn write(
    result: &ClassificationResult,
    besu_version: &str,
    build_dir: &Path,
) -> BesuDistResult<PathBuf> {
    let path = catalog_path(build_dir);
    let content = emit(result, besu_version)?;

    let write_err = |source| BesuDistError::CatalogWrite {
        path: path.clone(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(&path, content).map_err(write_err)?;

    info!(
        "Wrote {} plugin artifacts to {}",
        result.plugin_only.len(),
        path.display()
    );
    Ok(path)
}
