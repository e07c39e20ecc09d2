//! Plugin distribution layout
//!
//! A distribution holds the plugin's own jars, everything under `src/dist`,
//! the runtime files Besu does not already ship and the plugin artifacts
//! catalog. Runtime files land at the root next to the plugin jars.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::artifact_catalog::PLUGIN_ARTIFACTS_CATALOG_DIST_PATH;
use crate::classifier::{ClassificationResult, RuntimeInventory};
use crate::coordinates::CoordinateRemapper;
use crate::types::{BesuDistError, BesuDistResult};

/// Directory of extra distribution content, relative to the project
pub const DIST_SOURCE_DIR: &str = "src/dist";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    PluginJar,
    DistFile,
    RuntimeArtifact,
    Catalog,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionEntry {
    pub kind: EntryKind,
    pub source: PathBuf,
    /// Relative to the distribution root
    pub destination: PathBuf,
}

/// A runtime file left out because Besu already provides it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedArtifact {
    pub file: PathBuf,
    pub coordinate: String,
    pub normalized_coordinate: String,
}

/// Where the pieces of a distribution come from
#[derive(Debug, Clone)]
pub struct DistributionSources<'a> {
    pub plugin_jars: &'a [PathBuf],
    pub dist_dir: &'a Path,
    pub catalog: &'a Path,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DistributionPlan {
    pub entries: Vec<DistributionEntry>,
    pub excluded: Vec<ExcludedArtifact>,
}

impl DistributionPlan {
    pub fn build(
        sources: &DistributionSources<'_>,
        inventory: &RuntimeInventory,
        classification: &ClassificationResult,
        remapper: &CoordinateRemapper,
    ) -> BesuDistResult<Self> {
        let mut plan = Self::default();
        let mut destinations = BTreeMap::new();

        for jar in sources.plugin_jars {
            if !jar.is_file() {
                return Err(BesuDistError::Distribution(format!(
                    "Plugin jar {} does not exist",
                    jar.display()
                )));
            }
            plan.add(&mut destinations, EntryKind::PluginJar, jar, flat(jar)?)?;
        }

        if sources.dist_dir.is_dir() {
            for entry in WalkDir::new(sources.dist_dir).sort_by_file_name() {
                let entry = entry.map_err(|e| {
                    BesuDistError::Distribution(format!(
                        "Failed to read {}: {}",
                        sources.dist_dir.display(),
                        e
                    ))
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let relative = entry
                    .path()
                    .strip_prefix(sources.dist_dir)
                    .map_err(|e| BesuDistError::Distribution(e.to_string()))?
                    .to_path_buf();
                plan.add(&mut destinations, EntryKind::DistFile, entry.path(), relative)?;
            }
        }

        for (file, coordinate) in inventory {
            if classification.is_plugin_only(file) {
                plan.add(&mut destinations, EntryKind::RuntimeArtifact, file, flat(file)?)?;
            } else {
                let normalized_coordinate = remapper.normalize(coordinate);
                debug!(
                    "Excluding runtime artifact {} with coordinates {} ({}), already provided by Besu",
                    file.display(),
                    coordinate,
                    normalized_coordinate
                );
                plan.excluded.push(ExcludedArtifact {
                    file: file.clone(),
                    coordinate: coordinate.clone(),
                    normalized_coordinate,
                });
            }
        }

        plan.add(
            &mut destinations,
            EntryKind::Catalog,
            sources.catalog,
            PathBuf::from(PLUGIN_ARTIFACTS_CATALOG_DIST_PATH),
        )?;

        Ok(plan)
    }

    /// Runtime artifacts must all make it into the distribution, so a clash on
    /// one of them is an error. Other clashes keep the first entry.
    fn add(
        &mut self,
        destinations: &mut BTreeMap<PathBuf, PathBuf>,
        kind: EntryKind,
        source: &Path,
        destination: PathBuf,
    ) -> BesuDistResult<()> {
        if let Some(existing) = destinations.get(&destination) {
            if kind == EntryKind::RuntimeArtifact {
                return Err(BesuDistError::Distribution(format!(
                    "Runtime artifact {} clashes with {} at {}",
                    source.display(),
                    existing.display(),
                    destination.display()
                )));
            }
            warn!(
                "Skipping {}: {} is already part of the distribution",
                source.display(),
                destination.display()
            );
            return Ok(());
        }
        destinations.insert(destination.clone(), source.to_path_buf());
        self.entries.push(DistributionEntry {
            kind,
            source: source.to_path_buf(),
            destination,
        });
        Ok(())
    }

    pub fn entries_of(&self, kind: EntryKind) -> impl Iterator<Item = &DistributionEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    /// Copy the distribution into `target`, removing whatever was there before.
    pub fn install(&self, target: &Path) -> BesuDistResult<()> {
        if target.exists() {
            std::fs::remove_dir_all(target)?;
        }
        std::fs::create_dir_all(target)?;

        for entry in &self.entries {
            let destination = target.join(&entry.destination);
            if let Some(parent) = destination.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(&entry.source, &destination).map_err(|e| {
                BesuDistError::Distribution(format!(
                    "Failed to copy {} to {}: {}",
                    entry.source.display(),
                    destination.display(),
                    e
                ))
            })?;
        }

        info!(
            "Installed {} files into {}",
            self.entries.len(),
            target.display()
        );
        Ok(())
    }
}

pub fn install_dir(build_dir: &Path, name: &str) -> PathBuf {
    build_dir.join("install").join(name)
}

fn flat(file: &Path) -> BesuDistResult<PathBuf> {
    file.file_name().map(PathBuf::from).ok_or_else(|| {
        BesuDistError::Distribution(format!("{} has no file name", file.display()))
    })
}
