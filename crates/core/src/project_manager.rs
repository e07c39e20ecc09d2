//! High-level plugin project interface
//!
//! This module provides the [`PluginProjectManager`] which serves as the primary
//! interface for all operations on one Besu plugin project. It owns the
//! project's [`PluginBuildContext`]: the effective settings, the coordinate
//! remapper, the artifact repositories and, once loaded, the Besu catalogs.
//!
//! ## Example
//!
//! ```rust,no_run
//! use besu_dist_core::project_manager::{PluginProjectManager, PluginProjectManagerConfig};
//! use besu_dist_core::configs::project::ConfigOverrides;
//! use std::path::PathBuf;
//!
//! # async fn example() -> besu_dist_core::types::BesuDistResult<()> {
//! let mut manager = PluginProjectManager::new(PluginProjectManagerConfig {
//!     project_dir: PathBuf::from("."),
//!     overrides: ConfigOverrides::default().with_env_fallback(),
//! })?;
//!
//! let dependencies = manager.dependencies().await?;
//! println!("{} dependencies pinned", dependencies.merged.len());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use besu_dist_protocol::{DependencyCoordinate, DependencyHandler, ProvidedDependency};
use tracing::{debug, info};

use crate::artifact_catalog;
use crate::catalog::CatalogLoader;
use crate::classifier::{inventory, RuntimeClasspathClassifier};
use crate::configs::project::{load_project_config, ConfigOverrides, ProjectSettings};
use crate::coordinates::CoordinateRemapper;
use crate::declarations::DependencyPlan;
use crate::distribution::{install_dir, DistributionPlan, DistributionSources, DIST_SOURCE_DIR};
use crate::graph::ResolvedGraph;
use crate::merge::merge_dependencies;
use crate::repository::ArtifactRepositories;
use crate::results::{CollectResult, DependenciesResult, DistResult};
use crate::types::BesuDistResult;

/// What a Besu release publishes about its dependencies
#[derive(Debug, Clone)]
pub struct BesuCatalogs {
    pub bom: Vec<DependencyCoordinate>,
    pub provided: Vec<ProvidedDependency>,
    pub merged: Vec<DependencyCoordinate>,
}

/// Per-project state shared by every operation
pub struct PluginBuildContext {
    pub settings: ProjectSettings,
    pub remapper: CoordinateRemapper,
    pub repositories: ArtifactRepositories,
    catalogs: Option<BesuCatalogs>,
}

impl PluginBuildContext {
    pub fn new(settings: ProjectSettings) -> BesuDistResult<Self> {
        let remapper = match &settings.coordinates_mapping {
            Some(path) => CoordinateRemapper::from_file(path)?,
            None => CoordinateRemapper::bundled()?,
        };
        debug!("Loaded {} old Besu coordinates", remapper.len());

        let repositories = ArtifactRepositories::for_project(&settings);

        Ok(Self {
            settings,
            remapper,
            repositories,
            catalogs: None,
        })
    }

    /// Catalogs loaded so far, if any
    pub fn catalogs(&self) -> Option<&BesuCatalogs> {
        self.catalogs.as_ref()
    }
}

/// Configuration for initializing a plugin project manager
pub struct PluginProjectManagerConfig {
    pub project_dir: PathBuf,
    pub overrides: ConfigOverrides,
}

/// High-level manager that encapsulates all operations on a plugin project
pub struct PluginProjectManager {
    pub context: PluginBuildContext,
}

impl PluginProjectManager {
    /// Load `besu-plugin.yml`, apply overrides and set up the build context
    pub fn new(config: PluginProjectManagerConfig) -> BesuDistResult<Self> {
        let project_config = load_project_config(&config.project_dir)?;
        let settings =
            ProjectSettings::resolve(&config.project_dir, project_config, &config.overrides)?;

        info!(
            "Plugin project '{}' targets Besu {}",
            settings.name, settings.besu_version
        );

        Ok(Self {
            context: PluginBuildContext::new(settings)?,
        })
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.context.settings
    }

    /// Download cache of a project, usable without a configured Besu version
    pub fn artifact_cache(project_dir: &Path) -> BesuDistResult<ArtifactRepositories> {
        let config = load_project_config(project_dir)?;
        Ok(ArtifactRepositories::new(
            Vec::new(),
            ArtifactRepositories::cache_dir_for(&config.build_dir_in(project_dir)),
        ))
    }

    /// Load the BOM and the provided catalog once and merge them
    pub async fn catalogs(&mut self) -> BesuDistResult<&BesuCatalogs> {
        let catalogs = match self.context.catalogs.take() {
            Some(catalogs) => catalogs,
            None => self.load_catalogs().await?,
        };
        let catalogs: &BesuCatalogs = self.context.catalogs.insert(catalogs);
        Ok(catalogs)
    }

    async fn load_catalogs(&self) -> BesuDistResult<BesuCatalogs> {
        let besu_version = &self.context.settings.besu_version;
        let loader = CatalogLoader::new(&self.context.repositories);

        let bom = loader.load_bom(besu_version).await?;
        let provided = loader.load_provided_catalog(besu_version).await?;
        let merged = merge_dependencies(&bom, &provided, &self.context.remapper);
        info!(
            "Merged {} BOM entries and {} provided entries into {} dependencies",
            bom.len(),
            provided.len(),
            merged.len()
        );

        Ok(BesuCatalogs {
            bom,
            provided,
            merged,
        })
    }

    /// Declarations the plugin project receives for its Besu version
    pub async fn dependencies(&mut self) -> BesuDistResult<DependenciesResult> {
        let catalogs = self.catalogs().await?.clone();
        let settings = &self.context.settings;

        let plan = DependencyPlan::build(
            &settings.besu_version,
            &catalogs.merged,
            &settings.annotation_processors,
            &self.context.remapper,
        );

        Ok(DependenciesResult {
            besu_version: settings.besu_version.clone(),
            bom_count: catalogs.bom.len(),
            provided_count: catalogs.provided.len(),
            merged: catalogs.merged,
            plan,
        })
    }

    /// Hand the declaration plan to a host build
    pub async fn declare(
        &mut self,
        handler: &mut dyn DependencyHandler,
    ) -> BesuDistResult<DependencyPlan> {
        let result = self.dependencies().await?;
        result.plan.apply(handler);
        Ok(result.plan)
    }

    /// Classify the runtime classpath and write the plugin artifacts catalog
    pub async fn collect(&mut self, graph: &ResolvedGraph) -> BesuDistResult<CollectResult> {
        let provided = self.catalogs().await?.provided.clone();
        let settings = &self.context.settings;

        let classification =
            RuntimeClasspathClassifier::new(&self.context.remapper, &provided).classify(graph);
        let catalog_path =
            artifact_catalog::write(&classification, &settings.besu_version, &settings.build_dir)?;

        Ok(CollectResult {
            besu_version: settings.besu_version.clone(),
            catalog_path,
            runtime_files: inventory(graph).len(),
            classification,
        })
    }

    /// Collect, then lay out the distribution and optionally install it
    pub async fn dist(
        &mut self,
        graph: &ResolvedGraph,
        plugin_jars: &[PathBuf],
        install: bool,
    ) -> BesuDistResult<DistResult> {
        let collect = self.collect(graph).await?;
        let settings = &self.context.settings;

        let dist_dir = settings.project_dir.join(DIST_SOURCE_DIR);
        let plan = DistributionPlan::build(
            &DistributionSources {
                plugin_jars,
                dist_dir: &dist_dir,
                catalog: &collect.catalog_path,
            },
            &inventory(graph),
            &collect.classification,
            &self.context.remapper,
        )?;

        let installed = if install {
            let target = install_dir(&settings.build_dir, &settings.name);
            plan.install(&target)?;
            Some(target)
        } else {
            None
        };

        Ok(DistResult {
            collect,
            plan,
            install_dir: installed,
        })
    }
}
