//! Besu Dist Core Library
//!
//! This is the core library for the `besu-dist` plugin build tool. It reconciles
//! a Besu plugin's dependencies with the libraries a given Besu release already
//! ships, and assembles a plugin distribution that carries only what Besu does
//! not provide.
//!
//! ## Architecture
//!
//! The core library is organized into several modules:
//!
//! - [`project_manager`] - High-level plugin project interface
//! - [`coordinates`] - Old-to-new Besu artifact coordinates
//! - [`repository`] - Maven repositories and the artifact download cache
//! - [`catalog`] - Besu BOM and provided-artifacts catalog loading
//! - [`merge`] - Union of the BOM and the provided catalog
//! - [`declarations`] - Dependency declarations for the plugin's build
//! - [`graph`] - The plugin's resolved runtime dependency graph
//! - [`classifier`] - Provided vs. plugin-only runtime artifacts
//! - [`artifact_catalog`] - The generated plugin artifacts catalog
//! - [`distribution`] - Distribution layout and installation
//! - [`configs`] - `besu-plugin.yml` parsing and effective settings
//! - [`results`] - Result types for project operations
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
//!
//! The primary entry point is the [`PluginProjectManager`]:
//!
//! ```rust,no_run
//! use besu_dist_core::configs::project::ConfigOverrides;
//! use besu_dist_core::graph::ResolvedGraph;
//! use besu_dist_core::project_manager::{PluginProjectManager, PluginProjectManagerConfig};
//! use std::path::{Path, PathBuf};
//!
//! # async fn example() -> besu_dist_core::types::BesuDistResult<()> {
//! let mut manager = PluginProjectManager::new(PluginProjectManagerConfig {
//!     project_dir: PathBuf::from("."),
//!     overrides: ConfigOverrides::default(),
//! })?;
//!
//! let graph = ResolvedGraph::load(Path::new("build/runtime-graph.json"))?;
//! let collected = manager.collect(&graph).await?;
//! println!("catalog written to {}", collected.catalog_path.display());
//! # Ok(())
//! # }
//! ```

pub mod artifact_catalog;
pub mod catalog;
pub mod classifier;
pub mod configs;
pub mod coordinates;
pub mod declarations;
pub mod distribution;
pub mod graph;
pub mod merge;
pub mod project_manager;
pub mod repository;
pub mod results;
pub mod types;

// Re-export the main types for easier usage
pub use types::{BesuDistError, BesuDistResult};
pub use project_manager::{PluginProjectManager, PluginProjectManagerConfig};
