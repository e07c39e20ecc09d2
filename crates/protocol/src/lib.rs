//! Data model shared between the besu-dist engine and the host build tool.
//!
//! - [`types`] - Coordinates, provided dependencies, resolved artifacts and declarations
//! - [`message`] - JSON documents: the host's provided catalog, the exported runtime
//!   graph and the generated plugin artifact catalog
//! - [`traits`] - The dependency declaration seam implemented by the host

pub mod message;
pub mod traits;
pub mod types;

pub use message::{
    ArtifactCatalogDocument, ArtifactCatalogEntry, ProvidedCatalogEntry, ResolvedArtifactMessage,
    ResolvedGraphDocument, ResolvedNodeMessage,
};
pub use traits::DependencyHandler;
pub use types::{
    configurations, ArtifactRequest, DependencyCoordinate, DependencyNotation, ModuleId,
    ProvidedDependency, ResolvedArtifact,
};
