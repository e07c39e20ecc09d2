//! Catalog loading
//!
//! Resolves the two documents a Besu release publishes about its dependencies:
//! the bill of materials and the catalog of artifacts bundled in the application.

pub mod bom;
pub mod provided;

use besu_dist_protocol::{ArtifactRequest, DependencyCoordinate, ProvidedDependency};
use tracing::info;

use crate::repository::ArtifactRepositories;
use crate::types::{BesuDistError, BesuDistResult};

pub const BESU_BOM_GROUP: &str = "org.hyperledger.besu";
pub const BESU_BOM_NAME: &str = "bom";
pub const BESU_APP_GROUP: &str = "org.hyperledger.besu.internal";
pub const BESU_APP_NAME: &str = "besu-app";

pub fn bom_coordinate(besu_version: &str) -> DependencyCoordinate {
    DependencyCoordinate::new(BESU_BOM_GROUP, BESU_BOM_NAME, besu_version)
}

pub fn app_coordinate(besu_version: &str) -> DependencyCoordinate {
    DependencyCoordinate::new(BESU_APP_GROUP, BESU_APP_NAME, besu_version)
}

pub struct CatalogLoader<'a> {
    repositories: &'a ArtifactRepositories,
}

impl<'a> CatalogLoader<'a> {
    pub fn new(repositories: &'a ArtifactRepositories) -> Self {
        Self { repositories }
    }

    /// Managed dependencies of `org.hyperledger.besu:bom:<version>`
    pub async fn load_bom(&self, besu_version: &str) -> BesuDistResult<Vec<DependencyCoordinate>> {
        let request = ArtifactRequest::new(bom_coordinate(besu_version), "pom");
        let path = self.repositories.resolve(&request).await?;

        let xml = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| BesuDistError::parse(path.display().to_string(), e))?;
        let dependencies = bom::parse_bom(&xml, &path.display().to_string())?;

        info!(
            "Loaded {} managed dependencies from {}",
            dependencies.len(),
            request
        );
        Ok(dependencies)
    }

    /// Dependencies bundled with `org.hyperledger.besu.internal:besu-app:<version>`
    pub async fn load_provided_catalog(
        &self,
        besu_version: &str,
    ) -> BesuDistResult<Vec<ProvidedDependency>> {
        let request = ArtifactRequest::new(app_coordinate(besu_version), "jar");
        let jar = self.repositories.resolve(&request).await?;

        // Zip reading is blocking
        let provided = tokio::task::spawn_blocking(move || provided::read_provided_catalog(&jar))
            .await
            .map_err(|e| BesuDistError::Resolution {
                coordinate: request.to_string(),
                details: e.to_string(),
            })??;

        info!(
            "Loaded {} provided dependencies from {}",
            provided.len(),
            request
        );
        Ok(provided)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Repository;
    use std::path::Path;

    fn repository_with(root: &Path) -> ArtifactRepositories {
        ArtifactRepositories::new(
            vec![Repository::new(root.display().to_string())],
            root.join("cache"),
        )
    }

    #[tokio::test]
    async fn test_unresolvable_bom_names_coordinate() {
        let dir = tempfile::tempdir().unwrap();
        let repositories = repository_with(dir.path());
        let err = CatalogLoader::new(&repositories)
            .load_bom("99.0.0")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("org.hyperledger.besu:bom:99.0.0@pom"));
    }

    #[tokio::test]
    async fn test_load_provided_catalog_from_repository() {
        let dir = tempfile::tempdir().unwrap();
        let request = ArtifactRequest::new(app_coordinate("24.1.0"), "jar");
        let jar = dir.path().join(request.repository_path());
        std::fs::create_dir_all(jar.parent().unwrap()).unwrap();
        provided::tests::write_jar(
            &jar,
            &[(
                provided::BESU_ARTIFACTS_CATALOG_ENTRY,
                r#"[{"group":"g","name":"n","version":"1","filename":"n-1.jar"}]"#,
            )],
        );

        let repositories = repository_with(dir.path());
        let provided = CatalogLoader::new(&repositories)
            .load_provided_catalog("24.1.0")
            .await
            .unwrap();
        assert_eq!(provided.len(), 1);
        assert_eq!(provided[0].filename, "n-1.jar");
    }
}
