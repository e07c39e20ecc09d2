//! Runtime dependencies the Besu application ships, read from inside its main jar

use std::fs::File;
use std::io::Read;
use std::path::Path;

use besu_dist_protocol::{ProvidedCatalogEntry, ProvidedDependency};

use crate::types::{BesuDistError, BesuDistResult};

pub const BESU_ARTIFACTS_CATALOG_ENTRY: &str = "META-INF/besu-artifacts-catalog.json";

/// Extract and parse the artifacts catalog embedded in `jar`.
pub fn read_provided_catalog(jar: &Path) -> BesuDistResult<Vec<ProvidedDependency>> {
    let document = format!("{}!/{}", jar.display(), BESU_ARTIFACTS_CATALOG_ENTRY);

    let file = File::open(jar)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| BesuDistError::parse(jar.display().to_string(), e))?;

    let mut entry = match archive.by_name(BESU_ARTIFACTS_CATALOG_ENTRY) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(BesuDistError::missing(
                BESU_ARTIFACTS_CATALOG_ENTRY,
                jar.display().to_string(),
            ))
        }
        Err(e) => return Err(BesuDistError::parse(document, e)),
    };

    let mut content = String::new();
    entry
        .read_to_string(&mut content)
        .map_err(|e| BesuDistError::parse(document.clone(), e))?;

    parse_provided_catalog(&content, &document)
}

pub fn parse_provided_catalog(
    json: &str,
    document: &str,
) -> BesuDistResult<Vec<ProvidedDependency>> {
    let entries: Vec<ProvidedCatalogEntry> =
        serde_json::from_str(json).map_err(|e| BesuDistError::parse(document, e))?;
    Ok(entries.into_iter().map(ProvidedDependency::from).collect())
}
