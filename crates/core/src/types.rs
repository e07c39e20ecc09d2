use std::path::PathBuf;

use thiserror::Error;

/// The main error type for besu-dist operations
#[derive(Debug, Error)]
pub enum BesuDistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The coordinate mapping table could not be loaded
    #[error("Initialization error: {0}")]
    Initialization(String),

    #[error("Could not resolve {coordinate}: {details}")]
    Resolution { coordinate: String, details: String },

    #[error("Failed to parse {document}: {details}")]
    Parse { document: String, details: String },

    #[error("Element '{element}' not found in '{container}'")]
    MissingElement { element: String, container: String },

    #[error("Unable to write plugin artifacts catalog to file {}: {source}", path.display())]
    CatalogWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dependency graph error: {0}")]
    Graph(String),

    #[error("Distribution error: {0}")]
    Distribution(String),
}

impl BesuDistError {
    pub(crate) fn parse(document: impl Into<String>, details: impl ToString) -> Self {
        Self::Parse {
            document: document.into(),
            details: details.to_string(),
        }
    }

    pub(crate) fn missing(element: impl Into<String>, container: impl Into<String>) -> Self {
        Self::MissingElement {
            element: element.into(),
            container: container.into(),
        }
    }
}

/// Result type alias for besu-dist operations
pub type BesuDistResult<T> = Result<T, BesuDistError>;
