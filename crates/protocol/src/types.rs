//! Core types shared with the host build tool.
//!
//! - [`DependencyCoordinate`] - A library identity with its version and optional classifier
//! - [`ModuleId`] - The `group:name` key used for every matching decision
//! - [`ProvidedDependency`] - A library the host application ships at runtime
//! - [`ResolvedArtifact`] - One physical file produced by the host's resolver
//! - [`DependencyNotation`] - How a coordinate is declared on a host configuration
//! - [`ArtifactRequest`] - A detached single-artifact resolution request

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Host configuration names the declaration plan targets.
pub mod configurations {
    pub const ANNOTATION_PROCESSOR: &str = "annotationProcessor";
    pub const IMPLEMENTATION: &str = "implementation";
    pub const TEST_IMPLEMENTATION: &str = "testImplementation";
    pub const COMPILE_ONLY: &str = "compileOnly";
    pub const TEST_COMPILE_ONLY: &str = "testCompileOnly";
    pub const RUNTIME_ONLY: &str = "runtimeOnly";

    /// Every configuration that receives the enforced platform import.
    pub const PLATFORM_TARGETS: [&str; 6] = [
        ANNOTATION_PROCESSOR,
        IMPLEMENTATION,
        TEST_IMPLEMENTATION,
        COMPILE_ONLY,
        TEST_COMPILE_ONLY,
        RUNTIME_ONLY,
    ];
}

/// A dependency identity as used by the Maven ecosystem.
///
/// Only `group` and `name` take part in matching; `version` and `classifier`
/// are carried along so declarations and catalogs can be rendered exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyCoordinate {
    pub group: String,
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
}

impl DependencyCoordinate {
    #[must_use]
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
            classifier: None,
        }
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: Option<String>) -> Self {
        self.classifier = classifier;
        self
    }

    /// The `group:name` identity of this coordinate.
    #[must_use]
    pub fn module_id(&self) -> ModuleId {
        ModuleId::new(&self.group, &self.name)
    }
}

impl fmt::Display for DependencyCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{}", classifier)?;
        }
        Ok(())
    }
}

/// The `group:name` form of a coordinate.
///
/// ```rust
/// # use besu_dist_protocol::ModuleId;
/// let id = ModuleId::parse("org.example:lib").unwrap();
/// assert_eq!(id.group(), "org.example");
/// assert_eq!(id.name(), "lib");
///
/// assert!(ModuleId::parse("no-separator").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    #[must_use]
    pub fn new(group: &str, name: &str) -> Self {
        Self(format!("{}:{}", group, name))
    }

    /// Parse a `group:name` string.
    ///
    /// # Errors
    ///
    /// Returns an error if either part is empty or the separator is missing.
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.split_once(':') {
            Some((group, name)) if !group.is_empty() && !name.is_empty() => {
                Ok(Self(value.to_string()))
            }
            _ => Err(format!(
                "Coordinate '{}' is not in 'group:name' form",
                value
            )),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn group(&self) -> &str {
        self.0.split_once(':').map_or(self.0.as_str(), |(g, _)| g)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.0.split_once(':').map_or("", |(_, n)| n)
    }
}

impl AsRef<str> for ModuleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A dependency the host application bundles, with the file name it is packaged under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidedDependency {
    pub coordinate: DependencyCoordinate,
    pub filename: String,
}

impl fmt::Display for ProvidedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.coordinate, self.filename)
    }
}

/// One file on disk for one resolved node of the runtime graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedArtifact {
    pub coordinate: DependencyCoordinate,
    pub file: PathBuf,
}

/// A dependency declaration handed to the host's dependency API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "coordinate", rename_all = "camelCase")]
pub enum DependencyNotation {
    /// Pinned with strict semantics: nothing else in the graph may override the version.
    Strict(DependencyCoordinate),
    /// A bill of materials imported as an enforced platform.
    EnforcedPlatform(DependencyCoordinate),
}

impl fmt::Display for DependencyNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict(c) => {
                write!(f, "{}:{}:{}!!", c.group, c.name, c.version)?;
                if let Some(classifier) = &c.classifier {
                    write!(f, ":{}", classifier)?;
                }
                Ok(())
            }
            Self::EnforcedPlatform(c) => write!(f, "enforcedPlatform({})", c),
        }
    }
}

/// A request for a single artifact, e.g. `group:name:version@pom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactRequest {
    pub coordinate: DependencyCoordinate,
    pub extension: String,
}

impl ArtifactRequest {
    #[must_use]
    pub fn new(coordinate: DependencyCoordinate, extension: impl Into<String>) -> Self {
        Self {
            coordinate,
            extension: extension.into(),
        }
    }

    /// File name following the Maven layout: `name-version[-classifier].ext`.
    #[must_use]
    pub fn file_name(&self) -> String {
        let c = &self.coordinate;
        match &c.classifier {
            Some(classifier) => format!(
                "{}-{}-{}.{}",
                c.name, c.version, classifier, self.extension
            ),
            None => format!("{}-{}.{}", c.name, c.version, self.extension),
        }
    }

    /// Path relative to a repository root: `group/as/path/name/version/file`.
    #[must_use]
    pub fn repository_path(&self) -> String {
        let c = &self.coordinate;
        format!(
            "{}/{}/{}/{}",
            c.group.replace('.', "/"),
            c.name,
            c.version,
            self.file_name()
        )
    }
}

impl fmt::Display for ArtifactRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.coordinate, self.extension)
    }
}
