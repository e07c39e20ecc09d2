use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use besu_dist_protocol::ArtifactRequest;
use sha2::{Digest, Sha256};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::configs::project::{ProjectSettings, DEFAULT_BESU_REPO};
use crate::types::{BesuDistError, BesuDistResult};

pub const BESU_GROUP: &str = "org.hyperledger.besu";
pub const CONSENSYS_REPO: &str = "https://artifacts.consensys.net/public/maven/maven/";
pub const SPLUNK_REPO: &str = "https://splunk.jfrog.io/splunk/ext-releases-local/";
pub const MAVEN_CENTRAL: &str = "https://repo.maven.apache.org/maven2/";

/// A Maven repository, optionally restricted to a group and its subgroups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub url: String,
    pub content: Option<String>,
}

enum Location {
    Remote(String),
    Local(PathBuf),
}

impl Repository {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: None,
        }
    }

    pub fn with_group(url: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: Some(group.into()),
        }
    }

    /// Whether this repository may serve artifacts of `group`
    pub fn accepts(&self, group: &str) -> bool {
        match &self.content {
            None => true,
            Some(root) => {
                group == root
                    || group
                        .strip_prefix(root.as_str())
                        .is_some_and(|rest| rest.starts_with('.'))
            }
        }
    }

    fn location(&self) -> Location {
        if let Some(path) = self.url.strip_prefix("file://") {
            Location::Local(PathBuf::from(path))
        } else if self.url.starts_with("http://") || self.url.starts_with("https://") {
            Location::Remote(self.url.trim_end_matches('/').to_string())
        } else {
            Location::Local(PathBuf::from(&self.url))
        }
    }
}

/// The repositories a plugin project resolves Besu artifacts from, in lookup order
pub fn default_repositories(besu_repo: &str) -> Vec<Repository> {
    let mut repositories = vec![
        Repository::with_group(besu_repo, BESU_GROUP),
        Repository::with_group(DEFAULT_BESU_REPO, BESU_GROUP),
        Repository::with_group(CONSENSYS_REPO, "tech.pegasys"),
        Repository::with_group(SPLUNK_REPO, "com.splunk"),
        Repository::new(MAVEN_CENTRAL),
    ];

    if let Some(home) = dirs::home_dir() {
        repositories.push(Repository::new(
            home.join(".m2").join("repository").display().to_string(),
        ));
    }

    repositories
}

/// Resolves single artifacts from a repository list and caches remote downloads
pub struct ArtifactRepositories {
    repositories: Vec<Repository>,
    cache_dir: PathBuf,
    client: reqwest::Client,
}

impl ArtifactRepositories {
    pub fn new(repositories: Vec<Repository>, cache_dir: PathBuf) -> Self {
        Self {
            repositories,
            cache_dir,
            client: reqwest::Client::new(),
        }
    }

    pub fn for_project(settings: &ProjectSettings) -> Self {
        Self::new(
            default_repositories(&settings.besu_repo),
            Self::cache_dir_for(&settings.build_dir),
        )
    }

    pub fn cache_dir_for(build_dir: &Path) -> PathBuf {
        build_dir.join("besu-dist").join("cache").join("artifacts")
    }

    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Resolve one artifact to a file on disk.
    ///
    /// Repositories are tried in order; the first one holding the artifact wins.
    pub async fn resolve(&self, request: &ArtifactRequest) -> BesuDistResult<PathBuf> {
        let group = &request.coordinate.group;
        let mut attempts = Vec::new();

        for repository in self.repositories.iter().filter(|r| r.accepts(group)) {
            match repository.location() {
                Location::Local(root) => {
                    let path = root.join(request.repository_path());
                    if path.is_file() {
                        debug!("Resolved {} from {}", request, path.display());
                        return Ok(path);
                    }
                    attempts.push(format!("{}: not found", path.display()));
                }
                Location::Remote(base) => {
                    let url = format!("{}/{}", base, request.repository_path());
                    match self.download_and_cache(request, &url).await {
                        Ok(Some(path)) => return Ok(path),
                        Ok(None) => attempts.push(format!("{}: HTTP 404 Not Found", url)),
                        Err(e) => attempts.push(format!("{}: {:#}", url, e)),
                    }
                }
            }
        }

        let details = if attempts.is_empty() {
            format!("no configured repository serves group '{}'", group)
        } else {
            format!("tried\n  - {}", attempts.join("\n  - "))
        };

        Err(BesuDistError::Resolution {
            coordinate: request.to_string(),
            details,
        })
    }

    fn cached_path(&self, request: &ArtifactRequest, url: &str) -> PathBuf {
        let url_hash = format!("{:x}", Sha256::digest(url.as_bytes()));
        let stem = request
            .file_name()
            .trim_end_matches(&format!(".{}", request.extension))
            .to_string();
        self.cache_dir
            .join(format!("{}_{}.{}", stem, &url_hash[..8], request.extension))
    }

    /// Download an artifact unless it is already cached. `None` means HTTP 404.
    async fn download_and_cache(
        &self,
        request: &ArtifactRequest,
        url: &str,
    ) -> Result<Option<PathBuf>> {
        let cache_path = self.cached_path(request, url);

        if cache_path.exists() {
            debug!("Using cached artifact {}", cache_path.display());
            return Ok(Some(cache_path));
        }

        tokio::fs::create_dir_all(&self.cache_dir)
            .await
            .with_context(|| {
                format!(
                    "Failed to create artifact cache directory: {}",
                    self.cache_dir.display()
                )
            })?;

        info!("Downloading {} from {}", request, url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to download {}", url))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(anyhow::anyhow!("HTTP {}", response.status()));
        }

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read artifact data from {}", url))?;

        if bytes.is_empty() {
            return Err(anyhow::anyhow!("Downloaded file from {} is empty", url));
        }

        // Write next to the final name first so an interrupted download is never reused
        let partial_path = cache_path.with_extension("part");
        let mut file = File::create(&partial_path)
            .await
            .with_context(|| format!("Failed to create cache file: {}", partial_path.display()))?;

        file.write_all(&bytes).await.with_context(|| {
            format!("Failed to write artifact to cache: {}", partial_path.display())
        })?;

        file.flush().await.with_context(|| {
            format!("Failed to flush artifact cache file: {}", partial_path.display())
        })?;

        tokio::fs::rename(&partial_path, &cache_path)
            .await
            .with_context(|| format!("Failed to finalize {}", cache_path.display()))?;

        debug!("Cached {} -> {}", request, cache_path.display());
        Ok(Some(cache_path))
    }

    /// All artifacts currently in the download cache
    pub fn list_cached_artifacts(&self) -> Result<BTreeMap<String, PathBuf>> {
        let mut artifacts = BTreeMap::new();

        if !self.cache_dir.exists() {
            return Ok(artifacts);
        }

        for entry in fs::read_dir(&self.cache_dir)
            .with_context(|| format!("Failed to read {}", self.cache_dir.display()))?
        {
            let path = entry?.path();
            let is_artifact = path
                .extension()
                .map(|e| e == "jar" || e == "pom")
                .unwrap_or(false);

            if is_artifact {
                if let Some(filename) = path.file_name().and_then(|s| s.to_str()) {
                    artifacts.insert(filename.to_string(), path);
                }
            }
        }

        Ok(artifacts)
    }

    pub async fn clear_cache(&self) -> Result<()> {
        if self.cache_dir.exists() {
            tokio::fs::remove_dir_all(&self.cache_dir)
                .await
                .with_context(|| {
                    format!("Failed to clear artifact cache: {}", self.cache_dir.display())
                })?;
        }
        Ok(())
    }
}
