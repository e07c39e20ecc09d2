use std::path::{Component, Path, PathBuf};

use besu_dist_protocol::ModuleId;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::{BesuDistError, BesuDistResult};

pub const PROJECT_CONFIG_FILE: &str = "besu-plugin.yml";
pub const DEFAULT_BESU_REPO: &str = "https://hyperledger.jfrog.io/hyperledger/besu-maven/";
pub const DEFAULT_BUILD_DIR: &str = "build";
pub const DEFAULT_ANNOTATION_PROCESSORS: &[&str] = &["com.google.auto.service:auto-service"];

pub const BESU_VERSION_ENV: &str = "BESU_VERSION";
pub const BESU_REPO_ENV: &str = "BESU_REPO";

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PluginProjectConfig {
    /// Distribution name. Defaults to the project directory name.
    pub name: Option<String>,
    /// Version of the Besu application the plugin is built against.
    pub besu_version: Option<String>,
    /// Repository serving Besu artifacts, if not the public Besu repository.
    pub besu_repo: Option<String>,
    /// Build output directory, relative to the project directory.
    pub build_dir: Option<String>,
    /// `group:name` modules that are also added to the annotation processor path.
    pub annotation_processors: Option<Vec<String>>,
    /// Replacement for the bundled old-to-new coordinates table.
    pub coordinates_mapping: Option<String>,
}

impl PluginProjectConfig {
    pub fn build_dir_in(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(self.build_dir.as_deref().unwrap_or(DEFAULT_BUILD_DIR))
    }
}

pub fn parse_project_config(yaml_str: &str) -> BesuDistResult<PluginProjectConfig> {
    // An empty file is a valid, empty configuration
    if yaml_str.trim().is_empty() {
        return Ok(PluginProjectConfig::default());
    }
    let config: PluginProjectConfig = serde_yaml::from_str(yaml_str)?;
    Ok(config)
}

/// Load `besu-plugin.yml` from the project directory, if there is one.
pub fn load_project_config(project_dir: &Path) -> BesuDistResult<PluginProjectConfig> {
    let path = project_dir.join(PROJECT_CONFIG_FILE);
    if !path.exists() {
        return Ok(PluginProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path).map_err(|e| {
        BesuDistError::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;
    parse_project_config(&content).map_err(|e| {
        BesuDistError::Config(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// JSON schema of [`PluginProjectConfig`]
pub fn config_schema() -> BesuDistResult<serde_json::Value> {
    let schema = schemars::schema_for!(PluginProjectConfig);
    Ok(serde_json::to_value(schema)?)
}

/// Values given on the command line, which win over the environment and the config file
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub besu_version: Option<String>,
    pub besu_repo: Option<String>,
}

impl ConfigOverrides {
    /// Fill unset values from `BESU_VERSION` / `BESU_REPO`.
    pub fn with_env_fallback(self) -> Self {
        self.with_fallback(|key| std::env::var(key).ok())
    }

    fn with_fallback(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            besu_version: self.besu_version.or_else(|| lookup(BESU_VERSION_ENV)),
            besu_repo: self.besu_repo.or_else(|| lookup(BESU_REPO_ENV)),
        }
    }
}

/// Effective settings of one plugin project after applying defaults and overrides
#[derive(Debug, Clone)]
pub struct ProjectSettings {
    pub project_dir: PathBuf,
    pub name: String,
    pub besu_version: String,
    pub besu_repo: String,
    pub build_dir: PathBuf,
    pub annotation_processors: Vec<ModuleId>,
    pub coordinates_mapping: Option<PathBuf>,
}

impl ProjectSettings {
    pub fn resolve(
        project_dir: &Path,
        config: PluginProjectConfig,
        overrides: &ConfigOverrides,
    ) -> BesuDistResult<Self> {
        let build_dir = config.build_dir_in(project_dir);

        let besu_version = overrides
            .besu_version
            .clone()
            .or(config.besu_version)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                BesuDistError::Config(format!(
                    "No Besu version configured. Set 'besuVersion' in {}, pass --besu-version or set {}",
                    PROJECT_CONFIG_FILE, BESU_VERSION_ENV
                ))
            })?;

        let besu_repo = overrides
            .besu_repo
            .clone()
            .or(config.besu_repo)
            .unwrap_or_else(|| DEFAULT_BESU_REPO.to_string());

        let name = config.name.unwrap_or_else(|| {
            project_dir
                .canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .unwrap_or_else(|| "plugin".to_string())
        });
        validate_name(&name)?;

        let annotation_processors = match config.annotation_processors {
            Some(modules) => modules
                .iter()
                .map(|m| ModuleId::parse(m).map_err(BesuDistError::Config))
                .collect::<BesuDistResult<Vec<_>>>()?,
            None => DEFAULT_ANNOTATION_PROCESSORS
                .iter()
                .map(|m| ModuleId::parse(m).map_err(BesuDistError::Config))
                .collect::<BesuDistResult<Vec<_>>>()?,
        };

        let coordinates_mapping = config
            .coordinates_mapping
            .map(|path| project_dir.join(path));

        Ok(Self {
            project_dir: project_dir.to_path_buf(),
            name,
            besu_version,
            besu_repo,
            build_dir,
            annotation_processors,
            coordinates_mapping,
        })
    }
}

/// The name becomes a directory below `<buildDir>/install`, so it must be a
/// single plain path component.
fn validate_name(name: &str) -> BesuDistResult<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(BesuDistError::Config(format!(
            "Invalid plugin name '{}' in {}: it must be a single directory name",
            name, PROJECT_CONFIG_FILE
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = parse_project_config(
            "name: hello\nbesuVersion: 24.1.0\nbesuRepo: https://repo.example/maven/\nbuildDir: out\nannotationProcessors:\n  - com.example:processor\n",
        )
        .unwrap();
        assert_eq!(config.name.as_deref(), Some("hello"));
        assert_eq!(config.besu_version.as_deref(), Some("24.1.0"));
        assert_eq!(config.build_dir.as_deref(), Some("out"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(parse_project_config("besuVersoin: 24.1.0\n").is_err());
    }

    #[test]
    fn test_cli_overrides_win_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = PluginProjectConfig {
            besu_version: Some("23.10.0".into()),
            besu_repo: Some("https://file.example/".into()),
            ..Default::default()
        };
        let overrides = ConfigOverrides {
            besu_version: Some("24.1.0".into()),
            besu_repo: None,
        };

        let settings = ProjectSettings::resolve(dir.path(), config, &overrides).unwrap();
        assert_eq!(settings.besu_version, "24.1.0");
        assert_eq!(settings.besu_repo, "https://file.example/");
        assert_eq!(settings.build_dir, dir.path().join("build"));
        assert_eq!(
            settings.annotation_processors,
            vec![ModuleId::parse("com.google.auto.service:auto-service").unwrap()]
        );
    }

    #[test]
    fn test_env_fills_only_missing_values() {
        let overrides = ConfigOverrides {
            besu_version: Some("24.1.0".into()),
            besu_repo: None,
        }
        .with_fallback(|key| match key {
            BESU_VERSION_ENV => Some("1.0.0".into()),
            BESU_REPO_ENV => Some("https://env.example/".into()),
            _ => None,
        });
        assert_eq!(overrides.besu_version.as_deref(), Some("24.1.0"));
        assert_eq!(overrides.besu_repo.as_deref(), Some("https://env.example/"));
    }

    #[test]
    fn test_missing_version_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProjectSettings::resolve(
            dir.path(),
            PluginProjectConfig::default(),
            &ConfigOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, BesuDistError::Config(_)));
        assert!(err.to_string().contains("besuVersion"));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_project_config(dir.path()).unwrap();
        assert!(config.besu_version.is_none());
    }

    #[test]
    fn test_schema_lists_properties() {
        let schema = config_schema().unwrap();
        assert!(schema["properties"]["besuVersion"].is_object());
    }

    #[test]
    fn test_name_must_be_a_single_directory() {
        let dir = tempfile::tempdir().unwrap();
        let overrides = ConfigOverrides {
            besu_version: Some("24.1.0".into()),
            besu_repo: None,
        };

        for name in ["../..", "..", "nested/plugin", "/tmp/plugin", ""] {
            let config = PluginProjectConfig {
                name: Some(name.into()),
                ..Default::default()
            };
            let err = ProjectSettings::resolve(dir.path(), config, &overrides).unwrap_err();
            assert!(matches!(err, BesuDistError::Config(_)), "{}", name);
        }

        let config = PluginProjectConfig {
            name: Some("my-plugin".into()),
            ..Default::default()
        };
        let settings = ProjectSettings::resolve(dir.path(), config, &overrides).unwrap();
        assert_eq!(settings.name, "my-plugin");
    }
}
