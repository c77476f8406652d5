//! Configuration loading from TOML files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bookline_core::DEFAULT_BATCH_SIZE;
use bookline_openlibrary::{AuthorStage, LoadConfig};
use bookline_store::StoreConfig;
use serde::Deserialize;

/// Global configuration for bookline
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub dumps: DumpsConfig,
    pub load: LoadSection,
    pub store: StoreSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DumpsConfig {
    #[serde(deserialize_with = "deserialize_env_path")]
    pub authors: PathBuf,
    #[serde(deserialize_with = "deserialize_env_path")]
    pub works: PathBuf,
}

impl Default for DumpsConfig {
    fn default() -> Self {
        let defaults = LoadConfig::default();
        Self {
            authors: defaults.authors_dump,
            works: defaults.works_dump,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LoadSection {
    /// Resolve against authors already in the store
    pub skip_authors: bool,
    pub batch_size: usize,
}

impl Default for LoadSection {
    fn default() -> Self {
        Self {
            skip_authors: false,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    #[serde(deserialize_with = "deserialize_env_path")]
    pub path: PathBuf,
    #[serde(deserialize_with = "deserialize_env_var")]
    pub memory_limit: Option<String>,
    pub threads: Option<usize>,
}

impl Default for StoreSection {
    fn default() -> Self {
        let defaults = StoreConfig::default();
        Self {
            path: defaults.path,
            memory_limit: defaults.memory_limit,
            threads: defaults.threads,
        }
    }
}

/// Deserialize a string that may contain environment variable reference like ${VAR}
fn deserialize_env_var<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| expand_env_var(&s)))
}

/// Like [`deserialize_env_var`], but an unset variable is an error
fn deserialize_env_path<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    expand_env_var(&raw)
        .map(PathBuf::from)
        .ok_or_else(|| serde::de::Error::custom(format!("environment variable in {raw} is not set")))
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./bookline.toml (current directory)
    /// 2. ~/.config/bookline/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("bookline.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "bookline") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn load_config(&self) -> LoadConfig {
        LoadConfig {
            authors_dump: self.dumps.authors.clone(),
            works_dump: self.dumps.works.clone(),
            author_stage: if self.load.skip_authors {
                AuthorStage::Skip
            } else {
                AuthorStage::Load
            },
            batch_size: self.load.batch_size,
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            path: self.store.path.clone(),
            memory_limit: self.store.memory_limit.clone(),
            threads: self.store.threads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.load.batch_size, DEFAULT_BATCH_SIZE);
        assert!(!config.load.skip_authors);
        assert_eq!(config.store.path, PathBuf::from("./data/bookline.duckdb"));
        assert!(config.store.memory_limit.is_none());
        assert_eq!(config.load_config(), LoadConfig::default());
    }

    #[test]
    fn expand_env_var_simple() {
        std::env::set_var("BOOKLINE_TEST_VAR", "test_value");
        assert_eq!(
            expand_env_var("${BOOKLINE_TEST_VAR}"),
            Some("test_value".to_string())
        );
        std::env::remove_var("BOOKLINE_TEST_VAR");
    }

    #[test]
    fn expand_env_var_literal() {
        assert_eq!(expand_env_var("literal"), Some("literal".to_string()));
    }

    #[test]
    fn expand_env_var_missing() {
        assert_eq!(expand_env_var("${NONEXISTENT_VAR_12345}"), None);
    }

    #[test]
    fn parse_config_toml() {
        let toml = r#"
[dumps]
authors = "/data/authors.txt.gz"
works = "/data/works.txt.gz"

[load]
skip_authors = true
batch_size = 250

[store]
path = "/tmp/ol.duckdb"
memory_limit = "4GB"
threads = 4
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let load = config.load_config();
        assert_eq!(load.authors_dump, PathBuf::from("/data/authors.txt.gz"));
        assert_eq!(load.works_dump, PathBuf::from("/data/works.txt.gz"));
        assert_eq!(load.author_stage, AuthorStage::Skip);
        assert_eq!(load.batch_size, 250);

        let store = config.store_config();
        assert_eq!(store.path, PathBuf::from("/tmp/ol.duckdb"));
        assert_eq!(store.memory_limit.as_deref(), Some("4GB"));
        assert_eq!(store.threads, Some(4));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str("[load]\nbatch_size = 10\n").unwrap();
        assert_eq!(config.load.batch_size, 10);
        assert_eq!(config.dumps.works, DumpsConfig::default().works);
    }

    #[test]
    fn path_with_unset_var_is_rejected() {
        let toml = "[store]\npath = \"${NONEXISTENT_VAR_67890}\"\n";
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bookline.toml");
        std::fs::write(&path, "[store]\nthreads = 2\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.store.threads, Some(2));

        assert!(Config::from_file(&dir.path().join("missing.toml")).is_err());
    }
}
