//! Config file (`~/.config/shifa/config.toml`) with `SHIFA_API_URL` override.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::platform;

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "SHIFA_API_URL";

pub const DEFAULT_PAGE_SIZE: usize = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("page_size must be at least 1")]
    ZeroPageSize,
    #[error("invalid api base_url {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Where the medicine catalog service lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Pharmacy/medicine directory. The bundled copy is used when this
    /// file does not exist.
    #[serde(default = "default_directory_toml")]
    pub directory_toml: PathBuf,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            directory_toml: default_directory_toml(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8003".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("shifa/{}", env!("CARGO_PKG_VERSION"))
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_directory_toml() -> PathBuf {
    platform::config_dir().join("directory.toml")
}

impl Config {
    /// Load from the default location, writing a default file on first run.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(write_err)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }

    /// Apply `SHIFA_API_URL` if set and non-empty.
    pub fn apply_env(&mut self) {
        self.apply_api_url(std::env::var(API_URL_ENV).ok());
    }

    fn apply_api_url(&mut self, value: Option<String>) {
        if let Some(url) = value.map(|v| v.trim().to_string()) {
            if !url.is_empty() {
                self.api.base_url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        let url = reqwest::Url::parse(&self.api.base_url).map_err(|e| ConfigError::BaseUrl {
            url: self.api.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::BaseUrl {
                url: self.api.base_url.clone(),
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            catalog: CatalogConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8003");
        assert_eq!(config.catalog.page_size, 30);
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        assert!(config.paths.directory_toml.ends_with("directory.toml"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[catalog]\npage_size = 50\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.catalog.page_size, 50);
        assert_eq!(config.api.base_url, "http://localhost:8003");
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.api.base_url = "https://api.example.ma".to_string();
        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api.base_url, "https://api.example.ma");
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[catalog\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn env_value_overrides_base_url() {
        let mut config = Config::default();
        config.apply_api_url(Some("  ".to_string()));
        assert_eq!(config.api.base_url, "http://localhost:8003");
        config.apply_api_url(Some("http://10.0.0.2:9000 ".to_string()));
        assert_eq!(config.api.base_url, "http://10.0.0.2:9000");
        config.apply_api_url(None);
        assert_eq!(config.api.base_url, "http://10.0.0.2:9000");
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = Config::default();
        config.catalog.page_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroPageSize)));

        let mut config = Config::default();
        config.api.base_url = "localhost:8003".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "not a url".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BaseUrl { .. })
        ));
    }
}
