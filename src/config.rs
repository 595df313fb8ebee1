//! Application configuration.
//!
//! Configuration is stored in `config.yaml` under the platform config
//! directory (or the file named by `PORTAL_CONFIG`) and includes:
//! - The catalog API root
//! - Page size used to detect the last page
//! - Request and connect timeouts
//! - Enrichment fetch concurrency

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PortalError, Result};

pub const DEFAULT_API_URL: &str = "https://rickandmortyapi.com/api";

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "PORTAL_CONFIG";
/// Environment variable overriding `api_url`
pub const API_URL_ENV: &str = "PORTAL_API_URL";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the catalog API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Items per page served by the API (default: 20)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Connect timeout in seconds (default: 10)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Maximum enrichment fetches in flight at once (default: 8)
    #[serde(default = "default_enrichment_concurrency")]
    pub enrichment_concurrency: usize,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_page_size() -> usize {
    20
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_enrichment_concurrency() -> usize {
    8
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            page_size: default_page_size(),
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
            enrichment_concurrency: default_enrichment_concurrency(),
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV)
            && !path.is_empty()
        {
            return Some(PathBuf::from(path));
        }

        directories::ProjectDirs::from("", "", "portal")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Load configuration from the default location, or return defaults if
    /// no file exists. Environment overrides are applied last.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Config::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self) {
        if let Ok(url) = env::var(API_URL_ENV)
            && !url.is_empty()
        {
            self.api_url = url;
        }
    }

    /// Reject values the controller cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(PortalError::Config("page_size must be at least 1".to_string()));
        }
        if self.enrichment_concurrency == 0 {
            return Err(PortalError::Config(
                "enrichment_concurrency must be at least 1".to_string(),
            ));
        }
        if self.request_timeout == 0 {
            return Err(PortalError::Config(
                "request_timeout must be at least 1 second".to_string(),
            ));
        }
        let url = url::Url::parse(&self.api_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(PortalError::Config(format!(
                "api_url must be http or https, got '{}'",
                self.api_url
            )));
        }
        Ok(())
    }

    /// Get the per-request timeout duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Get the connect timeout duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml_ng::from_str("page_size: 5\n").unwrap();
        assert_eq!(config.page_size, 5);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.enrichment_concurrency, 8);
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let config = Config {
            page_size: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(PortalError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let config = Config {
            api_url: "file:///tmp/catalog".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(PortalError::Config(_))));
    }

    #[test]
    #[serial]
    fn test_load_from_env_path_with_url_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_url: http://localhost:9000/api").unwrap();
        writeln!(file, "enrichment_concurrency: 2").unwrap();

        // SAFETY: serialized with other env-mutating tests
        unsafe {
            env::set_var(CONFIG_PATH_ENV, file.path());
            env::set_var(API_URL_ENV, "http://127.0.0.1:9001/api");
        }

        let config = Config::load().unwrap();

        unsafe {
            env::remove_var(CONFIG_PATH_ENV);
            env::remove_var(API_URL_ENV);
        }

        assert_eq!(config.api_url, "http://127.0.0.1:9001/api");
        assert_eq!(config.enrichment_concurrency, 2);
    }

    #[test]
    #[serial]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.yaml");

        unsafe {
            env::set_var(CONFIG_PATH_ENV, &missing);
        }
        let config = Config::load().unwrap();
        unsafe {
            env::remove_var(CONFIG_PATH_ENV);
        }

        assert_eq!(config.page_size, 20);
    }
}
