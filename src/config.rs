//! Configuration file parser for ~/.config/newsdesk/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are accepted but logged as a warning since they are usually
//! typos.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::remote::API_URL_ENV;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Struct
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Origin the site is served from; relative API paths resolve against it.
    pub site_origin: String,

    /// API root, relative to `site_origin` unless it is an absolute URL.
    pub api_base_path: String,

    /// Key of the local persistence record holding the store snapshot.
    pub storage_key: String,

    /// SQLite file for local persistence. Defaults to `store.db` next to the
    /// config file.
    pub database_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_origin: "http://localhost:8080".to_string(),
            api_base_path: "/api".to_string(),
            storage_key: crate::store::DEFAULT_STORAGE_KEY.to_string(),
            database_path: None,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 4] =
        ["site_origin", "api_base_path", "storage_key", "database_path"];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)`
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), origin = %config.site_origin, "Loaded configuration");
        Ok(config)
    }

    /// Base URL for the content API.
    ///
    /// `NEWSDESK_API_URL` wins when set and non-empty. Otherwise
    /// `api_base_path` is used as-is if absolute, or joined onto
    /// `site_origin`.
    pub fn api_base_url(&self) -> String {
        self.api_base_url_with(std::env::var(API_URL_ENV).ok())
    }

    fn api_base_url_with(&self, env_override: Option<String>) -> String {
        if let Some(url) = env_override.filter(|u| !u.trim().is_empty()) {
            return url.trim().to_string();
        }
        if self.api_base_path.starts_with("http://") || self.api_base_path.starts_with("https://")
        {
            return self.api_base_path.clone();
        }
        format!(
            "{}/{}",
            self.site_origin.trim_end_matches('/'),
            self.api_base_path.trim_start_matches('/')
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, content: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(name);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_base_path, "/api");
        assert_eq!(config.storage_key, "newsdesk-content-store");
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/newsdesk_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let (dir, path) = write_config("newsdesk_config_test_whitespace", "  \n \n");
        assert_eq!(Config::load(&path).unwrap(), Config::default());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let (dir, path) = write_config(
            "newsdesk_config_test_partial",
            "site_origin = \"https://news.example.com\"\n",
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(config.site_origin, "https://news.example.com");
        assert_eq!(config.api_base_path, "/api");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let (dir, path) = write_config(
            "newsdesk_config_test_full",
            r#"
site_origin = "https://news.example.com"
api_base_path = "/v2/api"
storage_key = "desk"
database_path = "/var/lib/newsdesk/store.db"
"#,
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(config.api_base_path, "/v2/api");
        assert_eq!(config.storage_key, "desk");
        assert_eq!(
            config.database_path.as_deref(),
            Some(Path::new("/var/lib/newsdesk/store.db"))
        );
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let (dir, path) = write_config("newsdesk_config_test_invalid", "this is not [valid toml");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let (dir, path) = write_config(
            "newsdesk_config_test_unknown",
            "api_base_path = \"/api\"\ntheme = \"dark\"\n",
        );
        assert!(Config::load(&path).is_ok());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_too_large_file_rejected() {
        let (dir, path) =
            write_config("newsdesk_config_test_too_large", &"a".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_api_base_url_resolution() {
        let config = Config::default();
        assert_eq!(config.api_base_url_with(None), "http://localhost:8080/api");

        let config = Config {
            site_origin: "https://news.example.com/".into(),
            ..Config::default()
        };
        assert_eq!(config.api_base_url_with(None), "https://news.example.com/api");

        let config = Config {
            api_base_path: "https://api.example.com/v1".into(),
            ..Config::default()
        };
        assert_eq!(config.api_base_url_with(None), "https://api.example.com/v1");
    }

    #[test]
    fn test_env_override_wins() {
        let config = Config::default();
        assert_eq!(
            config.api_base_url_with(Some("https://staging.example.com/api".into())),
            "https://staging.example.com/api"
        );
        assert_eq!(
            config.api_base_url_with(Some("   ".into())),
            "http://localhost:8080/api"
        );
    }
}
