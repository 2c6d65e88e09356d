use crate::error::{AirStoreError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Environment variable that overrides the configured backend URL.
pub const API_URL_ENV: &str = "AIRSTORE_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    pub timeout_seconds: u64,
    /// Upload size guidance in megabytes. The adapter never enforces it;
    /// the CLI only warns above this.
    pub max_image_mb: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            timeout_seconds: 120,
            max_image_mb: 10,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AirStoreError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("airstore").join("config.json"))
    }

    /// Backend base URL. The environment variable wins over the config
    /// file, which wins over the default.
    pub fn api_url(&self) -> String {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                return url.trim_end_matches('/').to_string();
            }
        }

        self.api_url
            .as_deref()
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn set_api_url(&mut self, url: String) -> Result<()> {
        self.api_url = Some(url);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api_url.is_none());
        assert_eq!(config.timeout_seconds, 120);
        assert_eq!(config.max_image_mb, 10);
    }

    #[test]
    fn test_api_url_default() {
        std::env::remove_var(API_URL_ENV);
        let config = Config::default();
        assert_eq!(config.api_url(), DEFAULT_API_URL);
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        std::env::remove_var(API_URL_ENV);
        let config = Config {
            api_url: Some("https://airstore.example.com/".to_string()),
            ..Default::default()
        };
        assert_eq!(config.api_url(), "https://airstore.example.com");
    }

    #[test]
    fn test_config_path_file_name() {
        let path = Config::config_path().expect("config path");
        assert!(path.ends_with("airstore/config.json"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config {
            api_url: Some("http://10.0.0.5:8000".to_string()),
            timeout_seconds: 30,
            max_image_mb: 5,
        };
        let json = serde_json::to_string(&config).expect("serialize");
        let restored: Config = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored.api_url.as_deref(), Some("http://10.0.0.5:8000"));
        assert_eq!(restored.timeout_seconds, 30);
        assert_eq!(restored.max_image_mb, 5);
    }
}
