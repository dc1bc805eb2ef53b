//! Service configuration.
//!
//! Holds the plex.tv base URL, the request timeout, and the client
//! identification passed to the authenticator.
//!
//! Configuration is stored at `~/.config/plexpin/config.json`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::ClientOptions;

/// Application name used for the config directory path
const APP_NAME: &str = "plexpin";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default authorization service
pub const DEFAULT_SERVICE_URL: &str = "https://plex.tv";

/// HTTP request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_service_url")]
    pub service_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub client: ClientOptions,
}

fn default_service_url() -> String {
    DEFAULT_SERVICE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            request_timeout_secs: default_request_timeout_secs(),
            client: ClientOptions::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn with_service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs();
        self
    }

    pub fn with_client(mut self, client: ClientOptions) -> Self {
        self.client = client;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// URL for creating a new PIN
    pub fn pins_url(&self) -> String {
        format!("{}/pins.xml", self.base_url())
    }

    /// URL for checking the status of a PIN
    pub fn pin_url(&self, id: &str) -> String {
        format!("{}/pins/{}.xml", self.base_url(), id)
    }

    fn base_url(&self) -> &str {
        self.service_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.service_url, "https://plex.tv");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.pins_url(), "https://plex.tv/pins.xml");
        assert_eq!(config.pin_url("12345678"), "https://plex.tv/pins/12345678.xml");
    }

    #[test]
    fn test_trailing_slash_is_tolerated() {
        let config = Config::default().with_service_url("http://127.0.0.1:8080/");
        assert_eq!(config.pins_url(), "http://127.0.0.1:8080/pins.xml");
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"service_url": "http://localhost"}"#).unwrap();
        assert_eq!(config.service_url, "http://localhost");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.client.product, "plexpin");
        assert_eq!(config.client.identifier.len(), 24);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("plexpin-config-{}", std::process::id()));
        let path = dir.join(CONFIG_FILE);
        let config = Config::default()
            .with_client(ClientOptions::new("fixed-identifier"))
            .with_timeout(Duration::from_secs(5));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.client.identifier, "fixed-identifier");
        assert_eq!(loaded.request_timeout_secs, 5);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("plexpin-does-not-exist").join(CONFIG_FILE);
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.service_url, DEFAULT_SERVICE_URL);
    }
}
