//! Configuration management for the panel client
//!
//! Config files are stored in platform-appropriate locations:
//! - Linux: ~/.config/arucraft-panel/
//! - macOS: ~/Library/Application Support/arucraft-panel/
//! - Windows: %APPDATA%\arucraft-panel\

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Overrides `api.base_url` when set
pub const API_BASE_ENV: &str = "ARUCRAFT_API_BASE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Config directory not found")]
    NoDirFound,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Panel backend
    #[serde(default)]
    pub api: ApiConfig,

    /// Third-party APIs
    #[serde(default)]
    pub external: ExternalConfig,

    /// Saved login
    #[serde(default)]
    pub session: SessionConfig,

    /// Where the persisted stores live
    #[serde(default)]
    pub storage: StorageConfig,

    /// Terminal front end settings
    #[serde(default)]
    pub tui: TuiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every internal request is resolved against
    #[serde(default = "default_api_base")]
    pub base_url: String,

    /// Endpoint returning the live server list
    #[serde(default = "default_server_list_path")]
    pub server_list_path: String,

    /// Seconds a fetched server list is reused before refetching
    #[serde(default = "default_server_list_ttl")]
    pub server_list_ttl_secs: i64,

    /// Endpoint returning the logged-in player and permission
    #[serde(default = "default_current_user_path")]
    pub current_user_path: String,

    /// Endpoint returning the logged-in player's preferences
    #[serde(default = "default_player_profile_path")]
    pub player_profile_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalConfig {
    /// Base URL of the Mojang launcher metadata service
    #[serde(default = "default_minecraft_meta_base")]
    pub minecraft_meta_base: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Bearer token from a previous login
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides the platform data directory
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    /// Event poll interval in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Enable mouse support
    #[serde(default = "default_true")]
    pub mouse: bool,
}

// Default value functions
fn default_api_base() -> String {
    "http://127.0.0.1:8000/api".to_string()
}
fn default_server_list_path() -> String {
    "/servers/status".to_string()
}
fn default_server_list_ttl() -> i64 {
    30
}
fn default_current_user_path() -> String {
    "/players/me".to_string()
}
fn default_player_profile_path() -> String {
    "/players/me/profile".to_string()
}
fn default_minecraft_meta_base() -> String {
    "https://piston-meta.mojang.com".to_string()
}
fn default_tick_ms() -> u64 {
    100
}
fn default_true() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base(),
            server_list_path: default_server_list_path(),
            server_list_ttl_secs: default_server_list_ttl(),
            current_user_path: default_current_user_path(),
            player_profile_path: default_player_profile_path(),
        }
    }
}

impl Default for ExternalConfig {
    fn default() -> Self {
        Self {
            minecraft_meta_base: default_minecraft_meta_base(),
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            mouse: true,
        }
    }
}

impl PanelConfig {
    /// Get config directory path
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|p| p.join(crate::APP_DIR))
            .ok_or(ConfigError::NoDirFound)
    }

    /// Get config file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from default location, then apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;

        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides(std::env::var(API_BASE_ENV).ok());
        Ok(config)
    }

    /// Load config from specific path
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: PanelConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save config to specific path
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Directory holding the persisted stores
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|p| p.join(crate::APP_DIR))
                .ok_or(ConfigError::NoDirFound),
        }
    }

    fn apply_env_overrides(&mut self, api_base: Option<String>) {
        if let Some(base) = api_base.filter(|b| !b.trim().is_empty()) {
            self.api.base_url = base;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PanelConfig::default();
        assert_eq!(config.api.server_list_path, "/servers/status");
        assert!(config.session.token.is_none());
        assert!(config.tui.mouse);
    }

    #[test]
    fn test_config_serialization() {
        let config = PanelConfig::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[api]"));

        let parsed: PanelConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.api.base_url, config.api.base_url);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: PanelConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://panel.example.com/api"

            [session]
            token = "abc"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.api.base_url, "https://panel.example.com/api");
        assert_eq!(parsed.api.server_list_ttl_secs, 30);
        assert_eq!(parsed.session.token.as_deref(), Some("abc"));
        assert_eq!(parsed.external.minecraft_meta_base, "https://piston-meta.mojang.com");
    }

    #[test]
    fn test_env_override() {
        let mut config = PanelConfig::default();
        config.apply_env_overrides(Some("http://10.0.0.2/api".to_string()));
        assert_eq!(config.api.base_url, "http://10.0.0.2/api");

        config.apply_env_overrides(Some("  ".to_string()));
        assert_eq!(config.api.base_url, "http://10.0.0.2/api");
    }

    #[test]
    fn test_save_and_load_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = PanelConfig::default();
        config.storage.data_dir = Some(dir.path().join("data"));
        config.save_to(&path).unwrap();

        let loaded = PanelConfig::load_from(&path).unwrap();
        assert_eq!(loaded.data_dir().unwrap(), dir.path().join("data"));
    }
}
