//! Configuration loading and management
//!
//! Handles parsing of `.taskdeck.toml` configuration files.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::task::Priority;

pub const CONFIG_FILE: &str = ".taskdeck.toml";

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Dashboard configuration
    #[serde(default)]
    pub ui: UiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

/// Remote API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the task API, without a trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Dashboard settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Priority preselected in the new-task form
    #[serde(default = "default_priority")]
    pub default_priority: Priority,
}

fn default_priority() -> Priority {
    Priority::Medium
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_priority: default_priority(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Resolve the API base URL: an explicit override (CLI flag or env)
    /// wins over the config file. The trailing slash is normalized away so
    /// path joining stays predictable.
    pub fn resolve_base_url(&self, override_url: Option<&str>) -> String {
        let raw = override_url.unwrap_or(&self.api.base_url);
        raw.trim_end_matches('/').to_string()
    }

    fn validate(&self) -> crate::error::Result<()> {
        let url = self.api.base_url.trim();
        if url.is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "api.base_url cannot be empty".to_string(),
            ));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(crate::error::Error::InvalidConfig(format!(
                "api.base_url must be an http(s) URL, got '{url}'"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_directory_has_no_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::load_from_dir(dir.path());
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.ui.default_priority, Priority::Medium);
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let content = r#"
[api]
base_url = "https://tasks.example.net/api"

[ui]
default_priority = "high"
"#;
        std::fs::write(&path, content).expect("write config");
        let config = Config::load(&path).expect("load config");
        assert_eq!(config.api.base_url, "https://tasks.example.net/api");
        assert_eq!(config.ui.default_priority, Priority::High);
    }

    #[test]
    fn load_rejects_non_http_url() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[api]\nbase_url = \"ftp://nope\"\n").expect("write config");
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn override_wins_and_trailing_slash_is_trimmed() {
        let config = Config::default();
        assert_eq!(
            config.resolve_base_url(Some("http://10.0.0.2:9000/api/")),
            "http://10.0.0.2:9000/api"
        );
        assert_eq!(config.resolve_base_url(None), DEFAULT_BASE_URL);
    }
}
