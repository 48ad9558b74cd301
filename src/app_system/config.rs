use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ConfigError;

pub const API_URL_ENV: &str = "ADMIN_API_URL";
pub const API_TOKEN_ENV: &str = "ADMIN_API_TOKEN";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Bearer token used before any login.
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/".to_string(),
            timeout_secs: 30,
            token: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub flash_seconds: u64,
    pub page_size: usize,
}

impl UiConfig {
    pub fn flash_duration(&self) -> Duration {
        Duration::from_secs(self.flash_seconds)
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            flash_seconds: 5,
            page_size: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub ui: UiConfig,
}

impl AppConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path` if given, then applies the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                info!(path = %path.display(), "Loaded config file");
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };
        config.apply_overrides(std::env::var(API_URL_ENV).ok(), std::env::var(API_TOKEN_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Environment values win over the file. Empty values are ignored.
    pub fn apply_overrides(&mut self, base_url: Option<String>, token: Option<String>) {
        if let Some(url) = base_url.filter(|url| !url.trim().is_empty()) {
            debug!(url = %url, "Base URL overridden from environment");
            self.api.base_url = url;
        }
        if let Some(token) = token.filter(|token| !token.trim().is_empty()) {
            debug!("API token taken from environment");
            self.api.token = Some(token);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api.base_url.trim();
        let invalid = |reason: &str| ConfigError::InvalidUrl {
            url: self.api.base_url.clone(),
            reason: reason.to_string(),
        };
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(invalid("must start with http:// or https://"));
        }
        if url.trim_start_matches("https://").trim_start_matches("http://").is_empty() {
            return Err(invalid("missing host"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_local_backend() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8000/");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.ui.flash_duration(), Duration::from_secs(5));
        assert_eq!(config.ui.page_size, 10);
    }

    #[test]
    fn partial_files_keep_defaults() {
        let config = AppConfig::from_toml("[ui]\npage_size = 25\n").unwrap();
        assert_eq!(config.ui.page_size, 25);
        assert_eq!(config.ui.flash_seconds, 5);
        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = AppConfig::from_toml("[api]\nbase_url = \"http://files:8000/\"\n").unwrap();
        config.apply_overrides(Some("https://api.example.com/".to_string()), Some(String::new()));
        assert_eq!(config.api.base_url, "https://api.example.com/");
        assert_eq!(config.api.token, None);
    }

    #[test]
    fn rejects_bad_urls_and_bad_toml() {
        assert!(matches!(
            AppConfig::from_toml("[api]\nbase_url = \"localhost\"\n"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(AppConfig::from_toml("[api"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/admin-console.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
