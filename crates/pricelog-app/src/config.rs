//! Application configuration.
//!
//! Every field has a default, so the poller runs with no config file at
//! all. A TOML file only needs the fields it wants to override.

use crate::error::{AppError, AppResult};
use pricelog_core::TokenList;
use pricelog_feed::{PriceClientConfig, DEFAULT_PRICE_URL};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "PRICELOG_CONFIG";

/// Config file used when present and nothing else is specified.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Tokens tracked out of the box (Solana mint addresses).
pub const DEFAULT_TOKENS: [&str; 6] = [
    "JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN",
    "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263",
    "CLoUDKc4Ane7HeQcPpE3YHnznRxhMimJ4MyaUqyHFzAu",
    "jtojtomepa8beP8AuQc6eXt5FriJwfFMwQx2v2f9mCL",
    "SHDWyBxihqiCj6YekG2GUr7wqKLeLAMK1gHZck9pL6y",
    "27G8MtK7VtTcCHkpASjSDdkWWYfoqT6ggEuKidVJidD4",
];

fn default_price_url() -> String {
    DEFAULT_PRICE_URL.to_string()
}

fn default_tokens() -> Vec<String> {
    DEFAULT_TOKENS.iter().map(|s| s.to_string()).collect()
}

fn default_data_dir() -> String {
    "token_data".to_string()
}

fn default_show_extra_info() -> bool {
    true
}

/// Telemetry configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log filter (e.g. "info" or "info,pricelog=debug"). `RUST_LOG` overrides it.
    #[serde(default)]
    pub log_level: Option<String>,
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Price endpoint URL.
    #[serde(default = "default_price_url")]
    pub price_url: String,
    /// Tokens to track, in aggregate-column order.
    #[serde(default = "default_tokens")]
    pub tokens: Vec<String>,
    /// Root directory for all persisted files.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Ask the endpoint for extra info alongside the price.
    #[serde(default = "default_show_extra_info")]
    pub show_extra_info: bool,
    /// Request timeout in milliseconds. Unset means the HTTP client default.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    /// Telemetry configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            price_url: default_price_url(),
            tokens: default_tokens(),
            data_dir: default_data_dir(),
            show_extra_info: default_show_extra_info(),
            request_timeout_ms: None,
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Resolution order: explicit path > `PRICELOG_CONFIG` > `config/default.toml`
    /// if it exists > built-in defaults. An explicitly named file must exist.
    pub fn load(cli_path: Option<&str>) -> AppResult<Self> {
        let explicit = cli_path
            .map(str::to_string)
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok());

        let config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(DEFAULT_CONFIG_PATH)?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config {path}: {e}")))?;

        Self::from_toml(&content)
    }

    /// Parse from TOML text.
    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Check the settings that would otherwise fail at the first cycle.
    pub fn validate(&self) -> AppResult<()> {
        self.token_list()?;
        if self.price_url.trim().is_empty() {
            return Err(AppError::Config("price_url is empty".to_string()));
        }
        if self.data_dir.trim().is_empty() {
            return Err(AppError::Config("data_dir is empty".to_string()));
        }
        if self.request_timeout_ms == Some(0) {
            return Err(AppError::Config(
                "request_timeout_ms must be positive when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Validated token list.
    pub fn token_list(&self) -> AppResult<TokenList> {
        TokenList::new(self.tokens.iter().cloned())
            .map_err(|e| AppError::Config(format!("Invalid tokens: {e}")))
    }

    /// Settings for the price client.
    pub fn client_config(&self) -> PriceClientConfig {
        PriceClientConfig {
            price_url: self.price_url.clone(),
            show_extra_info: self.show_extra_info,
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.price_url, "https://api.jup.ag/price/v2");
        assert_eq!(config.tokens.len(), 6);
        assert_eq!(config.data_dir, "token_data");
        assert!(config.show_extra_info);
        assert!(config.request_timeout_ms.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AppConfig::from_toml(
            r#"
            tokens = ["A", "B"]
            data_dir = "/tmp/prices"

            [telemetry]
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.tokens, vec!["A", "B"]);
        assert_eq!(config.data_dir, "/tmp/prices");
        assert_eq!(config.price_url, DEFAULT_PRICE_URL);
        assert_eq!(config.telemetry.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_client_config_mapping() {
        let config = AppConfig {
            request_timeout_ms: Some(2500),
            show_extra_info: false,
            ..Default::default()
        };
        let client = config.client_config();
        assert_eq!(client.request_timeout, Some(Duration::from_millis(2500)));
        assert!(!client.show_extra_info);
    }

    #[test]
    fn test_validate_rejects_bad_tokens() {
        let config = AppConfig {
            tokens: vec!["A".to_string(), "A".to_string()],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));

        let config = AppConfig {
            tokens: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            tokens: vec!["../etc".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = AppConfig {
            request_timeout_ms: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("pricelog.toml");
        std::fs::write(&path, "price_url = \"http://localhost:9/price\"\n").unwrap();

        let config = AppConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.price_url, "http://localhost:9/price");
        assert_eq!(config.tokens.len(), 6);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        assert!(AppConfig::load(Some("/nonexistent/pricelog.toml")).is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("price_url"));
        assert!(toml_str.contains("tokens"));
        let parsed = AppConfig::from_toml(&toml_str).unwrap();
        assert_eq!(parsed.tokens, config.tokens);
    }
}
