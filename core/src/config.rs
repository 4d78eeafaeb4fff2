use crate::errors::{RedactError, RedactResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_LOOKBACK_CHARS: usize = 1000;
pub const DEFAULT_CONNECT_RETRIES: u32 = 1;
pub const DEFAULT_CLIENT_NAME: &str = concat!("redact-keyboard/", env!("CARGO_PKG_VERSION"));

/// Environment variable overriding `base_url`
pub const ENV_BASE_URL: &str = "REDACT_BASE_URL";
/// Environment variable overriding `timeout_ms`
pub const ENV_TIMEOUT_MS: &str = "REDACT_TIMEOUT_MS";

/// Configuration for the redaction pipeline
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RedactConfig {
    /// Base URL of the redaction service; `/redact` is appended
    pub base_url: Option<String>,
    /// Connect and overall request timeout, in milliseconds
    pub timeout_ms: Option<u64>,
    /// Value sent in the identifying client header
    pub client_name: Option<String>,
    /// How many characters before the cursor are captured
    pub lookback_chars: Option<usize>,
    /// Extra attempts made when the connection itself fails
    pub connect_retries: Option<u32>,
}

impl Default for RedactConfig {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            timeout_ms: Some(DEFAULT_TIMEOUT_MS),
            client_name: Some(DEFAULT_CLIENT_NAME.to_string()),
            lookback_chars: Some(DEFAULT_LOOKBACK_CHARS),
            connect_retries: Some(DEFAULT_CONNECT_RETRIES),
        }
    }
}

impl RedactConfig {
    /// Creates a configuration pointing at `base_url` with every other field defaulted
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Self::default()
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Full URL of the redaction endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/redact", self.base_url().trim_end_matches('/'))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS))
    }

    pub fn client_name(&self) -> &str {
        self.client_name.as_deref().unwrap_or(DEFAULT_CLIENT_NAME)
    }

    pub fn lookback_chars(&self) -> usize {
        self.lookback_chars.unwrap_or(DEFAULT_LOOKBACK_CHARS)
    }

    pub fn connect_retries(&self) -> u32 {
        self.connect_retries.unwrap_or(DEFAULT_CONNECT_RETRIES)
    }

    /// Checks the values a client cannot work without
    pub fn validate(&self) -> RedactResult<()> {
        let base_url = self.base_url();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(RedactError::ConfigError(format!(
                "base_url must start with http:// or https://, got '{}'",
                base_url
            )));
        }
        if self.timeout_ms == Some(0) {
            return Err(RedactError::ConfigError(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.lookback_chars == Some(0) {
            return Err(RedactError::ConfigError(
                "lookback_chars must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> RedactResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                RedactError::ConfigError(format!("Failed to read config file: {}", e))
            })?;

            let config: Self = toml::from_str(&content).map_err(|e| {
                RedactError::ConfigError(format!("Failed to parse config file: {}", e))
            })?;

            // Fields missing from the file fall back to defaults
            Ok(Self::default().merge(&config))
        } else {
            Ok(Self::default())
        }
    }

    /// Saves configuration to a file
    pub fn save_to_file(&self, path: &Path) -> RedactResult<()> {
        let content = toml::to_string(self).map_err(|e| {
            RedactError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                RedactError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        fs::write(path, content).map_err(|e| {
            RedactError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            base_url: other.base_url.clone().or_else(|| self.base_url.clone()),
            timeout_ms: other.timeout_ms.or(self.timeout_ms),
            client_name: other
                .client_name
                .clone()
                .or_else(|| self.client_name.clone()),
            lookback_chars: other.lookback_chars.or(self.lookback_chars),
            connect_retries: other.connect_retries.or(self.connect_retries),
        }
    }

    /// Applies `REDACT_BASE_URL` / `REDACT_TIMEOUT_MS` from the process environment
    pub fn apply_env(self) -> RedactResult<Self> {
        self.apply_overrides(
            std::env::var(ENV_BASE_URL).ok(),
            std::env::var(ENV_TIMEOUT_MS).ok(),
        )
    }

    fn apply_overrides(
        mut self,
        base_url: Option<String>,
        timeout_ms: Option<String>,
    ) -> RedactResult<Self> {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = Some(url.trim().to_string());
        }
        if let Some(raw) = timeout_ms {
            let parsed = raw.trim().parse::<u64>().map_err(|e| {
                RedactError::ConfigError(format!("Invalid {} value '{}': {}", ENV_TIMEOUT_MS, raw, e))
            })?;
            self.timeout_ms = Some(parsed);
        }
        Ok(self)
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> RedactResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        RedactError::ConfigError("Could not determine home directory".to_string())
    })?;

    Ok(home_dir.join(".config").join(app_name))
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> RedactResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}
