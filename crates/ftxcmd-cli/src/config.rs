//! Application configuration.

use crate::error::{AppError, AppResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Exchange connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// REST base URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Per-request timeout in seconds. Default: 10.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Subaccount to trade on. Empty or absent means the main account.
    #[serde(default)]
    pub subaccount: Option<String>,
}

fn default_endpoint() -> String {
    ftxcmd_client::rest::DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            subaccount: None,
        }
    }
}

impl ExchangeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Where API credentials come from.
///
/// The keys file is a dotenv file loaded into the environment before the
/// named variables are read; variables already set take precedence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default = "default_keys_file")]
    pub keys_file: String,
    #[serde(default = "default_key_var")]
    pub key_var: String,
    #[serde(default = "default_secret_var")]
    pub secret_var: String,
}

fn default_keys_file() -> String {
    "keys.env".to_string()
}

fn default_key_var() -> String {
    "FTX_API_KEY".to_string()
}

fn default_secret_var() -> String {
    "FTX_API_SECRET".to_string()
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            keys_file: default_keys_file(),
            key_var: default_key_var(),
            secret_var: default_secret_var(),
        }
    }
}

/// Initial session state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Market selected at startup.
    #[serde(default)]
    pub market: Option<String>,
    /// Fat-finger ceiling at startup. Unset blocks all orders until
    /// `fatfinger` is entered.
    #[serde(default)]
    pub fatfinger: Option<Decimal>,
}

/// Console output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Colour success/error lines.
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_color() -> bool {
    true
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
}

impl AppConfig {
    /// Load from `path`, or from `FTXCMD_CONFIG`, or the default path.
    /// A missing file falls back to defaults.
    pub fn load(path: Option<String>) -> AppResult<Self> {
        let config_path = path
            .or_else(|| std::env::var("FTXCMD_CONFIG").ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }
}
