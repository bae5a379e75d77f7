//! Configuration management
//!
//! Handles loading and parsing of JSON configuration files with environment
//! variable support for API credentials.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::types::{Algorithm, Location};
use crate::error::ConfigError;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub order: OrderConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
}

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// Environment variables `HASHBID_API_ID`, `HASHBID_API_KEY` and
    /// `HASHBID_2FA_SECRET` override the corresponding file fields when set.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_json::from_str(&contents)?;

        if let Ok(api_id) = std::env::var("HASHBID_API_ID") {
            config.api.api_id = api_id
                .parse()
                .map_err(|_| ConfigError::InvalidApiId(api_id.clone()))?;
        }
        if let Ok(api_key) = std::env::var("HASHBID_API_KEY") {
            config.api.api_key = api_key;
        }
        if let Ok(secret) = std::env::var("HASHBID_2FA_SECRET") {
            config.api.two_factor_secret = secret;
        }

        Ok(config)
    }

    /// Check credential and cadence fields before the loop starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.api_id == 0 {
            return Err(ConfigError::MissingApiId);
        }
        if self.api.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.monitor.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidInterval(
                "tick_interval_ms must be positive".to_string(),
            ));
        }
        if self.monitor.throttle_period == 0 {
            return Err(ConfigError::InvalidInterval(
                "throttle_period must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Marketplace API credentials and transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Numeric API identifier; must be non-zero.
    pub api_id: u64,
    /// API key; must be non-empty.
    pub api_key: String,
    /// Two-factor secret, reserved for order mutation endpoints.
    /// The monitor itself only reads public market data.
    #[serde(default)]
    pub two_factor_secret: String,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// The standing order being monitored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfig {
    /// Marketplace order id, used for diagnostics only.
    pub id: u64,
    pub location: Location,
    pub algorithm: Algorithm,
    /// Max price the order starts at before the first evaluation fires.
    #[serde(default)]
    pub initial_max_price: f64,
    /// Speed limit the order starts at; the default policy never changes it.
    #[serde(default)]
    pub initial_speed_limit: f64,
}

/// Cadence of the control loop
///
/// The external scheduler ticks every `tick_interval_ms`; one evaluation
/// pass (fetch + aggregate + re-price) runs every `throttle_period` ticks.
/// Defaults reproduce the reference cadence: 500 ms x 120 = one minute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_throttle_period")]
    pub throttle_period: u64,
}

fn default_tick_interval_ms() -> u64 {
    500
}

fn default_throttle_period() -> u64 {
    120
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            tick_interval_ms: default_tick_interval_ms(),
            throttle_period: default_throttle_period(),
        }
    }
}

impl MonitorConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Effective cadence of evaluation passes.
    pub fn effective_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms * self.throttle_period)
    }
}
