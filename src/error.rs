//! Error taxonomy for the order monitor
//!
//! Steady-state failures (`FetchError`) are recovered inside the control
//! loop and never propagate to the scheduler. Configuration failures
//! (`ConfigError`) surface once, at startup, and block it.

use thiserror::Error;

/// Failure while retrieving a competing-order snapshot.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("API error: {0}")]
    Api(String),
}

// Manual conversion rather than #[from] so transport timeouts surface as
// their own variant.
impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(err)
        }
    }
}

/// Invalid or missing configuration, detected before the loop starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("API ID is not set, please set a non-zero API ID")]
    MissingApiId,

    #[error("API key is not set, please set a non-empty API key")]
    MissingApiKey,

    #[error("invalid HASHBID_API_ID override: {0}")]
    InvalidApiId(String),

    #[error("invalid monitor cadence: {0}")]
    InvalidInterval(String),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
