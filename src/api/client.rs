//! Marketplace API client
//!
//! Thin HTTP client for the legacy marketplace endpoints. One request per
//! call, bounded by an explicit timeout; no retries at this layer — the
//! control loop treats any failure as "no update this cycle".

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::types::{Algorithm, ApiResponse, CompetingOrder, Location};
use crate::error::FetchError;

/// Base URL for the marketplace API
pub const API_BASE_URL: &str = "https://api.nicehash.com/api";

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout duration
    pub timeout: Duration,
    /// Endpoint base URL (overridable for tests)
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            base_url: API_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set endpoint base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Source of competing-order snapshots.
///
/// Abstracted so the control loop can be driven by a scripted provider in
/// tests instead of the live endpoint.
#[async_trait]
pub trait SnapshotProvider {
    /// Fetch all competing orders for a (location, algorithm) pair.
    ///
    /// `alive_only` asks the server to restrict the snapshot to active
    /// orders. The returned list is a point-in-time read; entry order is
    /// not significant.
    async fn get_orders(
        &self,
        location: Location,
        algorithm: Algorithm,
        alive_only: bool,
    ) -> Result<Vec<CompetingOrder>, FetchError>;
}

/// Marketplace API client
#[derive(Debug, Clone)]
pub struct MarketClient {
    api_id: u64,
    api_key: String,
    http_client: Client,
    base_url: String,
}

impl MarketClient {
    /// Create a new client with API credentials
    pub fn new(api_id: u64, api_key: impl Into<String>) -> Self {
        Self::with_config(api_id, api_key, ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(
        api_id: u64,
        api_key: impl Into<String>,
        config: ClientConfig,
    ) -> Self {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            api_id,
            api_key: api_key.into(),
            http_client,
            base_url: config.base_url,
        }
    }

    fn orders_url(&self, location: Location, algorithm: Algorithm, alive_only: bool) -> String {
        let mut url = format!(
            "{}?method=orders.get&location={}&algo={}&id={}&key={}",
            self.base_url,
            location.wire_id(),
            algorithm.wire_id(),
            self.api_id,
            self.api_key,
        );
        if alive_only {
            url.push_str("&alive=true");
        }
        url
    }
}

#[async_trait]
impl SnapshotProvider for MarketClient {
    async fn get_orders(
        &self,
        location: Location,
        algorithm: Algorithm,
        alive_only: bool,
    ) -> Result<Vec<CompetingOrder>, FetchError> {
        let url = self.orders_url(location, algorithm, alive_only);
        debug!("Fetching orders: location={} algo={}", location, algorithm);

        let response = self.http_client.get(&url).send().await?;
        let text = response.text().await?;

        // The legacy endpoint answers HTML error pages with status 200,
        // so the body itself is the only reliable malformation signal.
        if !text.trim_start().starts_with('{') {
            return Err(FetchError::MalformedResponse(
                "response is not a JSON object".to_string(),
            ));
        }

        let parsed: ApiResponse = serde_json::from_str(&text)
            .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;

        if let Some(error) = parsed.result.error {
            return Err(FetchError::Api(error));
        }

        debug!("Snapshot contains {} orders", parsed.result.orders.len());
        Ok(parsed.result.orders)
    }
}
