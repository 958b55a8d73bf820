//! Visual Crossing timeline API client
//!
//! Fetches the current conditions for a free-form location string. Requests
//! use the `uk` unit group, so temperatures are in degrees Celsius.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::{ProviderError, ProviderResponse, WeatherProvider};

/// Base URL for the Visual Crossing timeline API
pub const VISUAL_CROSSING_BASE_URL: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline";

/// Unit group requested from the API
const UNIT_GROUP: &str = "uk";

/// Client for fetching current conditions from Visual Crossing
#[derive(Clone)]
pub struct VisualCrossingClient {
    /// HTTP client for making requests
    http_client: Client,
    /// API key sent with every request
    api_key: String,
    /// Base URL for the API (allows override for testing)
    base_url: String,
}

impl std::fmt::Debug for VisualCrossingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisualCrossingClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl VisualCrossingClient {
    /// Create a client for the public API with default HTTP settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_key)
    }

    /// Create a client with a custom HTTP client
    pub fn with_client(http_client: Client, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: VISUAL_CROSSING_BASE_URL.to_string(),
        }
    }

    /// Create a client whose HTTP requests give up after `timeout`
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Connect(e.to_string()))?;
        Ok(Self::with_client(http_client, api_key))
    }

    /// Point the client at a different API root (a mirror or a test server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the request URL for `location`
    ///
    /// The location becomes a single percent-encoded path segment.
    fn request_url(&self, location: &str) -> Result<Url, ProviderError> {
        let invalid = || ProviderError::Connect(format!("invalid provider base URL: {}", self.base_url));

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push(location);
        url.query_pairs_mut()
            .append_pair("unitGroup", UNIT_GROUP)
            .append_pair("key", &self.api_key)
            .append_pair("contentType", "json");
        Ok(url)
    }
}

#[async_trait]
impl WeatherProvider for VisualCrossingClient {
    async fn current_conditions(&self, location: &str) -> Result<ProviderResponse, ProviderError> {
        let url = self.request_url(location)?;

        // reqwest errors carry the URL, which includes the API key.
        let response = self.http_client.get(url).send().await.map_err(|e| {
            let e = e.without_url();
            tracing::warn!(location, error = %e, "weather provider request failed");
            ProviderError::Connect(e.to_string())
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            let e = e.without_url();
            tracing::warn!(location, %status, error = %e, "failed to read weather provider response");
            ProviderError::BadResponse(e.to_string())
        })?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(location, %status, error = %e, "failed to decode weather provider response");
            ProviderError::BadResponse(e.to_string())
        })
    }
}
