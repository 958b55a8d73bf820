//! Upstream weather provider
//!
//! The lookup path only needs one thing from upstream: the current conditions
//! for a location string. [`WeatherProvider`] is that seam; the Visual Crossing
//! timeline API is the production implementation.

mod visual_crossing;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

pub use visual_crossing::{VisualCrossingClient, VISUAL_CROSSING_BASE_URL};

/// Errors that can occur when asking the provider for current conditions
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request could not be completed (DNS, connect, TLS, timeout)
    #[error("request to weather provider failed: {0}")]
    Connect(String),

    /// A response arrived but its body could not be read or decoded
    #[error("unusable response from weather provider: {0}")]
    BadResponse(String),
}

/// Current-conditions document returned by the provider
///
/// This is untrusted input, so every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResponse {
    /// The queried location as echoed back by the provider
    #[serde(default)]
    pub address: Option<String>,
    /// The provider's canonical name for the location
    #[serde(default)]
    pub resolved_address: Option<String>,
    #[serde(default)]
    pub current_conditions: Option<CurrentConditions>,
}

/// The `currentConditions` block of a provider response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CurrentConditions {
    /// Temperature in the provider's unit group
    #[serde(default)]
    pub temp: Option<f32>,
    /// Identifiers of the weather stations that contributed the reading
    #[serde(default)]
    pub stations: Option<Vec<String>>,
}

impl ProviderResponse {
    /// The reported temperature, if the response carried one
    pub fn temperature(&self) -> Option<f32> {
        self.current_conditions.as_ref().and_then(|c| c.temp)
    }

    /// Station identifiers in the order received
    pub fn stations(&self) -> &[String] {
        self.current_conditions
            .as_ref()
            .and_then(|c| c.stations.as_deref())
            .unwrap_or_default()
    }
}

/// Source of current weather conditions
///
/// Implementations are shared across concurrent requests and own their
/// transport policy (timeouts, TLS); callers never retry.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_conditions(&self, location: &str) -> Result<ProviderResponse, ProviderError>;
}
