//! Cache-aside temperature lookup
//!
//! A lookup reads the cache under the literal location string. On a miss it
//! asks the provider, then writes the formatted temperature under every alias
//! the response names: the echoed `address`, the `resolvedAddress`, and each
//! station identifier, in that order.
//!
//! The literal query key is only written when it equals one of those aliases.
//! A query the provider echoes back differently (`"london"` answered with
//! `address: "London"`) therefore misses on every request.
//!
//! Absent `address` or `resolvedAddress` fields contribute no alias, so no
//! entry is ever written under an empty key. A response without a finite
//! current temperature is rejected as a bad response before anything is
//! written.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::cache::{CacheStore, StoreError};
use crate::provider::{ProviderError, ProviderResponse, WeatherProvider};

/// How long each alias stays cached after it is written
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Ways a lookup can fail; every one of them ends the lookup
#[derive(Debug, Error)]
pub enum LookupError {
    /// The location was empty
    #[error("missing location query parameter")]
    InvalidInput,

    /// The cache store failed on a read or a write
    #[error("cache error: {0}")]
    Cache(#[from] StoreError),

    /// The provider could not be reached
    #[error("failed to connect to the Visual Crossing API")]
    ProviderUnavailable,

    /// The provider answered with something unusable
    #[error("something happened with the response from the Visual Crossing API")]
    ProviderBadResponse,
}

impl From<ProviderError> for LookupError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Connect(_) => LookupError::ProviderUnavailable,
            ProviderError::BadResponse(_) => LookupError::ProviderBadResponse,
        }
    }
}

/// Renders a temperature the way it is stored and returned
///
/// Shortest decimal that round-trips through `f32`, with no exponent and no
/// leading `+`: `7.5` is `"7.5"`, `12.0` is `"12"`.
pub fn format_temperature(temp: f32) -> String {
    temp.to_string()
}

/// Cache keys for one provider response, in write order
///
/// Duplicates are kept; writing the same key twice is harmless.
fn alias_set(response: &ProviderResponse) -> Vec<&str> {
    response
        .address
        .as_deref()
        .into_iter()
        .chain(response.resolved_address.as_deref())
        .chain(response.stations().iter().map(String::as_str))
        .collect()
}

/// Answers temperature lookups from a cache store backed by a provider
///
/// Cheap to clone; clones share the same store and provider.
#[derive(Clone)]
pub struct Lookup {
    store: Arc<dyn CacheStore>,
    provider: Arc<dyn WeatherProvider>,
    ttl: Duration,
}

impl Lookup {
    pub fn new(store: Arc<dyn CacheStore>, provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            store,
            provider,
            ttl: DEFAULT_TTL,
        }
    }

    /// Override the per-alias time-to-live
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Returns the current temperature at `location` as a decimal string
    ///
    /// A cache hit is returned untouched. A miss calls the provider once and
    /// writes every alias before returning; if a write fails the earlier
    /// writes stay in place and the lookup fails.
    pub async fn lookup(&self, location: &str) -> Result<String, LookupError> {
        if location.is_empty() {
            return Err(LookupError::InvalidInput);
        }

        if let Some(value) = self.store.get(location).await? {
            tracing::debug!(location, "cache hit");
            return Ok(value);
        }
        tracing::debug!(location, "cache miss");

        let response = self.provider.current_conditions(location).await?;
        let Some(temp) = response.temperature() else {
            tracing::warn!(location, "provider response has no current temperature");
            return Err(LookupError::ProviderBadResponse);
        };
        // Out-of-range JSON numbers decode to infinity.
        if !temp.is_finite() {
            tracing::warn!(location, %temp, "provider temperature is out of range");
            return Err(LookupError::ProviderBadResponse);
        }
        let value = format_temperature(temp);

        let aliases = alias_set(&response);
        for alias in &aliases {
            self.store.set(alias, &value, self.ttl).await?;
        }
        tracing::info!(location, aliases = aliases.len(), temperature = %value, "cached current conditions");

        Ok(value)
    }
}
