//! Weather Cache Library
//!
//! Answers "what is the current temperature at LOCATION?" from a TTL cache
//! sitting in front of the Visual Crossing API. A cache miss fans the upstream
//! response out under every alias the provider reports for the location.

pub mod cache;
pub mod cli;
pub mod lookup;
pub mod provider;
pub mod server;

pub use cache::{CacheStore, FileStore, MemoryStore, RedisStore, StoreConfig, StoreError};
pub use lookup::{format_temperature, Lookup, LookupError, DEFAULT_TTL};
pub use provider::{ProviderError, ProviderResponse, VisualCrossingClient, WeatherProvider};
