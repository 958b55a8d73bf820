//! Command-line interface parsing for the weather cache service
//!
//! Every option can also come from the environment, so the service can be
//! configured the usual container way (`VISUAL_CROSSING_API_KEY`,
//! `REDIS_CONNECTION_STRING`).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use thiserror::Error;

use crate::cache::StoreConfig;
use crate::lookup::DEFAULT_TTL;
use crate::provider::VISUAL_CROSSING_BASE_URL;

/// Error types for CLI argument validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    /// No Visual Crossing API key was supplied
    #[error("missing API key: pass --api-key or set VISUAL_CROSSING_API_KEY")]
    MissingApiKey,

    /// The Redis store was selected without a connection string
    #[error("missing Redis URL: pass --redis-url or set REDIS_CONNECTION_STRING")]
    MissingRedisUrl,

    /// A zero TTL would make every write expire immediately
    #[error("--ttl-secs must be greater than zero")]
    ZeroTtl,
}

/// Cache backend selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// Redis server (production)
    Redis,
    /// In-process map, lost on restart
    Memory,
    /// JSON files on local disk
    File,
}

/// Weather Cache - current temperatures served from a TTL cache
#[derive(Parser, Debug, Clone)]
#[command(name = "weather-cache")]
#[command(about = "Current-temperature lookups cached in front of the Visual Crossing API")]
#[command(version)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, env = "WEATHER_CACHE_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Visual Crossing API key
    #[arg(long, env = "VISUAL_CROSSING_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Root of the Visual Crossing timeline API
    #[arg(long, env = "VISUAL_CROSSING_BASE_URL", default_value = VISUAL_CROSSING_BASE_URL)]
    pub provider_url: String,

    /// Cache backend
    #[arg(long, value_enum, default_value_t = StoreKind::Redis)]
    pub store: StoreKind,

    /// Redis connection string, e.g. redis://127.0.0.1:6379/0
    #[arg(long, env = "REDIS_CONNECTION_STRING", hide_env_values = true)]
    pub redis_url: Option<String>,

    /// Directory for the file store (defaults to the XDG cache directory)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Seconds each cached alias stays valid
    #[arg(long, default_value_t = DEFAULT_TTL.as_secs())]
    pub ttl_secs: u64,

    /// Seconds before an upstream request is abandoned
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Look up a single location, print its temperature and exit
    ///
    /// Examples:
    ///   weather-cache --store memory --once London
    ///   weather-cache --once "Leeds, UK"
    #[arg(long, value_name = "LOCATION")]
    pub once: Option<String>,
}

/// Validated configuration derived from CLI arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub bind: SocketAddr,
    pub api_key: String,
    pub provider_url: String,
    pub store: StoreConfig,
    pub ttl: Duration,
    pub timeout: Duration,
    /// Single location to look up instead of serving HTTP
    pub once: Option<String>,
}

impl ServiceConfig {
    /// Creates a ServiceConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(ServiceConfig)` with the chosen backend and timings
    /// * `Err(CliError)` if a required value is missing or out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let api_key = cli
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or(CliError::MissingApiKey)?;

        if cli.ttl_secs == 0 {
            return Err(CliError::ZeroTtl);
        }

        let store = match cli.store {
            StoreKind::Redis => {
                let url = cli
                    .redis_url
                    .clone()
                    .filter(|url| !url.is_empty())
                    .ok_or(CliError::MissingRedisUrl)?;
                StoreConfig::Redis { url }
            }
            StoreKind::Memory => StoreConfig::Memory,
            StoreKind::File => StoreConfig::File {
                dir: cli.cache_dir.clone(),
            },
        };

        Ok(ServiceConfig {
            bind: cli.bind,
            api_key,
            provider_url: cli.provider_url.clone(),
            store,
            ttl: Duration::from_secs(cli.ttl_secs),
            timeout: Duration::from_secs(cli.timeout_secs),
            once: cli.once.clone(),
        })
    }
}
