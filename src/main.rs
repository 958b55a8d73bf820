//! Weather Cache - current temperatures served from a TTL cache
//!
//! Starts the HTTP service, or with `--once LOCATION` performs a single
//! lookup and prints the temperature.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use weather_cache::cli::{Cli, ServiceConfig};
use weather_cache::{cache, server, Lookup, VisualCrossingClient};

/// Logs go to stderr so `--once` keeps stdout for the temperature alone.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_cache=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = ServiceConfig::from_cli(&cli)?;

    let store = cache::open(&config.store)
        .await
        .context("failed to open cache store")?;
    let provider = VisualCrossingClient::with_timeout(config.api_key.clone(), config.timeout)
        .context("failed to build HTTP client")?
        .with_base_url(config.provider_url.clone());
    let lookup = Lookup::new(store, Arc::new(provider)).with_ttl(config.ttl);

    if let Some(location) = &config.once {
        let temperature = lookup.lookup(location).await?;
        println!("{temperature}");
        return Ok(());
    }

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    server::serve(listener, lookup).await?;

    Ok(())
}
