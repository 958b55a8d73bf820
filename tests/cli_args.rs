//! Integration tests for CLI argument handling
//!
//! Runs the built binary; `--once` exercises a whole lookup without
//! starting the HTTP server.

use std::process::{Command, Output};

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to run the CLI with given args and capture output
///
/// Environment configuration is cleared so the host cannot leak keys or
/// Redis URLs into the run.
fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_weather-cache"))
        .args(args)
        .env_remove("VISUAL_CROSSING_API_KEY")
        .env_remove("VISUAL_CROSSING_BASE_URL")
        .env_remove("REDIS_CONNECTION_STRING")
        .env_remove("WEATHER_CACHE_BIND")
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute weather-cache")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success(), "Expected --help to exit successfully");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("weather-cache"), "Help should mention weather-cache");
    assert!(stdout.contains("--api-key"), "Help should mention --api-key");
    assert!(stdout.contains("--once"), "Help should mention --once");
}

#[test]
fn test_missing_api_key_fails() {
    let output = run_cli(&["--store", "memory", "--once", "Leeds"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("VISUAL_CROSSING_API_KEY"),
        "Should explain how to provide the key: {}",
        stderr
    );
}

#[test]
fn test_redis_store_requires_url() {
    let output = run_cli(&["--api-key", "k", "--once", "Leeds"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("REDIS_CONNECTION_STRING"), "{}", stderr);
}

#[test]
fn test_once_with_empty_location_is_rejected() {
    let output = run_cli(&["--api-key", "k", "--store", "memory", "--once", ""]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing location query parameter"), "{}", stderr);
}

#[tokio::test]
async fn test_once_prints_temperature_from_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/timeline/Leeds"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "address": "Leeds",
            "resolvedAddress": "Leeds, England, United Kingdom",
            "currentConditions": { "temp": 7.5, "stations": ["EGNM"] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = format!("{}/timeline", server.uri());
    let output = tokio::task::spawn_blocking(move || {
        run_cli(&[
            "--api-key",
            "test-key",
            "--store",
            "memory",
            "--provider-url",
            &base_url,
            "--once",
            "Leeds",
        ])
    })
    .await
    .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "7.5");
}

#[tokio::test]
async fn test_once_reports_bad_provider_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid location parameter value."))
        .mount(&server)
        .await;

    let base_url = format!("{}/timeline", server.uri());
    let output = tokio::task::spawn_blocking(move || {
        run_cli(&[
            "--api-key",
            "test-key",
            "--store",
            "memory",
            "--provider-url",
            &base_url,
            "--once",
            "Atlantis",
        ])
    })
    .await
    .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("something happened with the response from the Visual Crossing API"),
        "{}",
        stderr
    );
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use weather_cache::cli::{Cli, StoreKind};

    #[test]
    fn test_cli_store_values() {
        for (arg, kind) in [
            ("redis", StoreKind::Redis),
            ("memory", StoreKind::Memory),
            ("file", StoreKind::File),
        ] {
            let cli = Cli::parse_from(["weather-cache", "--store", arg]);
            assert_eq!(cli.store, kind);
        }
    }

    #[test]
    fn test_cli_once_keeps_location_verbatim() {
        let cli = Cli::parse_from(["weather-cache", "--once", "  new york  "]);
        assert_eq!(cli.once.as_deref(), Some("  new york  "));
    }

    #[test]
    fn test_cli_cache_dir() {
        let cli = Cli::parse_from(["weather-cache", "--store", "file", "--cache-dir", "/var/cache/wc"]);
        assert_eq!(cli.cache_dir.as_deref(), Some(std::path::Path::new("/var/cache/wc")));
    }
}
