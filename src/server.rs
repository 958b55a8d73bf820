//! HTTP surface for temperature lookups
//!
//! `GET /?location=LOC` answers with the temperature as a plain-text body.
//! A missing or empty location is a 400; every other failure is a 500 whose
//! body is the error message.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::lookup::{Lookup, LookupError};

/// Query string of the lookup endpoint
#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    #[serde(default)]
    pub location: Option<String>,
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        let status = match &self {
            LookupError::InvalidInput => {
                tracing::debug!("rejected lookup without a location");
                StatusCode::BAD_REQUEST
            }
            LookupError::Cache(e) => {
                tracing::error!(error = %e, "cache store failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            LookupError::ProviderUnavailable | LookupError::ProviderBadResponse => {
                tracing::error!(error = %self, "weather provider failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}

async fn current_temperature(
    State(lookup): State<Lookup>,
    Query(query): Query<WeatherQuery>,
) -> Result<String, LookupError> {
    let location = query.location.unwrap_or_default();
    lookup.lookup(&location).await
}

async fn health() -> &'static str {
    "ok"
}

/// Builds the service router around a shared [`Lookup`]
pub fn router(lookup: Lookup) -> Router {
    Router::new()
        .route("/", get(current_temperature))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(lookup)
}

/// Serves lookups on `listener` until the process is stopped
pub async fn serve(listener: TcpListener, lookup: Lookup) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "weather cache listening");
    }
    axum::serve(listener, router(lookup)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::StoreError;

    #[test]
    fn test_invalid_input_is_bad_request() {
        let response = LookupError::InvalidInput.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_and_cache_errors_are_server_errors() {
        let errors = [
            LookupError::ProviderUnavailable,
            LookupError::ProviderBadResponse,
            LookupError::Cache(StoreError::Io(std::io::Error::other("down"))),
        ];
        for error in errors {
            assert_eq!(
                error.into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }
}
