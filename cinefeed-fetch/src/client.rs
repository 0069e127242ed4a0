//! HTTP client abstractions.

use cinefeed_core::TransportError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Thin HTTP wrapper that performs JSON GETs and raises [`TransportError`].
///
/// Deliberately retry-free: failed loads are surfaced as edge state and
/// retried at the caller's discretion, never transparently here.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    /// Creates a new HTTP client with the default timeout.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cinefeed/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self { inner: client })
    }

    /// Performs a GET request and decodes the JSON body.
    ///
    /// Non-success statuses become [`TransportError::Status`]; undecodable
    /// bodies become [`TransportError::Decode`].
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, TransportError> {
        debug!(path = url.path(), "Making GET request");

        let response = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(path = response.url().path(), status = status.as_u16(), "Request failed");
            return Err(TransportError::Status {
                code: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport_error)?;
        serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// Maps a reqwest error into the transport failure taxonomy.
///
/// Timeout is checked before connect: reqwest reports a timed-out connect
/// attempt as both.
fn transport_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else if err.is_decode() {
        TransportError::Decode(err.to_string())
    } else if let Some(status) = err.status() {
        TransportError::Status {
            code: status.as_u16(),
        }
    } else if err.is_request() || err.is_body() {
        TransportError::Io(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
