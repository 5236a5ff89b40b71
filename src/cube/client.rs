//! Cube REST API Client
//!
//! HTTP client for the Cube `/meta` and `/load` endpoints.
//! Stateless apart from the base URL and credential: no retries, no caching.

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use super::error::{CubeError, CubeResult};
use super::types::{LoadRequest, Query, RawQueryResult, RawSchema};

/// Operations the gateway needs from the analytics backend
#[async_trait]
pub trait AnalyticsBackend: Send + Sync {
    /// Fetch the backend's full schema description
    async fn get_meta(&self) -> CubeResult<RawSchema>;

    /// Execute a query and return the raw result
    async fn run_query(&self, query: &Query) -> CubeResult<RawQueryResult>;
}

/// Configuration for the Cube client
#[derive(Clone)]
pub struct CubeClientConfig {
    /// Base URL of the Cube REST API (e.g., "http://cube:4000/cubejs-api/v1")
    pub base_url: String,
    /// API token sent in the `Authorization` header
    pub api_secret: Option<String>,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for CubeClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://cube:4000/cubejs-api/v1".to_string(),
            api_secret: None,
            request_timeout_ms: 30_000,
        }
    }
}

impl fmt::Debug for CubeClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CubeClientConfig")
            .field("base_url", &self.base_url)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

/// Cube REST API client
pub struct CubeClient {
    client: Client,
    config: CubeClientConfig,
}

impl CubeClient {
    /// Create a new Cube client with the given configuration
    ///
    /// A timeout of 0 falls back to the default timeout.
    pub fn new(mut config: CubeClientConfig) -> CubeResult<Self> {
        if config.request_timeout_ms == 0 {
            config.request_timeout_ms = CubeClientConfig::default().request_timeout_ms;
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| CubeError::Connection(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &CubeClientConfig {
        &self.config
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let request = self.client.request(method, url);

        match &self.config.api_secret {
            Some(secret) => request.header(AUTHORIZATION, secret),
            None => request,
        }
    }

    /// Send a request and return the status and raw body
    async fn send(&self, request: RequestBuilder) -> CubeResult<(StatusCode, String)> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        Ok((status, body))
    }
}

#[async_trait]
impl AnalyticsBackend for CubeClient {
    async fn get_meta(&self) -> CubeResult<RawSchema> {
        let (status, body) = self.send(self.request(Method::GET, "meta")).await?;

        if status.is_server_error() {
            return Err(CubeError::Connection(format!(
                "Cube returned {} for /meta: {}",
                status,
                error_message(&body)
            )));
        }
        if !status.is_success() {
            return Err(CubeError::Protocol(format!(
                "unexpected status {} for /meta: {}",
                status,
                error_message(&body)
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| CubeError::Protocol(format!("malformed /meta response: {}", e)))
    }

    async fn run_query(&self, query: &Query) -> CubeResult<RawQueryResult> {
        let request = self
            .request(Method::POST, "load")
            .json(&LoadRequest { query });
        let (status, body) = self.send(request).await?;

        if status.is_server_error() {
            return Err(CubeError::Connection(format!(
                "Cube returned {} for /load: {}",
                status,
                error_message(&body)
            )));
        }
        if !status.is_success() {
            return Err(CubeError::Query(error_message(&body)));
        }

        let result: RawQueryResult = serde_json::from_str(&body)
            .map_err(|e| CubeError::Protocol(format!("malformed /load response: {}", e)))?;

        match result.error {
            Some(error) if error == CONTINUE_WAIT => Err(CubeError::Connection(
                "Cube query still processing (no retries)".to_string(),
            )),
            Some(error) => Err(CubeError::Query(error)),
            None => Ok(result),
        }
    }
}

/// Cube's reply for a query that has not finished yet
const CONTINUE_WAIT: &str = "Continue wait";

/// Timeouts and network faults are both reported as connection errors
fn transport_error(e: reqwest::Error) -> CubeError {
    if e.is_timeout() {
        CubeError::Connection(format!("request to Cube timed out: {}", e))
    } else {
        CubeError::Connection(format!("Cube unreachable: {}", e))
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Extract the message from a Cube error body, falling back to the raw text
fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.error;
    }

    let text = body.trim();
    if text.is_empty() {
        "empty response body".to_string()
    } else {
        text.chars().take(512).collect()
    }
}
