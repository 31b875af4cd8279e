//! HTTP transport
//!
//! The only place that talks to the network. Everything above it deals in
//! fully formed URLs and raw response bodies.

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::DistanceMatrixConfig;
use crate::error::DistanceMatrixError;
use crate::request::redact;

/// Fetches a URL and returns the raw response body
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a GET request for `url`
    async fn fetch(&self, url: &str) -> Result<String, DistanceMatrixError>;
}

/// reqwest-based transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout_secs: u64,
}

impl HttpTransport {
    /// Create a new HTTP transport
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &DistanceMatrixConfig) -> Result<Self, DistanceMatrixError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("distance-matrix-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DistanceMatrixError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip_all, fields(url = %redact(url)))]
    async fn fetch(&self, url: &str) -> Result<String, DistanceMatrixError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                DistanceMatrixError::Timeout {
                    timeout_secs: self.timeout_secs,
                }
            } else {
                DistanceMatrixError::ConnectionFailed(e.without_url().to_string())
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DistanceMatrixError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        if !status.is_success() {
            return Err(DistanceMatrixError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DistanceMatrixError::ParseError(e.without_url().to_string()))?;

        debug!(bytes = body.len(), "Response received");
        Ok(body)
    }
}
