//! Distance matrix error types

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur while computing a distance matrix
#[derive(Debug, Error)]
pub enum DistanceMatrixError {
    /// Client could not be constructed from its configuration
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Request input was rejected before any call was made
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A domain value could not be constructed
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Connection to the distance matrix service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request to the service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from the service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// HTTP-level rate limit (429)
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by the service)
        retry_after_secs: Option<u64>,
    },

    /// A single call exceeded the transport timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// `INVALID_REQUEST`: the service rejected the request as malformed
    #[error("Invalid request: the service rejected the query")]
    InvalidRequest,

    /// `MAX_ELEMENTS_EXCEEDED`: origins x destinations over the per-call limit
    #[error("Max elements exceeded: product of origins and destinations exceeds the per-call limit")]
    MaxElementsExceeded,

    /// `OVER_QUERY_LIMIT`: too many elements within the allowed time period
    #[error("Over query limit: too many requests within the allowed time period")]
    OverQueryLimit,

    /// `REQUEST_DENIED`: the service refused to serve this client
    #[error("Request denied: {}", .message.as_deref().unwrap_or("no reason given"))]
    RequestDenied {
        /// `error_message` field returned alongside the status, if any
        message: Option<String>,
    },

    /// Any other top-level status, e.g. `UNKNOWN_ERROR`
    #[error("Service error: {status}")]
    ServiceError {
        /// Raw status string from the response
        status: String,
    },

    /// Response carried a different number of rows than origins sent
    #[error("Invalid response: expected {expected} rows, got {actual}")]
    RowCountMismatch {
        /// Origins in the call
        expected: usize,
        /// Rows in the response
        actual: usize,
    },

    /// A row carried a different number of elements than destinations sent
    #[error("Invalid response: row {row} expected {expected} elements, got {actual}")]
    ElementCountMismatch {
        /// Row index within the call
        row: usize,
        /// Destinations in the call
        expected: usize,
        /// Elements in the row
        actual: usize,
    },

    /// An element reported a non-OK status (strict element mode only)
    #[error("Element ({origin_index}, {destination_index}) failed with status {status}")]
    ElementFailed {
        /// Index into the full origin list
        origin_index: usize,
        /// Index into the full destination list
        destination_index: usize,
        /// Element status string
        status: String,
    },

    /// The invocation deadline passed before all calls completed
    #[error("Deadline exceeded before the distance matrix was complete")]
    DeadlineExceeded,

    /// The caller cancelled the invocation
    #[error("Distance matrix request cancelled")]
    Cancelled,
}

impl DistanceMatrixError {
    /// Returns true if the caller may reasonably retry the whole request
    ///
    /// The client itself never retries.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::Timeout { .. }
                | Self::RateLimitExceeded { .. }
                | Self::OverQueryLimit
                | Self::ServiceError { .. }
        )
    }

    /// Map a top-level response status to its error, `None` for `OK`
    #[must_use]
    pub fn from_status(status: &str, message: Option<String>) -> Option<Self> {
        match status {
            "OK" => None,
            "INVALID_REQUEST" => Some(Self::InvalidRequest),
            "MAX_ELEMENTS_EXCEEDED" => Some(Self::MaxElementsExceeded),
            "OVER_QUERY_LIMIT" => Some(Self::OverQueryLimit),
            "REQUEST_DENIED" => Some(Self::RequestDenied { message }),
            other => Some(Self::ServiceError {
                status: other.to_string(),
            }),
        }
    }
}
