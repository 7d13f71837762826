//! Error types for the API client

use std::time::Duration;
use thiserror::Error;

/// Transport-level failures
///
/// An HTTP response with any status code is not an error at this layer;
/// callers inspect [`ApiResponse::status`](crate::ApiResponse::status).
#[derive(Error, Debug)]
pub enum ClientError {
    /// Failed to build the HTTP client (TLS or proxy misconfiguration)
    #[error("failed to initialize HTTP client: {0}")]
    Init(String),

    /// Base URL could not be parsed
    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    /// Request did not complete within the configured timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection, protocol or body read failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}
