//! Error types for the Indexify SDK.

use thiserror::Error;

/// SDK operation errors
#[derive(Debug, Error)]
pub enum SdkError {
    /// Caller passed an argument of the wrong shape; nothing was sent
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Client or TLS configuration is incomplete or unreadable
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Could not reach the service (network, DNS, TLS handshake)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request exceeded its timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Any other transport failure
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The service answered with a non-2xx status
    #[error("API error (HTTP {status}): {body}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body, kept for diagnostics
        body: String,
    },

    /// The service answered with JSON of an unexpected shape
    #[error("Unexpected response: {0}")]
    DecodeError(String),

    /// Local file access failed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The client connection was closed
    #[error("Client connection closed - create a new client")]
    NotConnected,
}

impl SdkError {
    /// HTTP status for API errors
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SdkError::Timeout(e.to_string())
        } else if e.is_connect() {
            SdkError::ConnectionError(e.to_string())
        } else if e.is_decode() {
            SdkError::DecodeError(e.to_string())
        } else if e.is_builder() {
            SdkError::ConfigError(e.to_string())
        } else {
            SdkError::HttpError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::DecodeError(format!("JSON parsing error: {}", e))
    }
}

impl From<toml::de::Error> for SdkError {
    fn from(e: toml::de::Error) -> Self {
        SdkError::ConfigError(format!("Invalid TLS config: {}", e))
    }
}
