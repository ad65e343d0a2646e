//! Error types shared by every *arr client.

use thiserror::Error;

use crate::http::HttpError;

/// Errors that can occur when talking to a Sonarr/Radarr/Lidarr/Readarr server.
#[derive(Debug, Error)]
pub enum StarrError {
    /// The server answered with a non-2xx status.
    #[error("invalid status code ({status}): {message}")]
    InvalidStatusCode { status: u16, message: String },

    /// The request never produced a response (connection, TLS, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(String),

    /// A payload could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A successful response body did not match the expected type.
    #[error("{request}: JSON error: {source}")]
    Decode {
        request: String,
        #[source]
        source: serde_json::Error,
    },

    /// The caller's cancellation token fired while the request was in flight.
    #[error("request cancelled")]
    Cancelled,

    /// Input rejected before any request was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid client configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<HttpError> for StarrError {
    fn from(err: HttpError) -> Self {
        StarrError::Transport(err.to_string())
    }
}

impl StarrError {
    /// Create an invalid request error.
    #[inline]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// The HTTP status, if the server answered.
    #[inline]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidStatusCode { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is the invalid status code sentinel.
    #[inline]
    pub fn is_invalid_status(&self) -> bool {
        matches!(self, Self::InvalidStatusCode { .. })
    }

    /// Whether the request was cancelled by the caller.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::InvalidStatusCode { status, .. } => matches!(status, 429 | 502 | 503 | 504),
            _ => false,
        }
    }
}

/// Get a short error message suitable for display.
pub fn short_error_message(err: &StarrError) -> String {
    match err {
        StarrError::InvalidStatusCode { status, message } => {
            if message.chars().count() > 50 {
                let truncated: String = message.chars().take(47).collect();
                format!("HTTP {}: {}...", status, truncated)
            } else if message.is_empty() {
                format!("HTTP {}", status)
            } else {
                format!("HTTP {}: {}", status, message)
            }
        }
        StarrError::Transport(_) => "Network error".to_string(),
        StarrError::Json(_) | StarrError::Decode { .. } => "JSON parse error".to_string(),
        StarrError::Cancelled => "Cancelled".to_string(),
        StarrError::InvalidRequest(msg) => format!("Invalid request: {}", msg),
        StarrError::Config(msg) => format!("Config: {}", msg),
    }
}

/// Result type for *arr operations.
pub type Result<T> = std::result::Result<T, StarrError>;
