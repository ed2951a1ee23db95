//! Error types for remote cluster API calls.

use thiserror::Error;

/// Error code the remote API uses for a missing cluster.
pub const RESOURCE_NOT_FOUND: &str = "ResourceNotFoundException";

/// Errors returned by the remote cluster API.
#[derive(Debug, Error)]
pub enum ClusterApiError {
    /// The cluster does not exist (or no longer exists).
    #[error("cluster not found: {0}")]
    NotFound(String),

    /// The remote API rejected the call.
    #[error("{code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// The call never produced a response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The configured base URL cannot address clusters.
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    /// The configured credentials cannot be sent.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
}

impl ClusterApiError {
    /// Create an API error from response details.
    pub fn api(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Returns true if the cluster does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClusterApiError::NotFound(_))
    }

    /// Returns true if repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClusterApiError::Api { status, .. } => *status == 429 || *status >= 500,
            ClusterApiError::Network(_) => true,
            _ => false,
        }
    }
}
