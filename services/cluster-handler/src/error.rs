//! Error types for lifecycle operations.

use kubeprov_cluster_api::ClusterApiError;
use kubeprov_events::EventError;
use thiserror::Error;

/// Result type for lifecycle operations.
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Errors that abort a lifecycle activation.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The requested configuration can never be applied. Not retryable.
    #[error("validation error: {0}")]
    Validation(String),

    /// The remote cluster API failed.
    #[error(transparent)]
    Api(#[from] ClusterApiError),

    /// The envelope is unusable for the requested operation.
    #[error(transparent)]
    Event(#[from] EventError),
}

impl HandlerError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Returns true if the remote API reported the cluster missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, HandlerError::Api(e) if e.is_not_found())
    }

    /// Returns true if re-invoking the same activation may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            HandlerError::Api(e) => e.is_retryable(),
            HandlerError::Validation(_) | HandlerError::Event(_) => false,
        }
    }
}
