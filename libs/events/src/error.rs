//! Error types for envelope handling.

use thiserror::Error;

/// Errors that can occur when decoding or reading an envelope.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    /// A field required for this request type is missing.
    #[error("missing {field} for {request_type} request")]
    MissingField {
        field: &'static str,
        request_type: String,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl EventError {
    /// Returns true if the envelope lacked a required field.
    pub fn is_missing_field(&self) -> bool {
        matches!(self, EventError::MissingField { .. })
    }
}

impl From<serde_json::Error> for EventError {
    fn from(err: serde_json::Error) -> Self {
        EventError::Serialization(err.to_string())
    }
}
