//! Error types for queue operations.

use thiserror::Error;

/// Error type for all queue operations.
///
/// The client is a transparent relay: provider-level failures are surfaced
/// through [`QueueError::QueueNotFound`] and [`QueueError::Provider`] without
/// retry or reclassification. Local validation is limited to message typing
/// on send and JSON decoding on receive.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Unsupported queue provider: {provider}")]
    UnsupportedProvider { provider: String },

    #[error("Message at index {index} is neither a JSON object nor a string")]
    InvalidMessageType { index: usize },

    #[error("Failed to decode body of message '{message_id}' as JSON")]
    MalformedBody {
        message_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Queue not found: {queue_name}")]
    QueueNotFound { queue_name: String },

    #[error("Provider error ({provider}): {code} - {message}")]
    Provider {
        provider: String,
        code: String,
        message: String,
    },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Validation errors for queue names and other inputs
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    Required { field: String },

    #[error("Invalid format for {field}: {message}")]
    InvalidFormat { field: String, message: String },

    #[error("Value out of range for {field}: {message}")]
    OutOfRange { field: String, message: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
