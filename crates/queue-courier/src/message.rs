//! Message types for queue operations including core domain identifiers.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

// ============================================================================
// Core Domain Identifiers
// ============================================================================

/// Validated queue name with length and character restrictions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueName(String);

impl QueueName {
    /// Create new queue name with validation
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();

        // Validate length (provider queue names top out at 80 characters)
        if name.is_empty() || name.len() > 80 {
            return Err(ValidationError::OutOfRange {
                field: "queue_name".to_string(),
                message: "must be 1-80 characters".to_string(),
            });
        }

        // Validate characters (ASCII alphanumeric, hyphens, underscores, dots)
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(ValidationError::InvalidFormat {
                field: "queue_name".to_string(),
                message: "only ASCII alphanumeric, hyphens, underscores, and dots allowed"
                    .to_string(),
            });
        }

        Ok(Self(name))
    }

    /// Get queue name as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QueueName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QueueName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Opaque handle to a resolved queue, obtained via name-based lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueHandle {
    url: String,
}

impl QueueHandle {
    /// Create new queue handle from a provider queue URL
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Get the provider queue URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// Message body in the decoding mode selected at receive time
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageBody {
    /// Body retained as raw text
    Raw(String),
    /// Body decoded as structured JSON
    Json(serde_json::Value),
}

impl MessageBody {
    /// Get raw text body, if any
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Self::Raw(text) => Some(text),
            Self::Json(_) => None,
        }
    }

    /// Get decoded JSON body, if any
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Raw(_) => None,
            Self::Json(value) => Some(value),
        }
    }
}

/// Wire representation of a message as returned by a provider receive call
#[derive(Debug, Clone, Default)]
pub struct ProviderMessage {
    pub message_id: String,
    pub receipt_handle: String,
    pub body: String,
    pub message_attributes: HashMap<String, String>,
    pub attributes: HashMap<String, String>,
}

/// Normalized representation of a message read from a queue.
///
/// Constructed per received message on every receive call; the caller owns it.
/// The receipt handle is the opaque token required to delete this delivery.
#[derive(Debug, Clone, Serialize)]
pub struct InboundMessage {
    pub message_id: String,
    pub receipt_handle: String,
    pub body: MessageBody,
    pub message_attributes: HashMap<String, String>,
    pub queue_url: String,
    pub attributes: HashMap<String, String>,
}

// ============================================================================
// Batch Entries
// ============================================================================

/// One entry of a batch-send call: correlation id, serialized body, and the
/// optional ordering group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendEntry {
    pub id: String,
    pub body: String,
    pub group_id: Option<String>,
}

/// One entry of a batch-delete call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteEntry {
    pub id: String,
    pub receipt_handle: String,
}

/// Anything exposing the identifier and receipt handle needed to delete a
/// received message
pub trait DeleteTarget {
    /// Provider-assigned message identifier
    fn message_id(&self) -> &str;

    /// Opaque token issued for this delivery
    fn receipt_handle(&self) -> &str;
}

impl DeleteTarget for InboundMessage {
    fn message_id(&self) -> &str {
        &self.message_id
    }

    fn receipt_handle(&self) -> &str {
        &self.receipt_handle
    }
}

impl DeleteTarget for DeleteEntry {
    fn message_id(&self) -> &str {
        &self.id
    }

    fn receipt_handle(&self) -> &str {
        &self.receipt_handle
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
