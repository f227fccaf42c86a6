//! Provider types and configuration.

use crate::error::QueueError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Enumeration of supported queue providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderType {
    AwsSqs,
    InMemory,
}

impl ProviderType {
    /// Get provider name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwsSqs => "aws-sqs",
            Self::InMemory => "in-memory",
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aws" | "aws-sqs" | "sqs" => Ok(Self::AwsSqs),
            "memory" | "in-memory" => Ok(Self::InMemory),
            other => Err(QueueError::UnsupportedProvider {
                provider: other.to_string(),
            }),
        }
    }
}

/// Provider-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProviderConfig {
    AwsSqs(AwsSqsConfig),
    InMemory(InMemoryConfig),
}

/// AWS SQS configuration.
///
/// Credentials and any unset fields resolve through the SDK's default chain
/// (environment, profile, instance metadata).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwsSqsConfig {
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
}

/// In-memory provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InMemoryConfig {
    /// Maximum entries accepted per batch call
    pub max_batch_size: usize,
    /// Queues registered at construction so name lookups succeed
    pub queues: Vec<String>,
}

impl Default for InMemoryConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 10,
            queues: Vec::new(),
        }
    }
}

/// Configuration options for receiving messages from queues
#[derive(Debug, Clone)]
pub struct ReceiveOptions {
    /// System attributes to retrieve with each message (default: all)
    pub attribute_names: Vec<String>,
    /// Maximum number of messages to request; the provider enforces its own
    /// hard ceiling independent of this value (default: 10)
    pub max_messages: u32,
    /// Long-poll wait bound in seconds (default: 10)
    pub wait_time_seconds: u32,
    /// Decode message bodies as JSON instead of retaining raw text
    /// (default: false)
    pub parse_json: bool,
}

impl Default for ReceiveOptions {
    fn default() -> Self {
        Self {
            attribute_names: vec!["All".to_string()],
            max_messages: 10,
            wait_time_seconds: 10,
            parse_json: false,
        }
    }
}

impl ReceiveOptions {
    /// Create new receive options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Select which system attributes to retrieve
    pub fn with_attribute_names(mut self, names: Vec<String>) -> Self {
        self.attribute_names = names;
        self
    }

    /// Set maximum number of messages to request
    pub fn with_max_messages(mut self, max: u32) -> Self {
        self.max_messages = max;
        self
    }

    /// Set long-poll wait bound
    pub fn with_wait_time_seconds(mut self, seconds: u32) -> Self {
        self.wait_time_seconds = seconds;
        self
    }

    /// Decode message bodies as JSON
    pub fn parse_json(mut self) -> Self {
        self.parse_json = true;
        self
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
