//! # Queue Courier
//!
//! Thin multi-provider client for managed message queues with support for
//! AWS SQS and an in-memory implementation.
//!
//! This library provides:
//! - Lazy queue-name resolution, memoized per client instance
//! - Chunked batch sends within the provider's batch cap
//! - Normalized inbound messages with raw or JSON-decoded bodies
//! - A provider capability trait so alternate backends can be injected
//!
//! ## Module Organization
//!
//! - [error] - Error types for all queue operations
//! - [message] - Message structures, queue names, and batch entries
//! - [provider] - Provider types and configuration
//! - [client] - Provider trait and the queue client

// Module declarations
pub mod client;
pub mod error;
pub mod message;
pub mod provider;
pub mod providers;

// Re-export commonly used types at crate root for convenience
pub use client::{QueueClient, QueueClientFactory, QueueProvider};
pub use error::{QueueError, ValidationError};
pub use message::{
    DeleteEntry, DeleteTarget, InboundMessage, MessageBody, ProviderMessage, QueueHandle,
    QueueName, SendEntry,
};
pub use provider::{AwsSqsConfig, InMemoryConfig, ProviderConfig, ProviderType, ReceiveOptions};
pub use providers::{AwsSqsProvider, InMemoryProvider};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
