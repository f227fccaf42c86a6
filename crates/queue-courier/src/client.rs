//! Provider trait and queue client implementation.

use crate::error::QueueError;
use crate::message::{
    DeleteEntry, DeleteTarget, InboundMessage, MessageBody, ProviderMessage, QueueHandle,
    QueueName, SendEntry,
};
use crate::provider::{ProviderConfig, ProviderType, ReceiveOptions};
use crate::providers::{AwsSqsProvider, InMemoryProvider};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

/// Capability contract implemented by queue providers (AWS SQS, in-memory).
///
/// Every method maps to exactly one provider call; batching, chunking, and
/// empty-input guards are the client's responsibility.
#[async_trait]
pub trait QueueProvider: Send + Sync {
    /// Resolve a queue name to a handle. Fails if no such queue exists.
    async fn get_queue_by_name(&self, queue: &QueueName) -> Result<QueueHandle, QueueError>;

    /// Issue one receive call against the queue
    async fn receive_messages(
        &self,
        handle: &QueueHandle,
        options: &ReceiveOptions,
    ) -> Result<Vec<ProviderMessage>, QueueError>;

    /// Issue one batch-delete call. Entries must be non-empty and within the
    /// batch cap; the provider rejects anything else.
    async fn delete_messages(
        &self,
        handle: &QueueHandle,
        entries: &[DeleteEntry],
    ) -> Result<(), QueueError>;

    /// Issue one batch-send call. Entries must be non-empty and within the
    /// batch cap; the provider rejects anything else.
    async fn send_messages(
        &self,
        handle: &QueueHandle,
        entries: &[SendEntry],
    ) -> Result<(), QueueError>;

    /// Maximum entries accepted per batch call
    fn max_batch_size(&self) -> usize;

    /// Get provider type
    fn provider_type(&self) -> ProviderType;
}

/// Thin client over a queue provider with lazy, memoized queue resolution.
///
/// A queue name maps to at most one handle for the lifetime of the client;
/// resolved entries are never replaced or invalidated. Callers needing a
/// fresh handle create a new client.
pub struct QueueClient {
    provider: Arc<dyn QueueProvider>,
    queues: Mutex<HashMap<QueueName, QueueHandle>>,
}

impl QueueClient {
    /// Create new client over the given provider
    pub fn new(provider: Arc<dyn QueueProvider>) -> Self {
        Self {
            provider,
            queues: Mutex::new(HashMap::new()),
        }
    }

    /// Get provider type
    pub fn provider_type(&self) -> ProviderType {
        self.provider.provider_type()
    }

    /// Resolve a queue name to a handle, invoking the provider lookup at most
    /// once per name for the lifetime of the client.
    ///
    /// The cache lock is held across the provider call so concurrent
    /// first-time resolutions of the same name cannot race into duplicate
    /// lookups.
    pub async fn resolve_queue(&self, queue: &QueueName) -> Result<QueueHandle, QueueError> {
        let mut queues = self.queues.lock().await;

        if let Some(handle) = queues.get(queue) {
            return Ok(handle.clone());
        }

        let handle = self.provider.get_queue_by_name(queue).await?;
        queues.insert(queue.clone(), handle.clone());

        Ok(handle)
    }

    /// Receive messages from the queue with one provider call.
    ///
    /// Returns exactly what the single call yields; the provider does not
    /// guarantee all available messages are returned in one call and no
    /// pagination is attempted. With `parse_json` set, a body that fails to
    /// decode aborts the whole call with [`QueueError::MalformedBody`].
    pub async fn receive(
        &self,
        queue: &QueueName,
        options: &ReceiveOptions,
    ) -> Result<Vec<InboundMessage>, QueueError> {
        let handle = self.resolve_queue(queue).await?;
        let raw = self.provider.receive_messages(&handle, options).await?;

        let mut messages = Vec::with_capacity(raw.len());
        for msg in raw {
            let body = if options.parse_json {
                let value =
                    serde_json::from_str(&msg.body).map_err(|source| QueueError::MalformedBody {
                        message_id: msg.message_id.clone(),
                        source,
                    })?;
                MessageBody::Json(value)
            } else {
                MessageBody::Raw(msg.body)
            };

            messages.push(InboundMessage {
                message_id: msg.message_id,
                receipt_handle: msg.receipt_handle,
                body,
                message_attributes: msg.message_attributes,
                queue_url: handle.url().to_string(),
                attributes: msg.attributes,
            });
        }

        debug!(queue = %queue, count = messages.len(), "received messages");
        Ok(messages)
    }

    /// Delete previously received messages with one batch call.
    ///
    /// An empty input is a deliberate no-op: the provider rejects empty
    /// batch-delete requests. Provider-side partial failures are not
    /// inspected; the call either succeeds or relays the provider failure.
    pub async fn delete<M>(&self, queue: &QueueName, messages: &[M]) -> Result<(), QueueError>
    where
        M: DeleteTarget + Sync,
    {
        if messages.is_empty() {
            debug!(queue = %queue, "no messages to delete");
            return Ok(());
        }

        let handle = self.resolve_queue(queue).await?;
        let entries: Vec<DeleteEntry> = messages
            .iter()
            .map(|msg| DeleteEntry {
                id: msg.message_id().to_string(),
                receipt_handle: msg.receipt_handle().to_string(),
            })
            .collect();

        self.provider.delete_messages(&handle, &entries).await?;

        debug!(queue = %queue, count = entries.len(), "deleted messages");
        Ok(())
    }

    /// Send messages to the queue, chunking at the provider's batch cap.
    ///
    /// Each element must be a JSON object (serialized before sending) or a
    /// string (passed through unchanged); anything else aborts the whole call
    /// with [`QueueError::InvalidMessageType`] before any provider
    /// interaction. Every entry gets a fresh random correlation id, and
    /// `group_id` is attached to all entries when supplied. Chunks go out
    /// sequentially in input order; if a later chunk fails, earlier chunks
    /// are not undone.
    pub async fn send(
        &self,
        queue: &QueueName,
        messages: &[Value],
        group_id: Option<&str>,
    ) -> Result<(), QueueError> {
        if messages.is_empty() {
            debug!(queue = %queue, "no messages to send");
            return Ok(());
        }

        // Validate and serialize the whole batch before any provider call
        let mut entries = Vec::with_capacity(messages.len());
        for (index, message) in messages.iter().enumerate() {
            let body = match message {
                Value::String(text) => text.clone(),
                Value::Object(_) => serde_json::to_string(message)?,
                _ => return Err(QueueError::InvalidMessageType { index }),
            };

            entries.push(SendEntry {
                id: correlation_id(),
                body,
                group_id: group_id.map(str::to_string),
            });
        }

        let handle = self.resolve_queue(queue).await?;
        for chunk in entries.chunks(self.provider.max_batch_size()) {
            self.provider.send_messages(&handle, chunk).await?;
        }

        debug!(queue = %queue, count = entries.len(), "sent messages");
        Ok(())
    }
}

/// Short random id distinguishing entries within one batch call.
///
/// Not a durable message identifier; collision probability within a single
/// call is accepted as negligible.
fn correlation_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Factory for creating queue clients with appropriate providers
pub struct QueueClientFactory;

impl QueueClientFactory {
    /// Create queue client from provider configuration
    pub async fn create_client(config: ProviderConfig) -> Result<QueueClient, QueueError> {
        let provider: Arc<dyn QueueProvider> = match config {
            ProviderConfig::AwsSqs(aws_config) => {
                Arc::new(AwsSqsProvider::from_config(&aws_config).await)
            }
            ProviderConfig::InMemory(memory_config) => {
                Arc::new(InMemoryProvider::new(memory_config))
            }
        };

        Ok(QueueClient::new(provider))
    }

    /// Create test client with in-memory provider
    pub fn create_test_client() -> QueueClient {
        QueueClient::new(Arc::new(InMemoryProvider::default()))
    }
}
