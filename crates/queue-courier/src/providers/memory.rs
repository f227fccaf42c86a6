//! In-memory queue provider for testing.

use crate::client::QueueProvider;
use crate::error::QueueError;
use crate::message::{DeleteEntry, ProviderMessage, QueueHandle, QueueName, SendEntry};
use crate::provider::{InMemoryConfig, ProviderType, ReceiveOptions};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;

const PROVIDER_NAME: &str = "in-memory";

#[derive(Debug, Default)]
struct QueueState {
    messages: Vec<ProviderMessage>,
    lookup_count: u64,
}

/// In-memory queue provider backed by per-queue message vectors.
///
/// Queues must be registered (via config or [`create_queue`]) before name
/// lookups succeed, mirroring the real provider's behavior for missing
/// queues. Recorded batches and lookup counts let tests assert exactly how
/// the client drove the provider.
///
/// [`create_queue`]: InMemoryProvider::create_queue
pub struct InMemoryProvider {
    queues: RwLock<HashMap<String, QueueState>>,
    send_batches: RwLock<Vec<Vec<SendEntry>>>,
    delete_batches: RwLock<Vec<Vec<DeleteEntry>>>,
    max_batch_size: usize,
    next_message_id: AtomicU64,
}

impl InMemoryProvider {
    /// Create provider with the given configuration
    pub fn new(config: InMemoryConfig) -> Self {
        let queues = config
            .queues
            .into_iter()
            .map(|name| (name, QueueState::default()))
            .collect();

        Self {
            queues: RwLock::new(queues),
            send_batches: RwLock::new(Vec::new()),
            delete_batches: RwLock::new(Vec::new()),
            max_batch_size: config.max_batch_size,
            next_message_id: AtomicU64::new(1),
        }
    }

    /// Register a queue so subsequent name lookups succeed
    pub fn create_queue(&self, name: &str) {
        let mut queues = self.queues.write().unwrap();
        queues.entry(name.to_string()).or_default();
    }

    /// Push a message directly onto a registered queue
    pub fn push_message(&self, name: &str, body: impl Into<String>) {
        let id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        let mut queues = self.queues.write().unwrap();
        if let Some(state) = queues.get_mut(name) {
            state.messages.push(ProviderMessage {
                message_id: format!("msg-{id}"),
                receipt_handle: format!("receipt-{id}"),
                body: body.into(),
                ..Default::default()
            });
        }
    }

    /// Number of name lookups issued against the given queue
    pub fn lookup_count(&self, name: &str) -> u64 {
        let queues = self.queues.read().unwrap();
        queues.get(name).map(|state| state.lookup_count).unwrap_or(0)
    }

    /// Batches recorded by [`send_messages`], in call order
    ///
    /// [`send_messages`]: QueueProvider::send_messages
    pub fn send_batches(&self) -> Vec<Vec<SendEntry>> {
        self.send_batches.read().unwrap().clone()
    }

    /// Batches recorded by [`delete_messages`], in call order
    ///
    /// [`delete_messages`]: QueueProvider::delete_messages
    pub fn delete_batches(&self) -> Vec<Vec<DeleteEntry>> {
        self.delete_batches.read().unwrap().clone()
    }

    fn queue_name_from_handle(handle: &QueueHandle) -> &str {
        handle
            .url()
            .strip_prefix("memory://")
            .unwrap_or_else(|| handle.url())
    }

    fn check_batch<T>(&self, entries: &[T]) -> Result<(), QueueError> {
        if entries.is_empty() {
            return Err(provider_error("EmptyBatchRequest", "batch must not be empty"));
        }
        if entries.len() > self.max_batch_size {
            return Err(provider_error(
                "TooManyEntriesInBatchRequest",
                format!(
                    "batch of {} exceeds maximum of {}",
                    entries.len(),
                    self.max_batch_size
                ),
            ));
        }
        Ok(())
    }
}

impl Default for InMemoryProvider {
    fn default() -> Self {
        Self::new(InMemoryConfig::default())
    }
}

fn provider_error(code: &str, message: impl Into<String>) -> QueueError {
    QueueError::Provider {
        provider: PROVIDER_NAME.to_string(),
        code: code.to_string(),
        message: message.into(),
    }
}

#[async_trait]
impl QueueProvider for InMemoryProvider {
    async fn get_queue_by_name(&self, queue: &QueueName) -> Result<QueueHandle, QueueError> {
        let mut queues = self.queues.write().unwrap();
        match queues.get_mut(queue.as_str()) {
            Some(state) => {
                state.lookup_count += 1;
                Ok(QueueHandle::new(format!("memory://{queue}")))
            }
            None => Err(QueueError::QueueNotFound {
                queue_name: queue.to_string(),
            }),
        }
    }

    async fn receive_messages(
        &self,
        handle: &QueueHandle,
        options: &ReceiveOptions,
    ) -> Result<Vec<ProviderMessage>, QueueError> {
        let name = Self::queue_name_from_handle(handle);
        let mut queues = self.queues.write().unwrap();
        let state = queues.get_mut(name).ok_or_else(|| QueueError::QueueNotFound {
            queue_name: name.to_string(),
        })?;

        let count = (options.max_messages as usize).min(state.messages.len());
        Ok(state.messages.drain(..count).collect())
    }

    async fn delete_messages(
        &self,
        handle: &QueueHandle,
        entries: &[DeleteEntry],
    ) -> Result<(), QueueError> {
        self.check_batch(entries)?;

        let name = Self::queue_name_from_handle(handle);
        let queues = self.queues.read().unwrap();
        if !queues.contains_key(name) {
            return Err(QueueError::QueueNotFound {
                queue_name: name.to_string(),
            });
        }
        drop(queues);

        self.delete_batches.write().unwrap().push(entries.to_vec());
        Ok(())
    }

    async fn send_messages(
        &self,
        handle: &QueueHandle,
        entries: &[SendEntry],
    ) -> Result<(), QueueError> {
        self.check_batch(entries)?;

        let name = Self::queue_name_from_handle(handle);
        let mut queues = self.queues.write().unwrap();
        let state = queues.get_mut(name).ok_or_else(|| QueueError::QueueNotFound {
            queue_name: name.to_string(),
        })?;

        // Sent entries become receivable so end-to-end flows work in tests
        for entry in entries {
            let id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
            state.messages.push(ProviderMessage {
                message_id: format!("msg-{id}"),
                receipt_handle: format!("receipt-{id}"),
                body: entry.body.clone(),
                ..Default::default()
            });
        }
        drop(queues);

        self.send_batches.write().unwrap().push(entries.to_vec());
        Ok(())
    }

    fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::InMemory
    }
}
