//! AWS SQS queue provider.

use crate::client::QueueProvider;
use crate::error::QueueError;
use crate::message::{DeleteEntry, ProviderMessage, QueueHandle, QueueName, SendEntry};
use crate::provider::{AwsSqsConfig, ProviderType, ReceiveOptions};
use async_trait::async_trait;
use aws_sdk_sqs::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_sqs::types::{
    DeleteMessageBatchRequestEntry, MessageSystemAttributeName, SendMessageBatchRequestEntry,
};
use aws_sdk_sqs::Client;
use std::collections::HashMap;

#[cfg(test)]
#[path = "aws_tests.rs"]
mod tests;

const PROVIDER_NAME: &str = "aws-sqs";

/// SQS caps batch operations at 10 entries per request
const MAX_BATCH_SIZE: usize = 10;

/// Queue provider backed by AWS SQS.
///
/// Stateless apart from the SDK client; queue-handle memoization lives in the
/// queue client, not here.
pub struct AwsSqsProvider {
    client: Client,
}

impl AwsSqsProvider {
    /// Create provider from an existing SQS client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create provider from configuration, resolving credentials and any
    /// unset fields through the SDK's default chain
    pub async fn from_config(config: &AwsSqsConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }

        let sdk_config = loader.load().await;
        let mut builder = aws_sdk_sqs::config::Builder::from(&sdk_config);
        if let Some(endpoint_url) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }

        Self {
            client: Client::from_conf(builder.build()),
        }
    }
}

/// Map an SDK failure to the library error type, keeping the provider's own
/// error code visible
fn sdk_error<E>(queue_name: &str, err: SdkError<E>) -> QueueError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let code = err
        .code()
        .unwrap_or("UnknownError")
        .to_string();

    match code.as_str() {
        "AWS.SimpleQueueService.NonExistentQueue" | "QueueDoesNotExist" => {
            QueueError::QueueNotFound {
                queue_name: queue_name.to_string(),
            }
        }
        _ => QueueError::Provider {
            provider: PROVIDER_NAME.to_string(),
            code,
            message: err
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| err.to_string()),
        },
    }
}

#[async_trait]
impl QueueProvider for AwsSqsProvider {
    async fn get_queue_by_name(&self, queue: &QueueName) -> Result<QueueHandle, QueueError> {
        let output = self
            .client
            .get_queue_url()
            .queue_name(queue.as_str())
            .send()
            .await
            .map_err(|err| sdk_error(queue.as_str(), err))?;

        let url = output.queue_url().ok_or_else(|| QueueError::QueueNotFound {
            queue_name: queue.to_string(),
        })?;

        Ok(QueueHandle::new(url))
    }

    async fn receive_messages(
        &self,
        handle: &QueueHandle,
        options: &ReceiveOptions,
    ) -> Result<Vec<ProviderMessage>, QueueError> {
        let mut request = self
            .client
            .receive_message()
            .queue_url(handle.url())
            .max_number_of_messages(options.max_messages as i32)
            .wait_time_seconds(options.wait_time_seconds as i32)
            .message_attribute_names("All");

        for name in &options.attribute_names {
            request =
                request.message_system_attribute_names(MessageSystemAttributeName::from(
                    name.as_str(),
                ));
        }

        let output = request
            .send()
            .await
            .map_err(|err| sdk_error(handle.url(), err))?;

        let messages = output
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(|msg| ProviderMessage {
                message_id: msg.message_id.unwrap_or_default(),
                receipt_handle: msg.receipt_handle.unwrap_or_default(),
                body: msg.body.unwrap_or_default(),
                message_attributes: msg
                    .message_attributes
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|(key, value)| {
                        value.string_value.map(|text| (key, text))
                    })
                    .collect(),
                attributes: msg
                    .attributes
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(key, value)| (key.as_str().to_string(), value))
                    .collect::<HashMap<_, _>>(),
            })
            .collect();

        Ok(messages)
    }

    async fn delete_messages(
        &self,
        handle: &QueueHandle,
        entries: &[DeleteEntry],
    ) -> Result<(), QueueError> {
        let mut batch = Vec::with_capacity(entries.len());
        for entry in entries {
            let built = DeleteMessageBatchRequestEntry::builder()
                .id(&entry.id)
                .receipt_handle(&entry.receipt_handle)
                .build()
                .map_err(|err| QueueError::Provider {
                    provider: PROVIDER_NAME.to_string(),
                    code: "InvalidBatchEntry".to_string(),
                    message: err.to_string(),
                })?;
            batch.push(built);
        }

        self.client
            .delete_message_batch()
            .queue_url(handle.url())
            .set_entries(Some(batch))
            .send()
            .await
            .map_err(|err| sdk_error(handle.url(), err))?;

        Ok(())
    }

    async fn send_messages(
        &self,
        handle: &QueueHandle,
        entries: &[SendEntry],
    ) -> Result<(), QueueError> {
        let mut batch = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut builder = SendMessageBatchRequestEntry::builder()
                .id(&entry.id)
                .message_body(&entry.body);
            if let Some(group_id) = &entry.group_id {
                builder = builder.message_group_id(group_id);
            }

            let built = builder.build().map_err(|err| QueueError::Provider {
                provider: PROVIDER_NAME.to_string(),
                code: "InvalidBatchEntry".to_string(),
                message: err.to_string(),
            })?;
            batch.push(built);
        }

        self.client
            .send_message_batch()
            .queue_url(handle.url())
            .set_entries(Some(batch))
            .send()
            .await
            .map_err(|err| sdk_error(handle.url(), err))?;

        Ok(())
    }

    fn max_batch_size(&self) -> usize {
        MAX_BATCH_SIZE
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::AwsSqs
    }
}
