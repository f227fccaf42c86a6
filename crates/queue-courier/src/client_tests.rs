use super::*;
use crate::provider::InMemoryConfig;
use serde_json::json;

fn provider_with_queue(name: &str) -> Arc<InMemoryProvider> {
    let provider = Arc::new(InMemoryProvider::default());
    provider.create_queue(name);
    provider
}

fn queue(name: &str) -> QueueName {
    QueueName::new(name).unwrap()
}

#[tokio::test]
async fn test_resolve_queue_returns_handle() {
    let provider = provider_with_queue("orders");
    let client = QueueClient::new(provider);

    let handle = client.resolve_queue(&queue("orders")).await.unwrap();
    assert_eq!(handle.url(), "memory://orders");
}

#[tokio::test]
async fn test_resolve_queue_is_memoized() {
    let provider = provider_with_queue("orders");
    let client = QueueClient::new(provider.clone());
    let name = queue("orders");

    let first = client.resolve_queue(&name).await.unwrap();
    let second = client.resolve_queue(&name).await.unwrap();
    let third = client.resolve_queue(&name).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(second, third);
    assert_eq!(provider.lookup_count("orders"), 1);
}

#[tokio::test]
async fn test_resolve_queue_caches_per_name() {
    let provider = provider_with_queue("orders");
    provider.create_queue("invoices");
    let client = QueueClient::new(provider.clone());

    let orders = client.resolve_queue(&queue("orders")).await.unwrap();
    let invoices = client.resolve_queue(&queue("invoices")).await.unwrap();

    assert_ne!(orders, invoices);
    assert_eq!(provider.lookup_count("orders"), 1);
    assert_eq!(provider.lookup_count("invoices"), 1);
}

#[tokio::test]
async fn test_resolve_queue_unknown_queue_fails() {
    let provider = Arc::new(InMemoryProvider::default());
    let client = QueueClient::new(provider.clone());

    let result = client.resolve_queue(&queue("missing")).await;
    assert!(matches!(
        result,
        Err(QueueError::QueueNotFound { queue_name }) if queue_name == "missing"
    ));
}

#[tokio::test]
async fn test_resolve_queue_failed_lookup_is_not_cached() {
    let provider = Arc::new(InMemoryProvider::default());
    let client = QueueClient::new(provider.clone());
    let name = queue("late");

    assert!(client.resolve_queue(&name).await.is_err());

    // Queue appears after the failed lookup; the next resolve must retry
    provider.create_queue("late");
    let handle = client.resolve_queue(&name).await.unwrap();
    assert_eq!(handle.url(), "memory://late");
}

#[tokio::test]
async fn test_concurrent_resolve_performs_single_lookup() {
    let provider = provider_with_queue("orders");
    let client = Arc::new(QueueClient::new(provider.clone()));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client.resolve_queue(&queue("orders")).await
        }));
    }

    for task in handles {
        assert!(task.await.unwrap().is_ok());
    }
    assert_eq!(provider.lookup_count("orders"), 1);
}

#[tokio::test]
async fn test_receive_returns_raw_bodies_by_default() {
    let provider = provider_with_queue("orders");
    provider.push_message("orders", r#"{"kind":"created"}"#);
    let client = QueueClient::new(provider);

    let messages = client
        .receive(&queue("orders"), &ReceiveOptions::default())
        .await
        .unwrap();

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].body.as_raw(), Some(r#"{"kind":"created"}"#));
    assert_eq!(messages[0].queue_url, "memory://orders");
    assert!(!messages[0].message_id.is_empty());
    assert!(!messages[0].receipt_handle.is_empty());
}

#[tokio::test]
async fn test_receive_parses_json_bodies_when_requested() {
    let provider = provider_with_queue("orders");
    provider.push_message("orders", r#"{"kind":"created","total":3}"#);
    let client = QueueClient::new(provider);

    let options = ReceiveOptions::new().parse_json();
    let messages = client.receive(&queue("orders"), &options).await.unwrap();

    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages[0].body.as_json(),
        Some(&json!({"kind": "created", "total": 3}))
    );
}

#[tokio::test]
async fn test_receive_malformed_json_body_fails() {
    let provider = provider_with_queue("orders");
    provider.push_message("orders", "not json");
    let client = QueueClient::new(provider);

    let options = ReceiveOptions::new().parse_json();
    let result = client.receive(&queue("orders"), &options).await;

    assert!(matches!(result, Err(QueueError::MalformedBody { .. })));
}

#[tokio::test]
async fn test_receive_empty_queue_returns_empty_vec() {
    let provider = provider_with_queue("orders");
    let client = QueueClient::new(provider);

    let messages = client
        .receive(&queue("orders"), &ReceiveOptions::default())
        .await
        .unwrap();
    assert!(messages.is_empty());
}

#[tokio::test]
async fn test_receive_honors_max_messages() {
    let provider = provider_with_queue("orders");
    for i in 0..5 {
        provider.push_message("orders", format!("body-{i}"));
    }
    let client = QueueClient::new(provider);

    let options = ReceiveOptions::new().with_max_messages(3);
    let messages = client.receive(&queue("orders"), &options).await.unwrap();
    assert_eq!(messages.len(), 3);
}

#[tokio::test]
async fn test_delete_empty_input_is_noop() {
    let provider = Arc::new(InMemoryProvider::default());
    let client = QueueClient::new(provider.clone());

    // No queue registered: a no-op must not even resolve the queue
    let messages: Vec<DeleteEntry> = Vec::new();
    client.delete(&queue("missing"), &messages).await.unwrap();

    assert!(provider.delete_batches().is_empty());
    assert_eq!(provider.lookup_count("missing"), 0);
}

#[tokio::test]
async fn test_delete_issues_single_batch() {
    let provider = provider_with_queue("orders");
    provider.push_message("orders", "a");
    provider.push_message("orders", "b");
    let client = QueueClient::new(provider.clone());

    let messages = client
        .receive(&queue("orders"), &ReceiveOptions::default())
        .await
        .unwrap();
    client.delete(&queue("orders"), &messages).await.unwrap();

    let batches = provider.delete_batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 2);
    assert_eq!(batches[0][0].id, messages[0].message_id);
    assert_eq!(batches[0][0].receipt_handle, messages[0].receipt_handle);
}

#[tokio::test]
async fn test_send_empty_input_is_noop() {
    let provider = Arc::new(InMemoryProvider::default());
    let client = QueueClient::new(provider.clone());

    client.send(&queue("missing"), &[], None).await.unwrap();

    assert!(provider.send_batches().is_empty());
    assert_eq!(provider.lookup_count("missing"), 0);
}

#[tokio::test]
async fn test_send_object_is_serialized() {
    let provider = provider_with_queue("orders");
    let client = QueueClient::new(provider.clone());

    client
        .send(&queue("orders"), &[json!({"kind": "created"})], None)
        .await
        .unwrap();

    let batches = provider.send_batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 1);
    assert_eq!(batches[0][0].body, r#"{"kind":"created"}"#);
}

#[tokio::test]
async fn test_send_string_passes_through_unchanged() {
    let provider = provider_with_queue("orders");
    let client = QueueClient::new(provider.clone());

    client
        .send(&queue("orders"), &[json!("plain text, not json")], None)
        .await
        .unwrap();

    let batches = provider.send_batches();
    assert_eq!(batches[0][0].body, "plain text, not json");
}

#[tokio::test]
async fn test_send_rejects_unsupported_value_kinds() {
    let provider = provider_with_queue("orders");
    let client = QueueClient::new(provider.clone());

    for value in [json!(42), json!(true), json!(null), json!([1, 2])] {
        let result = client
            .send(&queue("orders"), &[json!({"ok": true}), value], None)
            .await;
        assert!(matches!(
            result,
            Err(QueueError::InvalidMessageType { index: 1 })
        ));
    }

    // Validation aborted before any provider interaction
    assert!(provider.send_batches().is_empty());
    assert_eq!(provider.lookup_count("orders"), 0);
}

#[tokio::test]
async fn test_send_chunks_at_batch_cap() {
    let provider = provider_with_queue("orders");
    let client = QueueClient::new(provider.clone());

    let messages: Vec<_> = (0..22).map(|i| json!({"seq": i})).collect();
    client.send(&queue("orders"), &messages, None).await.unwrap();

    let batches = provider.send_batches();
    assert_eq!(batches.len(), 3);
    assert_eq!(batches[0].len(), 10);
    assert_eq!(batches[1].len(), 10);
    assert_eq!(batches[2].len(), 2);

    // Chunks preserve input order
    assert_eq!(batches[0][0].body, r#"{"seq":0}"#);
    assert_eq!(batches[1][0].body, r#"{"seq":10}"#);
    assert_eq!(batches[2][1].body, r#"{"seq":21}"#);
}

#[tokio::test]
async fn test_send_exact_batch_cap_is_single_chunk() {
    let provider = provider_with_queue("orders");
    let client = QueueClient::new(provider.clone());

    let messages: Vec<_> = (0..10).map(|i| json!({"seq": i})).collect();
    client.send(&queue("orders"), &messages, None).await.unwrap();

    assert_eq!(provider.send_batches().len(), 1);
}

#[tokio::test]
async fn test_send_respects_provider_batch_cap() {
    let provider = Arc::new(InMemoryProvider::new(InMemoryConfig {
        max_batch_size: 4,
        queues: vec!["orders".to_string()],
    }));
    let client = QueueClient::new(provider.clone());

    let messages: Vec<_> = (0..9).map(|i| json!({"seq": i})).collect();
    client.send(&queue("orders"), &messages, None).await.unwrap();

    let batches = provider.send_batches();
    assert_eq!(batches.len(), 3);
    assert_eq!(batches[0].len(), 4);
    assert_eq!(batches[1].len(), 4);
    assert_eq!(batches[2].len(), 1);
}

#[tokio::test]
async fn test_send_assigns_unique_correlation_ids() {
    let provider = provider_with_queue("orders");
    let client = QueueClient::new(provider.clone());

    let messages: Vec<_> = (0..12).map(|i| json!({"seq": i})).collect();
    client.send(&queue("orders"), &messages, None).await.unwrap();

    let mut ids: Vec<String> = provider
        .send_batches()
        .into_iter()
        .flatten()
        .map(|entry| entry.id)
        .collect();
    assert_eq!(ids.len(), 12);
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 12);
}

#[tokio::test]
async fn test_send_attaches_group_id_to_every_entry() {
    let provider = provider_with_queue("orders");
    let client = QueueClient::new(provider.clone());

    let messages: Vec<_> = (0..15).map(|i| json!({"seq": i})).collect();
    client
        .send(&queue("orders"), &messages, Some("tenant-7"))
        .await
        .unwrap();

    for entry in provider.send_batches().into_iter().flatten() {
        assert_eq!(entry.group_id.as_deref(), Some("tenant-7"));
    }
}

#[tokio::test]
async fn test_send_without_group_id_leaves_entries_ungrouped() {
    let provider = provider_with_queue("orders");
    let client = QueueClient::new(provider.clone());

    client
        .send(&queue("orders"), &[json!({"seq": 0})], None)
        .await
        .unwrap();

    assert_eq!(provider.send_batches()[0][0].group_id, None);
}

#[tokio::test]
async fn test_send_receive_delete_round_trip() {
    let name = queue("round-trip");
    let provider = Arc::new(InMemoryProvider::default());
    provider.create_queue("round-trip");
    let client = QueueClient::new(provider.clone());

    client
        .send(&name, &[json!({"kind": "created", "id": 9})], None)
        .await
        .unwrap();

    let options = ReceiveOptions::new().parse_json();
    let messages = client.receive(&name, &options).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages[0].body.as_json(),
        Some(&json!({"kind": "created", "id": 9}))
    );

    client.delete(&name, &messages).await.unwrap();
    assert_eq!(provider.delete_batches().len(), 1);

    // Queue is drained after the receive
    let remaining = client
        .receive(&name, &ReceiveOptions::default())
        .await
        .unwrap();
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn test_factory_creates_in_memory_client() {
    let client = QueueClientFactory::create_client(ProviderConfig::InMemory(
        InMemoryConfig {
            max_batch_size: 10,
            queues: vec!["orders".to_string()],
        },
    ))
    .await
    .unwrap();

    assert_eq!(client.provider_type(), ProviderType::InMemory);
    let handle = client.resolve_queue(&queue("orders")).await.unwrap();
    assert_eq!(handle.url(), "memory://orders");
}

#[tokio::test]
async fn test_factory_test_client_has_no_queues() {
    let client = QueueClientFactory::create_test_client();
    assert_eq!(client.provider_type(), ProviderType::InMemory);
    assert!(client.resolve_queue(&queue("anything")).await.is_err());
}

#[test]
fn test_correlation_ids_are_distinct() {
    let a = correlation_id();
    let b = correlation_id();
    assert_ne!(a, b);
    assert_eq!(a.len(), 32);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
}
