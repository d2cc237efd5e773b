/// End-to-end pipeline tests over the public API
///
/// Drives a finalize notification through the upload notifier, hands the
/// enqueued descriptor to the task consumer the way the queue would, and
/// checks the success and failure contracts on both sides.
use document_pipeline::dispatch::Disposition;
use document_pipeline::{
    ConsumerConfig, FinalizeEvent, InMemoryObjectStore, InMemoryTaskQueue, NotifyOutcome,
    PipelineConfig, TaskConsumer, TextPreviewHandler, UploadNotifier,
};
use std::sync::Arc;

fn test_config() -> PipelineConfig {
    PipelineConfig::builder()
        .project_id("my-project")
        .location("us-central1")
        .queue_name("document-processing-queue")
        .bucket("my-bucket")
        .service_account("my-project@appspot.gserviceaccount.com")
        .build()
}

fn test_consumer(store: Arc<InMemoryObjectStore>) -> TaskConsumer {
    TaskConsumer::new(
        ConsumerConfig::default(),
        store,
        Arc::new(TextPreviewHandler::new()),
    )
}

#[tokio::test]
async fn upload_to_processed_document() {
    // Upload side
    let queue = Arc::new(InMemoryTaskQueue::new());
    let notifier = UploadNotifier::new(test_config(), queue.clone());

    let event = FinalizeEvent {
        name: "docs/report.pdf".to_string(),
        bucket: "my-bucket".to_string(),
        generation: Some(1),
    };
    let outcome = notifier.handle(&event).await.unwrap();
    assert!(matches!(outcome, NotifyOutcome::Enqueued(_)));

    // The queue delivers exactly the body that was submitted
    let tasks = queue.enqueued();
    assert_eq!(tasks.len(), 1);
    let body = tasks[0].descriptor.to_json().unwrap();
    assert_eq!(body, r#"{"filePath":"docs/report.pdf","bucket":"my-bucket"}"#);

    // Consumer side
    let store = Arc::new(InMemoryObjectStore::new());
    store.insert("my-bucket", "docs/report.pdf", "quarterly figures");
    let consumer = test_consumer(store);

    let result = consumer.process_payload(&body).await;
    let response = result.as_ref().unwrap();
    assert_eq!(
        serde_json::to_string(response).unwrap(),
        r#"{"status":"success","message":"Processed docs/report.pdf"}"#
    );
    assert_eq!(Disposition::of(&result), Disposition::Ack);
}

#[tokio::test]
async fn empty_notification_never_reaches_the_queue() {
    let queue = Arc::new(InMemoryTaskQueue::new());
    let notifier = UploadNotifier::new(test_config(), queue.clone());

    let event = FinalizeEvent {
        name: String::new(),
        bucket: "my-bucket".to_string(),
        generation: None,
    };
    let outcome = notifier.handle(&event).await.unwrap();

    assert!(matches!(outcome, NotifyOutcome::Skipped));
    assert!(queue.is_empty());
}

#[tokio::test]
async fn missing_object_requests_redelivery() {
    let store = Arc::new(InMemoryObjectStore::new());
    let consumer = test_consumer(store);

    let result = consumer
        .process_payload(r#"{"filePath":"docs/report.pdf","bucket":"my-bucket"}"#)
        .await;

    assert!(result.is_err());
    assert_eq!(Disposition::of(&result), Disposition::Redeliver);
}

#[tokio::test]
async fn malformed_payload_is_dropped_not_redelivered() {
    let store = Arc::new(InMemoryObjectStore::new());
    let consumer = test_consumer(store);

    let result = consumer.process_payload(r#"{"bucket":"my-bucket"}"#).await;
    assert_eq!(Disposition::of(&result), Disposition::Drop);

    let result = consumer.process_payload("not json at all").await;
    assert_eq!(Disposition::of(&result), Disposition::Drop);
}

#[tokio::test]
async fn duplicate_uploads_enqueue_independent_tasks() {
    let queue = Arc::new(InMemoryTaskQueue::new());
    let notifier = UploadNotifier::new(test_config(), queue.clone());

    let event = FinalizeEvent {
        name: "docs/report.pdf".to_string(),
        bucket: "my-bucket".to_string(),
        generation: Some(7),
    };
    notifier.handle(&event).await.unwrap();
    notifier.handle(&event).await.unwrap();

    // No local coalescing: both attempts reach the queue. The shared
    // idempotency key is what lets the queue deduplicate them.
    let tasks = queue.enqueued();
    assert_eq!(tasks.len(), 2);
    assert!(tasks[0].idempotency_key.is_some());
    assert_eq!(tasks[0].idempotency_key, tasks[1].idempotency_key);

    // An overwrite (new generation) must produce a distinct task
    let overwrite = FinalizeEvent {
        generation: Some(8),
        ..event
    };
    notifier.handle(&overwrite).await.unwrap();
    let tasks = queue.enqueued();
    assert_ne!(tasks[1].idempotency_key, tasks[2].idempotency_key);
}

#[tokio::test]
async fn concurrent_invocations_share_nothing_but_the_queue() {
    let queue = Arc::new(InMemoryTaskQueue::new());
    let config = test_config();

    let mut handles = Vec::new();
    for i in 0..8 {
        let notifier = UploadNotifier::new(config.clone(), queue.clone());
        handles.push(tokio::spawn(async move {
            let event = FinalizeEvent {
                name: format!("docs/report-{i}.pdf"),
                bucket: "my-bucket".to_string(),
                generation: None,
            };
            notifier.handle(&event).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(queue.len(), 8);
}
