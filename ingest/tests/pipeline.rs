use chrono::NaiveDate;
use ingest::destination::memory::MemoryDestination;
use ingest::error::ErrorKind;
use ingest::masking::mask_pii;
use ingest::pipeline::Pipeline;
use ingest::source::memory::MemoryQueueSource;
use ingest_config::shared::BatchConfig;
use ingest_telemetry::init_test_tracing;

fn create_pipeline(
    source: &MemoryQueueSource,
    destination: &MemoryDestination,
) -> Pipeline<MemoryQueueSource, MemoryDestination> {
    Pipeline::new(BatchConfig::default(), source.clone(), destination.clone())
}

async fn run_pipeline(
    source: &MemoryQueueSource,
    destination: &MemoryDestination,
) -> ingest::error::IngestResult<()> {
    let mut pipeline = create_pipeline(source, destination);
    pipeline.start().await?;
    pipeline.wait().await
}

#[tokio::test(flavor = "multi_thread")]
async fn valid_messages_are_masked_persisted_and_acknowledged() {
    init_test_tracing();

    let source = MemoryQueueSource::new();
    let destination = MemoryDestination::new();

    source
        .push_message(
            r#"{"user_id":"u1","device_type":"ios","ip":"1.2.3.4","device_id":"d1","locale":"en-US","app_version":"2.1.0","create_date":"2023-05-01"}"#,
        )
        .await;
    source
        .push_message(
            r#"{"user_id":"u2","device_type":"android","ip":"5.6.7.8","device_id":"d2","locale":"en-US"}"#,
        )
        .await;

    run_pipeline(&source, &destination).await.unwrap();

    let events = destination.events().await;
    assert_eq!(events.len(), 2);

    assert_eq!(events[0].user_id, "u1");
    assert_eq!(events[0].device_type, "ios");
    assert_eq!(events[0].masked_ip, mask_pii("1.2.3.4"));
    assert_eq!(events[0].masked_device_id, mask_pii("d1"));
    assert_eq!(events[0].locale, "en-US");
    assert_eq!(events[0].app_version, 2);
    assert_eq!(
        events[0].create_date,
        NaiveDate::from_ymd_opt(2023, 5, 1).unwrap()
    );

    // Optional fields fall back to their defaults.
    assert_eq!(events[1].user_id, "u2");
    assert_eq!(events[1].masked_ip, mask_pii("5.6.7.8"));
    assert_eq!(events[1].masked_device_id, mask_pii("d2"));
    assert_eq!(events[1].app_version, 0);
    assert_eq!(
        events[1].create_date,
        NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
    );

    // The cleartext never reaches the destination.
    for event in &events {
        assert_ne!(event.masked_ip.as_str(), "1.2.3.4");
        assert_ne!(event.masked_ip.as_str(), "5.6.7.8");
        assert_ne!(event.masked_device_id.as_str(), "d1");
        assert_ne!(event.masked_device_id.as_str(), "d2");
    }

    // Both messages were acknowledged, in processing order.
    let deleted = source.deleted_receipts().await;
    assert_eq!(deleted, vec!["receipt-0".to_string(), "receipt-1".to_string()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_required_field_skips_message_without_acknowledgment() {
    init_test_tracing();

    let source = MemoryQueueSource::new();
    let destination = MemoryDestination::new();

    source
        .push_message(
            r#"{"user_id":"u1","device_type":"ios","ip":"1.2.3.4","device_id":"d1","locale":"en-US"}"#,
        )
        .await;
    // No `device_id`: this message must be skipped, not acknowledged.
    source
        .push_message(
            r#"{"user_id":"u2","device_type":"android","ip":"5.6.7.8","locale":"en-US"}"#,
        )
        .await;
    source
        .push_message(
            r#"{"user_id":"u3","device_type":"web","ip":"9.9.9.9","device_id":"d3","locale":"de-DE"}"#,
        )
        .await;

    run_pipeline(&source, &destination).await.unwrap();

    // Processing continued past the invalid message.
    let events = destination.events().await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].user_id, "u1");
    assert_eq!(events[1].user_id, "u3");

    // The invalid message's receipt was never deleted.
    let deleted = source.deleted_receipts().await;
    assert_eq!(deleted, vec!["receipt-0".to_string(), "receipt-2".to_string()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_version_is_fatal_and_abandons_the_batch() {
    init_test_tracing();

    let source = MemoryQueueSource::new();
    let destination = MemoryDestination::new();

    source
        .push_message(
            r#"{"user_id":"u1","device_type":"ios","ip":"1.2.3.4","device_id":"d1","locale":"en-US","app_version":"beta.1"}"#,
        )
        .await;
    source
        .push_message(
            r#"{"user_id":"u2","device_type":"android","ip":"5.6.7.8","device_id":"d2","locale":"en-US"}"#,
        )
        .await;

    let err = run_pipeline(&source, &destination).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConversionError);

    // Nothing was persisted and nothing was acknowledged; the rest of the
    // batch stays in the queue for a future delivery.
    assert!(destination.events().await.is_empty());
    assert!(source.deleted_receipts().await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_date_is_fatal() {
    init_test_tracing();

    let source = MemoryQueueSource::new();
    let destination = MemoryDestination::new();

    source
        .push_message(
            r#"{"user_id":"u1","device_type":"ios","ip":"1.2.3.4","device_id":"d1","locale":"en-US","create_date":"01-05-2023"}"#,
        )
        .await;

    let err = run_pipeline(&source, &destination).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConversionError);
    assert!(source.deleted_receipts().await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn destination_failure_prevents_acknowledgment() {
    init_test_tracing();

    let source = MemoryQueueSource::new();
    let destination = MemoryDestination::new();
    destination.fail_writes().await;

    source
        .push_message(
            r#"{"user_id":"u1","device_type":"ios","ip":"1.2.3.4","device_id":"d1","locale":"en-US"}"#,
        )
        .await;

    let err = run_pipeline(&source, &destination).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DestinationQueryFailed);

    // The write never committed, so the message must remain in the queue.
    assert!(source.deleted_receipts().await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_queue_terminates_the_run_after_one_poll() {
    init_test_tracing();

    let source = MemoryQueueSource::new();
    let destination = MemoryDestination::new();

    run_pipeline(&source, &destination).await.unwrap();

    assert_eq!(source.polls().await, 1);
    assert!(destination.events().await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn backlog_larger_than_a_batch_is_drained_across_polls() {
    init_test_tracing();

    let source = MemoryQueueSource::new();
    let destination = MemoryDestination::new();

    for i in 0..12 {
        source
            .push_message(format!(
                r#"{{"user_id":"u{i}","device_type":"ios","ip":"10.0.0.{i}","device_id":"d{i}","locale":"en-US"}}"#
            ))
            .await;
    }

    run_pipeline(&source, &destination).await.unwrap();

    // Two full polls drain the backlog, the third comes back empty and ends
    // the run.
    assert_eq!(source.polls().await, 3);
    assert_eq!(destination.events().await.len(), 12);
    assert_eq!(source.deleted_receipts().await.len(), 12);
    assert!(source.pending_messages().await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn waiting_on_an_unstarted_pipeline_returns_immediately() {
    init_test_tracing();

    let source = MemoryQueueSource::new();
    let destination = MemoryDestination::new();

    let pipeline = create_pipeline(&source, &destination);
    pipeline.wait().await.unwrap();

    assert_eq!(source.polls().await, 0);
}
