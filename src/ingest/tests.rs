//! Tests for ingest module

use super::*;
use crate::error::Error;
use crate::partition::PartitionBatch;
use crate::types::SensorReading;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Sink that records every insert and optionally fails them all
#[derive(Default)]
struct MockSink {
    inserts: Mutex<Vec<(String, Vec<SensorReading>)>>,
    fail: bool,
}

impl MockSink {
    fn failing() -> Self {
        Self {
            inserts: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    fn insert_sizes(&self) -> Vec<(String, usize)> {
        self.inserts
            .lock()
            .unwrap()
            .iter()
            .map(|(p, r)| (p.clone(), r.len()))
            .collect()
    }
}

#[async_trait]
impl crate::store::StorageSink for MockSink {
    async fn insert(&self, partition_id: &str, records: Vec<SensorReading>) -> crate::error::Result<()> {
        if self.fail {
            return Err(Error::sink(partition_id, "injected failure"));
        }
        self.inserts
            .lock()
            .unwrap()
            .push((partition_id.to_string(), records));
        Ok(())
    }
}

fn reading(ts: &str) -> SensorReading {
    serde_json::from_str(&format!(r#"{{"timestamp":"{ts}"}}"#)).unwrap()
}

fn record_json(ts: &str) -> String {
    format!(r#"{{"timestamp":"{ts}","device_id":"d1"}}"#)
}

/// Stand up an ingestor over an in-memory store holding one object
async fn ingestor_for(body: &str, sink: Arc<MockSink>, config: IngestConfig) -> Ingestor {
    let store = Arc::new(InMemory::new());
    store
        .put(
            &ObjectPath::from("input.json"),
            Bytes::copy_from_slice(body.as_bytes()).into(),
        )
        .await
        .unwrap();
    let stage = ObjectStage::with_store(store, "mem");
    Ingestor::new(stage, sink, config)
}

// ============================================================================
// BatchDispatcher Tests
// ============================================================================

#[tokio::test]
async fn test_dispatch_and_drain() {
    let sink = Arc::new(MockSink::default());
    let mut dispatcher = BatchDispatcher::new(sink.clone());

    dispatcher.dispatch(PartitionBatch::new("p1", vec![reading("2024-01-01T00:00:00Z")]));
    dispatcher.dispatch(PartitionBatch::new("p2", vec![reading("2024-02-01T00:00:00Z")]));
    assert_eq!(dispatcher.batches_dispatched(), 2);

    dispatcher.drain().await;
    assert_eq!(dispatcher.in_flight(), 0);
    assert!(dispatcher.take_error().is_none());

    let mut sizes = sink.insert_sizes();
    sizes.sort();
    assert_eq!(sizes, vec![("p1".to_string(), 1), ("p2".to_string(), 1)]);
}

#[tokio::test]
async fn test_first_error_wins() {
    let sink = Arc::new(MockSink::failing());
    let mut dispatcher = BatchDispatcher::new(sink);

    for month in 1..=4 {
        dispatcher.dispatch(PartitionBatch::new(
            format!("p{month}"),
            vec![reading(&format!("2024-{month:02}-01T00:00:00Z"))],
        ));
    }
    dispatcher.drain().await;

    // Exactly one representative error is retained
    let error = dispatcher.take_error().unwrap();
    assert!(matches!(error, Error::Sink { .. }));
    assert!(dispatcher.take_error().is_none());
}

#[tokio::test]
async fn test_drain_with_no_dispatches_terminates() {
    let sink = Arc::new(MockSink::default());
    let mut dispatcher = BatchDispatcher::new(sink);
    dispatcher.drain().await;
    assert_eq!(dispatcher.in_flight(), 0);
}

// ============================================================================
// Ingestor Tests
// ============================================================================

#[tokio::test]
async fn test_two_month_scenario() {
    let body = format!(
        "[{},{}]",
        record_json("2024-01-15T00:00:00Z"),
        record_json("2024-02-01T00:00:00Z")
    );
    let sink = Arc::new(MockSink::default());
    let ingestor = ingestor_for(&body, sink.clone(), IngestConfig::default()).await;

    let stats = ingestor.ingest_object("input.json").await.unwrap();
    assert_eq!(stats.records_processed, 2);
    assert_eq!(stats.records_skipped, 0);
    assert_eq!(stats.batches_dispatched, 2);

    let mut sizes = sink.insert_sizes();
    sizes.sort();
    assert_eq!(
        sizes,
        vec![
            ("hvac_readings_2024_01".to_string(), 1),
            ("hvac_readings_2024_02".to_string(), 1),
        ]
    );
}

#[tokio::test]
async fn test_skipped_record_between_valid_ones() {
    let body = format!(
        r#"[{},{{"broken":true}},{}]"#,
        record_json("2024-01-01T00:00:00Z"),
        record_json("2024-01-02T00:00:00Z")
    );
    let sink = Arc::new(MockSink::default());
    let ingestor = ingestor_for(&body, sink.clone(), IngestConfig::default()).await;

    let stats = ingestor.ingest_object("input.json").await.unwrap();
    assert_eq!(stats.records_processed, 2);
    assert_eq!(stats.records_skipped, 1);
    assert_eq!(sink.insert_sizes(), vec![("hvac_readings_2024_01".to_string(), 2)]);
}

#[tokio::test]
async fn test_empty_array_succeeds_with_zero_records() {
    let sink = Arc::new(MockSink::default());
    let ingestor = ingestor_for("[]", sink.clone(), IngestConfig::default()).await;

    let stats = ingestor.ingest_object("input.json").await.unwrap();
    assert_eq!(stats.records_processed, 0);
    assert_eq!(stats.batches_dispatched, 0);
    assert!(sink.insert_sizes().is_empty());
}

#[tokio::test]
async fn test_2500_records_make_three_batches() {
    let mut elements = Vec::new();
    for i in 0..2500 {
        let minute = i % 60;
        let hour = (i / 60) % 24;
        let day = 1 + (i / 1440) % 28;
        elements.push(record_json(&format!("2024-05-{day:02}T{hour:02}:{minute:02}:00Z")));
    }
    let body = format!("[{}]", elements.join(","));

    let sink = Arc::new(MockSink::default());
    let ingestor = ingestor_for(&body, sink.clone(), IngestConfig::default()).await;

    let stats = ingestor.ingest_object("input.json").await.unwrap();
    assert_eq!(stats.records_processed, 2500);
    assert_eq!(stats.batches_dispatched, 3);

    let mut sizes: Vec<usize> = sink.insert_sizes().iter().map(|(_, n)| *n).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![500, 1000, 1000]);
    // Conservation: every accepted record appears in exactly one batch
    assert_eq!(sizes.iter().sum::<usize>(), 2500);
}

#[tokio::test]
async fn test_sink_failure_fails_the_object() {
    let body = format!("[{}]", record_json("2024-01-01T00:00:00Z"));
    let sink = Arc::new(MockSink::failing());
    let ingestor = ingestor_for(&body, sink, IngestConfig::default()).await;

    let err = ingestor.ingest_object("input.json").await.unwrap_err();
    assert!(matches!(err, Error::Sink { .. }));
}

#[tokio::test]
async fn test_truncated_stream_dispatches_then_reports_envelope_error() {
    // No closing ']': the record still reaches the sink, the object fails
    let body = format!("[{}", record_json("2024-01-01T00:00:00Z"));
    let sink = Arc::new(MockSink::default());
    let ingestor = ingestor_for(&body, sink.clone(), IngestConfig::default()).await;

    let err = ingestor.ingest_object("input.json").await.unwrap_err();
    assert!(matches!(err, Error::MalformedEnvelope { .. }));
    assert_eq!(sink.insert_sizes(), vec![("hvac_readings_2024_01".to_string(), 1)]);
}

#[tokio::test]
async fn test_sink_error_takes_precedence_over_envelope_error() {
    // Truncated envelope and a failing sink at once: the delivery failure
    // is the terminal result, not the missing ']'
    let body = format!("[{}", record_json("2024-01-01T00:00:00Z"));
    let sink = Arc::new(MockSink::failing());
    let config = IngestConfig::new().with_batch_size(1);
    let ingestor = ingestor_for(&body, sink, config).await;

    let err = ingestor.ingest_object("input.json").await.unwrap_err();
    assert!(matches!(err, Error::Sink { .. }));
}

#[tokio::test]
async fn test_missing_object_is_transport_error() {
    let sink = Arc::new(MockSink::default());
    let ingestor = ingestor_for("[]", sink, IngestConfig::default()).await;

    let err = ingestor.ingest_object("missing.json").await.unwrap_err();
    assert!(matches!(err, Error::Transport { .. }));
}

#[tokio::test]
async fn test_custom_batch_size_and_prefix() {
    let body = format!(
        "[{},{},{}]",
        record_json("2024-01-01T00:00:00Z"),
        record_json("2024-01-02T00:00:00Z"),
        record_json("2024-01-03T00:00:00Z")
    );
    let sink = Arc::new(MockSink::default());
    let config = IngestConfig::new()
        .with_batch_size(2)
        .with_partition_prefix("readings");
    let ingestor = ingestor_for(&body, sink.clone(), config).await;

    let stats = ingestor.ingest_object("input.json").await.unwrap();
    assert_eq!(stats.batches_dispatched, 2);

    let mut sizes: Vec<usize> = sink.insert_sizes().iter().map(|(_, n)| *n).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![1, 2]);
    assert!(sink
        .insert_sizes()
        .iter()
        .all(|(p, _)| p == "readings_2024_01"));
}
