//! Tests for store module

use super::*;
use bytes::Bytes;
use futures::StreamExt;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn memory_stage() -> (Arc<InMemory>, ObjectStage) {
    let store = Arc::new(InMemory::new());
    let stage = ObjectStage::with_store(store.clone(), "mem");
    (store, stage)
}

#[test]
fn test_parse_local_path() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().to_str().unwrap();
    let stage = ObjectStage::parse(path).unwrap();
    assert_eq!(stage.scheme(), "file");
}

#[tokio::test]
async fn test_open_missing_object_is_transport_error() {
    let (_, stage) = memory_stage();
    let err = stage.open("nope.json").await.err().unwrap();
    assert!(matches!(err, crate::error::Error::Transport { .. }));
}

#[tokio::test]
async fn test_open_streams_object_bytes() {
    let (store, stage) = memory_stage();
    store
        .put(&ObjectPath::from("data.json"), Bytes::from_static(b"[1,2]").into())
        .await
        .unwrap();

    let mut stream = stage.open("data.json").await.unwrap();
    let mut collected = Vec::new();
    while let Some(chunk) = stream.next().await {
        collected.extend_from_slice(&chunk.unwrap());
    }
    assert_eq!(collected, b"[1,2]");
}

#[tokio::test]
async fn test_write_round_trip() {
    let (store, stage) = memory_stage();
    let location = stage.write("out/x.json", Bytes::from_static(b"{}")).await.unwrap();
    assert_eq!(location, "mem://out/x.json");

    let read_back = store
        .get(&ObjectPath::from("out/x.json"))
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();
    assert_eq!(&read_back[..], b"{}");
}

#[tokio::test]
async fn test_write_back_sink_renders_partition_array() {
    let (store, stage) = memory_stage();
    let sink = JsonWriteBackSink::new(stage);

    let reading: crate::types::SensorReading =
        serde_json::from_str(r#"{"timestamp":"2024-07-01T00:00:00Z","device_id":"d9"}"#).unwrap();
    sink.insert("hvac_readings_2024_07", vec![reading])
        .await
        .unwrap();

    let body = store
        .get(&ObjectPath::from("output/hvac_readings_2024_07.json"))
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
    assert_eq!(parsed[0]["device_id"], "d9");
}
