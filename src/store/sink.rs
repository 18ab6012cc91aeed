//! Storage sink seam
//!
//! Where dispatched batches land. The document store itself is an external
//! collaborator; this module defines the trait the dispatcher calls and a
//! write-back implementation over the object stage.

use super::cloud::ObjectStage;
use crate::error::{Error, Result};
use crate::types::SensorReading;
use async_trait::async_trait;
use bytes::Bytes;

/// Durable insertion target for partition batches
///
/// Implementations must be safe to call concurrently from multiple tasks
/// with different partition ids; each call receives independent data and
/// no external synchronization is required of the caller.
#[async_trait]
pub trait StorageSink: Send + Sync {
    /// Insert a batch of readings into the given partition
    async fn insert(&self, partition_id: &str, records: Vec<SensorReading>) -> Result<()>;
}

/// Sink that writes each partition batch back to object storage
///
/// Output key: `output/<partition_id>.json`, a pretty-printed JSON array of
/// the batch's readings. The key carries no batch discriminator, so a
/// partition that fills more than one batch overwrites (last writer wins).
#[derive(Debug, Clone)]
pub struct JsonWriteBackSink {
    stage: ObjectStage,
}

impl JsonWriteBackSink {
    /// Create a write-back sink over an object stage
    pub fn new(stage: ObjectStage) -> Self {
        Self { stage }
    }
}

#[async_trait]
impl StorageSink for JsonWriteBackSink {
    async fn insert(&self, partition_id: &str, records: Vec<SensorReading>) -> Result<()> {
        let body = serde_json::to_vec_pretty(&records)
            .map_err(|e| Error::sink(partition_id, format!("failed to serialize batch: {e}")))?;

        let key = format!("output/{partition_id}.json");
        self.stage
            .write(&key, Bytes::from(body))
            .await
            .map_err(|e| Error::sink(partition_id, e.to_string()))?;
        Ok(())
    }
}
