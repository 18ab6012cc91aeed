//! Partition types

use crate::types::SensorReading;

/// An ordered group of readings sharing one partition id
///
/// Detached from the accumulator when its buffer reaches the batch
/// threshold, or at final flush (where it may be smaller, never empty).
/// Ownership moves to exactly one dispatch task and is never shared.
#[derive(Debug, Clone)]
pub struct PartitionBatch {
    /// Partition identifier, e.g. `hvac_readings_2024_07`
    pub partition_id: String,
    /// Readings in source order
    pub records: Vec<SensorReading>,
}

impl PartitionBatch {
    /// Create a batch for a partition
    pub fn new(partition_id: impl Into<String>, records: Vec<SensorReading>) -> Self {
        Self {
            partition_id: partition_id.into(),
            records,
        }
    }

    /// Number of readings in the batch
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the batch holds no readings
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
