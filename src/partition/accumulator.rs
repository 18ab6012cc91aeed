//! Partition accumulator
//!
//! Routes each reading into a per-partition buffer and detaches a buffer
//! as a [`PartitionBatch`] the moment it reaches the configured threshold.

use super::keys::monthly_partition_id;
use super::types::PartitionBatch;
use crate::types::SensorReading;
use std::collections::HashMap;

/// Stateful router from readings to ready-to-dispatch batches
///
/// Every accepted reading lands in exactly one emitted batch: either the
/// threshold-triggered batch returned from [`append`](Self::append), or a
/// trailing batch returned from [`flush`](Self::flush).
#[derive(Debug)]
pub struct PartitionAccumulator {
    prefix: String,
    batch_size: usize,
    buffers: HashMap<String, Vec<SensorReading>>,
}

impl PartitionAccumulator {
    /// Create an accumulator with a partition prefix and batch threshold
    ///
    /// A threshold of zero is treated as one so a batch can always fill.
    pub fn new(prefix: impl Into<String>, batch_size: usize) -> Self {
        Self {
            prefix: prefix.into(),
            batch_size: batch_size.max(1),
            buffers: HashMap::new(),
        }
    }

    /// Append one reading; returns a batch if its partition just filled
    pub fn append(&mut self, reading: SensorReading) -> Option<PartitionBatch> {
        let partition_id = monthly_partition_id(&self.prefix, reading.timestamp);
        let buffer = self.buffers.entry(partition_id.clone()).or_default();
        buffer.push(reading);

        if buffer.len() >= self.batch_size {
            // Detach the whole buffer; the partition starts over empty
            let records = self.buffers.remove(&partition_id).unwrap_or_default();
            return Some(PartitionBatch::new(partition_id, records));
        }
        None
    }

    /// Detach every remaining non-empty buffer as a final batch
    ///
    /// Called once, after the source sequence is exhausted. Final batches
    /// may be smaller than the threshold but are never empty.
    pub fn flush(&mut self) -> Vec<PartitionBatch> {
        self.buffers
            .drain()
            .filter(|(_, records)| !records.is_empty())
            .map(|(partition_id, records)| PartitionBatch::new(partition_id, records))
            .collect()
    }

    /// Number of readings currently buffered across all partitions
    pub fn buffered(&self) -> usize {
        self.buffers.values().map(Vec::len).sum()
    }

    /// Number of partitions with a non-empty buffer
    pub fn open_partitions(&self) -> usize {
        self.buffers.len()
    }
}
