//! Partition routing
//!
//! Maps each reading to a calendar-month partition and accumulates
//! per-partition buffers until they are ready to dispatch.
//!
//! # Overview
//!
//! - `monthly_partition_id` - pure timestamp → partition id derivation
//! - `PartitionBatch` - a detached, ready-to-insert group of readings
//! - `PartitionAccumulator` - threshold-based router feeding the dispatcher

mod accumulator;
mod keys;
mod types;

pub use accumulator::PartitionAccumulator;
pub use keys::{monthly_partition_id, DEFAULT_PARTITION_PREFIX};
pub use types::PartitionBatch;
