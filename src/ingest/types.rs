//! Ingest types
//!
//! Configuration and statistics for the ingestion orchestrator.

use crate::partition::DEFAULT_PARTITION_PREFIX;

/// Configuration for one ingestion pipeline
///
/// Constructed by the invocation layer and passed in explicitly; the
/// pipeline never reads ambient environment state.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Records per dispatched batch (mid-stream batches never exceed this)
    pub batch_size: usize,
    /// Prefix for partition identifiers
    pub partition_prefix: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            partition_prefix: DEFAULT_PARTITION_PREFIX.to_string(),
        }
    }
}

impl IngestConfig {
    /// Create a config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the batch threshold
    #[must_use]
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Set the partition prefix
    #[must_use]
    pub fn with_partition_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.partition_prefix = prefix.into();
        self
    }
}

/// Statistics from ingesting one source object
#[derive(Debug, Clone, Default)]
pub struct IngestStats {
    /// Records successfully decoded and accepted into a batch
    pub records_processed: usize,
    /// Malformed elements skipped during decode
    pub records_skipped: usize,
    /// Batches handed to the dispatcher
    pub batches_dispatched: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl IngestStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a processed record
    pub fn add_record(&mut self) {
        self.records_processed += 1;
    }

    /// Add a skipped record
    pub fn add_skip(&mut self) {
        self.records_skipped += 1;
    }
}
