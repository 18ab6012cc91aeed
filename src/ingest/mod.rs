//! Ingestion orchestrator
//!
//! Ties the pipeline together for one source object: open the stream,
//! drive decoding, route records into partition buffers, dispatch ready
//! batches concurrently, flush trailing partials, drain every in-flight
//! insert, and produce one terminal result.
//!
//! # Overview
//!
//! - `Ingestor` - the end-to-end pipeline for a configured source and sink
//! - `IngestConfig` - batch threshold and partition prefix
//! - `IngestStats` - per-object counters
//! - `BatchDispatcher` - concurrent fan-out with a first-error slot

mod dispatcher;
mod types;

pub use dispatcher::BatchDispatcher;
pub use types::{IngestConfig, IngestStats};

use crate::decode::{DecodeEvent, JsonArrayDecoder};
use crate::error::Result;
use crate::partition::PartitionAccumulator;
use crate::store::{ObjectStage, StorageSink};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// End-to-end streaming ingest for one source object at a time
///
/// A single sequential producer (the decoder) feeds the accumulator;
/// each ready batch runs as its own insert task in parallel with continued
/// stream consumption. Cancellation is the caller's concern: wrap
/// [`ingest_object`](Self::ingest_object) in a timeout if needed; dropping
/// the future releases the stream, though inserts already in flight are
/// not rolled back.
pub struct Ingestor {
    source: ObjectStage,
    sink: Arc<dyn StorageSink>,
    config: IngestConfig,
}

impl Ingestor {
    /// Create an ingestor over a source stage and a sink
    pub fn new(source: ObjectStage, sink: Arc<dyn StorageSink>, config: IngestConfig) -> Self {
        Self {
            source,
            sink,
            config,
        }
    }

    /// Ingest one source object to completion
    ///
    /// Terminal result: `Ok` with stats when every batch inserted and the
    /// envelope was well-formed; otherwise the first retained sink error,
    /// else the envelope error. Record-level skips never fail the object.
    pub async fn ingest_object(&self, key: &str) -> Result<IngestStats> {
        let start = Instant::now();
        info!(
            "Starting ingest of '{key}' with monthly partitioning (batch size {})",
            self.config.batch_size
        );

        // Opening; failure is terminal before anything is dispatched
        let stream = self.source.open(key).await?;
        let mut decoder = JsonArrayDecoder::new(stream);
        let mut accumulator =
            PartitionAccumulator::new(&self.config.partition_prefix, self.config.batch_size);
        let mut dispatcher = BatchDispatcher::new(self.sink.clone());
        let mut stats = IngestStats::new();

        // Streaming: decode, route, dispatch as buffers fill
        let streamed = loop {
            match decoder.next_event().await {
                Ok(Some(DecodeEvent::Record(reading))) => {
                    stats.add_record();
                    if let Some(batch) = accumulator.append(reading) {
                        dispatcher.dispatch(batch);
                    }
                }
                Ok(Some(DecodeEvent::Skipped { index, reason })) => {
                    warn!("Skipping record #{index} in '{key}': {reason}");
                    stats.add_skip();
                }
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        // Flushing: trailing partial batches go out exactly like full ones
        if streamed.is_ok() {
            for batch in accumulator.flush() {
                dispatcher.dispatch(batch);
            }
        }

        // Draining: every dispatch settles before the terminal result,
        // even when the stream itself failed mid-read
        dispatcher.drain().await;
        stats.batches_dispatched = dispatcher.batches_dispatched();

        streamed?;
        if let Some(error) = dispatcher.take_error() {
            return Err(error);
        }

        // Envelope end is validated only now; batches already inserted
        // stay inserted even if this fails
        decoder.finish().await?;

        stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Completed ingest of '{key}': {} records in {} batches, {} skipped",
            stats.records_processed, stats.batches_dispatched, stats.records_skipped
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests;
