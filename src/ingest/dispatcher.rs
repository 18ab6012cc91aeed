//! Concurrent batch dispatcher
//!
//! One spawned insert task per batch, no concurrency cap: batch sizes are
//! bounded, batch counts per object are small, so memory stays bounded
//! while fan-out does not. The only state shared across tasks is the
//! first-error slot.

use crate::error::Error;
use crate::partition::PartitionBatch;
use crate::store::StorageSink;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Fire-and-forget batch dispatch with tracked completion
///
/// Every `dispatch` spawns one task; `drain` joins them all, so the
/// orchestrator can deterministically wait for every insert to settle.
/// Insert failures are funneled into a capacity-one error slot: the first
/// failure is retained, later ones are logged and discarded
/// (first-error-wins).
pub struct BatchDispatcher {
    sink: Arc<dyn StorageSink>,
    tasks: JoinSet<()>,
    first_error: Arc<Mutex<Option<Error>>>,
    batches_dispatched: usize,
}

impl BatchDispatcher {
    /// Create a dispatcher targeting a sink
    pub fn new(sink: Arc<dyn StorageSink>) -> Self {
        Self {
            sink,
            tasks: JoinSet::new(),
            first_error: Arc::new(Mutex::new(None)),
            batches_dispatched: 0,
        }
    }

    /// Submit a batch for asynchronous insertion; returns immediately
    ///
    /// The batch moves into the spawned task; ownership is never shared.
    pub fn dispatch(&mut self, batch: PartitionBatch) {
        self.batches_dispatched += 1;
        let sink = self.sink.clone();
        let slot = self.first_error.clone();

        self.tasks.spawn(async move {
            let PartitionBatch {
                partition_id,
                records,
            } = batch;
            let count = records.len();
            info!("Inserting batch of {count} records into partition '{partition_id}'");

            match sink.insert(&partition_id, records).await {
                Ok(()) => {
                    info!("Batch of {count} records inserted into partition '{partition_id}'");
                }
                Err(e) => {
                    warn!("Insert failed for partition '{partition_id}': {e}");
                    record_first(&slot, e);
                }
            }
        });
    }

    /// Number of dispatch tasks not yet joined
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Total batches submitted so far
    pub fn batches_dispatched(&self) -> usize {
        self.batches_dispatched
    }

    /// Join every spawned task (the pipeline's single join point)
    ///
    /// Terminates for any finite number of dispatches. A panicked insert
    /// task counts as a failed batch.
    pub async fn drain(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(e) = joined {
                record_first(
                    &self.first_error,
                    Error::Other(format!("insert task failed: {e}")),
                );
            }
        }
    }

    /// Take the retained representative error, if any insert failed
    pub fn take_error(&mut self) -> Option<Error> {
        lock_slot(&self.first_error).take()
    }
}

fn lock_slot(slot: &Mutex<Option<Error>>) -> std::sync::MutexGuard<'_, Option<Error>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Record an error into the slot only when it is empty
fn record_first(slot: &Mutex<Option<Error>>, error: Error) {
    let mut guard = lock_slot(slot);
    if guard.is_none() {
        *guard = Some(error);
    }
}
