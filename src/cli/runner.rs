//! CLI command execution

use super::commands::{Cli, Commands};
use crate::error::{Error, Result};
use crate::ingest::{IngestConfig, IngestStats, Ingestor};
use crate::store::{JsonWriteBackSink, ObjectStage};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

/// One bucket/key pair from an event manifest
///
/// The shape of a storage-trigger event record, read from a file so batch
/// jobs and local runs share the same surface.
#[derive(Debug, Deserialize)]
struct EventRecord {
    bucket: String,
    key: String,
}

/// Executes CLI commands
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the command
    ///
    /// Per-object failures are logged and do not abort the remaining
    /// objects in the invocation.
    pub async fn run(&self) -> Result<()> {
        let objects = match &self.cli.command {
            Commands::Ingest { bucket, keys } => keys
                .iter()
                .map(|key| (bucket.clone(), key.clone()))
                .collect(),
            Commands::Event { manifest } => load_manifest(manifest)?,
        };
        self.ingest_all(objects).await
    }

    fn config(&self) -> IngestConfig {
        IngestConfig::new()
            .with_batch_size(self.cli.batch_size)
            .with_partition_prefix(&self.cli.partition_prefix)
    }

    async fn ingest_all(&self, objects: Vec<(String, String)>) -> Result<()> {
        let mut failures = 0usize;

        for (bucket, key) in &objects {
            match self.ingest_one(bucket, key).await {
                Ok(stats) => log_stats(bucket, key, &stats),
                Err(e) => {
                    failures += 1;
                    error!("Failed to ingest '{bucket}/{key}': {e}");
                }
            }
        }

        if failures > 0 {
            warn!("{failures} of {} object(s) failed to ingest", objects.len());
        }
        Ok(())
    }

    async fn ingest_one(&self, bucket: &str, key: &str) -> Result<IngestStats> {
        let source = ObjectStage::parse(bucket)?;
        let destination = match &self.cli.output {
            Some(url) => ObjectStage::parse(url)?,
            None => source.clone(),
        };
        let sink = Arc::new(JsonWriteBackSink::new(destination));

        let ingestor = Ingestor::new(source, sink, self.config());
        ingestor.ingest_object(key).await
    }
}

fn log_stats(bucket: &str, key: &str, stats: &IngestStats) {
    info!(
        "Ingested '{bucket}/{key}': {} records in {} batches, {} skipped ({} ms)",
        stats.records_processed, stats.batches_dispatched, stats.records_skipped, stats.duration_ms
    );
}

fn load_manifest(path: &Path) -> Result<Vec<(String, String)>> {
    let body = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read manifest {}: {e}", path.display())))?;
    let records: Vec<EventRecord> = serde_json::from_str(&body)
        .map_err(|e| Error::config(format!("Invalid manifest {}: {e}", path.display())))?;
    Ok(records.into_iter().map(|r| (r.bucket, r.key)).collect())
}
