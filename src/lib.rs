// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # HVAC Sensor Ingest
//!
//! Streaming ingest pipeline for time-series HVAC sensor readings: parse an
//! unbounded JSON array straight off an object-store byte stream, group
//! records into calendar-month partitions, and dispatch bounded batches to a
//! storage sink concurrently, with at-least-once delivery per record and
//! first-error-wins failure aggregation.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hvac_ingest::ingest::{IngestConfig, Ingestor};
//! use hvac_ingest::store::{JsonWriteBackSink, ObjectStage};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> hvac_ingest::Result<()> {
//!     let stage = ObjectStage::parse("s3://sensor-data")?;
//!     let sink = Arc::new(JsonWriteBackSink::new(stage.clone()));
//!
//!     let ingestor = Ingestor::new(stage, sink, IngestConfig::default());
//!     let stats = ingestor.ingest_object("readings/2024-07.json").await?;
//!     println!("{} records ingested", stats.records_processed);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        Ingestor                            │
//! │  open → envelope start → stream → flush → drain → result   │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//! ┌────────────┬───────────────┴────────────┬──────────────────┐
//! │   Decode   │          Partition         │     Dispatch     │
//! ├────────────┼────────────────────────────┼──────────────────┤
//! │ Incremental│ Monthly key derivation     │ One task / batch │
//! │ JSON array │ Per-partition accumulation │ First-error slot │
//! │ Skip bad   │ Threshold detach + flush   │ Join-set drain   │
//! └────────────┴────────────────────────────┴──────────────────┘
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the pipeline
pub mod error;

/// Common types and the record model
pub mod types;

/// Streaming record decoder
pub mod decode;

/// Partition routing and accumulation
pub mod partition;

/// Object storage and sink interfaces
pub mod store;

/// Ingestion orchestrator and dispatcher
pub mod ingest;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::SensorReading;

pub use ingest::{IngestConfig, IngestStats, Ingestor};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
