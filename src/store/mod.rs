//! Object storage and sink interfaces
//!
//! The two external seams of the pipeline: where bytes come from
//! (`ObjectStage`, an `object_store`-backed bucket handle) and where
//! batches go (`StorageSink`, the document-store seam).

mod cloud;
mod sink;

pub use cloud::ObjectStage;
pub use sink::{JsonWriteBackSink, StorageSink};

#[cfg(test)]
mod tests;
