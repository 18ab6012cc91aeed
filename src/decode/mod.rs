//! Streaming record decoder
//!
//! Incremental decoding of a top-level JSON array delivered as a chunked
//! byte stream. The array is never materialized: elements are framed by an
//! incremental scanner and deserialized one at a time.
//!
//! # Overview
//!
//! - `JsonArrayDecoder` - pull-based decoder yielding one event per element
//! - `DecodeEvent` - a decoded record, or a skip for a malformed element
//! - `ByteStream` - the chunked input abstraction the decoder consumes

mod array;
mod types;

pub use array::JsonArrayDecoder;
pub use types::{ByteStream, DecodeEvent};
