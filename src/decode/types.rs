//! Decoder types
//!
//! Event and stream abstractions for the streaming decoder.

use crate::error::Result;
use crate::types::SensorReading;
use bytes::Bytes;
use futures::stream::BoxStream;

/// A chunked byte stream, as handed out by the object-store source
///
/// Chunk boundaries carry no meaning; a JSON element may span any number
/// of chunks. Read errors are surfaced as `Error::Transport`.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// One event produced per array element
#[derive(Debug)]
pub enum DecodeEvent {
    /// A well-formed element, decoded into a reading
    Record(SensorReading),
    /// An element that could not be decoded; the stream continues
    Skipped {
        /// Zero-based position of the element in the array
        index: usize,
        /// Why deserialization rejected it
        reason: String,
    },
}

impl DecodeEvent {
    /// Check if this is a record event
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    /// Check if this is a skip event
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}
