//! Error types for the ingest pipeline
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Record-level decode failures are deliberately *not* errors: the decoder
//! reports them as skip events and the stream continues. Only stream-open,
//! envelope, and sink failures surface through this type.

use thiserror::Error;

/// The main error type for the ingest pipeline
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("Transport error: {message}")]
    Transport { message: String },

    // ============================================================================
    // Envelope Errors
    // ============================================================================
    #[error("Malformed envelope: {message}")]
    MalformedEnvelope { message: String },

    // ============================================================================
    // Sink Errors
    // ============================================================================
    #[error("Sink error for partition '{partition_id}': {message}")]
    Sink {
        partition_id: String,
        message: String,
    },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a malformed-envelope error
    pub fn malformed_envelope(message: impl Into<String>) -> Self {
        Self::MalformedEnvelope {
            message: message.into(),
        }
    }

    /// Create a sink error for a partition
    pub fn sink(partition_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Sink {
            partition_id: partition_id.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error aborts the whole object's ingestion
    ///
    /// Sink failures are batch-scoped: other in-flight and future batches
    /// keep going. Everything else is fatal for the current object.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Sink { .. })
    }
}

/// Result type alias for the ingest pipeline
pub type Result<T> = std::result::Result<T, Error>;
