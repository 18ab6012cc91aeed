//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// HVAC sensor data ingest CLI
#[derive(Parser, Debug)]
#[command(name = "hvac-ingest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Records per dispatched batch
    #[arg(long, global = true, default_value = "1000")]
    pub batch_size: usize,

    /// Prefix for partition identifiers
    #[arg(long, global = true, default_value = "hvac_readings")]
    pub partition_prefix: String,

    /// Write-back destination URL; defaults to the source bucket
    /// Supports: /path, s3://bucket/path, gs://bucket/path, az://container/path
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest one or more objects from a bucket
    Ingest {
        /// Source bucket URL (s3://bucket, gs://bucket, az://container, or local path)
        bucket: String,

        /// Object keys to ingest
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Ingest every object named in an event manifest
    Event {
        /// JSON manifest: an array of {"bucket": "...", "key": "..."} records
        manifest: PathBuf,
    },
}
