//! Command-line interface
//!
//! Invocation surface for the pipeline: object keys from positional
//! arguments or from an event manifest file.

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
