//! Partition key derivation
//!
//! One pure function: timestamp in, partition id out.

use chrono::{DateTime, Datelike, FixedOffset};

/// Default prefix for monthly partitions
pub const DEFAULT_PARTITION_PREFIX: &str = "hvac_readings";

/// Derive the monthly partition id for a timestamp
///
/// Format: `<prefix>_<YYYY>_<MM>`, e.g. `hvac_readings_2024_07`. Uses the
/// calendar year and month of the timestamp in whatever offset it carries;
/// there is no normalization to UTC. Total and deterministic for any
/// representable timestamp.
pub fn monthly_partition_id(prefix: &str, timestamp: DateTime<FixedOffset>) -> String {
    format!(
        "{prefix}_{:04}_{:02}",
        timestamp.year(),
        timestamp.month()
    )
}
