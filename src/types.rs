//! Common types
//!
//! The record model shared by the decoder, accumulator, and sinks.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One HVAC sensor reading
///
/// Decoded from a single element of the source JSON array. The timestamp is
/// the only required field and drives partitioning; it keeps whatever UTC
/// offset the source carried. Every other field defaults to its zero value
/// when missing, and unknown fields in the source are ignored. No semantic
/// validation happens here: implausible values (negative pressure, say) are
/// accepted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Reading timestamp (ISO-8601, required)
    pub timestamp: DateTime<FixedOffset>,

    /// Indoor air temperature in degrees Celsius
    #[serde(default)]
    pub internal_temperature: f64,

    /// Thermostat set point in degrees Celsius
    #[serde(default)]
    pub set_point_temperature: f64,

    /// Outdoor air temperature in degrees Celsius
    #[serde(default)]
    pub outdoor_temperature: f64,

    /// Outdoor relative humidity in percent
    #[serde(default)]
    pub outdoor_humidity: f64,

    /// Supply duct static pressure in Pa
    #[serde(default)]
    pub supply_pressure: f64,

    /// Return duct static pressure in Pa
    #[serde(default)]
    pub return_pressure: f64,

    /// Energy consumed since the previous reading in kWh
    #[serde(default)]
    pub power_consumption_kwh: f64,

    /// CO2 concentration in ppm
    #[serde(default)]
    pub co2_ppm: f64,

    /// Operating mode reported by the unit (e.g. "cooling", "idle")
    #[serde(default)]
    pub system_status: String,

    /// Active fault code, empty when none
    #[serde(default)]
    pub fault_code: String,

    /// Identifier of the reporting device
    #[serde(default)]
    pub device_id: String,

    /// Site the device is installed at
    #[serde(default)]
    pub site_id: String,

    /// Zone within the site
    #[serde(default)]
    pub zone: String,

    /// Whether the zone was occupied at reading time
    #[serde(default)]
    pub occupancy_status: bool,
}
