//! # Measurement rows
//!
//! One [`Measurement`] is a single radar observation for one time bucket and
//! one altitude band: the mean eastward and northward speed components and
//! the mean bird density measured over the interval.
//!
//! Numeric fields of the feed are **lenient**: a value that is missing,
//! unparseable or non-finite is carried as `None` and contributes nothing to
//! aggregates. It is never silently coerced to zero; only the display
//! density may default to zero, and only at the point where a field sample
//! is built.

pub mod csv_reader;
pub mod index;

use hifitime::Epoch;
use serde::{Deserialize, Deserializer};

use crate::birdflow_errors::BirdFlowError;
use crate::constants::{AltitudeBand, RadarId};
use crate::time::parse_interval_start_time;

/// One row of the measurement feed, as serialized in the CSV file.
///
/// Timestamps and altitude bands stay raw here; [`Measurement::from_record`]
/// turns them into typed values and rejects rows that cannot be keyed.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMeasurementRecord {
    pub radar_id: String,
    pub interval_start_time: String,
    pub altitude_band: String,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_u_speed: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_v_speed: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_bird_density: Option<f64>,
}

/// A typed, immutable measurement row.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub radar_id: RadarId,
    pub timestamp: Epoch,
    pub altitude_band: AltitudeBand,
    pub avg_u_speed: Option<f64>,
    pub avg_v_speed: Option<f64>,
    pub avg_bird_density: Option<f64>,
}

impl Measurement {
    /// Convert a raw feed record into a typed measurement.
    ///
    /// Return
    /// ------
    /// * the measurement, or an error when the timestamp or altitude band
    ///   cannot be parsed — rows without a valid key cannot be indexed
    pub fn from_record(record: &RawMeasurementRecord) -> Result<Self, BirdFlowError> {
        let timestamp = parse_interval_start_time(&record.interval_start_time)?;
        let altitude_band = record
            .altitude_band
            .trim()
            .parse::<AltitudeBand>()
            .map_err(|_| BirdFlowError::InvalidAltitudeBand(record.altitude_band.clone()))?;

        Ok(Measurement {
            radar_id: record.radar_id.trim().to_string(),
            timestamp,
            altitude_band,
            avg_u_speed: record.avg_u_speed,
            avg_v_speed: record.avg_v_speed,
            avg_bird_density: record.avg_bird_density,
        })
    }

    /// Whether this row carries both speed components and can contribute a
    /// sample to the interpolated field.
    pub fn has_velocity(&self) -> bool {
        self.avg_u_speed.is_some() && self.avg_v_speed.is_some()
    }
}

/// Deserialize an optional float, mapping empty, unparseable and non-finite
/// values to `None`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite()))
}
