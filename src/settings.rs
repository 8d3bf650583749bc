//! Engine settings document.
//!
//! Mirrors the per-dataset settings file shipped next to the measurement
//! feed: data file locations, the geographic bounding box and the animation
//! tuning knobs. Every tuning field falls back to the defaults from
//! [`crate::constants`], so a minimal document only names its data files.

use std::io::Read;

use serde::Deserialize;

use crate::birdflow_errors::BirdFlowError;
use crate::constants::{
    AltitudeBand, DEFAULT_ALTITUDE_BAND, FRAME_RATE_MS, MAX_PARTICLE_AGE, PARTICLE_COUNT,
    TIME_STEP_MINUTES, VECTOR_DENOMINATOR,
};

/// Dataset and animation settings.
///
/// The geographic `bbox` is `[lon_min, lat_min, lon_max, lat_max]`, the
/// corners the caller's projection maps onto the view rectangle.
#[derive(Debug, Clone, Deserialize)]
pub struct FlowSettings {
    /// Location of the aggregated measurement feed (CSV)
    pub datafile: Option<String>,

    /// Location of the radar metadata document (JSON)
    pub radardatafile: Option<String>,

    /// Geographic bounding box of the visualized area
    pub bbox: Option<[f64; 4]>,

    /// Minutes between two consecutive time frames
    #[serde(default = "default_time_step")]
    pub time_step_minutes: i64,

    /// Altitude band shown at startup
    #[serde(default = "default_altitude_band")]
    pub default_altitude_band: AltitudeBand,

    /// Target milliseconds per animation frame
    #[serde(default = "default_frame_rate")]
    pub frame_rate_ms: u64,

    /// Frames a particle lives before regeneration
    #[serde(default = "default_max_particle_age")]
    pub max_particle_age: u32,

    /// Size of the tracer particle pool
    #[serde(default = "default_particle_count")]
    pub particle_count: usize,

    /// Speed-to-displacement divisor of the interpolated field
    #[serde(default = "default_vector_denominator")]
    pub vector_denominator: f64,
}

fn default_time_step() -> i64 {
    TIME_STEP_MINUTES
}

fn default_altitude_band() -> AltitudeBand {
    DEFAULT_ALTITUDE_BAND
}

fn default_frame_rate() -> u64 {
    FRAME_RATE_MS
}

fn default_max_particle_age() -> u32 {
    MAX_PARTICLE_AGE
}

fn default_particle_count() -> usize {
    PARTICLE_COUNT
}

fn default_vector_denominator() -> f64 {
    VECTOR_DENOMINATOR
}

impl Default for FlowSettings {
    fn default() -> Self {
        FlowSettings {
            datafile: None,
            radardatafile: None,
            bbox: None,
            time_step_minutes: TIME_STEP_MINUTES,
            default_altitude_band: DEFAULT_ALTITUDE_BAND,
            frame_rate_ms: FRAME_RATE_MS,
            max_particle_age: MAX_PARTICLE_AGE,
            particle_count: PARTICLE_COUNT,
            vector_denominator: VECTOR_DENOMINATOR,
        }
    }
}

impl FlowSettings {
    /// Read a settings document from a JSON source.
    pub fn from_json<R: Read>(reader: R) -> Result<Self, BirdFlowError> {
        Ok(serde_json::from_reader(reader)?)
    }
}
