//! # Field reconstruction
//!
//! This module turns the sparse radar samples of one `(timestamp, altitude
//! band)` slice into a dense, pixel-resolution vector field:
//!
//! 1. [`build_field_samples`] pairs each measurement carrying both speed
//!    components with its radar's cached pixel point, negating the
//!    northward component into pixel space (y grows downwards on a canvas).
//! 2. [`IdwInterpolator`] reconstructs a continuous field from those samples
//!    by inverse-distance weighting over the `k = min(5, n)` nearest ones.
//! 3. [`InterpolationBatch`] discretizes the field over the view rectangle
//!    column by column under a cooperative time budget, committing only
//!    fully filled [`FieldGrid`]s and carrying a generation token so a
//!    superseded computation is discarded, never committed.
//!
//! The committed grid answers `sample(x, y)` with the scaled
//! `[u, v, density]` triple, or the undefined vector for anything outside
//! the populated rectangle.
//!
//! ## Invariants
//!
//! - A query never observes a partially filled grid.
//! - No measurements for a slice produce an all-undefined grid, not an
//!   error.
//! - Out-of-range and non-finite queries yield the undefined vector and
//!   never panic.

pub mod batch;
pub mod grid;
pub mod idw;

pub use batch::{BatchStatus, InterpolationBatch};
pub use grid::{is_nil, nil_vector, FieldGrid};
pub use idw::{FieldSample, IdwInterpolator};

use hifitime::Epoch;
use log::warn;
use nalgebra::Vector3;

use crate::constants::{AltitudeBand, MAX_TASK_TIME, MIN_SLEEP_TIME};
use crate::measurements::index::MeasurementIndex;
use crate::measurements::Measurement;
use crate::radars::Radars;
use crate::view::ViewBounds;

/// Pair measurement rows with their radars' cached pixel points.
///
/// Rows missing either speed component contribute nothing. A missing
/// density enters the sample as `0.0` (the display default), while rows
/// referencing a radar absent from the registry are skipped with a warning.
/// The northward v-component is negated: geographic v grows north, pixel y
/// grows down.
pub fn build_field_samples(rows: &[Measurement], radars: &Radars) -> Vec<FieldSample> {
    let mut samples = Vec::with_capacity(rows.len());
    for row in rows {
        let (Some(u), Some(v)) = (row.avg_u_speed, row.avg_v_speed) else {
            continue;
        };
        match radars.get(&row.radar_id) {
            Some(site) => {
                let (x, y) = site.pixel_point();
                samples.push(FieldSample {
                    x,
                    y,
                    vector: Vector3::new(u, -v, row.avg_bird_density.unwrap_or(0.0)),
                });
            }
            None => warn!("measurement references unknown radar {}", row.radar_id),
        }
    }
    samples
}

/// Reconstruct and fully discretize the field of one slice, blocking.
///
/// The synchronous form of the operation: the batch is driven to completion
/// with the default slice budget and inter-slice pause. Interactive hosts
/// should instead poll an [`InterpolationBatch`] from their frame loop.
///
/// Arguments
/// ---------
/// * `timestamp`, `band`: the slice to reconstruct
/// * `index`: the measurement index of the current load
/// * `radars`: registry resolving rows to pixel positions
/// * `view`: pixel rectangle to cover
/// * `vector_denominator`: speed-to-displacement divisor
///
/// Return
/// ------
/// * the committed grid; all-undefined when the slice has no measurements
pub fn interpolate_field(
    timestamp: Epoch,
    band: AltitudeBand,
    index: &MeasurementIndex,
    radars: &Radars,
    view: &ViewBounds,
    vector_denominator: f64,
) -> FieldGrid {
    let samples = match index.rows_at(timestamp, band) {
        Some(rows) => build_field_samples(rows, radars),
        None => Vec::new(),
    };
    InterpolationBatch::new(0, samples, view, vector_denominator)
        .run_to_completion(MAX_TASK_TIME, MIN_SLEEP_TIME)
}
