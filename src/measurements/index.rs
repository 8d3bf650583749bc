//! # Measurement index
//!
//! Groups the raw measurement stream into the two lookup structures the
//! engine consumes:
//!
//! - `(timestamp, altitude band) -> rows`, feeding the field interpolator;
//! - `(radar, altitude band) -> rows`, feeding per-site context displays.
//!
//! A single [`MeasurementIndex::build`] pass also derives the sorted, unique
//! [`TimeIndex`] and the per-band maximum bird density used for display
//! scaling. The feed does **not** guarantee chronological row order, so the
//! time index is sorted explicitly after collection.

use std::collections::HashMap;

use hifitime::Epoch;
use itertools::Itertools;
use log::debug;

use crate::constants::{AltitudeBand, RadarId};
use crate::measurements::Measurement;

/// Ordered, deduplicated sequence of feed timestamps.
///
/// Strictly increasing after construction; `min`/`max` are its first and
/// last elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeIndex {
    timestamps: Vec<Epoch>,
}

impl TimeIndex {
    /// Build the index from timestamps in arbitrary order.
    pub fn from_unsorted(mut timestamps: Vec<Epoch>) -> Self {
        timestamps.sort_unstable();
        timestamps.dedup();
        TimeIndex { timestamps }
    }

    pub fn min(&self) -> Option<Epoch> {
        self.timestamps.first().copied()
    }

    pub fn max(&self) -> Option<Epoch> {
        self.timestamps.last().copied()
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Epoch> + '_ {
        self.timestamps.iter().copied()
    }

    pub fn as_slice(&self) -> &[Epoch] {
        &self.timestamps
    }
}

/// Time/altitude- and radar/altitude-keyed views over one data load.
#[derive(Debug, Clone, Default)]
pub struct MeasurementIndex {
    by_time_alt: HashMap<Epoch, HashMap<AltitudeBand, Vec<Measurement>>>,
    by_radar_alt: HashMap<RadarId, HashMap<AltitudeBand, Vec<Measurement>>>,
    timestamps: TimeIndex,
    max_density_by_alt: HashMap<AltitudeBand, f64>,
}

impl MeasurementIndex {
    /// Index the raw measurement stream.
    ///
    /// Both groupings, the time index and the per-band density maxima are
    /// derived in one pass over the rows. An empty input yields empty maps
    /// and an empty time index.
    pub fn build(rows: Vec<Measurement>) -> Self {
        let mut by_time_alt: HashMap<Epoch, HashMap<AltitudeBand, Vec<Measurement>>> =
            HashMap::new();
        let mut by_radar_alt: HashMap<RadarId, HashMap<AltitudeBand, Vec<Measurement>>> =
            HashMap::new();
        let mut time_keys: Vec<Epoch> = Vec::new();
        let mut max_density_by_alt: HashMap<AltitudeBand, f64> = HashMap::new();

        for row in rows {
            time_keys.push(row.timestamp);

            if let Some(density) = row.avg_bird_density.filter(|d| !d.is_nan()) {
                max_density_by_alt
                    .entry(row.altitude_band)
                    .and_modify(|max| *max = max.max(density))
                    .or_insert(density);
            }

            by_radar_alt
                .entry(row.radar_id.clone())
                .or_default()
                .entry(row.altitude_band)
                .or_default()
                .push(row.clone());

            by_time_alt
                .entry(row.timestamp)
                .or_default()
                .entry(row.altitude_band)
                .or_default()
                .push(row);
        }

        let timestamps = TimeIndex::from_unsorted(time_keys);
        debug!(
            "measurement index built: {} time buckets, {} radars",
            timestamps.len(),
            by_radar_alt.len()
        );

        MeasurementIndex {
            by_time_alt,
            by_radar_alt,
            timestamps,
            max_density_by_alt,
        }
    }

    /// Rows measured at one `(timestamp, altitude band)` pair.
    pub fn rows_at(&self, timestamp: Epoch, band: AltitudeBand) -> Option<&[Measurement]> {
        self.by_time_alt
            .get(&timestamp)
            .and_then(|bands| bands.get(&band))
            .map(Vec::as_slice)
    }

    /// Time series of one radar at one altitude band.
    pub fn rows_for_radar(&self, radar_id: &str, band: AltitudeBand) -> Option<&[Measurement]> {
        self.by_radar_alt
            .get(radar_id)
            .and_then(|bands| bands.get(&band))
            .map(Vec::as_slice)
    }

    pub fn timestamps(&self) -> &TimeIndex {
        &self.timestamps
    }

    /// Maximum bird density observed in one altitude band, if any row of the
    /// band carried a usable density.
    pub fn max_density(&self, band: AltitudeBand) -> Option<f64> {
        self.max_density_by_alt.get(&band).copied()
    }

    /// All altitude bands present in the load, ascending.
    pub fn altitude_bands(&self) -> Vec<AltitudeBand> {
        self.by_time_alt
            .values()
            .flat_map(|bands| bands.keys().copied())
            .unique()
            .sorted()
            .collect()
    }
}
