//! # Radar sites and pixel-space placement
//!
//! This module gathers **radar site handling** for the flow engine:
//!
//! - The [`Projection`] contract supplied by the caller, mapping geographic
//!   coordinates onto view pixels. The engine never does cartographic math
//!   itself; it only consumes the projected points.
//! - A [`RadarSite`] type storing the geographic position together with the
//!   **projected pixel point, derived once and cached**. Pixel coordinates
//!   are `NotNan` — a site whose projection comes back non-finite is rejected
//!   at construction instead of poisoning every later interpolation.
//! - The [`Radars`] registry resolving measurement rows to their site by id.
//!
//! ## Conventions
//!
//! - Longitudes/latitudes: **degrees**, east- and north-positive.
//! - Pixel coordinates: canvas space, y growing **downwards**.

pub mod metadata_reader;

use std::collections::HashMap;
use std::sync::Arc;

use ordered_float::NotNan;

use crate::birdflow_errors::BirdFlowError;
use crate::constants::{Pixel, RadarId};
use crate::radars::metadata_reader::RadarSpec;

/// Caller-supplied projection from geographic to pixel coordinates.
///
/// Implemented for any `Fn(f64, f64) -> (f64, f64)` closure, so a host can
/// pass its map projection directly.
pub trait Projection {
    fn project(&self, lon: f64, lat: f64) -> (Pixel, Pixel);
}

impl<F> Projection for F
where
    F: Fn(f64, f64) -> (Pixel, Pixel),
{
    fn project(&self, lon: f64, lat: f64) -> (Pixel, Pixel) {
        self(lon, lat)
    }
}

/// A radar site with its cached pixel placement.
///
/// The pixel point is computed once through the caller's [`Projection`] when
/// the registry is built and is read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RadarSite {
    pub id: RadarId,
    pub lon: NotNan<f64>,
    pub lat: NotNan<f64>,
    pixel_x: NotNan<f64>,
    pixel_y: NotNan<f64>,
}

impl RadarSite {
    /// Build a site from its metadata record, projecting its coordinates.
    ///
    /// Arguments
    /// ---------
    /// * `spec`: the metadata record `{id, coordinates: [lon, lat]}`
    /// * `projection`: the caller's geographic-to-pixel mapping
    ///
    /// Return
    /// ------
    /// * the site with cached pixel point, or
    ///   [`BirdFlowError::NonFiniteProjection`] when the projection yields
    ///   NaN or infinity for this site
    pub fn new<P: Projection>(spec: &RadarSpec, projection: &P) -> Result<Self, BirdFlowError> {
        let (px, py) = projection.project(spec.coordinates[0], spec.coordinates[1]);

        let non_finite = |_| BirdFlowError::NonFiniteProjection(spec.id.clone());
        Ok(RadarSite {
            id: spec.id.clone(),
            lon: NotNan::new(spec.coordinates[0]).map_err(non_finite)?,
            lat: NotNan::new(spec.coordinates[1]).map_err(non_finite)?,
            pixel_x: NotNan::new(px).map_err(non_finite)?,
            pixel_y: NotNan::new(py).map_err(non_finite)?,
        })
    }

    /// Cached pixel position of this site.
    pub fn pixel_point(&self) -> (Pixel, Pixel) {
        (self.pixel_x.into_inner(), self.pixel_y.into_inner())
    }
}

/// Registry of radar sites keyed by feed id.
#[derive(Debug, Clone, Default)]
pub struct Radars {
    sites: HashMap<RadarId, Arc<RadarSite>>,
}

impl Radars {
    /// Build the registry from metadata records, projecting each site once.
    pub fn from_specs<P: Projection>(
        specs: &[RadarSpec],
        projection: &P,
    ) -> Result<Self, BirdFlowError> {
        let mut sites = HashMap::with_capacity(specs.len());
        for spec in specs {
            let site = RadarSite::new(spec, projection)?;
            sites.insert(site.id.clone(), Arc::new(site));
        }
        Ok(Radars { sites })
    }

    pub fn get(&self, id: &str) -> Option<&Arc<RadarSite>> {
        self.sites.get(id)
    }

    /// Resolve a site's cached pixel point, failing on unknown ids.
    pub fn pixel_point_of(&self, id: &str) -> Result<(Pixel, Pixel), BirdFlowError> {
        self.sites
            .get(id)
            .map(|site| site.pixel_point())
            .ok_or_else(|| BirdFlowError::UnknownRadar(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<RadarSite>> {
        self.sites.values()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}
