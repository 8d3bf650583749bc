//! # BirdFlow: engine context and animation driver
//!
//! This module defines the [`BirdFlow`] struct, the central façade that
//! wires together:
//!
//! 1. **Measurement index** — the time/altitude and radar/altitude keyed
//!    views over one data load ([`MeasurementIndex`]).
//! 2. **Radar registry** — sites with pixel positions projected once and
//!    cached ([`Radars`]).
//! 3. **Time navigation** — the [`TimeCursor`] selecting which slice of the
//!    index feeds the interpolator.
//! 4. **Field reconstruction** — the pending [`InterpolationBatch`] and the
//!    last fully committed [`FieldGrid`].
//! 5. **Tracer particles** — the [`ParticleSystem`] advected each tick.
//!
//! All engine state lives in this one owned value; there are no module-level
//! globals. Two cooperative activities share the owner's single thread:
//!
//! - the **animation tick** ([`BirdFlow::tick`]), which first gives the
//!   pending interpolation batch one bounded slice of work, then advects the
//!   particles against the last committed field;
//! - **field recomputation**, requested by any time/altitude navigation and
//!   self-chunked so no single call blocks longer than its budget.
//!
//! The field consumed by a tick is always either the previously committed
//! grid or a newly completed one — never a torn intermediate. Navigating
//! again while a batch is in flight bumps the engine's generation counter;
//! a batch whose token does not match is discarded unseen.
//!
//! ## Typical usage
//!
//! ```rust,no_run
//! use birdflow::birdflow::BirdFlow;
//! use birdflow::measurements::csv_reader::read_measurements;
//! use birdflow::radars::metadata_reader::RadarMetadata;
//! use birdflow::settings::FlowSettings;
//! use birdflow::view::ViewBounds;
//!
//! # fn main() -> Result<(), birdflow::birdflow_errors::BirdFlowError> {
//! let measurements = read_measurements(std::fs::File::open("birds.csv")?)?;
//! let metadata = RadarMetadata::from_json(std::fs::File::open("radars.json")?)?;
//! let view = ViewBounds::from_extent(910.0, 720.0)?;
//! let project = |lon: f64, lat: f64| (lon * 10.0, lat * -10.0);
//!
//! let mut engine = BirdFlow::assemble(
//!     measurements,
//!     &metadata.radars,
//!     &project,
//!     view,
//!     FlowSettings::default(),
//! )?;
//!
//! loop {
//!     engine.tick();
//!     // ... draw each particle's (x, y) -> (xt, yt) segment ...
//!     engine.commit_particles();
//! }
//! # }
//! ```

use hifitime::Epoch;
use log::debug;
use nalgebra::Vector3;

use crate::birdflow_errors::BirdFlowError;
use crate::constants::{AltitudeBand, Pixel, MAX_TASK_TIME};
use crate::field::{build_field_samples, BatchStatus, FieldGrid, InterpolationBatch};
use crate::measurements::csv_reader::read_measurements;
use crate::measurements::index::MeasurementIndex;
use crate::measurements::Measurement;
use crate::particles::{Particle, ParticleSystem};
use crate::radars::metadata_reader::{RadarMetadata, RadarSpec};
use crate::radars::{Projection, Radars};
use crate::settings::FlowSettings;
use crate::time::align_to_step;
use crate::time_cursor::TimeCursor;
use crate::view::ViewBounds;

/// The assembled engine: one data load, one view, one animation session.
#[derive(Debug)]
pub struct BirdFlow {
    index: MeasurementIndex,
    radars: Radars,
    view: ViewBounds,
    settings: FlowSettings,
    cursor: TimeCursor,
    particles: ParticleSystem,
    field: FieldGrid,
    pending: Option<InterpolationBatch>,
    generation: u64,
}

impl BirdFlow {
    /// Assemble the engine from already-loaded inputs.
    ///
    /// This is the typed, sequential load pipeline: index the measurements,
    /// project and register the radars, place the cursor at the start of the
    /// range, seed the particle pool and request the first field.
    ///
    /// Arguments
    /// ---------
    /// * `measurements`: the parsed feed rows
    /// * `radar_specs`: the radar metadata records
    /// * `projection`: the caller's geographic-to-pixel mapping
    /// * `view`: pixel rectangle to animate
    /// * `settings`: dataset and tuning knobs
    ///
    /// Return
    /// ------
    /// * the engine, or an error when the feed has no timestamps or a radar
    ///   projects to a non-finite position
    pub fn assemble<P: Projection>(
        measurements: Vec<Measurement>,
        radar_specs: &[RadarSpec],
        projection: &P,
        view: ViewBounds,
        settings: FlowSettings,
    ) -> Result<Self, BirdFlowError> {
        let particles =
            ParticleSystem::new(view, settings.particle_count, settings.max_particle_age);
        Self::assemble_with_particles(measurements, radar_specs, projection, view, settings, particles)
    }

    /// Deterministic variant seeding the particle pool from `seed`.
    pub fn assemble_seeded<P: Projection>(
        measurements: Vec<Measurement>,
        radar_specs: &[RadarSpec],
        projection: &P,
        view: ViewBounds,
        settings: FlowSettings,
        seed: u64,
    ) -> Result<Self, BirdFlowError> {
        let particles = ParticleSystem::seeded(
            view,
            settings.particle_count,
            settings.max_particle_age,
            seed,
        );
        Self::assemble_with_particles(measurements, radar_specs, projection, view, settings, particles)
    }

    fn assemble_with_particles<P: Projection>(
        measurements: Vec<Measurement>,
        radar_specs: &[RadarSpec],
        projection: &P,
        view: ViewBounds,
        settings: FlowSettings,
        particles: ParticleSystem,
    ) -> Result<Self, BirdFlowError> {
        let index = MeasurementIndex::build(measurements);
        let radars = Radars::from_specs(radar_specs, projection)?;
        let cursor = TimeCursor::new(
            index.timestamps(),
            settings.default_altitude_band,
            settings.time_step_minutes,
        )?;
        let field = FieldGrid::undefined(&view);

        let mut engine = BirdFlow {
            index,
            radars,
            view,
            settings,
            cursor,
            particles,
            field,
            pending: None,
            generation: 0,
        };
        engine.request_interpolation();
        Ok(engine)
    }

    /// Assemble the engine by reading the files named in a settings
    /// document.
    pub fn from_settings_files<P: Projection>(
        settings: FlowSettings,
        projection: &P,
        view: ViewBounds,
    ) -> Result<Self, BirdFlowError> {
        let datafile = settings
            .datafile
            .clone()
            .ok_or(BirdFlowError::MissingDataFile("measurement feed"))?;
        let radarfile = settings
            .radardatafile
            .clone()
            .ok_or(BirdFlowError::MissingDataFile("radar metadata"))?;

        let measurements = read_measurements(std::fs::File::open(datafile)?)?;
        let metadata = RadarMetadata::from_json(std::fs::File::open(radarfile)?)?;
        Self::assemble(measurements, &metadata.radars, projection, view, settings)
    }

    /// One animation frame: give the pending interpolation its slice of the
    /// thread, then advect every particle against the current field.
    ///
    /// Returns the particle snapshot whose `(x, y) -> (xt, yt)` segments the
    /// renderer draws; call [`commit_particles`](Self::commit_particles)
    /// once drawn.
    pub fn tick(&mut self) -> &[Particle] {
        self.poll_interpolation();
        self.particles.evolve(&self.field);
        self.particles.particles()
    }

    /// Apply the moves computed by the last [`tick`](Self::tick).
    pub fn commit_particles(&mut self) {
        self.particles.commit();
    }

    /// Step the cursor forward (wrapping past the end of the range) and
    /// request the matching field.
    pub fn next(&mut self) {
        if self.cursor.advance() {
            self.request_interpolation();
        }
    }

    /// Step the cursor backward (clamped at the start of the range).
    pub fn previous(&mut self) {
        if self.cursor.retreat() {
            self.request_interpolation();
        }
    }

    /// Switch the active altitude band.
    pub fn set_altitude(&mut self, band: AltitudeBand) {
        if self.cursor.set_band(band) {
            self.request_interpolation();
        }
    }

    /// Jump to an arbitrary instant, aligned down onto the feed's time grid
    /// and clamped into the loaded range.
    pub fn set_time(&mut self, timestamp: Epoch) {
        let aligned = align_to_step(timestamp, self.settings.time_step_minutes);
        if self.cursor.set_time(aligned) {
            self.request_interpolation();
        }
    }

    /// Sample the current field at a pixel position.
    pub fn sample(&self, x: Pixel, y: Pixel) -> Vector3<f64> {
        self.field.sample(x, y)
    }

    /// The last fully committed field.
    pub fn field(&self) -> &FieldGrid {
        &self.field
    }

    /// Whether a field recomputation is still in flight.
    pub fn interpolation_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cursor(&self) -> &TimeCursor {
        &self.cursor
    }

    pub fn index(&self) -> &MeasurementIndex {
        &self.index
    }

    pub fn radars(&self) -> &Radars {
        &self.radars
    }

    pub fn view(&self) -> &ViewBounds {
        &self.view
    }

    pub fn settings(&self) -> &FlowSettings {
        &self.settings
    }

    /// Start a batch for the cursor's current slice, superseding any batch
    /// already in flight.
    fn request_interpolation(&mut self) {
        self.generation += 1;
        let samples = match self
            .index
            .rows_at(self.cursor.current(), self.cursor.band())
        {
            Some(rows) => build_field_samples(rows, &self.radars),
            None => Vec::new(),
        };
        debug!(
            "field requested: generation {}, {} samples",
            self.generation,
            samples.len()
        );
        self.pending = Some(InterpolationBatch::new(
            self.generation,
            samples,
            &self.view,
            self.settings.vector_denominator,
        ));
    }

    /// Run one slice of the pending batch, committing its grid on
    /// completion. A batch whose generation token no longer matches the
    /// engine's counter is stale and is dropped without being committed.
    fn poll_interpolation(&mut self) {
        let Some(batch) = self.pending.as_mut() else {
            return;
        };
        if batch.generation() != self.generation {
            debug!(
                "discarding stale interpolation batch (generation {} != {})",
                batch.generation(),
                self.generation
            );
            self.pending = None;
            return;
        }
        match batch.run_slice(MAX_TASK_TIME) {
            BatchStatus::Complete(grid) => {
                self.field = grid;
                self.pending = None;
            }
            BatchStatus::Yielded => {}
        }
    }
}

#[cfg(test)]
mod birdflow_test {
    use super::*;
    use crate::time::parse_interval_start_time;

    fn specs() -> Vec<RadarSpec> {
        vec![
            RadarSpec {
                id: "west".to_string(),
                coordinates: [10.0, 10.0],
            },
            RadarSpec {
                id: "east".to_string(),
                coordinates: [90.0, 10.0],
            },
        ]
    }

    fn row(radar: &str, time: &str, u: f64, v: f64) -> Measurement {
        Measurement {
            radar_id: radar.to_string(),
            timestamp: parse_interval_start_time(time).unwrap(),
            altitude_band: 1,
            avg_u_speed: Some(u),
            avg_v_speed: Some(v),
            avg_bird_density: Some(1.0),
        }
    }

    fn engine() -> BirdFlow {
        let rows = vec![
            row("west", "2013-04-05 10:00:00+00", 5.0, 0.0),
            row("east", "2013-04-05 10:00:00+00", -5.0, 0.0),
            row("west", "2013-04-05 10:20:00+00", 1.0, 1.0),
        ];
        let view = ViewBounds::from_extent(100.0, 100.0).unwrap();
        let settings = FlowSettings {
            particle_count: 20,
            ..FlowSettings::default()
        };
        BirdFlow::assemble_seeded(rows, &specs(), &|lon: f64, lat: f64| (lon, lat), view, settings, 9)
            .unwrap()
    }

    #[test]
    fn test_assemble_requests_initial_field() {
        let engine = engine();
        assert!(engine.interpolation_pending());
        assert_eq!(engine.cursor().current(), engine.cursor().min());
    }

    #[test]
    fn test_tick_commits_field_and_moves_particles() {
        let mut engine = engine();
        engine.tick();
        assert!(!engine.interpolation_pending());
        assert!(!engine.field().is_undefined());
        engine.commit_particles();
    }

    #[test]
    fn test_missing_settings_files_are_errors() {
        let view = ViewBounds::from_extent(10.0, 10.0).unwrap();
        let err = BirdFlow::from_settings_files(
            FlowSettings::default(),
            &|lon: f64, lat: f64| (lon, lat),
            view,
        )
        .unwrap_err();
        assert_eq!(err, BirdFlowError::MissingDataFile("measurement feed"));
    }
}
