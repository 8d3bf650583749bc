//! # Constants and type definitions for birdflow
//!
//! This module centralizes the **engine tunables** and **common type
//! definitions** used throughout the `birdflow` library.
//!
//! ## Overview
//!
//! - Animation and particle-pool defaults
//! - Interpolation kernel and batching budgets
//! - Core type aliases used across the crate
//!
//! These definitions are used by all main modules, including the measurement
//! index, the field interpolator, and the particle system.

use std::time::Duration;

// -------------------------------------------------------------------------------------------------
// Animation defaults
// -------------------------------------------------------------------------------------------------

/// Target milliseconds per animation frame
pub const FRAME_RATE_MS: u64 = 60;

/// Maximum number of frames a particle lives before regeneration
pub const MAX_PARTICLE_AGE: u32 = 60;

/// Number of tracer particles in the pool
pub const PARTICLE_COUNT: usize = 450;

// -------------------------------------------------------------------------------------------------
// Interpolation kernel and batching
// -------------------------------------------------------------------------------------------------

/// Maximum number of samples the IDW kernel interpolates from
pub const MAX_INTERPOLATION_SOURCES: usize = 5;

/// Divisor converting a raw speed into a per-frame pixel displacement,
/// together with the view height
pub const VECTOR_DENOMINATOR: f64 = 1000.0;

/// Time budget for one interpolation slice before it yields control
pub const MAX_TASK_TIME: Duration = Duration::from_millis(50);

/// Recommended pause between two interpolation slices when a host drives
/// a batch to completion outside a frame loop
pub const MIN_SLEEP_TIME: Duration = Duration::from_millis(25);

// -------------------------------------------------------------------------------------------------
// Time navigation
// -------------------------------------------------------------------------------------------------

/// Minutes between two consecutive time frames of the measurement feed
pub const TIME_STEP_MINUTES: i64 = 20;

/// Altitude band selected when none is specified
pub const DEFAULT_ALTITUDE_BAND: AltitudeBand = 1;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Identifier of a radar site as carried by the measurement feed
pub type RadarId = String;

/// Discrete altitude band partitioning measurements by height above ground
pub type AltitudeBand = u8;

/// Position or displacement expressed in view pixels
pub type Pixel = f64;
