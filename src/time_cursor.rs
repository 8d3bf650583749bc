use hifitime::{Duration, Epoch};

use crate::birdflow_errors::BirdFlowError;
use crate::constants::AltitudeBand;
use crate::measurements::index::TimeIndex;
use crate::time::step_duration;

/// Navigation state over the loaded time range and altitude bands.
///
/// The cursor steps by a fixed offset between the immutable data boundaries:
/// advancing past the last timestamp wraps to the first, retreating below
/// the first clamps there. Every mutator reports whether the
/// `(timestamp, altitude band)` pair actually changed, so the owner knows to
/// recompute the field before the next animation tick consumes it.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeCursor {
    current: Epoch,
    band: AltitudeBand,
    min: Epoch,
    max: Epoch,
    step: Duration,
}

impl TimeCursor {
    /// Place the cursor at the start of the loaded range.
    ///
    /// Return
    /// ------
    /// * the cursor, or [`BirdFlowError::EmptyTimeIndex`] when the load
    ///   carried no timestamps
    pub fn new(
        time_index: &TimeIndex,
        band: AltitudeBand,
        step_minutes: i64,
    ) -> Result<Self, BirdFlowError> {
        let min = time_index.min().ok_or(BirdFlowError::EmptyTimeIndex)?;
        let max = time_index.max().ok_or(BirdFlowError::EmptyTimeIndex)?;
        Ok(TimeCursor {
            current: min,
            band,
            min,
            max,
            step: step_duration(step_minutes),
        })
    }

    pub fn current(&self) -> Epoch {
        self.current
    }

    pub fn band(&self) -> AltitudeBand {
        self.band
    }

    pub fn min(&self) -> Epoch {
        self.min
    }

    pub fn max(&self) -> Epoch {
        self.max
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Step forward, wrapping to the first timestamp past the last.
    pub fn advance(&mut self) -> bool {
        self.current = self.current + self.step;
        if self.current > self.max {
            self.current = self.min;
        }
        true
    }

    /// Step backward, clamping at the first timestamp.
    pub fn retreat(&mut self) -> bool {
        if self.current == self.min {
            return false;
        }
        let stepped = self.current - self.step;
        self.current = if stepped < self.min { self.min } else { stepped };
        true
    }

    /// Jump to an arbitrary instant, clamped into the loaded range.
    pub fn set_time(&mut self, timestamp: Epoch) -> bool {
        let clamped = timestamp.clamp(self.min, self.max);
        if clamped == self.current {
            return false;
        }
        self.current = clamped;
        true
    }

    /// Switch the active altitude band.
    pub fn set_band(&mut self, band: AltitudeBand) -> bool {
        if band == self.band {
            return false;
        }
        self.band = band;
        true
    }
}
