use std::time::{Duration, Instant};

use log::debug;
use nalgebra::Vector3;

use crate::field::grid::{FieldGrid, PixelSpan};
use crate::field::idw::{FieldSample, IdwInterpolator};
use crate::view::ViewBounds;

/// Outcome of one interpolation slice.
#[derive(Debug)]
pub enum BatchStatus {
    /// The time budget lapsed with columns still unfilled; call
    /// [`InterpolationBatch::run_slice`] again to continue.
    Yielded,
    /// Every column is filled; the completed grid is handed over and the
    /// batch is spent.
    Complete(FieldGrid),
}

/// Incremental, cancellable discretization of one field.
///
/// The grid is filled column by column. Each [`run_slice`] call fills
/// columns until its time budget lapses, then yields so the host's frame
/// loop keeps breathing; the grid is only handed out once **every** column
/// is filled, so a torn field can never be observed. The batch carries the
/// **generation token** of the request that spawned it — an owner switching
/// to a new `(timestamp, altitude)` pair bumps its generation and discards
/// any batch with a stale token instead of committing it.
///
/// [`run_slice`]: InterpolationBatch::run_slice
#[derive(Debug)]
pub struct InterpolationBatch {
    generation: u64,
    span: PixelSpan,
    interpolator: Option<IdwInterpolator>,
    scale: f64,
    cursor: i64,
    columns: Vec<Vec<Vector3<f64>>>,
}

impl InterpolationBatch {
    /// Start a batch for one `(timestamp, altitude)` request.
    ///
    /// Arguments
    /// ---------
    /// * `generation`: token of the request, checked by the owner before
    ///   committing the result
    /// * `samples`: the slice's field samples; empty means the resulting
    ///   grid is all-undefined
    /// * `view`: pixel rectangle to discretize
    /// * `vector_denominator`: speed-to-displacement divisor; the scale
    ///   applied to every interpolated vector is `view.height / denominator`
    pub fn new(
        generation: u64,
        samples: Vec<FieldSample>,
        view: &ViewBounds,
        vector_denominator: f64,
    ) -> Self {
        let span = PixelSpan::from_view(view);
        InterpolationBatch {
            generation,
            span,
            interpolator: IdwInterpolator::new(samples),
            scale: view.height / vector_denominator,
            cursor: span.x0,
            columns: Vec::with_capacity(span.column_count()),
        }
    }

    /// Token of the request this batch belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fraction of columns filled so far, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let total = self.span.column_count();
        if total == 0 {
            return 1.0;
        }
        self.columns.len() as f64 / total as f64
    }

    /// Fill columns until the budget lapses or the grid completes.
    ///
    /// At least one column is filled per call, so progress is guaranteed
    /// even under a zero budget.
    pub fn run_slice(&mut self, budget: Duration) -> BatchStatus {
        let Some(interpolator) = &self.interpolator else {
            debug!(
                "no samples for generation {}: committing undefined field",
                self.generation
            );
            return BatchStatus::Complete(FieldGrid::undefined_for_span(self.span));
        };

        let start = Instant::now();
        while self.cursor < self.span.x_end {
            self.columns
                .push(interpolate_column(interpolator, self.span, self.cursor, self.scale));
            self.cursor += 1;
            if start.elapsed() > budget {
                return BatchStatus::Yielded;
            }
        }

        debug!(
            "field grid complete for generation {}: {} columns",
            self.generation,
            self.columns.len()
        );
        BatchStatus::Complete(FieldGrid::from_columns(
            self.span,
            std::mem::take(&mut self.columns),
        ))
    }

    /// Drive the batch to completion, pausing between slices.
    ///
    /// For hosts without a frame loop of their own. `pause` mirrors the
    /// short sleep a cooperative scheduler would insert between slices; see
    /// [`crate::constants::MIN_SLEEP_TIME`].
    pub fn run_to_completion(mut self, budget: Duration, pause: Duration) -> FieldGrid {
        loop {
            if let BatchStatus::Complete(grid) = self.run_slice(budget) {
                return grid;
            }
            std::thread::sleep(pause);
        }
    }
}

fn interpolate_column(
    interpolator: &IdwInterpolator,
    span: PixelSpan,
    x: i64,
    scale: f64,
) -> Vec<Vector3<f64>> {
    let mut column = Vec::with_capacity(span.row_count());
    for y in span.y0..=span.y_end {
        column.push(interpolator.interpolate(x as f64, y as f64) * scale);
    }
    column
}
