use nalgebra::Vector3;

use crate::constants::Pixel;
use crate::view::ViewBounds;

/// The undefined vector: what any query outside the populated grid yields.
pub fn nil_vector() -> Vector3<f64> {
    Vector3::new(f64::NAN, f64::NAN, f64::NAN)
}

/// Whether a sampled vector is the undefined sentinel.
pub fn is_nil(v: &Vector3<f64>) -> bool {
    v.x.is_nan() && v.y.is_nan() && v.z.is_nan()
}

/// Integer pixel span covered by a grid: columns over `[x0, x_end)`, rows
/// over `[y0, y_end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PixelSpan {
    pub x0: i64,
    pub x_end: i64,
    pub y0: i64,
    pub y_end: i64,
}

impl PixelSpan {
    pub fn from_view(view: &ViewBounds) -> Self {
        PixelSpan {
            x0: view.min_x.round() as i64,
            x_end: view.max_x.round() as i64,
            y0: view.min_y.round() as i64,
            y_end: view.max_y.round() as i64,
        }
    }

    pub fn column_count(&self) -> usize {
        (self.x_end - self.x0).max(0) as usize
    }

    pub fn row_count(&self) -> usize {
        (self.y_end - self.y0 + 1).max(0) as usize
    }
}

/// A fully committed, pixel-resolution vector field.
///
/// Cells hold the scaled `[u, v, density]` triple for their pixel. A grid is
/// either complete (every column populated) or **undefined** (no columns at
/// all, the no-data case); partially filled grids never escape the
/// interpolation batch that is building them.
#[derive(Debug, Clone)]
pub struct FieldGrid {
    span: PixelSpan,
    columns: Vec<Vec<Vector3<f64>>>,
}

impl FieldGrid {
    /// An all-undefined field spanning `view`. Every query yields the
    /// sentinel.
    pub fn undefined(view: &ViewBounds) -> Self {
        FieldGrid {
            span: PixelSpan::from_view(view),
            columns: Vec::new(),
        }
    }

    pub(crate) fn undefined_for_span(span: PixelSpan) -> Self {
        FieldGrid {
            span,
            columns: Vec::new(),
        }
    }

    pub(crate) fn from_columns(span: PixelSpan, columns: Vec<Vec<Vector3<f64>>>) -> Self {
        FieldGrid { span, columns }
    }

    /// Whether this grid carries any interpolated data.
    pub fn is_undefined(&self) -> bool {
        self.columns.is_empty()
    }

    /// Sample the field at a pixel position.
    ///
    /// The position is rounded to the nearest integer pixel. Queries outside
    /// `[min_x, max_x) x [min_y, max_y]`, on an unpopulated grid, or with
    /// non-finite coordinates yield the undefined vector — never a panic.
    pub fn sample(&self, x: Pixel, y: Pixel) -> Vector3<f64> {
        if !x.is_finite() || !y.is_finite() {
            return nil_vector();
        }

        let col = x.round() as i64 - self.span.x0;
        if col < 0 || col as usize >= self.columns.len() {
            return nil_vector();
        }
        let column = &self.columns[col as usize];

        let row = y.round() as i64 - self.span.y0;
        if row < 0 || row as usize >= column.len() {
            return nil_vector();
        }
        column[row as usize]
    }
}
