use serde::Deserialize;

use crate::birdflow_errors::BirdFlowError;
use crate::constants::Pixel;

/// Pixel-space extent of the animated view.
///
/// `(min_x, min_y)` is the top-left corner; x grows rightwards and y grows
/// downwards, as on a canvas. Columns of the interpolated field cover
/// `[min_x, max_x)` and rows cover `[min_y, max_y]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ViewBounds {
    pub min_x: Pixel,
    pub max_x: Pixel,
    pub min_y: Pixel,
    pub max_y: Pixel,
    pub width: Pixel,
    pub height: Pixel,
}

impl ViewBounds {
    /// Validate and build a view rectangle.
    ///
    /// Return
    /// ------
    /// * the bounds, or [`BirdFlowError::InvalidViewBounds`] when the
    ///   rectangle is empty, inverted or non-finite
    pub fn new(
        min_x: Pixel,
        max_x: Pixel,
        min_y: Pixel,
        max_y: Pixel,
        width: Pixel,
        height: Pixel,
    ) -> Result<Self, BirdFlowError> {
        let bounds = ViewBounds {
            min_x,
            max_x,
            min_y,
            max_y,
            width,
            height,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Build a view covering `[0, width) x [0, height]`, the common case of a
    /// canvas anchored at the origin.
    pub fn from_extent(width: Pixel, height: Pixel) -> Result<Self, BirdFlowError> {
        ViewBounds::new(0.0, width, 0.0, height, width, height)
    }

    fn validate(&self) -> Result<(), BirdFlowError> {
        let values = [
            self.min_x,
            self.max_x,
            self.min_y,
            self.max_y,
            self.width,
            self.height,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(BirdFlowError::InvalidViewBounds(format!("{self:?}")));
        }
        if self.min_x >= self.max_x || self.min_y >= self.max_y {
            return Err(BirdFlowError::InvalidViewBounds(format!("{self:?}")));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(BirdFlowError::InvalidViewBounds(format!("{self:?}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod view_test {
    use super::*;

    #[test]
    fn test_from_extent() {
        let view = ViewBounds::from_extent(640.0, 480.0).unwrap();
        assert_eq!(view.min_x, 0.0);
        assert_eq!(view.max_x, 640.0);
        assert_eq!(view.max_y, 480.0);
    }

    #[test]
    fn test_rejects_degenerate_bounds() {
        assert!(ViewBounds::new(10.0, 10.0, 0.0, 5.0, 0.0, 5.0).is_err());
        assert!(ViewBounds::new(0.0, 5.0, 5.0, 0.0, 5.0, 5.0).is_err());
        assert!(ViewBounds::from_extent(f64::NAN, 100.0).is_err());
        assert!(ViewBounds::from_extent(-10.0, 100.0).is_err());
    }
}
