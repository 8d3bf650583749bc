use std::cmp::Ordering;

use nalgebra::Vector3;
use smallvec::SmallVec;

use crate::constants::{Pixel, MAX_INTERPOLATION_SOURCES};

/// One known point of the sparse field: a radar's pixel position and its
/// `[u, v, density]` vector, v already negated into pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSample {
    pub x: Pixel,
    pub y: Pixel,
    pub vector: Vector3<f64>,
}

/// Inverse-distance-weighted interpolation over the k nearest samples.
///
/// The weight of a sample at distance `d` from the query point is `1/d²`;
/// the interpolated vector is the weight-normalized average over the
/// `k = min(5, n)` nearest samples. Because the result is a convex
/// combination, each of its components is bounded by the extrema of those
/// samples. A query point coinciding exactly with a sample returns that
/// sample's vector directly.
#[derive(Debug, Clone)]
pub struct IdwInterpolator {
    samples: SmallVec<[FieldSample; 8]>,
    k: usize,
}

impl IdwInterpolator {
    /// Build the kernel over the given samples.
    ///
    /// Return
    /// ------
    /// * the interpolator, or `None` when no samples exist — a field without
    ///   sources is undefined, not an error
    pub fn new(samples: Vec<FieldSample>) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let k = samples.len().min(MAX_INTERPOLATION_SOURCES);
        Some(IdwInterpolator {
            samples: SmallVec::from_vec(samples),
            k,
        })
    }

    /// Number of samples the kernel interpolates from at each query.
    pub fn sources(&self) -> usize {
        self.k
    }

    /// Interpolate the field vector at a query point.
    pub fn interpolate(&self, x: Pixel, y: Pixel) -> Vector3<f64> {
        let mut ranked: SmallVec<[(f64, usize); 8]> = SmallVec::new();
        for (i, sample) in self.samples.iter().enumerate() {
            let dx = x - sample.x;
            let dy = y - sample.y;
            let d2 = dx * dx + dy * dy;
            if d2 == 0.0 {
                return sample.vector;
            }
            ranked.push((d2, i));
        }

        ranked.sort_unstable_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        let mut weighted = Vector3::zeros();
        let mut total_weight = 0.0;
        for &(d2, i) in ranked.iter().take(self.k) {
            let w = 1.0 / d2;
            weighted += self.samples[i].vector * w;
            total_weight += w;
        }
        weighted / total_weight
    }
}
