//! # Tracer particles
//!
//! A fixed-size pool of massless particles advected through the current
//! field, producing the illusion of continuous flow. Each animation tick
//! [`ParticleSystem::evolve`] samples the field at every particle, computes
//! its next position and ages it; the renderer draws the segment between
//! current and next position and then calls [`ParticleSystem::commit`] to
//! apply the move.
//!
//! Particles drifting outside the view sample the undefined vector and go
//! NaN until their age expires; respawn places them back inside the view.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::Pixel;
use crate::field::FieldGrid;
use crate::view::ViewBounds;

/// One tracer particle: current position, next position and age in frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub age: u32,
    pub x: Pixel,
    pub y: Pixel,
    pub xt: Pixel,
    pub yt: Pixel,
}

/// Fixed-size pool of tracer particles.
#[derive(Debug)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    view: ViewBounds,
    max_age: u32,
    rng: StdRng,
}

impl ParticleSystem {
    /// Seed a pool of `count` particles at uniformly random positions.
    ///
    /// Initial ages are drawn uniformly from `[0, max_age)` so the
    /// population does not expire in lockstep.
    pub fn new(view: ViewBounds, count: usize, max_age: u32) -> Self {
        Self::with_rng(view, count, max_age, StdRng::from_os_rng())
    }

    /// Deterministic variant for tests and reproducible runs.
    pub fn seeded(view: ViewBounds, count: usize, max_age: u32, seed: u64) -> Self {
        Self::with_rng(view, count, max_age, StdRng::seed_from_u64(seed))
    }

    fn with_rng(view: ViewBounds, count: usize, max_age: u32, mut rng: StdRng) -> Self {
        let max_age = max_age.max(1);
        let particles = (0..count)
            .map(|_| {
                let age = rng.random_range(0..max_age);
                Self::spawn(&mut rng, &view, age)
            })
            .collect();
        ParticleSystem {
            particles,
            view,
            max_age,
            rng,
        }
    }

    fn spawn(rng: &mut StdRng, view: &ViewBounds, age: u32) -> Particle {
        Particle {
            age,
            x: rng.random_range(view.min_x..view.max_x),
            y: rng.random_range(view.min_y..view.max_y),
            xt: 0.0,
            yt: 0.0,
        }
    }

    /// Advance every particle by one frame against `field`.
    ///
    /// An expired particle is replaced in place by a fresh one whose age is
    /// drawn from `[0, max_age/2)`; skewing respawns young keeps the visible
    /// population steady. The replacement is advected in the same pass.
    pub fn evolve(&mut self, field: &FieldGrid) {
        for i in 0..self.particles.len() {
            if self.particles[i].age >= self.max_age {
                let half = (self.max_age / 2).max(1);
                let age = self.rng.random_range(0..half);
                self.particles[i] = Self::spawn(&mut self.rng, &self.view, age);
            }
            let particle = &mut self.particles[i];
            let uv = field.sample(particle.x, particle.y);
            particle.xt = particle.x + uv.x;
            particle.yt = particle.y + uv.y;
            particle.age += 1;
        }
    }

    /// Apply the computed moves: `x, y := xt, yt` for every live particle.
    ///
    /// The renderer calls this after drawing the current-to-next segments.
    pub fn commit(&mut self) {
        for particle in &mut self.particles {
            if particle.age < self.max_age {
                particle.x = particle.xt;
                particle.y = particle.yt;
            }
        }
    }

    /// Snapshot of the pool for the renderer.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn max_age(&self) -> u32 {
        self.max_age
    }
}

#[cfg(test)]
mod particles_test {
    use super::*;
    use crate::field::InterpolationBatch;
    use crate::field::FieldSample;
    use nalgebra::Vector3;
    use std::time::Duration;

    fn view() -> ViewBounds {
        ViewBounds::from_extent(100.0, 100.0).unwrap()
    }

    fn uniform_field(u: f64, v: f64) -> FieldGrid {
        // a single sample makes the whole field constant under IDW
        let samples = vec![FieldSample {
            x: 50.0,
            y: 50.0,
            vector: Vector3::new(u, v, 1.0),
        }];
        InterpolationBatch::new(0, samples, &view(), 100.0)
            .run_to_completion(Duration::from_millis(50), Duration::ZERO)
    }

    #[test]
    fn test_initial_population() {
        let pool = ParticleSystem::seeded(view(), 300, 60, 1);
        assert_eq!(pool.len(), 300);
        for p in pool.particles() {
            assert!(p.age < 60);
            assert!((0.0..100.0).contains(&p.x));
            assert!((0.0..100.0).contains(&p.y));
        }
    }

    #[test]
    fn test_evolve_advects_and_ages() {
        let mut pool = ParticleSystem::seeded(view(), 10, 60, 2);
        let field = uniform_field(2.0, -1.0);
        let before: Vec<_> = pool.particles().to_vec();
        pool.evolve(&field);
        for (old, new) in before.iter().zip(pool.particles()) {
            if old.age < 60 {
                assert!((new.xt - (old.x + 2.0)).abs() < 1e-9);
                assert!((new.yt - (old.y - 1.0)).abs() < 1e-9);
                assert_eq!(new.age, old.age + 1);
            }
        }
    }

    #[test]
    fn test_commit_applies_moves_for_live_particles() {
        let mut pool = ParticleSystem::seeded(view(), 10, 60, 3);
        let field = uniform_field(1.0, 1.0);
        pool.evolve(&field);
        pool.commit();
        for p in pool.particles() {
            if p.age < 60 {
                assert_eq!(p.x, p.xt);
                assert_eq!(p.y, p.yt);
            }
        }
    }

    #[test]
    fn test_expired_particles_respawn_young_and_inside() {
        let mut pool = ParticleSystem::seeded(view(), 50, 4, 4);
        let field = uniform_field(0.0, 0.0);
        // enough ticks that every initial particle has expired at least once
        for _ in 0..10 {
            pool.evolve(&field);
            pool.commit();
        }
        assert_eq!(pool.len(), 50);
        for p in pool.particles() {
            // age just after respawn is < max_age/2 + ticks since respawn;
            // it never reaches past max_age before being replaced
            assert!(p.age <= 4);
            assert!(p.x.is_nan() || (0.0..100.0).contains(&p.x) || p.xt.is_nan());
        }
    }

    #[test]
    fn test_out_of_view_particles_drift_nan_until_respawn() {
        let mut pool = ParticleSystem::seeded(view(), 4, 10, 5);
        let undefined = FieldGrid::undefined(&view());
        pool.evolve(&undefined);
        for p in pool.particles() {
            assert!(p.xt.is_nan());
        }
        pool.commit();
        for p in pool.particles() {
            // a live particle committed its NaN move; only an expired one
            // skipped the commit
            assert!(p.x.is_nan() || p.age >= 10);
        }
        // the pool never shrinks and ages stay bounded while drifting
        for _ in 0..30 {
            pool.evolve(&undefined);
            pool.commit();
        }
        assert_eq!(pool.len(), 4);
        for p in pool.particles() {
            assert!(p.age <= 10);
        }
    }
}
