// triton_core/src/noise.rs

//! Measurement-noise policies applied to an aggregated range.
//!
//! The distribution is a swappable policy rather than a hard-coded model:
//! a sensor holds a boxed [`RangeNoise`] and samples an additive delta from
//! it after cone aggregation. All randomness flows through the injected RNG.

use dyn_clone::DynClone;
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};
use std::fmt::Debug;

/// Policy producing an additive range perturbation.
pub trait RangeNoise: Debug + Send + Sync + DynClone {
    /// Samples the delta to add to a measured `range` (meters).
    fn sample(&self, range: f64, rng: &mut dyn RngCore) -> f64;
}

// Make the trait object cloneable.
dyn_clone::clone_trait_object!(RangeNoise);

/// No perturbation. Used by deterministic scenarios and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNoise;

impl RangeNoise for NoNoise {
    fn sample(&self, _range: f64, _rng: &mut dyn RngCore) -> f64 {
        0.0
    }
}

/// Zero-mean noise, uniformly distributed and bounded by a gain factor
/// scaled to the measured distance: the delta lies in
/// `[-gain * range, +gain * range]`.
#[derive(Debug, Clone, Copy)]
pub struct ProportionalNoise {
    pub gain: f64,
}

impl ProportionalNoise {
    pub fn new(gain: f64) -> Self {
        Self { gain }
    }
}

impl RangeNoise for ProportionalNoise {
    fn sample(&self, range: f64, rng: &mut dyn RngCore) -> f64 {
        let bound = self.gain * range;
        if bound <= 0.0 {
            return 0.0;
        }
        rng.gen_range(-bound..=bound)
    }
}

/// Zero-mean Gaussian noise with a fixed standard deviation in meters.
#[derive(Debug, Clone, Copy)]
pub struct GaussianNoise {
    pub stddev: f64,
}

impl GaussianNoise {
    pub fn new(stddev: f64) -> Self {
        Self { stddev }
    }
}

impl RangeNoise for GaussianNoise {
    fn sample(&self, _range: f64, rng: &mut dyn RngCore) -> f64 {
        match Normal::new(0.0, self.stddev) {
            Ok(dist) => dist.sample(rng),
            // Degenerate stddev (zero or non-finite) falls back to no noise.
            Err(_) => 0.0,
        }
    }
}
