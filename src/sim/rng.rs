//! Seeded randomness
//!
//! Level generation only ever asks for closed-range integers or floats, so the
//! generator takes anything implementing [`RandomSource`]. Sessions use
//! [`SimRng`]; tests can script exact draws.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform sampling in closed ranges
pub trait RandomSource {
    /// Uniform integer in `min..=max`
    fn int_in(&mut self, min: u32, max: u32) -> u32;
    /// Uniform float in `min..=max`
    fn float_in(&mut self, min: f32, max: f32) -> f32;
}

/// PCG-backed session RNG
#[derive(Debug, Clone)]
pub struct SimRng {
    seed: u64,
    rng: Pcg32,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed this generator was built from
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SimRng {
    fn int_in(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    fn float_in(&mut self, min: f32, max: f32) -> f32 {
        if min >= max {
            return min;
        }
        self.rng.random_range(min..=max)
    }
}
