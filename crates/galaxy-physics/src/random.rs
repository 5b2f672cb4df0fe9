//! Seedable scalar sampling

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform and Gaussian scalar draws over an injectable generator.
///
/// Every sampler in the crate takes `&mut RandomSource` instead of reaching for
/// a thread-local generator, so a fixed seed reproduces a whole galaxy.
#[derive(Debug, Clone)]
pub struct RandomSource<R = StdRng> {
    rng: R,
}

impl RandomSource<StdRng> {
    /// Deterministic stream for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Stream seeded from the operating system
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> RandomSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Uniform draw in `[a, b]`. Returns `a` when `a == b`.
    pub fn uniform(&mut self, a: f32, b: f32) -> f32 {
        let t: f32 = self.rng.random();
        a + t * (b - a)
    }

    /// Box-Muller transform. Only the cosine branch is used; the paired
    /// sine sample is dropped.
    pub fn gaussian(&mut self, mean: f32, stddev: f32) -> f32 {
        // `random()` is in [0, 1), so u is in (0, 1] and ln(u) is finite
        let u = 1.0 - self.uniform(0.0, 1.0);
        let v = self.uniform(0.0, 1.0);
        let z = (-2.0 * u.ln()).sqrt() * (std::f32::consts::TAU * v).cos();
        z * stddev + mean
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}
