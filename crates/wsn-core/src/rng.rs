//! Deterministic RNG wrapper and seed mixing.
//!
//! # Determinism strategy
//!
//! Every run gets its own `SimRng` seeded by:
//!
//!   seed = batch_seed XOR (stream * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive stream numbers across the seed space.  Runs
//! therefore never share RNG state, and adding runs at the end of a batch
//! does not disturb the seeds of existing ones.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Derive an independent seed for `stream` from a root seed.
#[inline]
pub fn mix_seed(seed: u64, stream: u64) -> u64 {
    seed ^ stream.wrapping_mul(MIXING_CONSTANT)
}

/// Run-level RNG.  Owned by exactly one run or generator; never shared
/// between threads.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed deterministically from a root seed and a stream number.
    pub fn for_stream(seed: u64, stream: u64) -> Self {
        SimRng::new(mix_seed(seed, stream))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
