//! Deterministic simulation RNG.
//!
//! # Determinism strategy
//!
//! The world metadata carries a single master seed.  Every consumer that needs
//! randomness (world generation jitter, candidate rolls, planting variance)
//! derives a child `SimRng` via [`SimRng::child`] with a stable offset, so the
//! same seed always reproduces the same run regardless of how many consumers
//! exist or in what order they were added.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing — spreads
/// consecutive offsets uniformly across the seed space.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Simulation-level deterministic RNG.
///
/// Used only in single-threaded contexts; world mutation has a single owner,
/// so no synchronisation is needed.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed from a textual seed (as stored in world metadata) by hashing the
    /// bytes with the mixing constant.
    pub fn from_text(seed: &str) -> Self {
        let mut acc: u64 = 0x6a09_e667_f3bc_c909;
        for byte in seed.bytes() {
            acc = (acc ^ byte as u64).wrapping_mul(MIXING_CONSTANT);
        }
        SimRng::new(acc)
    }

    /// Derive a child `SimRng` with a different seed offset — one child per
    /// consumer keeps streams independent and reproducible.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
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

    /// Generate a value uniformly in `range`.
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

    /// Choose a random element from a slice; `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}
