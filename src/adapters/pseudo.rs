//! Fallback pseudo-random source for hosts without an OS entropy source.

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use crate::ports::RandomSource;

/// Time-seeded PRNG used when the strong source is unavailable.
///
/// Draws are functionally equivalent to the strong source for collision
/// avoidance (the generator re-checks every candidate against its
/// seen-list) but carry no cryptographic guarantee.
pub struct PseudoRandomSource {
    rng: SmallRng,
}

impl PseudoRandomSource {
    /// Creates a source seeded from the system clock.
    #[must_use]
    pub fn new() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0x9e37_79b9_7f4a_7c15, |d| {
                u64::from(d.subsec_nanos()) ^ d.as_secs().wrapping_mul(0x9e37_79b9_7f4a_7c15)
            });
        Self::with_seed(seed)
    }

    /// Creates a source with an explicit seed, for reproducible sequences.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self { rng: SmallRng::seed_from_u64(seed) }
    }
}

impl Default for PseudoRandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for PseudoRandomSource {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }
}
