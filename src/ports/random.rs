//! Randomness source port supplying raw 32-bit draws.

/// Supplies independent 32-bit unsigned random values.
///
/// Abstracting the entropy source lets the strong OS source, the fallback
/// PRNG, and scripted deterministic sequences be swapped at construction
/// time without touching the identifier layout. The source is chosen once;
/// nothing re-probes availability per draw.
pub trait RandomSource: Send + Sync {
    /// Returns the next 32-bit random value.
    fn next_u32(&mut self) -> u32;
}
