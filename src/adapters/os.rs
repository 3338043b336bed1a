//! Cryptographically strong randomness source backed by the operating system.

use crate::ports::RandomSource;

/// Draws 32-bit values from the OS entropy source.
pub struct OsRandomSource;

impl OsRandomSource {
    /// Probes the OS entropy source once.
    ///
    /// # Errors
    ///
    /// Returns the probe error when the OS source is unavailable, so the
    /// caller can fall back to [`crate::adapters::PseudoRandomSource`].
    pub fn probe() -> Result<Self, getrandom::Error> {
        let mut buf = [0u8; 4];
        getrandom::getrandom(&mut buf)?;
        Ok(Self)
    }
}

impl RandomSource for OsRandomSource {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        // Probed at construction; losing the entropy source mid-process is
        // not a recoverable condition.
        getrandom::getrandom(&mut buf).expect("OS entropy source unavailable");
        u32::from_le_bytes(buf)
    }
}
