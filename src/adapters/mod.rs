//! Randomness source adapters.
//!
//! `os` is the preferred, cryptographically strong source; `pseudo` is the
//! fallback PRNG; `sequence` replays a scripted sequence for deterministic
//! tests.

pub mod os;
pub mod pseudo;
pub mod sequence;

pub use os::OsRandomSource;
pub use pseudo::PseudoRandomSource;
pub use sequence::SequenceRandomSource;

use tracing::debug;

use crate::ports::RandomSource;

/// Selects the best available randomness source.
///
/// Probes the OS entropy source once and falls back to a time-seeded PRNG
/// when it is unavailable. The selection happens here, at construction
/// time, and is never re-checked on later draws.
#[must_use]
pub fn default_random_source() -> Box<dyn RandomSource> {
    match OsRandomSource::probe() {
        Ok(source) => Box::new(source),
        Err(err) => {
            debug!("OS entropy source unavailable ({err}); using pseudo-random fallback");
            Box::new(PseudoRandomSource::new())
        }
    }
}
