//! Scripted randomness source for deterministic tests.

use crate::ports::RandomSource;

/// Replays a fixed sequence of 32-bit draws.
///
/// Panics when the script runs out, so a test that consumes more entropy
/// than it scripted fails loudly instead of looping on stale values.
pub struct SequenceRandomSource {
    values: Vec<u32>,
    cursor: usize,
}

impl SequenceRandomSource {
    /// Creates a source that yields `values` in order.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl RandomSource for SequenceRandomSource {
    fn next_u32(&mut self) -> u32 {
        let value = *self
            .values
            .get(self.cursor)
            .expect("scripted random source exhausted");
        self.cursor += 1;
        value
    }
}
