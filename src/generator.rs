//! Version-4 identifier generator with lifetime collision avoidance.

use tracing::trace;

use crate::adapters::default_random_source;
use crate::ports::RandomSource;
use crate::uid;

/// Generates RFC 4122 version-4 identifier strings.
///
/// Every identifier the generator has issued or been seeded with is kept in
/// an insertion-ordered seen-list; [`generate`](Self::generate) re-draws
/// until its candidate is absent from that list, so a single generator
/// never repeats itself within its lifetime.
pub struct UidGenerator {
    source: Box<dyn RandomSource>,
    seen: Vec<String>,
}

impl UidGenerator {
    /// Creates a generator with an empty seen-list and the default source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(default_random_source())
    }

    /// Creates a generator backed by the given randomness source.
    #[must_use]
    pub fn with_source(source: Box<dyn RandomSource>) -> Self {
        Self { source, seen: Vec::new() }
    }

    /// Creates a generator whose seen-list starts as `existing`.
    ///
    /// The list is trusted verbatim: entries are neither validated nor
    /// deduplicated. Use this to restore a generator from saved state.
    #[must_use]
    pub fn seeded<I>(existing: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self::seeded_with_source(existing, default_random_source())
    }

    /// Creates a seeded generator backed by the given randomness source.
    #[must_use]
    pub fn seeded_with_source<I>(existing: I, source: Box<dyn RandomSource>) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self { source, seen: existing.into_iter().collect() }
    }

    /// Generates a fresh identifier, distinct from every identifier this
    /// generator has issued or been seeded with.
    ///
    /// Draws four 32-bit values per candidate and re-draws until the
    /// candidate is absent from the seen-list. With 122 random bits a
    /// second attempt is already vanishingly rare; the loop matters for
    /// seeded lists and scripted sources.
    pub fn generate(&mut self) -> String {
        loop {
            let candidate = uid::format_v4(
                self.source.next_u32(),
                self.source.next_u32(),
                self.source.next_u32(),
                self.source.next_u32(),
            );
            if !self.seen.contains(&candidate) {
                self.seen.push(candidate.clone());
                return candidate;
            }
        }
    }

    /// Returns the seen-list in insertion order.
    #[must_use]
    pub fn existing(&self) -> &[String] {
        &self.seen
    }

    /// Replaces the seen-list wholesale.
    ///
    /// Succeeds only when every candidate is a well-formed version-4
    /// identifier; on any invalid member the call returns `false` and the
    /// prior seen-list is left untouched. Caller-supplied duplicates are
    /// passed through verbatim.
    pub fn set_existing<I, S>(&mut self, candidates: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let candidates: Vec<String> = candidates.into_iter().map(Into::into).collect();
        if !candidates.iter().all(|c| uid::is_valid(c)) {
            return false;
        }
        trace!(count = candidates.len(), "seen-list replaced");
        self.seen = candidates;
        true
    }

    /// Returns the inputs that are well-formed version-4 identifiers,
    /// order preserved.
    #[must_use]
    pub fn validate<I, S>(&self, inputs: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        uid::filter_valid(inputs)
    }
}

impl Default for UidGenerator {
    fn default() -> Self {
        Self::new()
    }
}
