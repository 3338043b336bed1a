//! Port traits defining external boundaries.
//!
//! The crate's single external dependency is entropy. Implementations
//! live in `src/adapters/`.

pub mod random;

pub use random::RandomSource;
