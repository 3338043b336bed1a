//! RFC 4122 version-4 identifier generation and entity association.
//!
//! Two components: [`UidGenerator`] produces v4 identifier strings from a
//! pluggable randomness source and never repeats itself within its own
//! lifetime; [`UidManager`] layers bidirectional bookkeeping between
//! caller-supplied entity keys and those identifiers on top of it.
//!
//! Both are synchronous and single-owner: no operation blocks, and no
//! internal locking is provided. Callers own persistence — `entries` /
//! `set_entries` on the manager and `existing` / seeded construction on
//! the generator are the save/restore hooks.

pub mod adapters;
pub mod generator;
pub mod manager;
pub mod ports;
pub mod uid;

pub use generator::UidGenerator;
pub use manager::{SetEntriesError, SetEntriesReport, UidManager};
pub use ports::RandomSource;
