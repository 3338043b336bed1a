//! Bidirectional association bookkeeping between entity keys and identifiers.

use std::hash::Hash;
use std::panic::{catch_unwind, AssertUnwindSafe};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::generator::UidGenerator;
use crate::uid;

/// Outcome report of a bulk [`UidManager::set_entries`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetEntriesReport<K> {
    /// Pairs whose supplied identifier collided with a value inserted
    /// earlier in the same call; each was given a freshly generated
    /// identifier instead, recorded here.
    pub changed: Vec<(K, String)>,
    /// Pairs whose supplied identifier was malformed; they were skipped.
    pub invalid: Vec<(K, String)>,
}

impl<K> SetEntriesReport<K> {
    /// Returns `true` when every pair was inserted exactly as supplied.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.changed.is_empty() && self.invalid.is_empty()
    }
}

impl<K> Default for SetEntriesReport<K> {
    fn default() -> Self {
        Self { changed: Vec::new(), invalid: Vec::new() }
    }
}

/// Failure signal for [`UidManager::set_entries`].
///
/// Malformed identifiers are not errors (they land in
/// [`SetEntriesReport::invalid`]); this type covers faults that would
/// otherwise escape the operation boundary.
#[derive(Debug, Error)]
pub enum SetEntriesError {
    /// A caller-supplied key implementation panicked mid-rebuild. The
    /// manager was cleared so its invariants still hold.
    #[error("internal fault while rebuilding associations: {0}")]
    Internal(String),
}

/// Owns a bidirectional mapping between entity keys and version-4
/// identifiers.
///
/// Identifier creation and validation are delegated to an internal
/// [`UidGenerator`]. After every operation that changes the map's value
/// set, the generator's seen-list is resynchronized to exactly the current
/// values, keeping its collision detection authoritative. Synchronization
/// is one-directional: the generator never reaches back into the map.
///
/// `K` is whatever token the caller uses to identify an entity; equal keys
/// resolve to the same association. Snapshots (`keys`, `uids`, `entries`)
/// reflect insertion order. The manager has no internal locking and
/// expects a single logical owner.
pub struct UidManager<K> {
    map: IndexMap<K, String>,
    generator: UidGenerator,
}

impl<K: Eq + Hash + Clone> UidManager<K> {
    /// Creates an empty manager with its own identifier generator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_generator(UidGenerator::new())
    }

    /// Creates an empty manager over the given generator.
    ///
    /// Useful for deterministic tests and for restoring a generator that
    /// was seeded from saved state.
    #[must_use]
    pub fn with_generator(generator: UidGenerator) -> Self {
        Self { map: IndexMap::new(), generator }
    }

    /// Associates `key` with a freshly generated identifier and returns it.
    ///
    /// Any prior association for the key is removed first, so a
    /// re-generated key moves to the end of insertion order and its old
    /// identifier stops resolving.
    pub fn generate_uid_for(&mut self, key: K) -> String {
        self.map.shift_remove(&key);
        let fresh = self.generator.generate();
        self.map.insert(key, fresh.clone());
        fresh
    }

    /// Returns `true` when the key currently has an association.
    #[must_use]
    pub fn has_uid_for(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Returns the identifier associated with `key`, if any.
    #[must_use]
    pub fn get_uid_for(&self, key: &K) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    /// Returns `true` when some key currently maps to this exact
    /// identifier string.
    #[must_use]
    pub fn has_key_for(&self, uid_str: &str) -> bool {
        self.map.values().any(|v| v == uid_str)
    }

    /// Returns the first key mapping to this exact identifier string.
    #[must_use]
    pub fn get_key_for(&self, uid_str: &str) -> Option<&K> {
        self.map.iter().find_map(|(k, v)| (v == uid_str).then_some(k))
    }

    /// Snapshot of all keys, insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<K> {
        self.map.keys().cloned().collect()
    }

    /// Snapshot of all identifier values, insertion order.
    #[must_use]
    pub fn uids(&self) -> Vec<String> {
        self.map.values().cloned().collect()
    }

    /// Snapshot of all associations, insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<(K, String)> {
        self.map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Number of current associations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` when no associations exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Read-only view of the owned generator.
    #[must_use]
    pub fn generator(&self) -> &UidGenerator {
        &self.generator
    }

    /// Replaces the entire map from `pairs`, processed in input order.
    ///
    /// The map is cleared first. A pair with a malformed identifier is
    /// recorded in [`SetEntriesReport::invalid`] and skipped. A pair whose
    /// identifier equals a value already inserted during this call gets a
    /// freshly generated identifier instead, recorded in
    /// [`SetEntriesReport::changed`]. A later pair with a duplicate key
    /// overwrites the earlier one. The generator is resynchronized once
    /// all pairs are processed.
    ///
    /// # Errors
    ///
    /// Returns [`SetEntriesError::Internal`] when a caller-supplied
    /// `Eq`/`Hash`/`Clone` implementation panics mid-rebuild. The panic is
    /// contained here: the map is cleared, the generator resynchronized,
    /// and the fault reported as a value.
    pub fn set_entries(
        &mut self,
        pairs: Vec<(K, String)>,
    ) -> Result<SetEntriesReport<K>, SetEntriesError> {
        match catch_unwind(AssertUnwindSafe(|| self.rebuild_from(pairs))) {
            Ok(report) => {
                self.resync_generator();
                Ok(report)
            }
            Err(payload) => {
                let detail = panic_detail(payload.as_ref());
                error!("fault while rebuilding associations: {detail}");
                self.map.clear();
                self.resync_generator();
                Err(SetEntriesError::Internal(detail))
            }
        }
    }

    /// Deletes the association holding this exact identifier string.
    ///
    /// Returns `true` when an entry was removed, `false` when no value
    /// matched.
    pub fn delete_entry_for_uid(&mut self, uid_str: &str) -> bool {
        let found = self.map.iter().find_map(|(k, v)| (v == uid_str).then(|| k.clone()));
        if let Some(key) = found {
            self.map.shift_remove(&key);
            self.resync_generator();
            true
        } else {
            false
        }
    }

    /// Deletes the association for `key`.
    ///
    /// Returns `true` when an entry was removed, `false` when the key had
    /// no association.
    pub fn delete_entry_for_key(&mut self, key: &K) -> bool {
        if self.map.shift_remove(key).is_some() {
            self.resync_generator();
            true
        } else {
            false
        }
    }

    /// Clears all associations and resynchronizes the generator to empty.
    pub fn reset(&mut self) {
        self.map.clear();
        self.resync_generator();
    }

    fn rebuild_from(&mut self, pairs: Vec<(K, String)>) -> SetEntriesReport<K> {
        self.map.clear();
        let mut report = SetEntriesReport::default();
        for (key, candidate) in pairs {
            if !uid::is_valid(&candidate) {
                report.invalid.push((key, candidate));
                continue;
            }
            if self.map.values().any(|v| v == &candidate) {
                let fresh = self.generator.generate();
                report.changed.push((key.clone(), fresh.clone()));
                self.map.insert(key, fresh);
            } else {
                self.map.insert(key, candidate);
            }
        }
        report
    }

    // Map values are well-formed identifiers by construction, so the
    // wholesale replacement cannot fail.
    fn resync_generator(&mut self) {
        let values: Vec<String> = self.map.values().cloned().collect();
        let replaced = self.generator.set_existing(values);
        debug_assert!(replaced, "map held a malformed identifier");
    }
}

impl<K: Eq + Hash + Clone> Default for UidManager<K> {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_detail(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::SequenceRandomSource;

    fn valid_uid(tag: u32) -> String {
        uid::format_v4(tag, tag, tag, tag)
    }

    #[test]
    fn generate_and_lookup_round_trip() {
        let mut mgr: UidManager<String> = UidManager::new();
        let id = mgr.generate_uid_for("alpha".to_string());

        assert!(uid::is_valid(&id));
        assert!(mgr.has_uid_for(&"alpha".to_string()));
        assert_eq!(mgr.get_uid_for(&"alpha".to_string()), Some(id.as_str()));
        assert!(mgr.has_key_for(&id));
        assert_eq!(mgr.get_key_for(&id), Some(&"alpha".to_string()));
    }

    #[test]
    fn missing_key_and_uid_lookups_are_absent() {
        let mgr: UidManager<String> = UidManager::new();
        assert!(!mgr.has_uid_for(&"ghost".to_string()));
        assert_eq!(mgr.get_uid_for(&"ghost".to_string()), None);
        assert!(!mgr.has_key_for("c7e2f683-bc03-477e-b7e4-b1bb442c1b1f"));
        assert_eq!(mgr.get_key_for("c7e2f683-bc03-477e-b7e4-b1bb442c1b1f"), None);
    }

    #[test]
    fn regenerating_overwrites_and_moves_to_the_end() {
        let mut mgr: UidManager<&str> = UidManager::new();
        let old = mgr.generate_uid_for("a");
        mgr.generate_uid_for("b");
        let new = mgr.generate_uid_for("a");

        assert_ne!(old, new);
        assert!(mgr.has_uid_for(&"a"));
        assert_eq!(mgr.get_uid_for(&"a"), Some(new.as_str()));
        assert_eq!(mgr.get_key_for(&old), None);
        assert_eq!(mgr.keys(), vec!["b", "a"]);
    }

    #[test]
    fn snapshots_reflect_insertion_order() {
        let mut mgr: UidManager<u32> = UidManager::new();
        let id1 = mgr.generate_uid_for(1);
        let id2 = mgr.generate_uid_for(2);
        let id3 = mgr.generate_uid_for(3);

        assert_eq!(mgr.keys(), vec![1, 2, 3]);
        assert_eq!(mgr.uids(), vec![id1.clone(), id2.clone(), id3.clone()]);
        assert_eq!(mgr.entries(), vec![(1, id1), (2, id2), (3, id3)]);
    }

    #[test]
    fn delete_by_uid_removes_and_resynchronizes() {
        let mut mgr: UidManager<&str> = UidManager::new();
        let id = mgr.generate_uid_for("a");
        mgr.generate_uid_for("b");

        assert!(mgr.delete_entry_for_uid(&id));
        assert!(!mgr.has_uid_for(&"a"));
        assert!(!mgr.has_key_for(&id));
        assert_eq!(mgr.generator().existing(), mgr.uids().as_slice());

        assert!(!mgr.delete_entry_for_uid(&id));
    }

    #[test]
    fn delete_by_key_removes_and_resynchronizes() {
        let mut mgr: UidManager<&str> = UidManager::new();
        let id = mgr.generate_uid_for("a");

        assert!(mgr.delete_entry_for_key(&"a"));
        assert!(!mgr.has_key_for(&id));
        assert!(mgr.generator().existing().is_empty());

        assert!(!mgr.delete_entry_for_key(&"a"));
    }

    #[test]
    fn reset_clears_map_and_generator() {
        let mut mgr: UidManager<u32> = UidManager::new();
        mgr.generate_uid_for(1);
        mgr.generate_uid_for(2);

        mgr.reset();
        assert!(mgr.is_empty());
        assert!(mgr.entries().is_empty());
        assert!(mgr.generator().existing().is_empty());
    }

    #[test]
    fn set_entries_restores_clean_input_verbatim() {
        let mut mgr: UidManager<&str> = UidManager::new();
        let pairs = vec![("a", valid_uid(1)), ("b", valid_uid(2)), ("c", valid_uid(3))];

        let report = mgr.set_entries(pairs.clone()).expect("no fault expected");
        assert!(report.is_clean());
        assert_eq!(mgr.entries(), pairs);
        assert_eq!(mgr.generator().existing(), mgr.uids().as_slice());
    }

    #[test]
    fn set_entries_skips_invalid_pairs() {
        let mut mgr: UidManager<&str> = UidManager::new();
        let report = mgr
            .set_entries(vec![("a", valid_uid(1)), ("b", "malformed".to_string())])
            .expect("no fault expected");

        assert_eq!(report.invalid, vec![("b", "malformed".to_string())]);
        assert!(report.changed.is_empty());
        assert_eq!(mgr.len(), 1);
        assert!(!mgr.has_uid_for(&"b"));
    }

    #[test]
    fn set_entries_regenerates_colliding_values() {
        let mut mgr: UidManager<&str> = UidManager::new();
        let dup = valid_uid(7);
        let report = mgr
            .set_entries(vec![("a", dup.clone()), ("b", dup.clone())])
            .expect("no fault expected");

        assert_eq!(report.changed.len(), 1);
        let (changed_key, changed_uid) = &report.changed[0];
        assert_eq!(*changed_key, "b");
        assert_ne!(*changed_uid, dup);
        assert_eq!(mgr.get_uid_for(&"a"), Some(dup.as_str()));
        assert_eq!(mgr.get_uid_for(&"b"), Some(changed_uid.as_str()));
        assert_eq!(mgr.generator().existing(), mgr.uids().as_slice());
    }

    #[test]
    fn set_entries_replaces_prior_state() {
        let mut mgr: UidManager<&str> = UidManager::new();
        mgr.generate_uid_for("old");

        mgr.set_entries(vec![("new", valid_uid(9))]).expect("no fault expected");
        assert!(!mgr.has_uid_for(&"old"));
        assert_eq!(mgr.keys(), vec!["new"]);
    }

    #[test]
    fn set_entries_later_duplicate_key_wins() {
        let mut mgr: UidManager<&str> = UidManager::new();
        let report = mgr
            .set_entries(vec![("a", valid_uid(1)), ("a", valid_uid(2))])
            .expect("no fault expected");

        assert!(report.is_clean());
        assert_eq!(mgr.len(), 1);
        assert_eq!(mgr.get_uid_for(&"a"), Some(valid_uid(2).as_str()));
    }

    /// Key whose `Hash` detonates on demand, standing in for a faulty
    /// caller-supplied key implementation.
    #[derive(Clone, PartialEq, Eq)]
    struct Volatile(bool);

    impl std::hash::Hash for Volatile {
        fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
            assert!(!self.0, "key hash fault");
            state.write_u8(0);
        }
    }

    #[test]
    fn set_entries_contains_key_faults() {
        let mut mgr: UidManager<Volatile> = UidManager::new();
        let outcome = mgr.set_entries(vec![
            (Volatile(false), valid_uid(1)),
            (Volatile(true), valid_uid(2)),
        ]);

        assert!(matches!(outcome, Err(SetEntriesError::Internal(_))));
        assert!(mgr.is_empty());
        assert!(mgr.generator().existing().is_empty());
    }

    #[test]
    fn deterministic_generator_drives_the_manager() {
        let source = SequenceRandomSource::new(vec![1, 2, 3, 4]);
        let gen = UidGenerator::with_source(Box::new(source));
        let mut mgr = UidManager::with_generator(gen);

        assert_eq!(mgr.generate_uid_for("a"), uid::format_v4(1, 2, 3, 4));
    }
}
