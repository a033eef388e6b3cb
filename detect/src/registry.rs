// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! Generic dedup-and-expire store shared by [`crate::cross::CrossVenueDetector`] and
//! [`crate::triangular::TriangularDetector`]: single writer (the owning detector), many
//! readers, one entry per dedup key, replaced only by a strictly better candidate.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::Hash;

/// Keeps at most one entry per `K`, replacing it only when a newly offered value is
/// judged "better" than the incumbent, and dropping entries whose age exceeds a
/// caller-supplied TTL.
#[derive(Debug)]
pub struct OpportunityStore<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for OpportunityStore<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> OpportunityStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `key` if no entry exists yet, or if `is_better(&value,
    /// &incumbent)` holds. Returns `true` if the store was mutated.
    pub fn upsert_if_better(&self, key: K, value: V, is_better: impl Fn(&V, &V) -> bool) -> bool {
        let mut entries = self.entries.write();
        match entries.get(&key) {
            Some(incumbent) if !is_better(&value, incumbent) => false,
            _ => {
                entries.insert(key, value);
                true
            }
        }
    }

    /// Removes every entry for which `is_expired` holds. Called after every insert so
    /// the store never accumulates unboundedly.
    pub fn gc(&self, now: DateTime<Utc>, ttl: Duration, is_expired: impl Fn(&V, DateTime<Utc>, Duration) -> bool) {
        self.entries.write().retain(|_, v| !is_expired(v, now, ttl));
    }

    pub fn snapshot(&self) -> Vec<V> {
        self.entries.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_a_strictly_better_candidate_replaces_the_incumbent() {
        let store: OpportunityStore<&str, i32> = OpportunityStore::new();
        assert!(store.upsert_if_better("a", 10, |new, old| new > old));
        assert!(!store.upsert_if_better("a", 5, |new, old| new > old));
        assert_eq!(store.snapshot(), vec![10]);
        assert!(store.upsert_if_better("a", 20, |new, old| new > old));
        assert_eq!(store.snapshot(), vec![20]);
    }

    #[test]
    fn gc_drops_entries_the_predicate_marks_expired() {
        let store: OpportunityStore<&str, i32> = OpportunityStore::new();
        store.upsert_if_better("a", 1, |_, _| true);
        store.upsert_if_better("b", 2, |_, _| true);
        store.gc(Utc::now(), Duration::seconds(1), |v, _, _| *v == 1);
        assert_eq!(store.snapshot(), vec![2]);
    }
}
