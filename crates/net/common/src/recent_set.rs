use std::hash::Hash;

use parking_lot::Mutex;
use schnellru::{ByLength, LruMap};

/// A bounded set of recently-seen identifiers, used to suppress re-gossip
/// of the same transaction within a short window.
///
/// Capacity-bounded true LRU eviction via [`schnellru`] — a superset of the
/// "approximate-LRU" requirement: recent membership for at least the most
/// recent `capacity` distinct inserts is always preserved. The set is a
/// hint only: false negatives (an entry evicted too early) are acceptable
/// and merely cause one redundant broadcast; false positives never occur,
/// since membership is never reported for a key that was not inserted.
pub struct RecentSet<K: Hash + Eq + Clone + 'static> {
    inner: Mutex<LruMap<K, ()>>,
}

impl<K: Hash + Eq + Clone + 'static> RecentSet<K> {
    /// Creates a set bounded to the most recent `capacity` distinct
    /// inserts.
    pub fn new(capacity: u32) -> Self {
        Self { inner: Mutex::new(LruMap::new(ByLength::new(capacity))) }
    }

    /// Inserts `key`, evicting the least-recently-used entry if the set is
    /// at capacity.
    pub fn put(&self, key: K) {
        self.inner.lock().insert(key, ());
    }

    /// Returns whether `key` is currently a member.
    pub fn get(&self, key: &K) -> bool {
        self.inner.lock().get(key).is_some()
    }

    /// Atomically checks membership and inserts `key` if absent, returning
    /// `true` if `key` was already present.
    ///
    /// This is the recommended primitive under concurrent access: a
    /// separate `get` then `put` would let two callers both observe
    /// "absent" and both proceed to gossip the same transaction.
    pub fn check_and_insert(&self, key: K) -> bool {
        let mut guard = self.inner.lock();
        if guard.get(&key).is_some() {
            true
        } else {
            guard.insert(key, ());
            false
        }
    }
}

impl<K: Hash + Eq + Clone + 'static> std::fmt::Debug for RecentSet<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecentSet").field("len", &self.inner.lock().len()).finish()
    }
}
