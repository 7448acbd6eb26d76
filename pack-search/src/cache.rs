//! Deep-search result cache.
//!
//! Holds one [`ResultSet`] per [`QuerySignature`], in insertion order. Each
//! entry lives in its own async-locked slot: a request holds the slot's lock
//! across its fetch, so a second request for the same signature waits for
//! the first instead of fetching again. The index lock itself is only held
//! for lookups and inserts, never across network I/O.
//!
//! Eviction is by bulk trim: once more than `limit` signatures are held, the
//! oldest `trim` are dropped in one go.

use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::orchestrator::results::ResultSet;
use crate::types::QuerySignature;

/// Shared, lockable cache entry. `None` until its first fetch succeeds.
pub type Slot = Arc<AsyncMutex<Option<ResultSet>>>;

/// Exclusive access to one signature's entry.
pub type SlotGuard = OwnedMutexGuard<Option<ResultSet>>;

/// Bounded, insertion-ordered cache of deep-search result sets.
#[derive(Debug)]
pub struct SearchCache {
    limit: usize,
    trim: usize,
    entries: Mutex<Vec<(QuerySignature, Slot)>>,
}

impl SearchCache {
    /// Create an empty cache holding at most `limit` signatures, dropping the
    /// oldest `trim` once exceeded.
    pub fn new(limit: usize, trim: usize) -> Self {
        Self {
            limit,
            trim,
            entries: Mutex::new(Vec::new()),
        }
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, Vec<(QuerySignature, Slot)>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The slot for `signature`, inserting an empty one on first use.
    pub fn slot(&self, signature: &QuerySignature) -> Slot {
        let mut entries = self.entries();
        if let Some((_, slot)) = entries.iter().find(|(sig, _)| sig == signature) {
            tracing::trace!("cache slot found");
            return Arc::clone(slot);
        }

        let slot: Slot = Arc::new(AsyncMutex::new(None));
        entries.push((signature.clone(), Arc::clone(&slot)));

        if entries.len() > self.limit {
            let drop_count = self.trim.min(entries.len());
            tracing::info!(
                limit = self.limit,
                evicted = drop_count,
                "search cache over limit, evicting oldest entries"
            );
            entries.drain(..drop_count);
        }
        slot
    }

    /// Lock the entry for `signature`, waiting for any request already
    /// holding it.
    ///
    /// If the entry was dropped from the index while waiting (discarded
    /// after an empty fetch, or evicted), a fresh slot is indexed and locked
    /// instead, so whatever the caller stores stays reachable.
    pub async fn lock(&self, signature: &QuerySignature) -> (Slot, SlotGuard) {
        loop {
            let slot = self.slot(signature);
            let guard = Arc::clone(&slot).lock_owned().await;
            if self.holds(signature, &slot) {
                return (slot, guard);
            }
            tracing::debug!("cache slot dropped while waiting, retrying");
        }
    }

    fn holds(&self, signature: &QuerySignature, slot: &Slot) -> bool {
        self.entries()
            .iter()
            .any(|(sig, held)| sig == signature && Arc::ptr_eq(held, slot))
    }

    /// Drop `slot` from the index if it is still the entry for `signature`.
    pub fn discard(&self, signature: &QuerySignature, slot: &Slot) -> bool {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|(sig, held)| !(sig == signature && Arc::ptr_eq(held, slot)));
        entries.len() != before
    }

    /// Returns `true` if an entry for `signature` is held.
    pub fn contains(&self, signature: &QuerySignature) -> bool {
        self.entries().iter().any(|(sig, _)| sig == signature)
    }

    /// Number of signatures held.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Query;

    fn sig(text: &str) -> QuerySignature {
        Query::new(text).signature()
    }

    #[test]
    fn same_signature_shares_a_slot() {
        let cache = SearchCache::new(20, 10);
        let a = cache.slot(&sig("sodium"));
        let b = cache.slot(&sig("sodium"));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_signatures_get_distinct_slots() {
        let cache = SearchCache::new(20, 10);
        let a = cache.slot(&sig("sodium"));
        let b = cache.slot(&sig("lithium"));
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn exceeding_limit_drops_oldest_trim() {
        let cache = SearchCache::new(20, 10);
        for i in 0..20 {
            cache.slot(&sig(&format!("q{i}")));
        }
        assert_eq!(cache.len(), 20);

        cache.slot(&sig("q20"));
        assert_eq!(cache.len(), 11);
        for i in 0..10 {
            assert!(!cache.contains(&sig(&format!("q{i}"))));
        }
        for i in 10..=20 {
            assert!(cache.contains(&sig(&format!("q{i}"))));
        }
    }

    #[test]
    fn lookup_does_not_refresh_position() {
        let cache = SearchCache::new(2, 1);
        cache.slot(&sig("a"));
        cache.slot(&sig("b"));
        cache.slot(&sig("a"));
        cache.slot(&sig("c"));
        assert!(!cache.contains(&sig("a")));
        assert!(cache.contains(&sig("b")));
        assert!(cache.contains(&sig("c")));
    }

    #[test]
    fn discard_only_drops_the_given_slot() {
        let cache = SearchCache::new(20, 10);
        let old = cache.slot(&sig("a"));
        cache.slot(&sig("b"));
        assert!(cache.discard(&sig("a"), &old));
        assert!(!cache.discard(&sig("a"), &old));
        assert_eq!(cache.len(), 1);

        let fresh = cache.slot(&sig("a"));
        assert!(!cache.discard(&sig("a"), &old));
        assert!(cache.contains(&sig("a")));
        assert!(cache.discard(&sig("a"), &fresh));
        assert!(!cache.contains(&sig("a")));
    }

    #[tokio::test]
    async fn waiter_relocks_a_slot_discarded_while_it_waited() {
        let cache = Arc::new(SearchCache::new(20, 10));
        let (first_slot, first_guard) = cache.lock(&sig("a")).await;

        let waiter = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                let (slot, mut guard) = cache.lock(&sig("a")).await;
                *guard = Some(ResultSet::new(Vec::new(), "a", 10, 0.0625, 2));
                slot
            })
        };
        tokio::task::yield_now().await;

        assert!(cache.discard(&sig("a"), &first_slot));
        drop(first_guard);

        let stored = waiter.await.expect("waiter");
        assert!(!Arc::ptr_eq(&stored, &first_slot));
        assert!(cache.contains(&sig("a")));
        assert_eq!(cache.len(), 1);
        assert!(cache.slot(&sig("a")).lock().await.is_some());
    }

    #[tokio::test]
    async fn evicted_slot_stays_usable_by_holder() {
        let cache = SearchCache::new(1, 1);
        let held = cache.slot(&sig("a"));
        cache.slot(&sig("b"));
        assert!(!cache.contains(&sig("a")));
        let guard = held.lock().await;
        assert!(guard.is_none());
    }
}
