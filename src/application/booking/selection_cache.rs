//! Process-local TTL cache
//!
//! Holds the last seat/pricing snapshot shown to a user for a slot. The
//! cache is advisory: nothing reads it to decide availability, and it is
//! not shared between replicas.

use std::hash::Hash;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::selection::SelectionSnapshot;

/// Default entry lifetime
pub const DEFAULT_SELECTION_TTL: Duration = Duration::from_secs(30 * 60);

/// Key of a cached selection: who and which slot
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectionKey {
    /// User email, or the session id for anonymous selections
    pub user: String,
    pub slot_id: i32,
}

impl SelectionKey {
    pub fn new(user: impl Into<String>, slot_id: i32) -> Self {
        Self {
            user: user.into(),
            slot_id,
        }
    }
}

pub type SelectionCache = TtlCache<SelectionKey, SelectionSnapshot>;

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// Concurrent map whose entries expire `ttl` after insertion.
///
/// Expiry is checked lazily on `get` and eagerly by [`TtlCache::sweep`].
pub struct TtlCache<K, V> {
    entries: DashMap<K, Entry<V>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn put(&self, key: K, value: V) {
        self.put_at(key, value, Instant::now());
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|(_, e)| e.value)
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_expired(&self, entry: &Entry<V>, now: Instant) -> bool {
        now.saturating_duration_since(entry.stored_at) >= self.ttl
    }

    pub(crate) fn put_at(&self, key: K, value: V, now: Instant) {
        self.entries.insert(
            key,
            Entry {
                value,
                stored_at: now,
            },
        );
    }

    pub(crate) fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        {
            let entry = self.entries.get(key)?;
            if !self.is_expired(&entry, now) {
                return Some(entry.value.clone());
            }
        }
        // The read guard must be gone before removing from the same shard.
        self.entries.remove_if(key, |_, e| self.is_expired(e, now));
        None
    }

    pub(crate) fn sweep_at(&self, now: Instant) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, e| {
            let keep = !self.is_expired(e, now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }
}
