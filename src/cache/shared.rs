//! Shared Cache Module
//!
//! Thread-safe handle over a `CacheStore`. Every operation, reads included,
//! runs under one mutex because a hit moves the entry in the recency order.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::error::Result;

// == TTL Cache ==
/// Cloneable, thread-safe LRU cache with per-entry TTL.
///
/// Clones share the same underlying store. Values are returned as clones, so
/// large payloads are best stored as `Arc<T>`.
///
/// # Example
/// ```
/// use lru_ttl_cache::TtlCache;
///
/// let cache = TtlCache::new(2, None).unwrap();
/// cache.set("a", 1, None).unwrap();
/// cache.set("b", 2, None).unwrap();
/// assert_eq!(cache.get(&"a"), Some(1));
///
/// cache.set("c", 3, None).unwrap(); // evicts "b"
/// assert_eq!(cache.get(&"b"), None);
/// assert_eq!(cache.len(), 2);
/// ```
pub struct TtlCache<K, V> {
    inner: Arc<Mutex<CacheStore<K, V>>>,
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> fmt::Debug for TtlCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.inner.lock();
        f.debug_struct("TtlCache")
            .field("len", &store.len())
            .field("capacity", &store.capacity())
            .finish()
    }
}

impl<K, V> From<CacheStore<K, V>> for TtlCache<K, V> {
    fn from(store: CacheStore<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// `InvalidCapacity` for a zero capacity, `InvalidTtl` for a negative default TTL.
    pub fn new(capacity: usize, default_ttl: Option<i64>) -> Result<Self> {
        CacheStore::new(capacity, default_ttl).map(Self::from)
    }

    /// Creates a cache from a loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        CacheStore::from_config(config).map(Self::from)
    }

    /// Returns a clone of the value if present and unexpired, marking it most recent.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Inserts or overwrites an entry; see [`CacheStore::set`].
    pub fn set(&self, key: K, value: V, ttl: Option<i64>) -> Result<()> {
        self.inner.lock().set(key, value, ttl)
    }

    /// Inserts or overwrites an entry that expires after `ttl`.
    pub fn set_for(&self, key: K, value: V, ttl: Duration) {
        self.inner.lock().set_for(key, value, ttl)
    }

    /// Removes an entry; true if a live entry existed.
    pub fn delete<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().delete(key)
    }

    /// Checks for a live entry without changing its recency.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains(key)
    }

    /// Remaining lifetime of a live entry; see [`CacheStore::ttl_remaining`].
    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Option<Duration>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().ttl_remaining(key)
    }

    /// Removes every entry. Statistics counters are kept.
    pub fn clear(&self) {
        self.inner.lock().clear()
    }

    /// Removes all expired entries, returning how many were removed.
    pub fn sweep(&self) -> usize {
        self.inner.lock().sweep()
    }

    /// Removes all entries expired at `now`.
    pub fn sweep_at(&self, now: Instant) -> usize {
        self.inner.lock().sweep_at(now)
    }

    /// Number of live entries; expired entries are never counted.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Number of entries held, including expired ones no sweep has removed yet.
    pub fn stored_len(&self) -> usize {
        self.inner.lock().stored_len()
    }

    /// True if no live entry remains.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Configured maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Snapshot of the counters; `total_entries` matches [`len`](Self::len).
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    /// Runs `f` with exclusive access to the store, e.g. for read-modify-write.
    pub fn with_store<R>(&self, f: impl FnOnce(&mut CacheStore<K, V>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
