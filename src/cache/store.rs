//! Cache Store Module
//!
//! Single-threaded cache engine combining the LRU table with TTL expiration
//! and statistics. `TtlCache` wraps it for shared use.

use std::borrow::Borrow;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::cache::expiry::{deadline_after, ExpiryPolicy};
use crate::cache::{CacheEntry, CacheStats, LruTable};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Bounded cache storage with LRU eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Index and recency order
    table: LruTable<K, V>,
    /// Deadline computation and default TTL
    expiry: ExpiryPolicy,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, at least 1
    /// * `default_ttl` - TTL in seconds for entries set without one; None = never expire
    ///
    /// # Errors
    /// `InvalidCapacity` for a zero capacity, `InvalidTtl` for a negative default TTL.
    pub fn new(capacity: usize, default_ttl: Option<i64>) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(0));
        }
        let expiry = ExpiryPolicy::new(default_ttl)?;

        Ok(Self {
            table: LruTable::with_capacity(capacity),
            expiry,
            stats: CacheStats::new(capacity),
            capacity,
        })
    }

    /// Creates a CacheStore from a loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let capacity = usize::try_from(config.capacity)
            .map_err(|_| CacheError::InvalidCapacity(config.capacity))?;
        Self::new(capacity, config.default_ttl)
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL in seconds.
    ///
    /// If the key already exists, the value and deadline are replaced. A new
    /// key that overflows capacity evicts the least recently used entry.
    ///
    /// # Arguments
    /// * `ttl` - TTL in seconds (uses the default TTL if None, 0 = expire on next access)
    ///
    /// # Errors
    /// `InvalidTtl` for a negative TTL; the cache is left untouched.
    pub fn set(&mut self, key: K, value: V, ttl: Option<i64>) -> Result<()> {
        let now = Instant::now();
        let expires_at = self.expiry.deadline(ttl, now)?;
        self.insert(key, value, expires_at, now);
        Ok(())
    }

    /// Stores a key-value pair that expires after `ttl`.
    pub fn set_for(&mut self, key: K, value: V, ttl: Duration) {
        let now = Instant::now();
        self.insert(key, value, Some(deadline_after(ttl, now)), now);
    }

    fn insert(&mut self, key: K, value: V, expires_at: Option<Instant>, now: Instant) {
        match self.table.locate(&key) {
            Some(handle) => {
                self.table.replace(handle, value, expires_at);
                self.table.move_to_back(handle);
            }
            None => {
                self.table.push_back(CacheEntry::new(key, value, expires_at));
                if self.table.len() > self.capacity {
                    self.evict_front(now);
                }
            }
        }
        self.stats.set_total_entries(self.table.len());
    }

    // == Evict ==
    /// Removes the front of the recency order regardless of its TTL.
    fn evict_front(&mut self, now: Instant) {
        let Some(entry) = self.table.evict_front() else {
            return;
        };
        if entry.is_expired_at(now) {
            self.stats.record_expirations(1);
            trace!("evicted entry had already expired");
        } else {
            self.stats.record_eviction();
            debug!(capacity = self.capacity, "evicted least recently used entry");
        }
    }

    // == Get ==
    /// Retrieves a value by key and marks it most recently used.
    ///
    /// Expired entries are removed and counted as expirations.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(handle) = self.table.locate(key) else {
            self.stats.record_miss();
            return None;
        };
        if self.expire_if_due(handle, Instant::now()) {
            return None;
        }

        self.table.move_to_back(handle);
        self.stats.record_hit();
        self.table.entry(handle).map(|entry| &entry.value)
    }

    // == Contains ==
    /// Checks whether a live entry exists without changing its recency.
    pub fn contains<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.table.locate(key) {
            Some(handle) => !self.expire_if_due(handle, Instant::now()),
            None => false,
        }
    }

    // == Time To Live ==
    /// Remaining lifetime of a live entry.
    ///
    /// # Returns
    /// - `None` if the key is absent or expired
    /// - `Some(None)` if the entry never expires
    /// - `Some(Some(remaining))` otherwise
    pub fn ttl_remaining<Q>(&mut self, key: &Q) -> Option<Option<Duration>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = Instant::now();
        let handle = self.table.locate(key)?;
        if self.expire_if_due(handle, now) {
            return None;
        }
        self.table
            .entry(handle)
            .map(|entry| entry.ttl_remaining_at(now))
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// Returns true if a live entry existed. An entry that had already
    /// expired is removed too but reported as absent.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(handle) = self.table.locate(key) else {
            return false;
        };
        if self.expire_if_due(handle, Instant::now()) {
            return false;
        }
        self.table.remove(handle);
        self.stats.set_total_entries(self.table.len());
        true
    }

    // == Clear ==
    /// Removes every entry. Statistics counters are kept.
    pub fn clear(&mut self) {
        self.table.clear();
        self.stats.set_total_entries(0);
    }

    // == Sweep ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&mut self) -> usize {
        self.sweep_at(Instant::now())
    }

    /// Removes all entries expired at `now`.
    pub fn sweep_at(&mut self, now: Instant) -> usize {
        let expired: Vec<usize> = self
            .table
            .handles()
            .filter(|&handle| {
                self.table
                    .entry(handle)
                    .is_some_and(|entry| entry.is_expired_at(now))
            })
            .collect();

        for &handle in &expired {
            self.table.remove(handle);
        }

        let count = expired.len();
        if count > 0 {
            self.stats.record_expirations(count as u64);
            self.stats.set_total_entries(self.table.len());
            debug!(removed = count, remaining = self.table.len(), "swept expired entries");
        }
        count
    }

    /// Removes the entry if its deadline has passed; true if it did.
    fn expire_if_due(&mut self, handle: usize, now: Instant) -> bool {
        let expired = self
            .table
            .entry(handle)
            .is_some_and(|entry| entry.is_expired_at(now));
        if expired {
            self.table.remove(handle);
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.table.len());
            trace!("lazily expired entry");
        }
        expired
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    ///
    /// `total_entries` counts live entries only, like [`len`](Self::len).
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.len());
        stats
    }

    // == Length ==
    /// Returns the number of live entries.
    ///
    /// Entries past their deadline are not counted even if no access or sweep
    /// has removed them yet. O(1) when no stored entry has a TTL.
    pub fn len(&self) -> usize {
        self.table.live_len(Instant::now())
    }

    /// Returns the number of entries physically held, expired ones included.
    ///
    /// This is what capacity is enforced against; `sweep` brings it down to `len`.
    pub fn stored_len(&self) -> usize {
        self.table.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the configured maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the TTL applied to entries set without one.
    pub fn default_ttl(&self) -> Option<Duration> {
        self.expiry.default_ttl()
    }

    /// Keys from least to most recently used.
    pub fn keys_by_recency(&self) -> Vec<K> {
        self.table
            .handles()
            .filter_map(|handle| self.table.entry(handle))
            .map(|entry| entry.key.clone())
            .collect()
    }
}
