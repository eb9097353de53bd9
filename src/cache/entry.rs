//! Cache Entry Module
//!
//! Defines the record stored for each key, including its recency links.

use std::time::{Duration, Instant};

use crate::cache::expiry::is_expired;

// == Cache Entry ==
/// A single cached record.
///
/// `prev` and `next` are arena handles into the owning `LruTable`; they are
/// only ever read or written by the table itself.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    /// The key this entry is indexed under
    pub key: K,
    /// The stored value
    pub value: V,
    /// Expiration deadline, None = no expiration
    pub expires_at: Option<Instant>,
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates an unlinked entry with the given deadline.
    pub fn new(key: K, value: V, expires_at: Option<Instant>) -> Self {
        Self {
            key,
            value,
            expires_at,
            prev: None,
            next: None,
        }
    }

    // == Replace ==
    /// Overwrites value and deadline in place, keeping the recency links.
    pub fn replace(&mut self, value: V, expires_at: Option<Instant>) {
        self.value = value;
        self.expires_at = expires_at;
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is expired once `now` reaches the deadline, so a zero TTL
    /// expires on the very next check.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        is_expired(self.expires_at, now)
    }

    // == Time To Live ==
    /// Returns the remaining lifetime at `now`, or None if the entry never expires.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the deadline has passed
    /// - `Some(remaining)` if the entry has a deadline in the future
    /// - `None` if the entry has no deadline
    pub fn ttl_remaining_at(&self, now: Instant) -> Option<Duration> {
        self.expires_at
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}
