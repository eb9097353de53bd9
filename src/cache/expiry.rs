//! Expiry Policy Module
//!
//! Turns caller-supplied TTLs into monotonic deadlines and decides liveness.

use std::time::{Duration, Instant};

use crate::error::{CacheError, Result};

// == Expiry Check ==
/// True iff a deadline is set and `now` has reached it.
#[inline]
pub fn is_expired(expires_at: Option<Instant>, now: Instant) -> bool {
    match expires_at {
        Some(deadline) => now >= deadline,
        None => false,
    }
}

// == TTL Validation ==
/// Converts a TTL in seconds into a `Duration`, rejecting negative values.
pub fn validate_ttl(ttl_seconds: i64) -> Result<Duration> {
    u64::try_from(ttl_seconds)
        .map(Duration::from_secs)
        .map_err(|_| CacheError::InvalidTtl(ttl_seconds))
}

// == Expiry Policy ==
/// Deadline computation for a cache, carrying its default TTL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpiryPolicy {
    default_ttl: Option<Duration>,
}

impl ExpiryPolicy {
    // == Constructor ==
    /// Creates a policy; the default TTL is validated like any per-call TTL.
    pub fn new(default_ttl: Option<i64>) -> Result<Self> {
        let default_ttl = default_ttl.map(validate_ttl).transpose()?;
        Ok(Self { default_ttl })
    }

    /// The default TTL applied to `set` calls without an explicit TTL.
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    // == Deadline ==
    /// Computes the deadline for an entry written at `now`.
    ///
    /// An explicit `ttl` wins over the default; with neither, the entry never
    /// expires. A TTL of zero yields a deadline of `now`.
    pub fn deadline(&self, ttl: Option<i64>, now: Instant) -> Result<Option<Instant>> {
        let ttl = match ttl {
            Some(seconds) => Some(validate_ttl(seconds)?),
            None => self.default_ttl,
        };
        Ok(ttl.map(|ttl| deadline_after(ttl, now)))
    }
}

/// Deadline `ttl` after `now`, saturating far in the future instead of overflowing.
pub fn deadline_after(ttl: Duration, now: Instant) -> Instant {
    now.checked_add(ttl)
        .unwrap_or_else(|| now + Duration::from_secs(u32::MAX as u64))
}
