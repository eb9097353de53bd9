//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised synchronously by cache construction and insertion.
///
/// Absence of a key is never an error; lookups return `Option` and
/// deletes return `bool`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity below 1 was requested
    #[error("capacity must be at least 1, got {0}")]
    InvalidCapacity(i64),

    /// A negative TTL was supplied
    #[error("ttl must not be negative, got {0}s")]
    InvalidTtl(i64),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
