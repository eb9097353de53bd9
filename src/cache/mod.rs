//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod entry;
pub mod expiry;
mod lru;
mod shared;
mod stats;
mod store;


// Re-export public types
pub(crate) use entry::CacheEntry;
pub use expiry::ExpiryPolicy;
pub(crate) use lru::LruTable;
pub use shared::TtlCache;
pub use stats::CacheStats;
pub use store::CacheStore;
