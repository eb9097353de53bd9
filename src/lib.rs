//! LRU TTL Cache - A bounded in-process cache
//!
//! Provides least-recently-used eviction combined with per-entry
//! time-to-live expiration, behind a thread-safe handle.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{CacheStats, CacheStore, TtlCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::{spawn_configured_sweeper, spawn_sweeper};
