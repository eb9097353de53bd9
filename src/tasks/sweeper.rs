//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries.
//! Lazy expiration already keeps reads correct; sweeping only reclaims memory
//! held by entries nobody reads again.

use std::hash::Hash;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::TtlCache;
use crate::config::Config;

/// Spawns a sweep task using the interval from `config.sweep_interval`.
///
/// See [`spawn_sweeper`]; the period is never shorter than one second.
pub fn spawn_configured_sweeper<K, V>(cache: TtlCache<K, V>, config: &Config) -> JoinHandle<()>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
{
    spawn_sweeper(cache, config.sweep_period())
}

/// Spawns a background task that sweeps expired entries every `interval`.
///
/// The task takes the cache guard only for the duration of each sweep.
/// It runs until the returned handle is aborted or the runtime shuts down,
/// and logs when it stops either way.
///
/// Must be called from within a tokio runtime. Panics if `interval` is zero.
///
/// # Example
/// ```ignore
/// let cache = TtlCache::new(1000, Some(300))?;
/// let sweeper = spawn_sweeper(cache.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_sweeper<K, V>(cache: TtlCache<K, V>, interval: Duration) -> JoinHandle<()>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
{
    tokio::spawn(async move {
        info!(?interval, "starting TTL sweep task");
        let _stopped = StopLog;

        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = cache.sweep();
            if removed > 0 {
                info!(removed, remaining = cache.stored_len(), "TTL sweep removed expired entries");
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }
    })
}

/// Logs the end of the sweep task when its future is dropped.
struct StopLog;

impl Drop for StopLog {
    fn drop(&mut self) {
        info!("TTL sweep task stopped");
    }
}
