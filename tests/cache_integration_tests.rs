//! Integration Tests for the Public Cache API
//!
//! Exercises the shared `TtlCache` handle the way an embedding application would.

use std::thread::sleep;
use std::time::{Duration, Instant};

use lru_ttl_cache::{CacheError, Config, TtlCache};
use tokio_test::{assert_err, assert_ok};

// == Helper Functions ==

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lru_ttl_cache=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

fn create_test_cache(capacity: usize) -> TtlCache<String, String> {
    init_tracing();
    TtlCache::new(capacity, None).unwrap()
}

fn set(cache: &TtlCache<String, String>, key: &str) {
    assert_ok!(cache.set(key.to_string(), format!("value_{key}"), None));
}

// == Construction ==

#[test]
fn test_construction_rejects_zero_and_negative_capacity() {
    assert_eq!(
        TtlCache::<String, String>::new(0, None).unwrap_err(),
        CacheError::InvalidCapacity(0)
    );
    assert_eq!(
        TtlCache::<String, String>::from_config(&Config::with_capacity(-1)).unwrap_err(),
        CacheError::InvalidCapacity(-1)
    );

    let cache = assert_ok!(TtlCache::<String, String>::new(5, None));
    assert_eq!(cache.capacity(), 5);
    assert!(cache.is_empty());
}

#[test]
fn test_construction_from_config() {
    let config = Config::with_capacity(3).with_default_ttl(Some(0));
    let cache: TtlCache<String, String> = assert_ok!(TtlCache::from_config(&config));

    set(&cache, "k");
    // Default TTL of zero applies to sets without an explicit TTL
    assert_eq!(cache.get("k"), None);
    assert_eq!(cache.capacity(), 3);
}

// == LRU Behaviour ==

#[test]
fn test_lru_evicts_oldest() {
    let cache = create_test_cache(3);
    for key in ["A", "B", "C", "D"] {
        set(&cache, key);
    }

    assert_eq!(cache.len(), 3);
    assert!(!cache.contains("A"));
    for key in ["B", "C", "D"] {
        assert!(cache.contains(key), "{key} should be cached");
    }
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn test_get_refreshes_recency() {
    let cache = create_test_cache(3);
    for key in ["A", "B", "C"] {
        set(&cache, key);
    }

    assert_eq!(cache.get("A").as_deref(), Some("value_A"));
    set(&cache, "D");

    assert!(cache.contains("A"));
    assert!(!cache.contains("B"));
    assert!(cache.contains("C"));
    assert!(cache.contains("D"));
}

// == TTL Behaviour ==

#[test]
fn test_zero_ttl_is_absent_and_removed() {
    let cache = create_test_cache(10);

    assert_ok!(cache.set("k".into(), "v".into(), Some(0)));
    assert_eq!(cache.get("k"), None);
    assert_eq!(cache.len(), 0);

    let stats = cache.stats();
    assert_eq!(stats.expirations, 1);
    assert_eq!(stats.misses, 0);
}

#[test]
fn test_zero_ttl_entry_not_counted_before_access() {
    init_tracing();
    let cache = TtlCache::new(3, None).unwrap();

    assert_ok!(cache.set("k", "v", Some(0)));

    assert_eq!(cache.len(), 0);
    assert!(cache.is_empty());
    assert_eq!(cache.stats().total_entries, 0);
}

#[test]
fn test_expired_entries_leave_live_count_before_sweep() {
    let cache = create_test_cache(10);
    set(&cache, "kept");
    cache.set_for("brief".into(), "v".into(), Duration::from_millis(20));
    assert_eq!(cache.len(), 2);

    sleep(Duration::from_millis(40));

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.stored_len(), 2);
    assert_eq!(cache.sweep(), 1);
    assert_eq!(cache.stored_len(), 1);
}

#[test]
fn test_expired_most_recent_entry_is_absent() {
    let cache = create_test_cache(3);
    set(&cache, "old");
    assert_ok!(cache.set("newest".into(), "v".into(), Some(0)));

    assert_eq!(cache.get("newest"), None);
    assert_eq!(cache.get("old").as_deref(), Some("value_old"));
}

#[test]
fn test_ttl_expiration_over_time() {
    let cache = create_test_cache(10);

    assert_ok!(cache.set("key1".into(), "value1".into(), Some(1)));
    assert_eq!(cache.get("key1").as_deref(), Some("value1"));

    sleep(Duration::from_millis(1100));

    assert_eq!(cache.get("key1"), None);
    assert!(cache.is_empty());
}

#[test]
fn test_negative_ttl_rejected_without_side_effects() {
    let cache = create_test_cache(3);
    set(&cache, "existing");
    let before = cache.stats();

    let err = assert_err!(cache.set("k".into(), "v".into(), Some(-1)));
    assert_eq!(err, CacheError::InvalidTtl(-1));

    assert!(!cache.contains("k"));
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.stats(), before);
}

#[test]
fn test_ttl_remaining_reports_deadline() {
    let cache = create_test_cache(3);
    assert_ok!(cache.set("short".into(), "v".into(), Some(30)));
    set(&cache, "forever");

    let remaining = cache.ttl_remaining("short").flatten().unwrap();
    assert!(remaining <= Duration::from_secs(30));
    assert_eq!(cache.ttl_remaining("forever"), Some(None));
    assert_eq!(cache.ttl_remaining("missing"), None);
}

#[test]
fn test_sweep_reclaims_expired_entries() {
    let cache = create_test_cache(10);
    assert_ok!(cache.set("a".into(), "v".into(), Some(5)));
    assert_ok!(cache.set("b".into(), "v".into(), Some(50)));
    set(&cache, "c");

    assert_eq!(cache.sweep(), 0);
    assert_eq!(cache.sweep_at(Instant::now() + Duration::from_secs(10)), 1);
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.stats().expirations, 1);
}

// == Delete / Clear ==

#[test]
fn test_delete_is_idempotent() {
    let cache = create_test_cache(3);
    set(&cache, "k");

    assert!(!cache.delete("missing"));
    assert_eq!(cache.len(), 1);

    assert!(cache.delete("k"));
    assert!(!cache.delete("k"));
    assert!(cache.is_empty());
}

#[test]
fn test_clear_empties_cache_but_keeps_counters() {
    let cache = create_test_cache(3);
    set(&cache, "a");
    set(&cache, "b");
    cache.get("a");
    cache.get("zzz");

    cache.clear();

    assert!(cache.is_empty());
    let stats = cache.stats();
    assert_eq!((stats.hits, stats.misses), (1, 1));
    assert_eq!(stats.total_entries, 0);
    assert_eq!(stats.hit_rate(), 0.5);
}

// == Sweeper ==

#[tokio::test]
async fn test_background_sweeper_with_config() {
    init_tracing();
    let config = Config::with_capacity(10);
    let cache: TtlCache<&'static str, u32> = TtlCache::from_config(&config).unwrap();

    cache.set_for("brief", 1, Duration::from_millis(20));
    cache.set("kept", 2, None).unwrap();

    // Default sweep_interval is one second
    let sweeper = lru_ttl_cache::spawn_configured_sweeper(cache.clone(), &config);
    tokio::time::sleep(Duration::from_millis(1300)).await;
    sweeper.abort();

    assert_eq!(cache.stored_len(), 1);
    assert_eq!(cache.stats().expirations, 1);
    assert_eq!(cache.get("kept"), Some(2));
}
