//! Configuration Module
//!
//! Handles loading cache construction parameters from environment variables.

use std::env;
use std::time::Duration;

use serde::Deserialize;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// Capacity and TTL are kept signed so that out-of-range input reaches the
/// cache constructor and is rejected there instead of being silently clamped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: i64,
    /// Default TTL in seconds for entries set without an explicit TTL
    pub default_ttl: Option<i64>,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: unset, entries never expire)
    /// - `CACHE_SWEEP_INTERVAL` - Sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.capacity),
            default_ttl: env::var("CACHE_DEFAULT_TTL")
                .ok()
                .and_then(|v| v.trim().parse().ok()),
            sweep_interval: env::var("CACHE_SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.sweep_interval),
        }
    }

    /// Returns a default config with the given capacity.
    pub fn with_capacity(capacity: i64) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Sets the default TTL in seconds.
    pub fn with_default_ttl(mut self, ttl: Option<i64>) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Sweep interval as a `Duration`, never shorter than one second.
    pub fn sweep_period(&self) -> Duration {
        Duration::from_secs(self.sweep_interval.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            default_ttl: None,
            sweep_interval: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.capacity, 1000);
        assert_eq!(config.default_ttl, None);
        assert_eq!(config.sweep_interval, 1);
    }

    #[test]
    fn test_config_from_env() {
        env::remove_var("CACHE_CAPACITY");
        env::remove_var("CACHE_DEFAULT_TTL");
        env::remove_var("CACHE_SWEEP_INTERVAL");

        assert_eq!(Config::from_env(), Config::default());

        env::set_var("CACHE_CAPACITY", "-1");
        env::set_var("CACHE_DEFAULT_TTL", "30");
        env::set_var("CACHE_SWEEP_INTERVAL", "not-a-number");

        let config = Config::from_env();
        assert_eq!(config.capacity, -1);
        assert_eq!(config.default_ttl, Some(30));
        assert_eq!(config.sweep_interval, 1);

        env::remove_var("CACHE_CAPACITY");
        env::remove_var("CACHE_DEFAULT_TTL");
        env::remove_var("CACHE_SWEEP_INTERVAL");
    }

    #[test]
    fn test_config_builder() {
        let config = Config::with_capacity(5).with_default_ttl(Some(60));
        assert_eq!(config.capacity, 5);
        assert_eq!(config.default_ttl, Some(60));
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: Config = serde_json::from_str(r#"{"capacity": 10}"#).unwrap();
        assert_eq!(config.capacity, 10);
        assert_eq!(config.default_ttl, None);
        assert_eq!(config.sweep_interval, 1);
    }

    #[test]
    fn test_sweep_interval_floor() {
        let config = Config {
            sweep_interval: 0,
            ..Config::default()
        };
        assert_eq!(config.sweep_period(), Duration::from_secs(1));
    }
}
