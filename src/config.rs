//! Environment-driven configuration.
//!
//! Every knob has a production-friendly default and can be overridden through
//! an environment variable; explicit builder calls take precedence over both.

use std::env;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 32;
pub const DEFAULT_POOL_IDLE_TIMEOUT_SECS: u64 = 90;
pub const DEFAULT_FLAGR_FLAG_ID: i64 = 12;
pub const DEFAULT_MIN_FETCH_INTERVAL_MS: u64 = 30_000;
pub const DEFAULT_CONFIG_CACHE_TTL_SECS: u64 = 30 * 60;

/// Transport and remote-config settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL for the default instance (`API_BASE_URL`).
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: Duration,
    pub proxy_url: Option<String>,
    /// Flagr evaluation service; remote base URLs are disabled without it.
    pub flagr_url: Option<String>,
    pub flagr_flag_id: i64,
    /// Minimum time between two remote config fetches.
    pub min_fetch_interval: Duration,
    /// How long a fetched remote config stays in the local cache.
    pub config_cache_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT_SECS),
            proxy_url: None,
            flagr_url: None,
            flagr_flag_id: DEFAULT_FLAGR_FLAG_ID,
            min_fetch_interval: Duration::from_millis(DEFAULT_MIN_FETCH_INTERVAL_MS),
            config_cache_ttl: Duration::from_secs(DEFAULT_CONFIG_CACHE_TTL_SECS),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            base_url: non_empty("API_BASE_URL"),
            timeout: non_empty("API_HTTP_TIMEOUT_SECS")
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            pool_max_idle_per_host: non_empty("API_HTTP_POOL_MAX_IDLE_PER_HOST")
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(defaults.pool_max_idle_per_host),
            pool_idle_timeout: non_empty("API_HTTP_POOL_IDLE_TIMEOUT_SECS")
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.pool_idle_timeout),
            proxy_url: non_empty("API_PROXY_URL"),
            flagr_url: non_empty("FLAGR_URL"),
            flagr_flag_id: non_empty("FLAGR_FLAG_ID")
                .and_then(|s| s.parse::<i64>().ok())
                .unwrap_or(defaults.flagr_flag_id),
            min_fetch_interval: non_empty("API_CLIENT_CONFIG_MIN_FETCH_INTERVAL_MS")
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.min_fetch_interval),
            config_cache_ttl: non_empty("API_CLIENT_CONFIG_CACHE_TTL_SECS")
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.config_cache_ttl),
        }
    }
}
