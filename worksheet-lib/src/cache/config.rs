//! Cache configuration

use std::time::Duration;

/// Configuration for cache TTL (time-to-live) and sweeping.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use worksheet_lib::cache::CacheConfig;
///
/// let config = CacheConfig::default()
///     .with_static_ttl(Duration::from_secs(7200))
///     .with_sweep_interval(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL for values stored without an explicit TTL, such as per-user
    /// settings.
    ///
    /// Default: 5 minutes
    pub default_ttl: Duration,

    /// TTL for static config (subject lists, grade levels, question types).
    ///
    /// Default: 1 hour
    pub static_ttl: Duration,

    /// How often the background sweeper removes expired entries.
    /// Zero disables the sweeper; expiry then happens only on read.
    ///
    /// Default: 5 minutes
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(300), // 5 minutes
            static_ttl: Duration::from_secs(3600), // 1 hour
            sweep_interval: Duration::from_secs(300),
        }
    }
}

impl CacheConfig {
    /// Creates a new cache config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default TTL.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Sets the TTL for static config.
    pub fn with_static_ttl(mut self, ttl: Duration) -> Self {
        self.static_ttl = ttl;
        self
    }

    /// Sets the sweep interval.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Creates a config with zero TTLs and no sweeper.
    ///
    /// A value stays fresh only at the instant it was stored and is gone on
    /// any later read.
    pub fn no_cache() -> Self {
        Self {
            default_ttl: Duration::ZERO,
            static_ttl: Duration::ZERO,
            sweep_interval: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::cache::CachedValue;

    #[test]
    fn test_no_cache_ttl_is_fresh_only_at_insert() {
        let config = CacheConfig::no_cache();
        let created = Utc::now();
        let value = CachedValue::new("grades", created, config.default_ttl);
        assert!(!value.is_expired_at(created));
        assert!(value.is_expired_at(created + chrono::Duration::milliseconds(1)));
        assert!(config.sweep_interval.is_zero());
    }
}
