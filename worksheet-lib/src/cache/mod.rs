//! Time-to-live key-value cache
//!
//! Provides a `CacheProvider` trait, the in-memory [`TtlCache`] and the
//! process-scoped [`CacheService`] that owns a cache plus its background
//! sweeper. Used to pre-warm static and per-user config objects so they are
//! not recomputed on every page load.
//!
//! Expired entries are dropped lazily on read and periodically by the
//! sweeper.

mod config;
mod memory;
mod service;
mod sweeper;

pub use config::*;
pub use memory::*;
pub use service::*;
pub use sweeper::*;

use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;

/// A cached value with the time it was stored and how long it lives.
#[derive(Debug, Clone)]
pub struct CachedValue<V> {
    /// The cached data.
    pub value: V,
    /// When this value was cached.
    pub created_at: DateTime<Utc>,
    /// How long after `created_at` the value stays fresh.
    pub ttl: Duration,
}

impl<V> CachedValue<V> {
    /// Creates a cached value with an explicit insertion time.
    pub fn new(value: V, created_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            value,
            created_at,
            ttl,
        }
    }

    /// Creates a cached value inserted now.
    pub fn with_ttl(value: V, ttl: Duration) -> Self {
        Self::new(value, Utc::now(), ttl)
    }

    /// When this value stops being fresh. `None` if the TTL is too large to
    /// represent, in which case it never expires.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        chrono::Duration::from_std(self.ttl)
            .ok()
            .and_then(|ttl| self.created_at.checked_add_signed(ttl))
    }

    /// Returns `true` once more than `ttl` has elapsed since insertion.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expires| now > expires)
    }

    /// Returns `true` if this value has expired as of now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Trait for cache providers.
///
/// Implementations store and retrieve values by string keys and must:
/// - Never return expired values from `get()`
/// - Remember each value's insertion time and TTL
/// - Provide garbage collection for expired entries
pub trait CacheProvider<V>: Send + Sync {
    /// Retrieves a value by key.
    ///
    /// Returns `None` if the key doesn't exist or the value has expired.
    fn get(&self, key: &str) -> Option<V>;

    /// Stores a value that stays fresh for `ttl`.
    fn set(&self, key: &str, value: V, ttl: Duration);

    /// Removes a value from the cache.
    fn remove(&self, key: &str);

    /// Clears all values from the cache.
    fn clear(&self);

    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    fn gc(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_is_strict() {
        let created = Utc::now();
        let value = CachedValue::new(1, created, Duration::from_secs(10));
        let boundary = created + chrono::Duration::seconds(10);
        assert!(!value.is_expired_at(boundary));
        assert!(value.is_expired_at(boundary + chrono::Duration::milliseconds(1)));
    }

    #[test]
    fn test_huge_ttl_never_expires() {
        let value = CachedValue::new((), Utc::now(), Duration::MAX);
        assert_eq!(value.expires_at(), None);
        assert!(!value.is_expired());
    }
}
