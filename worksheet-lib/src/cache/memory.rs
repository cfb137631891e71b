//! In-memory TTL cache using DashMap

use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;

use super::CacheProvider;
use super::CachedValue;

/// An in-memory TTL cache backed by a concurrent hash map.
///
/// Safe to share across threads behind an `Arc`; reads, lazy evictions and
/// writes on the same key are serialized by the map's shard locks. Data is
/// lost when the process exits.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use worksheet_lib::cache::{CacheProvider, TtlCache};
///
/// let cache = TtlCache::new();
/// cache.set("subjects", vec!["math", "korean", "english"], Duration::from_secs(300));
/// assert_eq!(cache.get("subjects").map(|s| s.len()), Some(3));
/// ```
#[derive(Debug)]
pub struct TtlCache<V> {
    store: DashMap<String, CachedValue<V>>,
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self {
            store: DashMap::new(),
        }
    }
}

impl<V: Clone> TtlCache<V> {
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new cache with the specified initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            store: DashMap::with_capacity(capacity),
        }
    }

    /// Returns the number of entries in the cache (including expired ones).
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns the fresh entry for a key together with its metadata.
    pub fn get_entry(&self, key: &str) -> Option<CachedValue<V>> {
        let now = Utc::now();
        let entry = self.store.get(key)?;
        if entry.value().is_expired_at(now) {
            drop(entry);
            // Only evict if no fresh value was written in the meantime.
            self.store.remove_if(key, |_, v| v.is_expired_at(now));
            None
        } else {
            Some(entry.value().clone())
        }
    }

    /// Stores a prepared entry as-is.
    pub fn insert_entry(&self, key: impl Into<String>, entry: CachedValue<V>) {
        self.store.insert(key.into(), entry);
    }

    /// Returns the fresh value for `key`, computing and storing it on a miss.
    pub fn get_or_insert_with<F>(&self, key: &str, ttl: Duration, f: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(entry) = self.get_entry(key) {
            return entry.value;
        }
        let value = f();
        self.store
            .insert(key.to_string(), CachedValue::with_ttl(value.clone(), ttl));
        value
    }

    /// Returns the keys currently stored (including expired ones).
    pub fn keys(&self) -> Vec<String> {
        self.store.iter().map(|e| e.key().clone()).collect()
    }
}

impl<V: Clone + Send + Sync> CacheProvider<V> for TtlCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        self.get_entry(key).map(|entry| entry.value)
    }

    fn set(&self, key: &str, value: V, ttl: Duration) {
        self.store
            .insert(key.to_string(), CachedValue::with_ttl(value, ttl));
    }

    fn remove(&self, key: &str) {
        self.store.remove(key);
    }

    fn clear(&self) {
        self.store.clear();
    }

    fn gc(&self) -> usize {
        let now = Utc::now();
        let mut removed = 0;
        self.store.retain(|_, value| {
            if value.is_expired_at(now) {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }
}
