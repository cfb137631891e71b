//! Process-scoped cache service.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use log::warn;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::CacheConfig;
use super::CacheProvider;
use super::TtlCache;
use super::spawn_sweeper;

/// The application's config cache.
///
/// Construct one at startup and hand clones of [`CacheService::cache`] (or
/// references to the service) to the code that needs it. The service owns the
/// background sweeper; dropping the service or calling
/// [`shutdown`](Self::shutdown) stops it.
///
/// # Example
///
/// ```
/// use worksheet_lib::cache::{CacheConfig, CacheService};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let service = CacheService::start(CacheConfig::default());
/// service.prewarm_static([("subjects".to_string(), vec!["math", "korean", "english"])]);
///
/// let subjects = service.get_or_load("subjects", Vec::new);
/// assert_eq!(subjects.len(), 3);
///
/// service.shutdown().await;
/// # }
/// ```
#[derive(Debug)]
pub struct CacheService<V> {
    cache: Arc<TtlCache<V>>,
    config: CacheConfig,
    cancel: CancellationToken,
    sweeper: Option<JoinHandle<()>>,
}

impl<V> CacheService<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates the cache and starts its sweeper on the current tokio runtime.
    ///
    /// Without a runtime, or with a zero sweep interval, no sweeper runs and
    /// entries expire only when read.
    pub fn start(config: CacheConfig) -> Self {
        let mut service = Self::without_sweeper(config);

        if service.config.sweep_interval.is_zero() {
            debug!("Cache sweeper disabled by config");
        } else if tokio::runtime::Handle::try_current().is_err() {
            warn!("No tokio runtime; cache entries will only expire on read");
        } else {
            service.sweeper = Some(spawn_sweeper(
                Arc::clone(&service.cache),
                service.config.sweep_interval,
                service.cancel.clone(),
            ));
        }

        service
    }

    /// Creates the cache without a background sweeper.
    pub fn without_sweeper(config: CacheConfig) -> Self {
        Self {
            cache: Arc::new(TtlCache::new()),
            config,
            cancel: CancellationToken::new(),
            sweeper: None,
        }
    }

    /// The underlying store.
    pub fn cache(&self) -> &Arc<TtlCache<V>> {
        &self.cache
    }

    /// The configuration the service was started with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns `true` while the background sweeper is running.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Retrieves a fresh value.
    pub fn get(&self, key: &str) -> Option<V> {
        self.cache.get(key)
    }

    /// Stores a value with the default TTL.
    pub fn set(&self, key: &str, value: V) {
        self.cache.set(key, value, self.config.default_ttl);
    }

    /// Stores a value with an explicit TTL.
    pub fn set_with_ttl(&self, key: &str, value: V, ttl: Duration) {
        self.cache.set(key, value, ttl);
    }

    /// Removes a value.
    pub fn delete(&self, key: &str) {
        self.cache.remove(key);
    }

    /// Removes every value.
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Returns the fresh value for `key`, loading and caching it with the
    /// default TTL on a miss.
    pub fn get_or_load<F>(&self, key: &str, loader: F) -> V
    where
        F: FnOnce() -> V,
    {
        self.cache
            .get_or_insert_with(key, self.config.default_ttl, loader)
    }

    /// Stores static config values with the static TTL.
    ///
    /// Returns the number of entries written.
    pub fn prewarm_static<I>(&self, entries: I) -> usize
    where
        I: IntoIterator<Item = (String, V)>,
    {
        self.prewarm(entries, self.config.static_ttl)
    }

    /// Stores values with the given TTL, replacing existing entries.
    pub fn prewarm<I>(&self, entries: I, ttl: Duration) -> usize
    where
        I: IntoIterator<Item = (String, V)>,
    {
        let mut written = 0;
        for (key, value) in entries {
            self.cache.set(&key, value, ttl);
            written += 1;
        }
        debug!("Pre-warmed {} cache entries", written);
        written
    }

    /// Stops the sweeper and waits for it to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        let Some(handle) = self.sweeper.take() else {
            return;
        };
        if let Err(e) = handle.await {
            warn!("Cache sweeper ended abnormally: {}", e);
        }
    }
}

impl<V> Drop for CacheService<V> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
