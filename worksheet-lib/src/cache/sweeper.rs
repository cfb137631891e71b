//! Background sweeping of expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::CacheProvider;
use super::TtlCache;

/// Shortest period the sweeper will tick at.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Spawns a task that calls [`CacheProvider::gc`] every `interval` until
/// `cancel` fires.
///
/// The first sweep happens one full interval after spawning. Must be called
/// from within a tokio runtime.
pub fn spawn_sweeper<V>(
    cache: Arc<TtlCache<V>>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    let period = interval.max(MIN_SWEEP_INTERVAL);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Cache sweeper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = cache.gc();
                    if removed > 0 {
                        debug!("Cache sweep evicted {} expired entries", removed);
                    }
                }
            }
        }
    })
}
