//! Background Sweeper Task
//!
//! Periodically removes cache entries whose time-to-live has elapsed.

use std::hash::Hash;
use std::sync::Weak;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ttl::{sweep_expired, CacheInner};

/// Spawns the background task that periodically sweeps expired entries.
///
/// The task alternates between waiting out the sweep interval and running
/// one two-phase sweep pass. It holds only a weak reference to the shared
/// map: once the owning cache is dropped the task logs and stops on its own
/// instead of keeping the map alive or taking anything else down with it.
/// The returned handle is owned by the cache, which aborts it on shutdown.
pub(crate) fn spawn_sweeper<K, V>(
    inner: Weak<Mutex<CacheInner<K, V>>>,
    time_to_live: Duration,
    sweep_interval: Duration,
) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
{
    tokio::spawn(async move {
        info!(
            "Starting sweeper with ttl of {:?} and interval of {:?}",
            time_to_live, sweep_interval
        );

        loop {
            tokio::time::sleep(sweep_interval).await;

            let inner = match inner.upgrade() {
                Some(inner) => inner,
                None => {
                    debug!("Cache dropped, stopping sweeper");
                    break;
                }
            };

            let removed = sweep_expired(&inner, time_to_live).await;
            if removed > 0 {
                info!("Sweep removed {} expired entries", removed);
            } else {
                debug!("Sweep found no expired entries");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{current_timestamp_ms, CacheEntry};
    use std::sync::Arc;

    fn shared_map_with_entry(age_ms: u64) -> Arc<Mutex<CacheInner<String, String>>> {
        let mut entry = CacheEntry::new("value".to_string());
        entry.last_accessed = current_timestamp_ms() - age_ms;

        let mut inner = CacheInner::new();
        inner.entries.insert("key".to_string(), entry);
        Arc::new(Mutex::new(inner))
    }

    #[tokio::test]
    async fn test_sweeper_removes_expired_entry() {
        let inner = shared_map_with_entry(5_000);

        let handle = spawn_sweeper(
            Arc::downgrade(&inner),
            Duration::from_secs(1),
            Duration::from_millis(200),
        );

        tokio::time::sleep(Duration::from_millis(600)).await;

        assert!(inner.lock().await.entries.is_empty());
        assert_eq!(inner.lock().await.stats.expirations, 1);
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweeper_preserves_fresh_entry() {
        let inner = shared_map_with_entry(0);

        let handle = spawn_sweeper(
            Arc::downgrade(&inner),
            Duration::from_secs(60),
            Duration::from_millis(200),
        );

        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(inner.lock().await.entries.len(), 1);
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweeper_stops_when_cache_dropped() {
        let inner = shared_map_with_entry(0);

        let handle = spawn_sweeper(
            Arc::downgrade(&inner),
            Duration::from_secs(60),
            Duration::from_millis(100),
        );

        drop(inner);
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert!(handle.is_finished());
    }

    #[tokio::test]
    async fn test_sweeper_can_be_aborted() {
        let inner = shared_map_with_entry(0);

        let handle = spawn_sweeper(
            Arc::downgrade(&inner),
            Duration::from_secs(60),
            Duration::from_millis(100),
        );

        handle.abort();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(handle.is_finished());
    }
}
