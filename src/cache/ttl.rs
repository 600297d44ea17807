//! TTL Cache Module
//!
//! Generic thread-safe key-value cache with age-based expiry. One coarse
//! mutex guards the whole map; every operation, including per-entry
//! timestamp refreshes, is serialized through it. A background sweeper task
//! owned by the cache removes entries that have gone unread for longer than
//! the configured time-to-live.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::cache::{
    current_timestamp_ms, CacheEntry, CacheStats, DEFAULT_SWEEP_INTERVAL_SECS,
    DEFAULT_TIME_TO_LIVE_SECS,
};
use crate::tasks::spawn_sweeper;

// == Shared State ==
/// Map plus counters, guarded together so that lookups and their statistics
/// stay consistent.
pub(crate) struct CacheInner<K, V> {
    pub(crate) entries: HashMap<K, CacheEntry<V>>,
    pub(crate) stats: CacheStats,
}

impl<K, V> CacheInner<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
        }
    }
}

// == TTL Cache ==
/// Concurrent-safe storage of key-value pairs with age-based expiry.
///
/// Every successful read refreshes the entry's last-access timestamp, so the
/// TTL measures time since last use, not time since insertion ("keep warm on
/// read"). Eviction happens only on sweep ticks: a lookup between expiry and
/// the next sweep still returns the entry and refreshes it.
///
/// The sweeper task starts at construction and runs for the cache's whole
/// lifetime; [`TtlCache::shutdown`] or dropping the cache stops it.
pub struct TtlCache<K, V> {
    inner: Arc<Mutex<CacheInner<K, V>>>,
    time_to_live: Duration,
    sweep_interval: Duration,
    sweeper: Option<JoinHandle<()>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    // == Constructors ==
    /// Creates a cache with the default time-to-live (10s) and sweep
    /// interval (1s).
    ///
    /// # Panics
    /// Must be called from within a Tokio runtime, which the sweeper task is
    /// spawned onto.
    pub fn new() -> Self {
        Self::with_config(DEFAULT_TIME_TO_LIVE_SECS, DEFAULT_SWEEP_INTERVAL_SECS)
    }

    /// Creates a cache with explicit time-to-live and sweep interval, both
    /// in seconds.
    ///
    /// A zero value for either parameter disables automatic expiry entirely:
    /// no sweeper is spawned and entries live until explicitly removed. This
    /// mirrors the documented behavior of the configuration surface rather
    /// than rejecting the value.
    ///
    /// # Panics
    /// Must be called from within a Tokio runtime when sweeping is enabled.
    pub fn with_config(time_to_live_secs: u64, sweep_interval_secs: u64) -> Self {
        let time_to_live = Duration::from_secs(time_to_live_secs);
        let sweep_interval = Duration::from_secs(sweep_interval_secs);
        let inner = Arc::new(Mutex::new(CacheInner::new()));

        let sweeper = if time_to_live_secs > 0 && sweep_interval_secs > 0 {
            Some(spawn_sweeper(
                Arc::downgrade(&inner),
                time_to_live,
                sweep_interval,
            ))
        } else {
            None
        };

        Self {
            inner,
            time_to_live,
            sweep_interval,
            sweeper,
        }
    }

    // == Put ==
    /// Inserts or silently overwrites the entry for `key`, resetting its
    /// last-access timestamp to now.
    pub async fn put(&self, key: K, value: V) {
        let mut guard = self.inner.lock().await;
        guard.entries.insert(key, CacheEntry::new(value));
        let count = guard.entries.len();
        guard.stats.set_total_entries(count);
    }

    // == Get ==
    /// Returns the stored value for `key`, refreshing its last-access
    /// timestamp as a side effect.
    ///
    /// Returns `None` when the key was never inserted or has been removed.
    /// An absent key is a normal outcome, not an error. An entry whose age
    /// already exceeds the TTL but which the sweeper has not yet reached is
    /// still returned, and the read extends its life.
    pub async fn get(&self, key: &K) -> Option<V> {
        let mut guard = self.inner.lock().await;
        let CacheInner { entries, stats } = &mut *guard;
        match entries.get_mut(key) {
            Some(entry) => {
                entry.touch();
                stats.record_hit();
                Some(entry.value.clone())
            }
            None => {
                stats.record_miss();
                None
            }
        }
    }

    // == Get All ==
    /// Returns a snapshot of all currently stored values, in map iteration
    /// order (unspecified, not stable).
    ///
    /// When `update_last_accessed` is true, every visited entry's timestamp
    /// is refreshed to the same snapshot instant. The whole enumeration runs
    /// under a single lock hold, so concurrent mutation can never corrupt or
    /// skip the snapshot.
    pub async fn get_all(&self, update_last_accessed: bool) -> Vec<V> {
        let snapshot_ms = current_timestamp_ms();
        let mut guard = self.inner.lock().await;
        guard
            .entries
            .values_mut()
            .map(|entry| {
                if update_last_accessed {
                    entry.touch_at(snapshot_ms);
                }
                entry.value.clone()
            })
            .collect()
    }

    // == Remove ==
    /// Unconditionally deletes the entry for `key`; no-op when absent.
    pub async fn remove(&self, key: &K) {
        let mut guard = self.inner.lock().await;
        guard.entries.remove(key);
        let count = guard.entries.len();
        guard.stats.set_total_entries(count);
    }

    // == Contains Key ==
    /// Returns true iff an entry currently exists for `key`.
    ///
    /// Unlike [`TtlCache::get`], this does not refresh the entry's
    /// last-access timestamp.
    pub async fn contains_key(&self, key: &K) -> bool {
        let guard = self.inner.lock().await;
        guard.entries.contains_key(key)
    }

    // == Length ==
    /// Returns the current number of entries, from a single atomic snapshot
    /// of the map.
    pub async fn len(&self) -> usize {
        let guard = self.inner.lock().await;
        guard.entries.len()
    }

    /// Returns true if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    // == Sweep ==
    /// Runs one sweep pass, removing every entry whose age exceeds the TTL.
    ///
    /// Normally invoked by the background sweeper; exposed so tests can
    /// drive expiry deterministically. Returns the number of entries
    /// removed.
    pub async fn sweep(&self) -> usize {
        sweep_expired(&self.inner, self.time_to_live).await
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let guard = self.inner.lock().await;
        let mut stats = guard.stats.clone();
        stats.set_total_entries(guard.entries.len());
        stats
    }

    // == Accessors ==
    /// The configured time-to-live.
    pub fn time_to_live(&self) -> Duration {
        self.time_to_live
    }

    /// The configured sweep interval.
    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    /// Returns true while the background sweeper task is running.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    // == Shutdown ==
    /// Stops the background sweeper.
    ///
    /// The cache itself stays fully usable afterwards; entries simply stop
    /// expiring automatically. Dropping the cache has the same effect.
    pub fn shutdown(&self) {
        if let Some(handle) = &self.sweeper {
            handle.abort();
        }
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for TtlCache<K, V> {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.take() {
            handle.abort();
        }
    }
}

// == Sweep Pass ==
/// One two-phase sweep over the shared map.
///
/// Candidates are collected under a single lock hold; each removal then
/// takes its own short lock hold, yielding to the scheduler in between, so
/// a large sweep never starves concurrent callers. The window between the
/// two phases means an entry can be read (and refreshed) once more while
/// already marked; it is removed regardless, matching the documented
/// staleness trade-off.
pub(crate) async fn sweep_expired<K, V>(
    inner: &Mutex<CacheInner<K, V>>,
    time_to_live: Duration,
) -> usize
where
    K: Eq + Hash + Clone,
{
    let expired: Vec<K> = {
        let guard = inner.lock().await;
        guard
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(time_to_live))
            .map(|(key, _)| key.clone())
            .collect()
    };

    let mut removed = 0;
    for key in expired {
        {
            let mut guard = inner.lock().await;
            if guard.entries.remove(&key).is_some() {
                guard.stats.record_expiration();
                removed += 1;
            }
            let count = guard.entries.len();
            guard.stats.set_total_entries(count);
        }
        tokio::task::yield_now().await;
    }
    removed
}
