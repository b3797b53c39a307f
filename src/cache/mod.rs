//! TTL keyed cache for resolved tablet details
//!
//! Entries are logically absent as soon as they expire; a background sweep
//! task physically removes them on a fixed interval to bound memory. There
//! is no capacity bound and no LRU eviction, turnover is TTL-driven only.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Interval between physical sweeps of expired entries, independent of any
/// per-entry TTL.
const SWEEP_INTERVAL: Duration = Duration::from_secs(1);

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// A concurrent keyed store with per-entry time-to-live.
///
/// Safe for concurrent `get`/`set` from overlapping discovery calls without
/// external locking.
pub struct TtlCache<V> {
    entries: Arc<DashMap<String, Entry<V>>>,
    default_ttl: Duration,
    sweeper: CancellationToken,
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            default_ttl,
            sweeper: CancellationToken::new(),
        }
    }

    /// The TTL applied when callers pass no explicit override.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Look up a live entry. An expired entry behaves as a miss even before
    /// the sweeper has removed it.
    pub fn get(&self, key: &str) -> Option<V> {
        let entry = self.entries.get(key)?;
        if entry.expires_at <= Instant::now() {
            return None;
        }
        Some(entry.value.clone())
    }

    /// Insert or replace an entry, resetting its expiry to now + `ttl`.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.entries.insert(
            key.into(),
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Number of live (unexpired) entries. Physical entries may exceed this
    /// between sweeps.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.iter().filter(|e| e.expires_at > now).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Spawn the background sweep task. Must be called inside a Tokio
    /// runtime; the task is cancelled when the cache is dropped.
    pub fn spawn_sweeper(&self) {
        let entries = Arc::clone(&self.entries);
        let cancel = self.sweeper.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("Cache sweeper shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        let before = entries.len();
                        let now = Instant::now();
                        entries.retain(|_, entry| entry.expires_at > now);
                        // Concurrent inserts during the retain can push the
                        // length past the snapshot; never underflow.
                        let removed = before.saturating_sub(entries.len());
                        if removed > 0 {
                            debug!(removed, remaining = entries.len(), "Swept expired cache entries");
                        }
                    }
                }
            }
        });
    }

    #[cfg(test)]
    fn physical_len(&self) -> usize {
        self.entries.len()
    }
}

impl<V> Drop for TtlCache<V> {
    fn drop(&mut self) {
        self.sweeper.cancel();
    }
}
