//! Registry Count Cache
//!
//! Memoizes the total entry count of each registry for a fixed TTL. Cache misses on the
//! same registry are coalesced through a per-registry refresh lock so that one chain read
//! serves every caller waiting in that expiry window, while refreshes of different
//! registries proceed independently.

use crate::error::ResolverError;
use crate::types::RegistryAddress;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Default time a count stays fresh.
pub const DEFAULT_COUNT_TTL: Duration = Duration::from_secs(180);

/// Cached count for one registry
#[derive(Debug, Clone, Copy)]
struct CountCacheEntry {
    value: u64,
    observed_at: Instant,
}

/// Snapshot of cache activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountCacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Chain reads actually issued (misses that did not find a value refreshed by a peer)
    pub refreshes: u64,
}

/// TTL cache of registry entry counts.
///
/// Shared across resolver invocations via `Arc`; construct one per process (or per test).
pub struct CountCache {
    ttl: Duration,
    entries: RwLock<HashMap<RegistryAddress, CountCacheEntry>>,
    /// Per-registry refresh locks; never held while `entries` is locked.
    refresh_locks: RwLock<HashMap<RegistryAddress, Arc<Mutex<()>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    refreshes: AtomicU64,
}

impl CountCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
            refresh_locks: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            refreshes: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the fresh cached count, if any, without I/O.
    pub fn get(&self, registry: &RegistryAddress) -> Option<u64> {
        let entries = self.entries.read();
        entries
            .get(registry)
            .filter(|entry| entry.observed_at.elapsed() < self.ttl)
            .map(|entry| entry.value)
    }

    /// Return the cached count or run `fetch` to refresh it.
    ///
    /// A failed fetch leaves the previous entry untouched and is returned to the caller.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        registry: &RegistryAddress,
        fetch: F,
    ) -> Result<u64, ResolverError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<u64, ResolverError>>,
    {
        if let Some(value) = self.get(registry) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(registry = %registry, value, "Count cache hit");
            return Ok(value);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let lock = self.refresh_lock(registry);
        let _guard = lock.lock().await;

        // A peer may have refreshed while this caller waited for the lock.
        if let Some(value) = self.get(registry) {
            debug!(registry = %registry, value, "Count refreshed by concurrent caller");
            return Ok(value);
        }

        self.refreshes.fetch_add(1, Ordering::Relaxed);
        let value = fetch().await?;
        self.entries.write().insert(
            registry.clone(),
            CountCacheEntry {
                value,
                observed_at: Instant::now(),
            },
        );
        debug!(registry = %registry, value, ttl_secs = self.ttl.as_secs(), "Count cache refreshed");
        Ok(value)
    }

    /// Drop the cached count for a registry so the next read refreshes.
    pub fn invalidate(&self, registry: &RegistryAddress) {
        self.entries.write().remove(registry);
    }

    pub fn stats(&self) -> CountCacheStats {
        CountCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            refreshes: self.refreshes.load(Ordering::Relaxed),
        }
    }

    fn refresh_lock(&self, registry: &RegistryAddress) -> Arc<Mutex<()>> {
        {
            let locks = self.refresh_locks.read();
            if let Some(lock) = locks.get(registry) {
                return lock.clone();
            }
        }

        let mut locks = self.refresh_locks.write();
        locks
            .entry(registry.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

impl Default for CountCache {
    fn default() -> Self {
        Self::new(DEFAULT_COUNT_TTL)
    }
}
