//! Time-based in-memory cache shared by all provider clients.
//!
//! Entries are keyed by string (usually the request URL) and considered
//! fresh while `now - stored_at < ttl`. A stale entry is dropped when it is
//! read; nothing else evicts unless [`TtlCache::purge_expired`] is called.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::debug;

/// A cached value and the instant it was stored
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub data: V,
    pub stored_at: Instant,
}

impl<V> CacheEntry<V> {
    /// Whether this entry is still fresh at `now`
    pub fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) < ttl
    }
}

/// Thread-safe TTL cache
#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    /// Create an empty cache with the given time-to-live
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cache with a TTL expressed in minutes
    pub fn with_minutes(minutes: u64) -> Self {
        Self::new(Duration::from_secs(minutes * 60))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Look up a fresh value
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Look up a value as of `now`, removing it if stale
    pub fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.is_fresh(self.ttl, now) => {
                debug!(key, "Cache hit");
                Some(entry.data.clone())
            }
            Some(_) => {
                debug!(key, "Cache entry expired");
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a value stamped with the current instant
    pub fn insert(&self, key: impl Into<String>, data: V) {
        self.insert_at(key, data, Instant::now());
    }

    /// Store a value stamped with `stored_at`
    pub fn insert_at(&self, key: impl Into<String>, data: V, stored_at: Instant) {
        self.lock()
            .insert(key.into(), CacheEntry { data, stored_at });
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Drop stale entries, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    pub fn purge_expired_at(&self, now: Instant) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.is_fresh(ttl, now));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
