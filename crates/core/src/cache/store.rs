//! TTL-bounded concurrent store of generated analyses.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// How long a generated analysis is served from the cache.
pub const ANALYSIS_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct CacheEntry {
    text: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Cache counters reported by the health endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub keys: usize,
    pub hits: u64,
    pub misses: u64,
}

/// In-memory analysis cache.
///
/// Concurrent writers to the same key race; the last write wins.
#[derive(Debug)]
pub struct AnalysisCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for AnalysisCache {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisCache {
    /// Create an empty cache with the standard [`ANALYSIS_TTL`].
    pub fn new() -> Self {
        Self::with_ttl(ANALYSIS_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self { entries: DashMap::new(), ttl, hits: AtomicU64::new(0), misses: AtomicU64::new(0) }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a live entry.
    ///
    /// Expired entries are treated as absent and evicted.
    pub fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        let fresh = self
            .entries
            .get(key)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.text.clone());

        match fresh {
            Some(text) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(text)
            }
            None => {
                self.entries.remove_if(key, |_, entry| !entry.is_fresh(now));
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store `text` under `key` for one TTL, replacing any previous entry.
    pub fn insert(&self, key: impl Into<String>, text: impl Into<String>) {
        let entry = CacheEntry { text: text.into(), expires_at: Instant::now() + self.ttl };
        self.entries.insert(key.into(), entry);
    }

    /// Drop every entry.
    pub fn flush(&self) {
        self.entries.clear();
        tracing::info!("analysis cache flushed");
    }

    /// Remove expired entries, returning how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = entry.is_fresh(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            keys: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
