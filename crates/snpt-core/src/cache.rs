//! Bounded memoization of computed snippets with oldest-first eviction.
//!
//! The cache maps a [`CacheKey`] (document fingerprint plus canonical
//! query-term string) to the snippet text computed for that combination.
//! A [`ScoreBoard`] doubles as the insertion ledger: every stored entry is
//! stamped with a monotonically increasing counter, and when the cache
//! grows past its capacity the minimum-stamp (oldest) entries are evicted
//! first.
//!
//! The whole store-and-evict sequence runs under the exclusive side of an
//! `RwLock`, so concurrent lookups never observe a cache mid-eviction.
//! Each [`SnippetService`](crate::SnippetService) instance owns one cache;
//! nothing is persisted across restarts.

use crate::score::ScoreBoard;
use crate::term::{TermSet, document_fingerprint};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info};
use url::Url;

/// Default number of snippets kept before the oldest are evicted.
pub const DEFAULT_CAPACITY: usize = 500;

/// Composite key identifying one (document, query-term-set) combination.
///
/// Deterministic: the same document URL and the same set of term
/// fingerprints produce the same key regardless of term iteration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Builds the key for a document URL and a query-term set.
    #[must_use]
    pub fn new(url: &Url, terms: &TermSet) -> Self {
        Self(format!("{}{}", document_fingerprint(url), terms.canonical()))
    }

    /// The key's string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Everything `store` mutates, behind one lock.
struct CacheState {
    entries: HashMap<CacheKey, String>,
    ledger: ScoreBoard<CacheKey>,
    counter: u32,
}

/// Cache access counters.
#[derive(Default)]
struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
    evictions: AtomicU64,
    resets: AtomicU64,
}

/// Snapshot of the cache counters.
#[derive(Debug, Clone, Copy)]
pub struct CacheStatsSnapshot {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
    /// Entries accepted by `store` (idempotent re-stores not counted).
    pub stores: u64,
    /// Entries evicted over capacity.
    pub evictions: u64,
    /// Counter-exhaustion resets that dropped the whole cache.
    pub resets: u64,
}

/// Bounded snippet cache with insertion-order eviction.
pub struct SnippetCache {
    state: RwLock<CacheState>,
    capacity: usize,
    stats: CacheStats,
}

impl SnippetCache {
    /// Creates a cache with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a cache bounded to `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: RwLock::new(CacheState {
                entries: HashMap::new(),
                ledger: ScoreBoard::new(),
                counter: 0,
            }),
            capacity,
            stats: CacheStats::default(),
        }
    }

    /// Returns the cached snippet for the key, if any. Pure read.
    pub async fn lookup(&self, key: &CacheKey) -> Option<String> {
        let state = self.state.read().await;
        let found = state.entries.get(key).cloned();
        if found.is_some() {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.stats.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// True if the key is cached. Does not touch the hit/miss counters.
    pub async fn contains(&self, key: &CacheKey) -> bool {
        self.state.read().await.entries.contains_key(key)
    }

    /// Memoizes a snippet under the key.
    ///
    /// Idempotent: re-storing an existing key is a no-op, the first writer
    /// wins. Inserting stamps the ledger with the current counter; when
    /// the counter reaches its maximum the entire cache is dropped and the
    /// counter restarts at zero (a rare, accepted self-healing event, not
    /// an error). Finally the oldest entries are evicted while the cache
    /// exceeds its capacity. The sequence is a single atomic unit with
    /// respect to all other cache operations.
    pub async fn store(&self, key: CacheKey, snippet: String) {
        let mut state = self.state.write().await;
        if state.entries.contains_key(&key) {
            return;
        }

        let stamp = state.counter;
        state.ledger.set(key.clone(), i64::from(stamp));
        state.entries.insert(key, snippet);
        state.counter += 1;
        self.stats.stores.fetch_add(1, Ordering::Relaxed);

        if state.counter == u32::MAX {
            info!(
                dropped = state.entries.len(),
                "snippet cache insertion counter exhausted, dropping all entries"
            );
            state.entries.clear();
            state.ledger.clear();
            state.counter = 0;
            self.stats.resets.fetch_add(1, Ordering::Relaxed);
        }

        while state.entries.len() > self.capacity {
            let Some(oldest) = state.ledger.min_key().cloned() else {
                break;
            };
            state.ledger.remove(&oldest);
            state.entries.remove(&oldest);
            self.stats.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(key = oldest.as_str(), "evicted oldest cached snippet");
        }
    }

    /// Number of cached snippets.
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    /// True when nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }

    /// Snapshot of the access counters.
    #[must_use]
    pub fn stats(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.stats.hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            stores: self.stats.stores.load(Ordering::Relaxed),
            evictions: self.stats.evictions.load(Ordering::Relaxed),
            resets: self.stats.resets.load(Ordering::Relaxed),
        }
    }

    /// Forces the insertion counter, so counter exhaustion is testable
    /// without four billion inserts.
    #[cfg(test)]
    pub(crate) async fn set_counter(&self, value: u32) {
        self.state.write().await.counter = value;
    }
}

impl Default for SnippetCache {
    fn default() -> Self {
        Self::new()
    }
}
