//! In-memory cache for fused search answers.
//!
//! Caches the final deduplicated, ranked results keyed by the snapshot
//! generation and the normalised query, so a commit to the index
//! invalidates every earlier entry. Uses [`moka`] for async-friendly
//! caching with configurable TTL and automatic eviction. Each engine owns
//! its own cache.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use moka::future::Cache;

use crate::orchestrator::candidates::normalize_term;
use crate::types::{FusedResult, Query};

/// Maximum number of cached answers per engine.
const MAX_CACHE_ENTRIES: u64 = 100;

/// Composite cache key: snapshot generation + normalised query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    generation: u64,
    /// Lowercased, trimmed phrase.
    phrase: String,
    /// Hash of the sorted field set, so `[title, content]` and
    /// `[content, title]` share an entry.
    field_hash: u64,
    key_field: String,
    max_results: usize,
}

impl CacheKey {
    /// Build a deterministic cache key for `query` against a snapshot of
    /// the given generation.
    pub fn new(generation: u64, query: &Query) -> Self {
        Self {
            generation,
            phrase: normalize_term(query.phrase()),
            field_hash: hash_fields(query.fields()),
            key_field: query.key_field().to_string(),
            max_results: query.max_results(),
        }
    }
}

/// TTL cache of fused answers.
#[derive(Debug, Clone)]
pub struct ResultCache {
    inner: Cache<CacheKey, Vec<FusedResult>>,
}

impl ResultCache {
    /// Create a cache whose entries expire after `ttl_seconds`.
    ///
    /// Returns `None` when `ttl_seconds` is 0, meaning caching is disabled.
    pub fn new(ttl_seconds: u64) -> Option<Self> {
        if ttl_seconds == 0 {
            return None;
        }
        let inner = Cache::builder()
            .max_capacity(MAX_CACHE_ENTRIES)
            .time_to_live(Duration::from_secs(ttl_seconds))
            .build();
        Some(Self { inner })
    }

    /// Look up cached results for the given key.
    ///
    /// Returns `Some(results)` on cache hit, `None` on miss.
    pub async fn get(&self, key: &CacheKey) -> Option<Vec<FusedResult>> {
        self.inner.get(key).await
    }

    /// Insert an answer into the cache.
    pub async fn insert(&self, key: CacheKey, results: Vec<FusedResult>) {
        self.inner.insert(key, results).await;
    }

    /// Drop every cached answer.
    pub fn clear(&self) {
        self.inner.invalidate_all();
    }
}

/// Compute a deterministic hash of a set of field names.
///
/// The list is sorted before hashing so that order does not affect the
/// result.
fn hash_fields(fields: &[String]) -> u64 {
    let mut sorted: Vec<&String> = fields.iter().collect();
    sorted.sort();
    let mut hasher = DefaultHasher::new();
    for field in sorted {
        field.hash(&mut hasher);
    }
    hasher.finish()
}
