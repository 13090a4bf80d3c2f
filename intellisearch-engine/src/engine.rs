//! Search entry point.
//!
//! An [`Engine`] owns the index handle, configuration, compiled key
//! extractor and result cache. Each search opens a [`SearchSession`]: a
//! read-only snapshot plus the spelling dictionary built from it, so every
//! candidate term of one query sees the same index state.

use crate::cache::{CacheKey, ResultCache};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::index::{IndexSnapshot, SearchIndex};
use crate::orchestrator::key::KeyExtractor;
use crate::orchestrator::search::orchestrate_search;
use crate::suggest::SpellDictionary;
use crate::types::{FusedResult, Query};

/// Query-expansion and fusion engine over one index.
pub struct Engine<I: SearchIndex> {
    index: I,
    config: SearchConfig,
    extractor: KeyExtractor,
    cache: Option<ResultCache>,
}

impl<I: SearchIndex> Engine<I> {
    /// Create an engine over `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` fails validation or its
    /// key delimiter is not a usable pattern.
    pub fn new(index: I, config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let extractor = KeyExtractor::new(&config.key_delimiter)?;
        let cache = ResultCache::new(config.cache_ttl_seconds);
        Ok(Self {
            index,
            config,
            extractor,
            cache,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The underlying index.
    pub fn index(&self) -> &I {
        &self.index
    }

    /// Open a session over the latest committed index state.
    ///
    /// The spelling dictionary is rebuilt from the snapshot. If that fails
    /// the session falls back to an empty dictionary, which searches the
    /// phrase alone.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::IndexUnavailable`] if no reader can be opened.
    pub fn session(&self) -> Result<SearchSession<'_, I>, SearchError> {
        let snapshot = self.index.open_reader()?;
        Ok(self.session_for(snapshot))
    }

    fn session_for(&self, snapshot: I::Snapshot) -> SearchSession<'_, I> {
        let dictionary =
            match SpellDictionary::from_snapshot(&snapshot, &self.config.suggestion_field) {
                Ok(dictionary) => dictionary,
                Err(err) => {
                    tracing::warn!(
                        field = %self.config.suggestion_field,
                        error = %err,
                        "spell dictionary unavailable, searching phrases only"
                    );
                    SpellDictionary::default()
                }
            }
            .with_accuracy(self.config.suggestion_accuracy);
        SearchSession {
            engine: self,
            snapshot,
            dictionary,
        }
    }

    /// Search `fields` for `phrase` and return up to `max_results` keys,
    /// best first.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for an invalid query and
    /// [`SearchError::IndexUnavailable`] if the index cannot be read. No
    /// matches is `Ok(vec![])`.
    pub async fn search(
        &self,
        phrase: &str,
        fields: &[&str],
        key_field: &str,
        max_results: usize,
    ) -> Result<Vec<String>, SearchError> {
        let query = Query::new(phrase, fields.iter().copied(), key_field, max_results)?;
        let results = self.search_query(&query).await?;
        Ok(results.into_iter().map(|r| r.key).collect())
    }

    /// [`Engine::search`] capped at the configured `max_results`.
    ///
    /// # Errors
    ///
    /// Same as [`Engine::search`].
    pub async fn search_default(
        &self,
        phrase: &str,
        fields: &[&str],
        key_field: &str,
    ) -> Result<Vec<String>, SearchError> {
        self.search(phrase, fields, key_field, self.config.max_results)
            .await
    }

    /// Answer a prepared query with scores and source terms.
    ///
    /// Answers are served from the cache while the index generation is
    /// unchanged and the TTL has not expired.
    ///
    /// # Errors
    ///
    /// Same as [`Engine::search`].
    pub async fn search_query(&self, query: &Query) -> Result<Vec<FusedResult>, SearchError> {
        let snapshot = self.index.open_reader()?;
        let cache_key = CacheKey::new(snapshot.generation(), query);

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&cache_key).await {
                tracing::debug!(results = cached.len(), "cache hit");
                return Ok(cached);
            }
        }

        let results = self.session_for(snapshot).search_query(query).await?;

        if let Some(cache) = &self.cache {
            cache.insert(cache_key, results.clone()).await;
        }
        Ok(results)
    }
}

impl<I: SearchIndex + std::fmt::Debug> std::fmt::Debug for Engine<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("index", &self.index)
            .field("config", &self.config)
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

/// One read-only view of the index with its spelling dictionary.
///
/// Reuse a session to run several queries against the same snapshot
/// without rebuilding the dictionary. Sessions bypass the result cache.
pub struct SearchSession<'e, I: SearchIndex> {
    engine: &'e Engine<I>,
    snapshot: I::Snapshot,
    dictionary: SpellDictionary,
}

impl<I: SearchIndex> SearchSession<'_, I> {
    /// The snapshot every query of this session reads.
    pub fn snapshot(&self) -> &I::Snapshot {
        &self.snapshot
    }

    /// The dictionary built from the snapshot.
    pub fn dictionary(&self) -> &SpellDictionary {
        &self.dictionary
    }

    /// Same as [`Engine::search`], against this session's snapshot.
    ///
    /// # Errors
    ///
    /// Same as [`Engine::search`].
    pub async fn search(
        &self,
        phrase: &str,
        fields: &[&str],
        key_field: &str,
        max_results: usize,
    ) -> Result<Vec<String>, SearchError> {
        let query = Query::new(phrase, fields.iter().copied(), key_field, max_results)?;
        let results = self.search_query(&query).await?;
        Ok(results.into_iter().map(|r| r.key).collect())
    }

    /// Same as [`Engine::search_query`], against this session's snapshot.
    ///
    /// # Errors
    ///
    /// Same as [`Engine::search`].
    pub async fn search_query(&self, query: &Query) -> Result<Vec<FusedResult>, SearchError> {
        orchestrate_search(
            query,
            &self.snapshot,
            &self.dictionary,
            &self.engine.extractor,
            &self.engine.config,
        )
        .await
    }
}
