//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls candidate expansion, per-term retrieval
//! bounds, key extraction and caching. The defaults reproduce the
//! reference behaviour: five spelling suggestions per phrase and ten keys
//! per answer.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Configuration for a search engine instance.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of keys returned when the caller does not specify a limit.
    pub max_results: usize,
    /// Maximum number of spelling suggestions added to the original phrase.
    /// Set to 0 to search the phrase alone.
    pub suggestion_limit: usize,
    /// Indexed field whose terms feed the spelling dictionary.
    pub suggestion_field: String,
    /// Minimum normalised edit similarity (0.0–1.0) for a suggestion.
    pub suggestion_accuracy: f32,
    /// Regex pattern splitting a stored value; the last segment is the key.
    pub key_delimiter: String,
    /// Hits requested per candidate term. `None` uses the query's
    /// `max_results`.
    pub per_term_cap: Option<usize>,
    /// Deadline for a single candidate's retrieval pass in milliseconds.
    /// A term that misses it contributes zero results.
    pub retrieval_timeout_ms: u64,
    /// How long to cache final answers in seconds. Set to 0 to disable caching.
    pub cache_ttl_seconds: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            suggestion_limit: 5,
            suggestion_field: "content".into(),
            suggestion_accuracy: 0.5,
            key_delimiter: "//".into(),
            per_term_cap: None,
            retrieval_timeout_ms: 5_000,
            cache_ttl_seconds: 0,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `max_results` must be greater than 0
    /// - `per_term_cap`, when set, must be greater than 0
    /// - `retrieval_timeout_ms` must be greater than 0
    /// - `key_delimiter` must not be empty
    /// - `suggestion_accuracy` must lie within `0.0..=1.0`
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if self.per_term_cap == Some(0) {
            return Err(SearchError::Config(
                "per_term_cap must be greater than 0 when set".into(),
            ));
        }
        if self.retrieval_timeout_ms == 0 {
            return Err(SearchError::Config(
                "retrieval_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.key_delimiter.is_empty() {
            return Err(SearchError::Config("key_delimiter must not be empty".into()));
        }
        if !(0.0..=1.0).contains(&self.suggestion_accuracy) {
            return Err(SearchError::Config(
                "suggestion_accuracy must be between 0.0 and 1.0".into(),
            ));
        }
        Ok(())
    }

    /// Hits to request per candidate term for a query capped at `max_results`.
    pub fn per_term_cap_for(&self, max_results: usize) -> usize {
        self.per_term_cap.unwrap_or(max_results)
    }
}
