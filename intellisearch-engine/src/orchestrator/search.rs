//! Core search pipeline: candidate expansion, concurrent per-term fan-out,
//! fusion and key extraction over a single index snapshot.

use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::index::IndexSnapshot;
use crate::suggest::SuggestionSource;
use crate::types::{FusedResult, Query, ScoredResult};

use super::candidates::generate;
use super::fusion::fuse;
use super::key::KeyExtractor;
use super::retrieve::retrieve_with_deadline;

/// Answer `query` against `snapshot`.
///
/// # Pipeline
///
/// 0. Check that every search field and the key field exist in the index
/// 1. Expand the phrase into candidate terms with `dictionary`
/// 2. Fan out one deadline-bounded retrieval per candidate with
///    [`futures::future::join_all`]; outcomes come back in candidate order
/// 3. Skip malformed candidates and treat timed-out ones as empty, logging
///    both at warn level
/// 4. Fuse the per-term lists on the blocking pool, resolving each hit's
///    key from the stored key field through `extractor`
///
/// # Errors
///
/// Returns [`SearchError::Config`] if a search field or the key field is
/// not part of the index, and [`SearchError::IndexUnavailable`] or
/// [`SearchError::Index`] if the snapshot cannot be read. An empty answer
/// is `Ok(vec![])`.
pub async fn orchestrate_search<S, D>(
    query: &Query,
    snapshot: &S,
    dictionary: &D,
    extractor: &KeyExtractor,
    config: &SearchConfig,
) -> Result<Vec<FusedResult>, SearchError>
where
    S: IndexSnapshot,
    D: SuggestionSource + ?Sized,
{
    tracing::trace!(phrase = query.phrase(), "search started");

    // 0. Field names are checked once; a typo is not a per-term failure.
    for field in query.fields() {
        if !snapshot.has_field(field) {
            return Err(SearchError::Config(format!("unknown search field `{field}`")));
        }
    }
    if !snapshot.has_field(query.key_field()) {
        return Err(SearchError::Config(format!(
            "unknown key field `{}`",
            query.key_field()
        )));
    }

    // 1. Candidate terms, original phrase first.
    let candidates = generate(query.phrase(), dictionary, config.suggestion_limit);
    if candidates.iter().all(|term| term.is_empty()) {
        tracing::debug!("empty phrase, nothing to search");
        return Ok(Vec::new());
    }

    // 2. Fan out retrievals concurrently.
    let cap = config.per_term_cap_for(query.max_results());
    let deadline = Duration::from_millis(config.retrieval_timeout_ms);
    let futures: Vec<_> = candidates
        .iter()
        .map(|term| {
            retrieve_with_deadline(
                term.clone(),
                query.fields().to_vec(),
                cap,
                snapshot.clone(),
                deadline,
            )
        })
        .collect();

    let outcomes = futures::future::join_all(futures).await;

    // 3. Classify outcomes without disturbing candidate order.
    let mut per_term: Vec<Vec<ScoredResult>> = Vec::with_capacity(outcomes.len());
    for (term, outcome) in candidates.iter().zip(outcomes) {
        match outcome {
            Ok(hits) => {
                tracing::debug!(count = hits.len(), "candidate term retrieved");
                tracing::trace!(term = %term, count = hits.len(), "candidate hits");
                per_term.push(hits);
            }
            Err(SearchError::MalformedQuery(reason)) => {
                tracing::warn!(error = %reason, "skipping malformed candidate term");
            }
            Err(SearchError::Timeout(reason)) => {
                tracing::warn!(error = %reason, "candidate term timed out, counting as no results");
            }
            Err(err) => return Err(err),
        }
    }

    // 4. Fuse on the blocking pool, reading the key field lazily for
    // surviving hits only.
    let key_field = query.key_field().to_string();
    let max_results = query.max_results();
    let snapshot = snapshot.clone();
    let extractor = extractor.clone();
    let fused = tokio::task::spawn_blocking(move || {
        fuse(
            per_term,
            |handle| match snapshot.stored_field(handle, &key_field) {
                Ok(Some(raw)) => Some(extractor.extract(&raw).to_string()),
                Ok(None) => {
                    let err = SearchError::MissingStoredField(key_field.clone());
                    tracing::debug!(doc = %handle, error = %err, "skipping result");
                    None
                }
                Err(err) => {
                    tracing::warn!(doc = %handle, error = %err, "could not read key field, skipping result");
                    None
                }
            },
            max_results,
        )
    })
    .await
    .map_err(|e| SearchError::Index(format!("fusion task failed: {e}")))?;

    tracing::debug!(
        candidates = candidates.len(),
        results = fused.len(),
        "search complete"
    );
    Ok(fused)
}
