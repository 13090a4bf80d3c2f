//! Per-term retrieval against an index snapshot.

use std::time::Duration;

use crate::error::SearchError;
use crate::index::IndexSnapshot;
use crate::types::ScoredResult;

/// Run one candidate term as a multi-field query and tag every hit with it.
///
/// At most `cap` hits are returned, best score first, exactly as the index
/// ranked them.
///
/// # Errors
///
/// Returns [`SearchError::MalformedQuery`] if the term cannot be parsed, or
/// whatever read error the snapshot reports.
pub fn retrieve<S: IndexSnapshot>(
    term: &str,
    fields: &[String],
    cap: usize,
    snapshot: &S,
) -> Result<Vec<ScoredResult>, SearchError> {
    let hits = snapshot.query(term, fields, cap)?;
    Ok(hits
        .into_iter()
        .map(|(handle, score)| ScoredResult {
            handle,
            score,
            source_term: term.to_string(),
        })
        .collect())
}

/// [`retrieve`] on the blocking pool, bounded by `deadline`.
///
/// # Errors
///
/// Returns [`SearchError::Timeout`] if the deadline elapses first. The
/// blocking query is left to finish on its own; its result is discarded.
pub async fn retrieve_with_deadline<S: IndexSnapshot>(
    term: String,
    fields: Vec<String>,
    cap: usize,
    snapshot: S,
    deadline: Duration,
) -> Result<Vec<ScoredResult>, SearchError> {
    let label = term.clone();
    let task = tokio::task::spawn_blocking(move || retrieve(&term, &fields, cap, &snapshot));

    match tokio::time::timeout(deadline, task).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(join_err)) => Err(SearchError::Index(format!(
            "retrieval task for {label:?} failed: {join_err}"
        ))),
        Err(_) => Err(SearchError::Timeout(format!(
            "{label:?} exceeded {}ms",
            deadline.as_millis()
        ))),
    }
}
