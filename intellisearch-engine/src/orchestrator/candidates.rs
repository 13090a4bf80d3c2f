//! Candidate term generation: the phrase plus its spelling corrections.

use crate::suggest::SuggestionSource;

/// Normalise a phrase or suggestion for matching and deduplication.
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Expand `phrase` into an ordered, duplicate-free list of search terms.
///
/// The normalised phrase always comes first, followed by up to `limit`
/// suggestions from `dictionary` in the order it returned them. An empty
/// dictionary yields just the phrase.
pub fn generate<D>(phrase: &str, dictionary: &D, limit: usize) -> Vec<String>
where
    D: SuggestionSource + ?Sized,
{
    let phrase = normalize_term(phrase);
    let mut candidates = vec![phrase.clone()];
    if limit == 0 {
        return candidates;
    }

    for suggestion in dictionary.suggest(&phrase, limit) {
        let suggestion = normalize_term(&suggestion);
        if !suggestion.is_empty() && !candidates.contains(&suggestion) {
            candidates.push(suggestion);
        }
    }

    tracing::debug!(count = candidates.len(), "candidate terms generated");
    candidates
}
