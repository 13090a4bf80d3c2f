//! Spelling suggestions drawn from the indexed vocabulary.
//!
//! [`SpellDictionary`] is rebuilt from a snapshot's term dictionary for
//! every search session. Each lookup compiles the misspelt term into a
//! Levenshtein DFA (transpositions cost one edit) and runs the vocabulary
//! through it. Matches within [`MAX_EDITS`] are ranked by normalised
//! similarity, then by document frequency, then alphabetically, so the
//! output is deterministic for a given snapshot.

use std::sync::OnceLock;

use levenshtein_automata::{Distance, LevenshteinAutomatonBuilder};

use crate::error::SearchError;
use crate::index::IndexSnapshot;
use crate::types::DictionaryTerm;

/// Default minimum similarity for a suggestion to be returned.
pub const DEFAULT_ACCURACY: f32 = 0.5;

/// Largest edit distance between a term and any of its suggestions.
pub const MAX_EDITS: u8 = 2;

/// A source of spelling corrections.
pub trait SuggestionSource: Send + Sync {
    /// Return up to `k` corrections for `term`, best first.
    ///
    /// An empty or uninitialised source returns an empty list; it never fails.
    fn suggest(&self, term: &str, k: usize) -> Vec<String>;
}

/// A suggestion source that never suggests anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSuggestions;

impl SuggestionSource for NoSuggestions {
    fn suggest(&self, _term: &str, _k: usize) -> Vec<String> {
        Vec::new()
    }
}

/// Vocabulary of one indexed field, queried by edit similarity.
#[derive(Debug, Clone)]
pub struct SpellDictionary {
    /// Sorted by text, unique.
    terms: Vec<DictionaryTerm>,
    accuracy: f32,
}

impl Default for SpellDictionary {
    fn default() -> Self {
        Self {
            terms: Vec::new(),
            accuracy: DEFAULT_ACCURACY,
        }
    }
}

impl SpellDictionary {
    /// Build a dictionary from an arbitrary term list. Duplicate texts are
    /// merged by summing their frequencies.
    pub fn new(mut terms: Vec<DictionaryTerm>) -> Self {
        terms.sort_by(|a, b| a.text.cmp(&b.text));
        let mut merged: Vec<DictionaryTerm> = Vec::with_capacity(terms.len());
        for term in terms {
            match merged.last_mut() {
                Some(last) if last.text == term.text => last.doc_freq += term.doc_freq,
                _ => merged.push(term),
            }
        }
        Self {
            terms: merged,
            accuracy: DEFAULT_ACCURACY,
        }
    }

    /// Build a dictionary from the indexed terms of `field` in `snapshot`.
    pub fn from_snapshot<S: IndexSnapshot>(snapshot: &S, field: &str) -> Result<Self, SearchError> {
        let terms = snapshot.field_terms(field)?;
        tracing::debug!(field, terms = terms.len(), "spell dictionary built");
        Ok(Self::new(terms))
    }

    /// Override the minimum similarity (0.0–1.0) a suggestion must reach.
    pub fn with_accuracy(mut self, accuracy: f32) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if the dictionary holds no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns `true` if `term` is in the vocabulary verbatim.
    pub fn contains(&self, term: &str) -> bool {
        self.terms
            .binary_search_by(|t| t.text.as_str().cmp(term))
            .is_ok()
    }
}

impl SuggestionSource for SpellDictionary {
    /// A term already present in the vocabulary is its own only suggestion.
    fn suggest(&self, term: &str, k: usize) -> Vec<String> {
        if k == 0 || term.is_empty() || self.terms.is_empty() {
            return Vec::new();
        }
        if self.contains(term) {
            return vec![term.to_string()];
        }

        let dfa = automaton_builder().build_dfa(term);
        let term_len = term.chars().count();
        let mut scored: Vec<(f32, &DictionaryTerm)> = self
            .terms
            .iter()
            .filter_map(|candidate| {
                let candidate_len = candidate.text.chars().count();
                if term_len.abs_diff(candidate_len) > usize::from(MAX_EDITS) {
                    return None;
                }
                let Distance::Exact(distance) = dfa.eval(candidate.text.as_str()) else {
                    return None;
                };
                let similarity = similarity(distance, term_len, candidate_len);
                (similarity >= self.accuracy).then_some((similarity, candidate))
            })
            .collect();

        scored.sort_by(|a, b| {
            b.0.total_cmp(&a.0)
                .then_with(|| b.1.doc_freq.cmp(&a.1.doc_freq))
                .then_with(|| a.1.text.cmp(&b.1.text))
        });
        scored
            .into_iter()
            .take(k)
            .map(|(_, candidate)| candidate.text.clone())
            .collect()
    }
}

/// Shared automaton builder; building one precomputes the parametric DFA.
fn automaton_builder() -> &'static LevenshteinAutomatonBuilder {
    static BUILDER: OnceLock<LevenshteinAutomatonBuilder> = OnceLock::new();
    BUILDER.get_or_init(|| LevenshteinAutomatonBuilder::new(MAX_EDITS, true))
}

/// `1 - distance / longer_length`, in `0.0..=1.0`.
fn similarity(distance: u8, a_len: usize, b_len: usize) -> f32 {
    let longest = a_len.max(b_len);
    if longest == 0 {
        return 1.0;
    }
    1.0 - f32::from(distance) / longest as f32
}
