//! Core types for queries, scored hits and fused answers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SearchError;

/// A validated search request.
///
/// Immutable once constructed: `fields` is non-empty (duplicates collapsed,
/// first occurrence kept) and `max_results` is at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    phrase: String,
    fields: Vec<String>,
    key_field: String,
    max_results: usize,
}

impl Query {
    /// Build a query, rejecting an empty field list or a zero result cap.
    pub fn new<I, S>(
        phrase: impl Into<String>,
        fields: I,
        key_field: impl Into<String>,
        max_results: usize,
    ) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into();
            if !unique.contains(&field) {
                unique.push(field);
            }
        }
        if unique.is_empty() {
            return Err(SearchError::Config(
                "at least one search field is required".into(),
            ));
        }
        if max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        let key_field = key_field.into();
        if key_field.is_empty() {
            return Err(SearchError::Config("key_field must not be empty".into()));
        }
        Ok(Self {
            phrase: phrase.into(),
            fields: unique,
            key_field,
            max_results,
        })
    }

    /// The raw phrase as typed by the caller.
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Fields searched for every candidate term (OR semantics).
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Stored field whose value is turned into the result key.
    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    /// Maximum number of keys in the answer.
    pub fn max_results(&self) -> usize {
        self.max_results
    }
}

/// Opaque reference to a matched document inside one index snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocHandle {
    /// Segment ordinal within the snapshot.
    pub segment: u32,
    /// Document id within the segment.
    pub doc: u32,
}

impl DocHandle {
    /// Create a handle from its raw parts.
    pub fn new(segment: u32, doc: u32) -> Self {
        Self { segment, doc }
    }
}

impl fmt::Display for DocHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.segment, self.doc)
    }
}

/// One hit from a single candidate term's retrieval pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredResult {
    /// The matched document.
    pub handle: DocHandle,
    /// Relevance score assigned by the index (higher is better).
    pub score: f32,
    /// Candidate term that produced this hit. Diagnostic only.
    pub source_term: String,
}

/// A deduplicated entry of the final answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedResult {
    /// Key extracted from the document's stored key field.
    pub key: String,
    /// Highest score seen for this key across all candidate terms.
    pub best_score: f32,
    /// Candidate term that produced the best-scoring hit.
    pub source_term: String,
}

/// A term from an indexed field together with its document frequency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryTerm {
    /// The indexed (analysed) term text.
    pub text: String,
    /// Number of documents containing the term.
    pub doc_freq: u64,
}

/// Analyzer language applied at index and query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English stop words and Porter stemming.
    #[default]
    English,
    /// Russian stop words and Snowball stemming.
    Russian,
}

impl Language {
    /// Returns the lowercase name of this language.
    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Russian => "russian",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
