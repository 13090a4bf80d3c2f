//! Result key extraction from raw stored field values.
//!
//! A stored value such as `https://www.apache.org` is split on a delimiter
//! pattern and the final segment becomes the key used for deduplication
//! and output.

use regex::Regex;

use crate::error::SearchError;

/// Pre-compiled delimiter pattern for turning stored values into keys.
#[derive(Debug, Clone)]
pub struct KeyExtractor {
    delimiter: Regex,
}

impl KeyExtractor {
    /// Compile `pattern` as a regular expression.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the pattern is invalid or can
    /// match the empty string.
    pub fn new(pattern: &str) -> Result<Self, SearchError> {
        let delimiter = Regex::new(pattern)
            .map_err(|e| SearchError::Config(format!("invalid key delimiter {pattern:?}: {e}")))?;
        if delimiter.is_match("") {
            return Err(SearchError::Config(format!(
                "key delimiter {pattern:?} must not match the empty string"
            )));
        }
        Ok(Self { delimiter })
    }

    /// The delimiter pattern as written.
    pub fn pattern(&self) -> &str {
        self.delimiter.as_str()
    }

    /// Return the segment after the last delimiter match.
    ///
    /// Input without a match is returned unchanged; empty input yields an
    /// empty key.
    ///
    /// # Examples
    ///
    /// ```
    /// use intellisearch_engine::orchestrator::key::KeyExtractor;
    ///
    /// let extractor = KeyExtractor::new("//").unwrap();
    /// assert_eq!(extractor.extract("https://www.apache.org"), "www.apache.org");
    /// ```
    pub fn extract<'a>(&self, raw: &'a str) -> &'a str {
        self.delimiter.split(raw).last().unwrap_or_default()
    }
}

/// One-shot form of [`KeyExtractor::extract`].
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `pattern` is not a usable delimiter.
pub fn extract_key(raw: &str, pattern: &str) -> Result<String, SearchError> {
    Ok(KeyExtractor::new(pattern)?.extract(raw).to_string())
}
