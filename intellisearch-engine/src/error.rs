//! Error types for the intellisearch-engine crate.
//!
//! All errors carry stable string messages suitable for display to users
//! and programmatic handling. Only [`SearchError::IndexUnavailable`] and
//! configuration errors ever escape a search call; the other variants are
//! classified and absorbed by the orchestrator.

/// Errors that can occur while indexing or searching.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A candidate term could not be parsed as a structured query.
    #[error("malformed query: {0}")]
    MalformedQuery(String),

    /// The configured key field is absent on a matched document.
    #[error("missing stored field: {0}")]
    MissingStoredField(String),

    /// The index reader could not be opened.
    #[error("index unavailable: {0}")]
    IndexUnavailable(String),

    /// Any other failure reported by the underlying index.
    #[error("index error: {0}")]
    Index(String),

    /// A retrieval pass did not finish before its deadline.
    #[error("retrieval timed out: {0}")]
    Timeout(String),

    /// Invalid query or engine configuration.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error while preparing an on-disk index.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for intellisearch-engine results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_malformed_query() {
        let err = SearchError::MalformedQuery("\"open source".into());
        assert_eq!(err.to_string(), "malformed query: \"open source");
    }

    #[test]
    fn display_missing_stored_field() {
        let err = SearchError::MissingStoredField("domain".into());
        assert_eq!(err.to_string(), "missing stored field: domain");
    }

    #[test]
    fn display_index_unavailable() {
        let err = SearchError::IndexUnavailable("meta.json not found".into());
        assert_eq!(err.to_string(), "index unavailable: meta.json not found");
    }

    #[test]
    fn display_timeout() {
        let err = SearchError::Timeout("exceeded 5000ms".into());
        assert_eq!(err.to_string(), "retrieval timed out: exceeded 5000ms");
    }

    #[test]
    fn display_config() {
        let err = SearchError::Config("max_results must be greater than 0".into());
        assert_eq!(
            err.to_string(),
            "config error: max_results must be greater than 0"
        );
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: SearchError = io.into();
        assert!(err.to_string().starts_with("I/O error"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
