//! Error types for the intellisearch application.

use intellisearch_engine::SearchError;

/// Top-level error type for indexing and searching from the application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Failure reported by the search engine or its index.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Configuration file could not be parsed or written.
    #[error("config error: {0}")]
    Config(String),

    /// Source directory problem during ingestion.
    #[error("ingest error: {0}")]
    Ingest(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AppError>;
