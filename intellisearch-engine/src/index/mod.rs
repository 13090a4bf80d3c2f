//! Trait seam for the full-text index consumed by the search pipeline.
//!
//! The pipeline never touches storage directly: it opens a read-only
//! [`IndexSnapshot`] through [`SearchIndex`] and issues capped, multi-field
//! queries against it. [`TantivyIndex`] is the bundled implementation.

pub mod tantivy_index;

pub use tantivy_index::{FieldKind, IndexLayout, RecordWriter, TantivyIndex, TantivySnapshot};

use crate::error::SearchError;
use crate::types::{DictionaryTerm, DocHandle};

/// A searchable index that can hand out consistent read-only snapshots.
pub trait SearchIndex: Send + Sync {
    /// Snapshot type produced by [`SearchIndex::open_reader`].
    type Snapshot: IndexSnapshot;

    /// Open a reader over the latest committed state.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::IndexUnavailable`] if no reader can be opened.
    fn open_reader(&self) -> Result<Self::Snapshot, SearchError>;
}

/// A point-in-time, read-only view of an index.
///
/// Snapshots are cheap to clone and are shared with blocking worker tasks,
/// so every call must be safe to run concurrently.
pub trait IndexSnapshot: Clone + Send + Sync + 'static {
    /// Identifies the committed state this snapshot reads. Two snapshots
    /// with the same generation return identical answers.
    fn generation(&self) -> u64;

    /// Returns `true` if the index schema declares `field`.
    fn has_field(&self, field: &str) -> bool;

    /// Parse `term` against the union of `fields` and return at most `cap`
    /// hits, best score first.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::MalformedQuery`] if `term` cannot be parsed or
    /// names an unknown field, and [`SearchError::Index`] for read failures.
    fn query(
        &self,
        term: &str,
        fields: &[String],
        cap: usize,
    ) -> Result<Vec<(DocHandle, f32)>, SearchError>;

    /// Read a stored field of a matched document. `Ok(None)` means the
    /// document has no value for `field`.
    fn stored_field(&self, handle: DocHandle, field: &str) -> Result<Option<String>, SearchError>;

    /// All indexed terms of `field` with their document frequencies, sorted
    /// by text. An unknown or unindexed field yields an empty list.
    fn field_terms(&self, field: &str) -> Result<Vec<DictionaryTerm>, SearchError>;
}
