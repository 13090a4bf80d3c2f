//! In-memory snapshot with scripted hits for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use crate::error::SearchError;
use crate::index::{IndexSnapshot, SearchIndex};
use crate::types::{DictionaryTerm, DocHandle};

#[derive(Debug, Clone, Default)]
pub(crate) struct MockSnapshot {
    hits: Arc<HashMap<String, Vec<(DocHandle, f32)>>>,
    keys: Arc<HashMap<DocHandle, String>>,
    terms: Arc<Vec<DictionaryTerm>>,
    malformed: Arc<HashSet<String>>,
    slow: Arc<HashSet<String>>,
    /// `None` accepts every field name.
    fields: Option<Arc<HashSet<String>>>,
    generation: u64,
}

impl MockSnapshot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Script the hits for `term`, one per `(doc, raw key, score)`.
    pub(crate) fn with_hits(mut self, term: &str, hits: &[(u32, &str, f32)]) -> Self {
        let mut scripted = (*self.hits).clone();
        let mut keys = (*self.keys).clone();
        let list = scripted.entry(term.to_string()).or_default();
        for &(doc, raw_key, score) in hits {
            let handle = DocHandle::new(0, doc);
            list.push((handle, score));
            if !raw_key.is_empty() {
                keys.insert(handle, raw_key.to_string());
            }
        }
        self.hits = Arc::new(scripted);
        self.keys = Arc::new(keys);
        self
    }

    pub(crate) fn with_terms(mut self, terms: &[(&str, u64)]) -> Self {
        self.terms = Arc::new(
            terms
                .iter()
                .map(|&(text, doc_freq)| DictionaryTerm {
                    text: text.to_string(),
                    doc_freq,
                })
                .collect(),
        );
        self
    }

    pub(crate) fn with_malformed(mut self, term: &str) -> Self {
        let mut malformed = (*self.malformed).clone();
        malformed.insert(term.to_string());
        self.malformed = Arc::new(malformed);
        self
    }

    pub(crate) fn with_slow(mut self, term: &str) -> Self {
        let mut slow = (*self.slow).clone();
        slow.insert(term.to_string());
        self.slow = Arc::new(slow);
        self
    }

    pub(crate) fn with_fields(mut self, fields: &[&str]) -> Self {
        self.fields = Some(Arc::new(fields.iter().map(|f| f.to_string()).collect()));
        self
    }

    pub(crate) fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }
}

impl IndexSnapshot for MockSnapshot {
    fn generation(&self) -> u64 {
        self.generation
    }

    fn has_field(&self, field: &str) -> bool {
        self.fields
            .as_ref()
            .is_none_or(|fields| fields.contains(field))
    }

    fn query(
        &self,
        term: &str,
        _fields: &[String],
        cap: usize,
    ) -> Result<Vec<(DocHandle, f32)>, SearchError> {
        if self.malformed.contains(term) {
            return Err(SearchError::MalformedQuery(term.to_string()));
        }
        if self.slow.contains(term) {
            std::thread::sleep(Duration::from_millis(300));
        }
        let mut hits = self.hits.get(term).cloned().unwrap_or_default();
        hits.truncate(cap);
        Ok(hits)
    }

    fn stored_field(&self, handle: DocHandle, _field: &str) -> Result<Option<String>, SearchError> {
        Ok(self.keys.get(&handle).cloned())
    }

    fn field_terms(&self, _field: &str) -> Result<Vec<DictionaryTerm>, SearchError> {
        Ok((*self.terms).clone())
    }
}

/// Index handing out a fixed snapshot, or failing to open.
#[derive(Debug, Clone)]
pub(crate) struct MockIndex {
    pub(crate) snapshot: Option<MockSnapshot>,
}

impl SearchIndex for MockIndex {
    type Snapshot = MockSnapshot;

    fn open_reader(&self) -> Result<MockSnapshot, SearchError> {
        self.snapshot
            .clone()
            .ok_or_else(|| SearchError::IndexUnavailable("mock index closed".into()))
    }
}
