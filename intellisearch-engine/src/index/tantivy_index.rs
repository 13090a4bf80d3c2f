//! tantivy-backed implementation of [`SearchIndex`].
//!
//! Records are flat lists of named string fields. Each field is declared
//! up front in an [`IndexLayout`] as analysed text, a verbatim keyword, or
//! a stored-only value. Writes go through [`RecordWriter`] and become
//! visible to new snapshots on commit.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::query::QueryParser;
use tantivy::schema::{Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, Value};
use tantivy::{DocAddress, Index, IndexReader, IndexWriter, ReloadPolicy, Searcher, TantivyDocument};

use super::{IndexSnapshot, SearchIndex};
use crate::analyzer::{Analyzer, ANALYZER_NAME};
use crate::error::SearchError;
use crate::types::{DictionaryTerm, DocHandle, Language};

/// tantivy's built-in tokenizer that keeps the whole value as one term.
const RAW_TOKENIZER: &str = "raw";

/// How a field is indexed and stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Analysed full text, searchable and stored.
    Text,
    /// Indexed verbatim as a single term, stored.
    Keyword,
    /// Stored only; not searchable.
    Stored,
}

impl FieldKind {
    fn options(self) -> TextOptions {
        match self {
            Self::Text => TextOptions::default()
                .set_indexing_options(
                    TextFieldIndexing::default()
                        .set_tokenizer(ANALYZER_NAME)
                        .set_index_option(IndexRecordOption::WithFreqsAndPositions),
                )
                .set_stored(),
            Self::Keyword => TextOptions::default()
                .set_indexing_options(
                    TextFieldIndexing::default()
                        .set_tokenizer(RAW_TOKENIZER)
                        .set_index_option(IndexRecordOption::Basic),
                )
                .set_stored(),
            Self::Stored => TextOptions::default().set_stored(),
        }
    }
}

/// Ordered declaration of the fields every record may carry.
#[derive(Debug, Clone, Default)]
pub struct IndexLayout {
    fields: Vec<(String, FieldKind)>,
}

impl IndexLayout {
    /// An empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field of the given kind.
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push((name.into(), kind));
        self
    }

    /// Declare an analysed, stored text field.
    pub fn text(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::Text)
    }

    /// Declare a verbatim, stored keyword field.
    pub fn keyword(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::Keyword)
    }

    /// Declare a stored-only field.
    pub fn stored(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::Stored)
    }

    /// Declared fields in order.
    pub fn fields(&self) -> &[(String, FieldKind)] {
        &self.fields
    }

    fn build_schema(&self) -> Result<Schema, SearchError> {
        if self.fields.is_empty() {
            return Err(SearchError::Config(
                "index layout must declare at least one field".into(),
            ));
        }
        let mut seen = HashSet::new();
        let mut builder = Schema::builder();
        for (name, kind) in &self.fields {
            if name.is_empty() || name.starts_with('-') {
                return Err(SearchError::Config(format!("invalid field name `{name}`")));
            }
            if !seen.insert(name.as_str()) {
                return Err(SearchError::Config(format!("duplicate field `{name}`")));
            }
            builder.add_text_field(name, kind.options());
        }
        Ok(builder.build())
    }
}

/// A full-text index with the language analyzer registered.
#[derive(Clone)]
pub struct TantivyIndex {
    index: Index,
    language: Language,
}

impl TantivyIndex {
    /// Create an empty in-memory index.
    pub fn create_in_ram(layout: &IndexLayout, language: Language) -> Result<Self, SearchError> {
        let schema = layout.build_schema()?;
        Ok(Self::with_analyzer(Index::create_in_ram(schema), language))
    }

    /// Open the index stored in `path`, creating it (and the directory)
    /// when absent.
    ///
    /// # Errors
    ///
    /// Fails if an existing index was built with a different layout.
    pub fn open_or_create(
        path: &Path,
        layout: &IndexLayout,
        language: Language,
    ) -> Result<Self, SearchError> {
        std::fs::create_dir_all(path)?;
        let schema = layout.build_schema()?;
        let directory = MmapDirectory::open(path)
            .map_err(|e| SearchError::Index(format!("{}: {e}", path.display())))?;
        let index = Index::open_or_create(directory, schema)
            .map_err(|e| SearchError::Index(format!("{}: {e}", path.display())))?;
        Ok(Self::with_analyzer(index, language))
    }

    /// Open an existing on-disk index for searching.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::IndexUnavailable`] if `path` holds no index.
    pub fn open_in_dir(path: &Path, language: Language) -> Result<Self, SearchError> {
        let index = Index::open_in_dir(path)
            .map_err(|e| SearchError::IndexUnavailable(format!("{}: {e}", path.display())))?;
        Ok(Self::with_analyzer(index, language))
    }

    fn with_analyzer(index: Index, language: Language) -> Self {
        index
            .tokenizers()
            .register(ANALYZER_NAME, Analyzer::new(language).text_analyzer());
        Self { index, language }
    }

    /// Analyzer language registered on this index.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Names of all fields in the schema, in declaration order.
    pub fn field_names(&self) -> Vec<String> {
        self.index
            .schema()
            .fields()
            .map(|(_, entry)| entry.name().to_string())
            .collect()
    }

    /// Single-threaded writer with the given memory budget.
    pub fn writer(&self, memory_bytes: usize) -> Result<RecordWriter, SearchError> {
        let writer: IndexWriter = self
            .index
            .writer_with_num_threads(1, memory_bytes)
            .map_err(|e| SearchError::Index(e.to_string()))?;
        Ok(RecordWriter {
            writer,
            schema: self.index.schema(),
        })
    }
}

impl std::fmt::Debug for TantivyIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivyIndex")
            .field("language", &self.language)
            .field("fields", &self.field_names())
            .finish()
    }
}

impl SearchIndex for TantivyIndex {
    type Snapshot = TantivySnapshot;

    fn open_reader(&self) -> Result<TantivySnapshot, SearchError> {
        let opstamp = self
            .index
            .load_metas()
            .map_err(|e| SearchError::IndexUnavailable(e.to_string()))?
            .opstamp;
        let reader: IndexReader = self
            .index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| SearchError::IndexUnavailable(e.to_string()))?;
        Ok(TantivySnapshot {
            index: self.index.clone(),
            searcher: reader.searcher(),
            opstamp,
        })
    }
}

/// Adds records to a [`TantivyIndex`].
pub struct RecordWriter {
    writer: IndexWriter,
    schema: Schema,
}

impl RecordWriter {
    /// Queue one record of `(field, value)` pairs. Fields may repeat.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for a field the layout does not declare.
    pub fn add_record(&mut self, values: &[(&str, &str)]) -> Result<(), SearchError> {
        let mut doc = TantivyDocument::default();
        for (name, value) in values {
            let field = self
                .schema
                .get_field(name)
                .map_err(|_| SearchError::Config(format!("unknown field `{name}`")))?;
            doc.add_text(field, value);
        }
        self.writer
            .add_document(doc)
            .map_err(|e| SearchError::Index(e.to_string()))?;
        Ok(())
    }

    /// Queue deletion of every document, including previously committed ones.
    pub fn clear(&mut self) -> Result<(), SearchError> {
        self.writer
            .delete_all_documents()
            .map_err(|e| SearchError::Index(e.to_string()))?;
        Ok(())
    }

    /// Flush queued operations and make them visible to new snapshots.
    /// Returns the commit opstamp.
    pub fn commit(&mut self) -> Result<u64, SearchError> {
        self.writer
            .commit()
            .map_err(|e| SearchError::Index(e.to_string()))
    }
}

/// Read-only view of a [`TantivyIndex`] at one commit.
#[derive(Clone)]
pub struct TantivySnapshot {
    index: Index,
    searcher: Searcher,
    opstamp: u64,
}

impl TantivySnapshot {
    /// Number of live documents visible to this snapshot.
    pub fn num_docs(&self) -> u64 {
        self.searcher.num_docs()
    }

    fn resolve_fields(&self, names: &[String]) -> Result<Vec<Field>, SearchError> {
        let schema = self.searcher.schema();
        names
            .iter()
            .map(|name| {
                schema
                    .get_field(name)
                    .map_err(|_| SearchError::MalformedQuery(format!("unknown field `{name}`")))
            })
            .collect()
    }
}

impl From<DocAddress> for DocHandle {
    fn from(address: DocAddress) -> Self {
        Self::new(address.segment_ord, address.doc_id)
    }
}

impl From<DocHandle> for DocAddress {
    fn from(handle: DocHandle) -> Self {
        DocAddress::new(handle.segment, handle.doc)
    }
}

impl IndexSnapshot for TantivySnapshot {
    fn generation(&self) -> u64 {
        self.opstamp
    }

    fn has_field(&self, field: &str) -> bool {
        self.searcher.schema().get_field(field).is_ok()
    }

    fn query(
        &self,
        term: &str,
        fields: &[String],
        cap: usize,
    ) -> Result<Vec<(DocHandle, f32)>, SearchError> {
        if cap == 0 {
            return Ok(Vec::new());
        }
        let parser = QueryParser::for_index(&self.index, self.resolve_fields(fields)?);
        let query = parser
            .parse_query(term)
            .map_err(|e| SearchError::MalformedQuery(format!("{term:?}: {e}")))?;
        let hits = self
            .searcher
            .search(&*query, &TopDocs::with_limit(cap))
            .map_err(|e| SearchError::Index(e.to_string()))?;
        Ok(hits
            .into_iter()
            .map(|(score, address)| (DocHandle::from(address), score))
            .collect())
    }

    fn stored_field(&self, handle: DocHandle, field: &str) -> Result<Option<String>, SearchError> {
        let Ok(field) = self.searcher.schema().get_field(field) else {
            return Ok(None);
        };
        let doc: TantivyDocument = self
            .searcher
            .doc(handle.into())
            .map_err(|e| SearchError::Index(e.to_string()))?;
        Ok(doc
            .get_first(field)
            .and_then(|value| value.as_str())
            .map(str::to_owned))
    }

    fn field_terms(&self, field: &str) -> Result<Vec<DictionaryTerm>, SearchError> {
        let schema = self.searcher.schema();
        let Ok(field) = schema.get_field(field) else {
            return Ok(Vec::new());
        };
        if !schema.get_field_entry(field).is_indexed() {
            return Ok(Vec::new());
        }

        let mut frequencies: BTreeMap<String, u64> = BTreeMap::new();
        for segment in self.searcher.segment_readers() {
            let inverted = segment
                .inverted_index(field)
                .map_err(|e| SearchError::Index(e.to_string()))?;
            let mut terms = inverted
                .terms()
                .stream()
                .map_err(|e| SearchError::Index(e.to_string()))?;
            while terms.advance() {
                let Ok(text) = std::str::from_utf8(terms.key()) else {
                    continue;
                };
                *frequencies.entry(text.to_owned()).or_default() +=
                    u64::from(terms.value().doc_freq);
            }
        }

        Ok(frequencies
            .into_iter()
            .map(|(text, doc_freq)| DictionaryTerm { text, doc_freq })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_layout() -> IndexLayout {
        IndexLayout::new().text("title").keyword("domain")
    }

    fn reference_index() -> TantivyIndex {
        let index = TantivyIndex::create_in_ram(&reference_layout(), Language::English)
            .expect("create index");
        let mut writer = index.writer(15_000_000).expect("writer");
        for (title, domain) in [
            (
                "The Apache Software Foundation - The world's largest open source foundation.",
                "www.apache.org",
            ),
            (
                "Powerful open source search library for .NET",
                "lucenenet.apache.org",
            ),
            (
                "Unique gifts made by small businesses in North Carolina.",
                "www.giftoasis.com",
            ),
        ] {
            writer
                .add_record(&[("title", title), ("domain", domain)])
                .expect("add record");
        }
        writer.commit().expect("commit");
        index
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn layout_rejects_duplicates() {
        let layout = IndexLayout::new().text("title").keyword("title");
        let err = TantivyIndex::create_in_ram(&layout, Language::English).unwrap_err();
        assert!(err.to_string().contains("duplicate field"));
    }

    #[test]
    fn layout_rejects_empty() {
        assert!(TantivyIndex::create_in_ram(&IndexLayout::new(), Language::English).is_err());
    }

    #[test]
    fn layout_lists_fields_in_order() {
        let layout = IndexLayout::new().stored("filename").text("title").text("content");
        let names: Vec<&str> = layout.fields().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["filename", "title", "content"]);
        assert_eq!(layout.fields()[0].1, FieldKind::Stored);
    }

    #[test]
    fn field_names_follow_layout() {
        let index = reference_index();
        assert_eq!(index.field_names(), vec!["title", "domain"]);
    }

    #[test]
    fn query_matches_analysed_title() {
        let snapshot = reference_index().open_reader().expect("reader");
        assert_eq!(snapshot.num_docs(), 3);
        let hits = snapshot
            .query("open source", &fields(&["title"]), 10)
            .expect("query");
        assert_eq!(hits.len(), 2);
        assert!(hits[0].1 >= hits[1].1);
    }

    #[test]
    fn query_respects_cap() {
        let snapshot = reference_index().open_reader().expect("reader");
        let hits = snapshot
            .query("open source", &fields(&["title"]), 1)
            .expect("query");
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn zero_cap_returns_nothing() {
        let snapshot = reference_index().open_reader().expect("reader");
        let hits = snapshot.query("open", &fields(&["title"]), 0).expect("query");
        assert!(hits.is_empty());
    }

    #[test]
    fn unknown_field_prefix_in_term_is_malformed() {
        let snapshot = reference_index().open_reader().expect("reader");
        let err = snapshot
            .query("nosuchfield:open", &fields(&["title"]), 10)
            .unwrap_err();
        assert!(matches!(err, SearchError::MalformedQuery(_)));
    }

    #[test]
    fn unknown_field_is_malformed() {
        let snapshot = reference_index().open_reader().expect("reader");
        let err = snapshot
            .query("open", &fields(&["body"]), 10)
            .unwrap_err();
        assert!(matches!(err, SearchError::MalformedQuery(_)));
    }

    #[test]
    fn has_field_follows_schema() {
        let snapshot = reference_index().open_reader().expect("reader");
        assert!(snapshot.has_field("title"));
        assert!(snapshot.has_field("domain"));
        assert!(!snapshot.has_field("titel"));
    }

    #[test]
    fn stored_field_reads_back_keyword() {
        let snapshot = reference_index().open_reader().expect("reader");
        let hits = snapshot
            .query("gifts", &fields(&["title"]), 10)
            .expect("query");
        assert_eq!(hits.len(), 1);
        let domain = snapshot.stored_field(hits[0].0, "domain").expect("read");
        assert_eq!(domain.as_deref(), Some("www.giftoasis.com"));
    }

    #[test]
    fn stored_field_unknown_name_is_none() {
        let snapshot = reference_index().open_reader().expect("reader");
        let hits = snapshot.query("gifts", &fields(&["title"]), 10).expect("query");
        let value = snapshot.stored_field(hits[0].0, "filename").expect("read");
        assert!(value.is_none());
    }

    #[test]
    fn field_terms_lists_analysed_vocabulary() {
        let snapshot = reference_index().open_reader().expect("reader");
        let terms = snapshot.field_terms("title").expect("terms");
        let texts: Vec<&str> = terms.iter().map(|t| t.text.as_str()).collect();
        assert!(texts.contains(&"open"));
        assert!(texts.contains(&"sourc"));
        assert!(!texts.contains(&"the"));
        let open = terms.iter().find(|t| t.text == "open").expect("open");
        assert_eq!(open.doc_freq, 2);
        let mut sorted = texts.clone();
        sorted.sort_unstable();
        assert_eq!(texts, sorted);
    }

    #[test]
    fn field_terms_for_missing_field_is_empty() {
        let snapshot = reference_index().open_reader().expect("reader");
        assert!(snapshot.field_terms("content").expect("terms").is_empty());
    }

    #[test]
    fn generation_advances_on_commit() {
        let index = reference_index();
        let before = index.open_reader().expect("reader").generation();
        let mut writer = index.writer(15_000_000).expect("writer");
        writer
            .add_record(&[("title", "another page"), ("domain", "example.org")])
            .expect("add");
        writer.commit().expect("commit");
        let after = index.open_reader().expect("reader");
        assert_ne!(before, after.generation());
        assert_eq!(after.num_docs(), 4);
    }

    #[test]
    fn clear_removes_committed_documents() {
        let index = reference_index();
        let mut writer = index.writer(15_000_000).expect("writer");
        writer.clear().expect("clear");
        writer.commit().expect("commit");
        assert_eq!(index.open_reader().expect("reader").num_docs(), 0);
    }

    #[test]
    fn unknown_field_in_record_rejected() {
        let index = reference_index();
        let mut writer = index.writer(15_000_000).expect("writer");
        let err = writer.add_record(&[("body", "text")]).unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn open_in_dir_missing_is_unavailable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = TantivyIndex::open_in_dir(&dir.path().join("absent"), Language::English)
            .unwrap_err();
        assert!(matches!(err, SearchError::IndexUnavailable(_)));
    }

    #[test]
    fn on_disk_index_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("index");
        {
            let index = TantivyIndex::open_or_create(&path, &reference_layout(), Language::English)
                .expect("create");
            let mut writer = index.writer(15_000_000).expect("writer");
            writer
                .add_record(&[("title", "open source search"), ("domain", "search.example")])
                .expect("add");
            writer.commit().expect("commit");
        }
        let reopened = TantivyIndex::open_in_dir(&path, Language::English).expect("open");
        let snapshot = reopened.open_reader().expect("reader");
        let hits = snapshot
            .query("searching", &fields(&["title"]), 10)
            .expect("query");
        assert_eq!(hits.len(), 1);
    }
}
