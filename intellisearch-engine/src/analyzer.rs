//! Language-specific text analysis shared by indexing and querying.
//!
//! The same pipeline (tokenize, drop over-long tokens, lowercase, remove
//! stop words, stem) is registered on every index under [`ANALYZER_NAME`],
//! so documents and query terms are normalised identically.

use tantivy::tokenizer::{
    Language as StemLanguage, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer,
    StopWordFilter, TextAnalyzer, TokenStream,
};

use crate::types::Language;

/// Name under which the analyzer is registered on an index.
pub const ANALYZER_NAME: &str = "intellisearch";

/// Tokens longer than this many bytes are dropped.
const MAX_TOKEN_LEN: usize = 40;

impl From<Language> for StemLanguage {
    fn from(language: Language) -> Self {
        match language {
            Language::English => StemLanguage::English,
            Language::Russian => StemLanguage::Russian,
        }
    }
}

/// A reusable text analyzer for one language.
#[derive(Clone)]
pub struct Analyzer {
    language: Language,
    inner: TextAnalyzer,
}

impl Analyzer {
    /// Build the analysis pipeline for `language`.
    pub fn new(language: Language) -> Self {
        let stop_words = StopWordFilter::new(language.into())
            .unwrap_or_else(|| StopWordFilter::remove(Vec::<String>::new()));
        let inner = TextAnalyzer::builder(SimpleTokenizer::default())
            .filter(RemoveLongFilter::limit(MAX_TOKEN_LEN))
            .filter(LowerCaser)
            .filter(stop_words)
            .filter(Stemmer::new(language.into()))
            .build();
        Self { language, inner }
    }

    /// The language this analyzer was built for.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Run `text` through the pipeline and collect the resulting tokens.
    pub fn analyze(&mut self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut stream = self.inner.token_stream(text);
        stream.process(&mut |token| tokens.push(token.text.clone()));
        tokens
    }

    /// The underlying tantivy analyzer, for registration on an index.
    pub fn text_analyzer(&self) -> TextAnalyzer {
        self.inner.clone()
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}
