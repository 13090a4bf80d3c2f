//! # intellisearch-engine
//!
//! Query expansion and result fusion over a full-text index.
//!
//! Given a raw phrase, the engine derives spelling-corrected candidate
//! terms from the indexed vocabulary, runs one capped retrieval pass per
//! candidate, merges the ranked lists by score and collapses hits that
//! share a key (for example a domain name extracted from a stored URL).
//!
//! ## Design
//!
//! - Index access goes through the [`SearchIndex`] / [`IndexSnapshot`]
//!   traits; [`TantivyIndex`] is the bundled implementation
//! - Per-term retrievals run concurrently on the blocking pool, each with
//!   its own deadline; fusion order never depends on completion order
//! - Malformed candidates and timeouts only drop that candidate
//! - Optional per-engine TTL cache keyed by index generation
//! - Query text is logged only at trace level
//!
//! ## Example
//!
//! ```no_run
//! use intellisearch_engine::{Engine, IndexLayout, Language, SearchConfig, TantivyIndex};
//!
//! # async fn example() -> intellisearch_engine::Result<()> {
//! let layout = IndexLayout::new().text("title").keyword("domain");
//! let index = TantivyIndex::create_in_ram(&layout, Language::English)?;
//! let mut writer = index.writer(15_000_000)?;
//! writer.add_record(&[("title", "Apache Software Foundation"), ("domain", "https://www.apache.org")])?;
//! writer.commit()?;
//!
//! let engine = Engine::new(index, SearchConfig::default())?;
//! let keys = engine.search("apache", &["title"], "domain", 10).await?;
//! assert_eq!(keys, vec!["www.apache.org"]);
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod orchestrator;
pub mod suggest;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use analyzer::Analyzer;
pub use config::SearchConfig;
pub use engine::{Engine, SearchSession};
pub use error::{Result, SearchError};
pub use index::{
    FieldKind, IndexLayout, IndexSnapshot, RecordWriter, SearchIndex, TantivyIndex,
    TantivySnapshot,
};
pub use orchestrator::candidates::generate;
pub use orchestrator::fusion::fuse;
pub use orchestrator::key::{extract_key, KeyExtractor};
pub use orchestrator::retrieve::retrieve;
pub use suggest::{NoSuggestions, SpellDictionary, SuggestionSource};
pub use types::{DictionaryTerm, DocHandle, FusedResult, Language, Query, ScoredResult};
