//! Index building and engine start-up for the command line.

use std::path::Path;

use intellisearch_engine::{Engine, TantivyIndex};

use crate::config::AppConfig;
use crate::error::Result;
use crate::ingest::{self, IngestReport};

/// Rebuild the on-disk index at `index_dir` from the text files in `source`.
///
/// Existing contents are replaced. At most `limit` files are indexed.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the index cannot be
/// opened, or `source` cannot be listed.
pub fn build_directory_index(
    source: &Path,
    index_dir: &Path,
    config: &AppConfig,
    limit: Option<usize>,
) -> Result<IngestReport> {
    config.validate()?;
    let encoding = config.index.text_encoding()?;
    let index = TantivyIndex::open_or_create(index_dir, &ingest::news_layout(), config.index.language)?;
    let mut writer = index.writer(config.index.writer_memory_bytes)?;
    writer.clear()?;
    ingest::load_text_directory(&mut writer, source, limit, encoding)
}

/// Open an engine over the existing index at `index_dir`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or no index exists.
pub fn open_engine(index_dir: &Path, config: &AppConfig) -> Result<Engine<TantivyIndex>> {
    config.validate()?;
    let index = TantivyIndex::open_in_dir(index_dir, config.index.language)?;
    tracing::info!(dir = %index_dir.display(), fields = ?index.field_names(), "index opened");
    Ok(Engine::new(index, config.search.clone())?)
}

/// Build the example corpus in memory and open an engine over it.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or indexing fails.
pub fn demo_engine(config: &AppConfig) -> Result<Engine<TantivyIndex>> {
    config.validate()?;
    let index = TantivyIndex::create_in_ram(&ingest::example_layout(), config.index.language)?;
    let mut writer = index.writer(config.index.writer_memory_bytes)?;
    ingest::index_example_corpus(&mut writer)?;
    Ok(Engine::new(index, config.search.clone())?)
}
