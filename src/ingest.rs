//! Building indexes from the bundled example corpus or a directory of
//! text files.
//!
//! Each `*.txt` file becomes one record: the first line is the title, the
//! second line is the content and the file path is stored as `filename`.
//! Files are decoded with the configured encoding (UTF-8 or a legacy code
//! page such as windows-1251). Files that do not fit that shape are skipped and counted in the
//! [`IngestReport`]; they never abort ingestion.

use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use intellisearch_engine::{IndexLayout, RecordWriter};

use crate::error::{AppError, Result};

/// Counters for one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Records added to the index.
    pub indexed: usize,
    /// Files with fewer than two lines.
    pub skipped_short: usize,
    /// Files that do not decode in the configured encoding.
    pub skipped_encoding: usize,
    /// Files that could not be read.
    pub skipped_unreadable: usize,
}

impl IngestReport {
    /// Total files skipped for any reason.
    pub fn skipped(&self) -> usize {
        self.skipped_short + self.skipped_encoding + self.skipped_unreadable
    }
}

/// Layout for text-file corpora: stored path, analysed title and content.
pub fn news_layout() -> IndexLayout {
    IndexLayout::new()
        .stored("filename")
        .text("title")
        .text("content")
}

/// Layout of the bundled example corpus: analysed title, keyword domain.
pub fn example_layout() -> IndexLayout {
    IndexLayout::new().text("title").keyword("domain")
}

/// The three-record example corpus as `(title, domain)` pairs.
pub fn example_corpus() -> [(&'static str, &'static str); 3] {
    [
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
    ]
}

/// Replace the writer's index contents with the example corpus and commit.
///
/// The index must use [`example_layout`].
///
/// # Errors
///
/// Returns an error if a record cannot be added or the commit fails.
pub fn index_example_corpus(writer: &mut RecordWriter) -> Result<IngestReport> {
    writer.clear()?;
    let mut report = IngestReport::default();
    for (title, domain) in example_corpus() {
        writer.add_record(&[("title", title), ("domain", domain)])?;
        report.indexed += 1;
    }
    writer.commit()?;
    tracing::info!(indexed = report.indexed, "example corpus indexed");
    Ok(report)
}

/// Add every `*.txt` file directly inside `dir`, decoded as `encoding`,
/// and commit.
///
/// Files are visited in path order. Ingestion stops once `limit` records
/// have been indexed. A leading byte-order mark is dropped. The index must
/// use [`news_layout`].
///
/// # Errors
///
/// Returns [`AppError::Ingest`] if `dir` cannot be listed, or an index
/// error if a record cannot be added or the commit fails.
pub fn load_text_directory(
    writer: &mut RecordWriter,
    dir: &Path,
    limit: Option<usize>,
    encoding: &'static Encoding,
) -> Result<IngestReport> {
    let files = text_files(dir)?;
    let limit = limit.unwrap_or(usize::MAX);
    let mut report = IngestReport::default();

    for path in files {
        if report.indexed >= limit {
            break;
        }
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
                report.skipped_unreadable += 1;
                continue;
            }
        };
        let (text, had_errors) = encoding.decode_with_bom_removal(&bytes);
        if had_errors {
            tracing::warn!(
                path = %path.display(),
                encoding = encoding.name(),
                "skipping file that does not decode"
            );
            report.skipped_encoding += 1;
            continue;
        }
        let mut lines = text.lines();
        let (Some(title), Some(content)) = (lines.next(), lines.next()) else {
            tracing::warn!(path = %path.display(), "skipping file with fewer than two lines");
            report.skipped_short += 1;
            continue;
        };

        let filename = path.to_string_lossy();
        writer.add_record(&[
            ("filename", filename.as_ref()),
            ("title", title),
            ("content", content),
        ])?;
        report.indexed += 1;
    }

    writer.commit()?;
    tracing::info!(
        indexed = report.indexed,
        skipped = report.skipped(),
        dir = %dir.display(),
        encoding = encoding.name(),
        "directory indexed"
    );
    Ok(report)
}

/// `*.txt` files directly inside `dir`, sorted by path.
fn text_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| AppError::Ingest(format!("cannot read {}: {e}", dir.display())))?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();
    Ok(files)
}
