//! Application configuration loaded from a TOML file.
//!
//! ```toml
//! [search]
//! max_results = 10
//! suggestion_limit = 5
//! suggestion_field = "content"
//!
//! [index]
//! language = "russian"
//! encoding = "windows-1251"
//!
//! [query]
//! fields = ["title", "content"]
//! key_field = "filename"
//! ```

use encoding_rs::Encoding;
use intellisearch_engine::{Language, SearchConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Smallest writer budget tantivy accepts for a single indexing thread.
pub const MIN_WRITER_MEMORY_BYTES: usize = 15_000_000;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Engine settings: suggestions, caps, key delimiter, cache.
    pub search: SearchConfig,
    /// Index settings shared by ingestion and search.
    pub index: IndexSettings,
    /// Defaults for `search` when the command line does not override them.
    pub query: QueryDefaults,
}

/// Index construction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Analyzer language used at index and query time.
    pub language: Language,
    /// Memory budget for the index writer in bytes.
    pub writer_memory_bytes: usize,
    /// WHATWG label of the text-file encoding, e.g. `utf-8` or `windows-1251`.
    pub encoding: String,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            language: Language::English,
            writer_memory_bytes: 50_000_000,
            encoding: "utf-8".into(),
        }
    }
}

impl IndexSettings {
    /// Resolve [`IndexSettings::encoding`] to a decoder.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if the label is not a known encoding.
    pub fn text_encoding(&self) -> Result<&'static Encoding> {
        Encoding::for_label(self.encoding.trim().as_bytes()).ok_or_else(|| {
            AppError::Config(format!("unknown index.encoding `{}`", self.encoding))
        })
    }
}

/// Default search fields and key field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryDefaults {
    /// Fields searched for every candidate term.
    pub fields: Vec<String>,
    /// Stored field supplying the result key.
    pub key_field: String,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            fields: vec!["title".into()],
            key_field: "domain".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/intellisearch/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config)
                .join("intellisearch")
                .join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("intellisearch")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/intellisearch-config/config.toml")
        }
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] naming the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        if self.index.writer_memory_bytes < MIN_WRITER_MEMORY_BYTES {
            return Err(AppError::Config(format!(
                "index.writer_memory_bytes must be at least {MIN_WRITER_MEMORY_BYTES}"
            )));
        }
        self.index.text_encoding()?;
        if self.query.fields.is_empty() {
            return Err(AppError::Config("query.fields must not be empty".into()));
        }
        if self.query.key_field.is_empty() {
            return Err(AppError::Config("query.key_field must not be empty".into()));
        }
        Ok(())
    }
}
