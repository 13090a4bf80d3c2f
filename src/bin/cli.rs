//! CLI binary for intellisearch.

use clap::{Parser, Subcommand};
use intellisearch::startup::{build_directory_index, demo_engine, open_engine};
use intellisearch::AppConfig;
use intellisearch_engine::{Engine, FusedResult, Language, Query, TantivyIndex};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// intellisearch: spelling-tolerant search over short text records.
#[derive(Parser)]
#[command(name = "intellisearch", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Index every two-line `*.txt` file in a directory.
    Index {
        /// Directory holding the text files.
        #[arg(long)]
        source: PathBuf,
        /// Directory the index is written to (replaced if present).
        #[arg(long)]
        index: PathBuf,
        /// Stop after this many files have been indexed.
        #[arg(long)]
        limit: Option<usize>,
        /// Analyzer language, overriding the config file.
        #[arg(long, value_parser = parse_language)]
        language: Option<Language>,
        /// Text file encoding label (`utf-8`, `windows-1251`, ...), overriding the config file.
        #[arg(long)]
        encoding: Option<String>,
    },

    /// Search an existing index.
    Search {
        /// Directory holding the index.
        #[arg(long)]
        index: PathBuf,
        /// Field to search; repeat for several. Defaults to the config file.
        #[arg(long = "field")]
        fields: Vec<String>,
        /// Stored field supplying the result key.
        #[arg(long)]
        key_field: Option<String>,
        /// Maximum number of keys to print.
        #[arg(long)]
        max_results: Option<usize>,
        /// Analyzer language, overriding the config file.
        #[arg(long, value_parser = parse_language)]
        language: Option<Language>,
        /// Print results as JSON with scores.
        #[arg(long)]
        json: bool,
        /// Phrase to search for.
        phrase: String,
    },

    /// Search the built-in three-record example corpus.
    Demo {
        /// Phrase to search for.
        #[arg(default_value = "open source")]
        phrase: String,
        /// Print results as JSON with scores.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so results on stdout stay pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("intellisearch=info,intellisearch_engine=warn,tantivy=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = if let Some(ref path) = cli.config {
        AppConfig::from_file(path)?
    } else {
        let default_path = AppConfig::default_config_path();
        if default_path.exists() {
            AppConfig::from_file(&default_path)?
        } else {
            AppConfig::default()
        }
    };

    match cli.command {
        Command::Index {
            source,
            index,
            limit,
            language,
            encoding,
        } => {
            if let Some(language) = language {
                config.index.language = language;
            }
            if let Some(encoding) = encoding {
                config.index.encoding = encoding;
            }
            let report = build_directory_index(&source, &index, &config, limit)?;
            info!(
                indexed = report.indexed,
                skipped = report.skipped(),
                "indexing finished"
            );
            println!(
                "Indexed {} files ({} skipped: {} too short, {} not decodable, {} unreadable)",
                report.indexed,
                report.skipped(),
                report.skipped_short,
                report.skipped_encoding,
                report.skipped_unreadable
            );
            Ok(())
        }
        Command::Search {
            index,
            fields,
            key_field,
            max_results,
            language,
            json,
            phrase,
        } => {
            if let Some(language) = language {
                config.index.language = language;
            }
            let fields = if fields.is_empty() {
                config.query.fields.clone()
            } else {
                fields
            };
            let key_field = key_field.unwrap_or_else(|| config.query.key_field.clone());
            let max_results = max_results.unwrap_or(config.search.max_results);

            let engine = open_engine(&index, &config)?;
            let query = Query::new(phrase, fields, key_field, max_results)?;
            run_search(&engine, &query, json).await
        }
        Command::Demo { phrase, json } => {
            let engine = demo_engine(&config)?;
            let query = Query::new(phrase, ["title"], "domain", config.search.max_results)?;
            run_search(&engine, &query, json).await
        }
    }
}

async fn run_search(engine: &Engine<TantivyIndex>, query: &Query, json: bool) -> anyhow::Result<()> {
    let results = engine.search_query(query).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_results(&results);
    }
    Ok(())
}

fn print_results(results: &[FusedResult]) {
    if results.is_empty() {
        println!("No results.");
        return;
    }
    for (i, result) in results.iter().enumerate() {
        println!("{:>3}. {}", i + 1, result.key);
    }
}

fn parse_language(s: &str) -> Result<Language, String> {
    match s.to_lowercase().as_str() {
        "en" | "english" => Ok(Language::English),
        "ru" | "russian" => Ok(Language::Russian),
        other => Err(format!("unsupported language `{other}` (expected en or ru)")),
    }
}
