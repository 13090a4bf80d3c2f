//! intellisearch: spelling-tolerant search over short text records.
//!
//! This crate is the application around `intellisearch-engine`:
//! - **Config**: TOML file with engine, index and query-default sections
//! - **Ingestion**: the example corpus or a directory of two-line text files
//! - **Start-up**: building on-disk indexes and opening engines over them
//!
//! The `intellisearch` binary exposes all of it on the command line.

pub mod config;
pub mod error;
pub mod ingest;
pub mod startup;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use ingest::IngestReport;
