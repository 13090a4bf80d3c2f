//! Search orchestrator: candidate expansion, concurrent per-term retrieval,
//! fusion and key extraction.
//!
//! This module turns a phrase into spelling-corrected candidate terms, fans
//! one retrieval pass per candidate out to the index, merges the ranked
//! lists by score, deduplicates by extracted key and truncates the answer.

pub mod candidates;
pub mod fusion;
pub mod key;
pub mod retrieve;
pub mod search;
