//! Fusion of per-term ranked lists into one key-deduplicated ranking.
//!
//! Per-term lists are flattened in candidate order and stably sorted by
//! descending score, so exact ties keep the earlier candidate first. Keys
//! are resolved lazily in that order; the first occurrence of each key
//! wins and resolution stops once `output_limit` keys are collected.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::types::{DocHandle, FusedResult, ScoredResult};

/// Merge `per_term` result lists into at most `output_limit` distinct keys.
///
/// `key_of` maps a hit to its key; `None` excludes the hit (for example a
/// document without the key field).
pub fn fuse<F>(per_term: Vec<Vec<ScoredResult>>, mut key_of: F, output_limit: usize) -> Vec<FusedResult>
where
    F: FnMut(DocHandle) -> Option<String>,
{
    let mut flattened: Vec<ScoredResult> = per_term.into_iter().flatten().collect();
    flattened.sort_by(by_score_descending);

    let mut seen: HashSet<String> = HashSet::new();
    let mut fused: Vec<FusedResult> = Vec::new();

    for hit in flattened {
        if fused.len() >= output_limit {
            break;
        }
        let Some(key) = key_of(hit.handle) else {
            continue;
        };
        if seen.insert(key.clone()) {
            fused.push(FusedResult {
                key,
                best_score: hit.score,
                source_term: hit.source_term,
            });
        }
    }

    fused
}

/// Descending by score; NaN sorts after every number.
fn by_score_descending(a: &ScoredResult, b: &ScoredResult) -> Ordering {
    match (a.score.is_nan(), b.score.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(doc: u32, score: f32, term: &str) -> ScoredResult {
        ScoredResult {
            handle: DocHandle::new(0, doc),
            score,
            source_term: term.to_string(),
        }
    }

    /// Documents 0..10 map to keys "k0".."k9"; document 99 has no key.
    fn key_of(handle: DocHandle) -> Option<String> {
        (handle.doc < 10).then(|| format!("k{}", handle.doc))
    }

    fn keys(fused: &[FusedResult]) -> Vec<&str> {
        fused.iter().map(|r| r.key.as_str()).collect()
    }

    #[test]
    fn merged_in_descending_score_order() {
        let per_term = vec![
            vec![hit(1, 0.9, "a"), hit(2, 0.3, "a")],
            vec![hit(3, 0.7, "b"), hit(4, 0.5, "b")],
        ];
        let fused = fuse(per_term, key_of, 10);
        assert_eq!(keys(&fused), vec!["k1", "k3", "k4", "k2"]);
    }

    #[test]
    fn duplicate_key_keeps_best_score() {
        let per_term = vec![vec![hit(1, 0.4, "a")], vec![hit(1, 0.8, "b")]];
        let fused = fuse(per_term, key_of, 10);
        assert_eq!(fused.len(), 1);
        assert!((fused[0].best_score - 0.8).abs() < f32::EPSILON);
        assert_eq!(fused[0].source_term, "b");
    }

    #[test]
    fn exact_tie_prefers_earlier_candidate() {
        let per_term = vec![vec![hit(1, 0.5, "first")], vec![hit(1, 0.5, "second")]];
        let fused = fuse(per_term, key_of, 10);
        assert_eq!(fused[0].source_term, "first");
    }

    #[test]
    fn tied_distinct_keys_keep_candidate_order() {
        let per_term = vec![vec![hit(5, 1.0, "a")], vec![hit(2, 1.0, "b")]];
        assert_eq!(keys(&fuse(per_term, key_of, 10)), vec!["k5", "k2"]);
    }

    #[test]
    fn output_truncated_to_limit() {
        let per_term = vec![(0..10).map(|i| hit(i, 1.0 - i as f32 * 0.05, "a")).collect()];
        let fused = fuse(per_term, key_of, 3);
        assert_eq!(keys(&fused), vec!["k0", "k1", "k2"]);
    }

    #[test]
    fn duplicates_do_not_count_towards_limit() {
        let per_term = vec![
            vec![hit(1, 0.9, "a"), hit(2, 0.5, "a")],
            vec![hit(1, 0.8, "b"), hit(3, 0.4, "b")],
        ];
        assert_eq!(keys(&fuse(per_term, key_of, 3)), vec!["k1", "k2", "k3"]);
    }

    #[test]
    fn missing_key_excluded() {
        let per_term = vec![vec![hit(99, 2.0, "a"), hit(1, 1.0, "a")]];
        assert_eq!(keys(&fuse(per_term, key_of, 10)), vec!["k1"]);
    }

    #[test]
    fn nan_scores_sort_last() {
        let per_term = vec![vec![hit(1, f32::NAN, "a"), hit(2, 0.1, "a")]];
        assert_eq!(keys(&fuse(per_term, key_of, 10)), vec!["k2", "k1"]);
    }

    #[test]
    fn keys_not_resolved_past_limit() {
        let per_term = vec![(0..10).map(|i| hit(i, 10.0 - i as f32, "a")).collect()];
        let mut resolved = 0;
        let fused = fuse(
            per_term,
            |handle| {
                resolved += 1;
                key_of(handle)
            },
            2,
        );
        assert_eq!(fused.len(), 2);
        assert_eq!(resolved, 2);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(fuse(Vec::new(), key_of, 10).is_empty());
        assert!(fuse(vec![Vec::new(), Vec::new()], key_of, 10).is_empty());
    }

    #[test]
    fn output_scores_non_increasing() {
        let per_term = vec![
            vec![hit(1, 0.2, "a"), hit(2, 0.9, "a"), hit(3, 0.4, "a")],
            vec![hit(4, 0.6, "b"), hit(2, 0.1, "b"), hit(5, 0.6, "b")],
        ];
        let fused = fuse(per_term, key_of, 10);
        assert!(fused
            .windows(2)
            .all(|pair| pair[0].best_score >= pair[1].best_score));
        let unique: HashSet<&str> = keys(&fused).into_iter().collect();
        assert_eq!(unique.len(), fused.len());
    }
}
