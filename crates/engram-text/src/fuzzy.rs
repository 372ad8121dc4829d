// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fuzzy string scoring for the retrieval fallback path.
//!
//! Used when no embedding is available: counts token overlap between a
//! query and a candidate (a token pair counts as overlapping when its
//! normalized edit-distance similarity clears a threshold) and adds a
//! fixed bonus when the whole query appears verbatim in the candidate.

use crate::normalize::{normalize, tokenize};

/// Bonus added when the normalized query is a substring of the
/// normalized candidate.
pub const VERBATIM_BONUS: f64 = 2.0;

/// Fuzzy match result for one query/candidate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyScore {
    /// Number of query tokens with a similar counterpart in the candidate.
    pub overlap: usize,
    /// Overlap count plus the verbatim-substring bonus, if earned.
    pub score: f64,
}

/// Score `candidate` against `query`.
///
/// `token_threshold` is the per-token-pair similarity
/// (`strsim::normalized_levenshtein`) above which two tokens count as
/// the same term; the reference value is 0.85.
pub fn fuzzy_score(query: &str, candidate: &str, token_threshold: f64) -> FuzzyScore {
    let query_norm = normalize(query);
    let candidate_norm = normalize(candidate);

    let query_tokens = tokenize(&query_norm);
    let candidate_tokens = tokenize(&candidate_norm);

    let overlap = query_tokens
        .iter()
        .filter(|q| tokens_contain(&candidate_tokens, q, token_threshold))
        .count();

    let mut score = overlap as f64;
    if !query_norm.is_empty() && candidate_norm.contains(&query_norm) {
        score += VERBATIM_BONUS;
    }

    FuzzyScore { overlap, score }
}

/// Fraction of query terms present (per the similarity threshold) in the
/// candidate. Returns 0.0 for an empty query.
pub fn term_overlap_ratio(query: &str, candidate: &str, token_threshold: f64) -> f64 {
    let query_tokens = tokenize(&normalize(query));
    if query_tokens.is_empty() {
        return 0.0;
    }
    let candidate_tokens = tokenize(&normalize(candidate));
    let overlap = query_tokens
        .iter()
        .filter(|q| tokens_contain(&candidate_tokens, q, token_threshold))
        .count();
    overlap as f64 / query_tokens.len() as f64
}

fn tokens_contain(tokens: &[String], term: &str, threshold: f64) -> bool {
    tokens
        .iter()
        .any(|t| strsim::normalized_levenshtein(t, term) >= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_tokens_overlap() {
        let s = fuzzy_score("love hiking", "the user loves hiking trails", 0.85);
        assert_eq!(s.overlap, 2);
    }

    #[test]
    fn near_miss_tokens_overlap_at_threshold() {
        // "favourite" vs "favorite" survive normalization as distinct
        // tokens but clear the 0.85 edit-distance bar.
        let s = fuzzy_score("favourite color", "favorite color is blue", 0.85);
        assert_eq!(s.overlap, 2);
    }

    #[test]
    fn verbatim_substring_earns_bonus() {
        let with_bonus = fuzzy_score("loves hiking", "the user loves hiking", 0.85);
        let without = fuzzy_score("loves hiking", "hiking is loved by the user", 0.85);
        assert!(with_bonus.score > without.score);
        assert_eq!(with_bonus.score, with_bonus.overlap as f64 + VERBATIM_BONUS);
    }

    #[test]
    fn disjoint_strings_score_zero() {
        let s = fuzzy_score("quantum physics", "the user has a dog", 0.85);
        assert_eq!(s.overlap, 0);
        assert_eq!(s.score, 0.0);
    }

    #[test]
    fn overlap_ratio_bounds() {
        assert_eq!(term_overlap_ratio("", "anything", 0.85), 0.0);
        assert_eq!(term_overlap_ratio("dog", "the dog barks", 0.85), 1.0);
        let half = term_overlap_ratio("dog cat", "the dog barks", 0.85);
        assert!((half - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn stemming_helps_overlap() {
        // "dogs" stems to "dog", so the singular in the candidate counts.
        let ratio = term_overlap_ratio("dogs", "the dog barks", 0.85);
        assert_eq!(ratio, 1.0);
    }
}
