//! Name and company string matching
//!
//! Two distinct operations with distinct jobs:
//! - `name_match_score` is the SOFT similarity used for ranking candidates
//!   and tie-breaking company search results.
//! - `exact_name_equals` is the HARD predicate used wherever the pipeline
//!   must decide "is this the same person". A high soft score is never
//!   treated as an exact match for identity decisions.
//!
//! The soft score takes the max of a token-overlap ratio and a character
//! sequence ratio: token overlap rewards reordered or partial names
//! ("Smith, John" vs "John Smith"), the sequence ratio catches typos and
//! abbreviations that token overlap misses entirely.

use std::collections::HashSet;

/// Normalize free text for comparison: lowercase, strip everything that is
/// not alphanumeric-or-space, collapse whitespace runs.
pub fn normalize_text(value: &str) -> String {
    let lowered: String = value
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Soft similarity score in [0, 1].
///
/// Equal normalized strings score 1.0; substring containment either
/// direction scores 0.9; otherwise the max of token overlap and sequence
/// ratio. Empty input on either side scores 0.0.
pub fn name_match_score(target: &str, candidate: &str) -> f64 {
    let t = normalize_text(target);
    let c = normalize_text(candidate);
    if t.is_empty() || c.is_empty() {
        return 0.0;
    }
    if t == c {
        return 1.0;
    }
    if t.contains(&c) || c.contains(&t) {
        return 0.9;
    }

    let t_tokens: HashSet<&str> = t.split(' ').collect();
    let c_tokens: HashSet<&str> = c.split(' ').collect();
    let overlap = t_tokens.intersection(&c_tokens).count();
    // Denominator is the smaller token set: rewards partial names in either
    // direction and keeps the score symmetric.
    let token_score = overlap as f64 / t_tokens.len().min(c_tokens.len()).max(1) as f64;

    let seq_score = sequence_ratio(&t, &c);
    token_score.max(seq_score)
}

/// Hard equality predicate: post-normalization string equality, with empty
/// strings never equal to anything.
pub fn exact_name_equals(left: &str, right: &str) -> bool {
    let l = normalize_text(left);
    !l.is_empty() && l == normalize_text(right)
}

/// Symmetric longest-matching-blocks ratio in [0, 1].
///
/// Recursively finds the longest common substring, then matches the pieces
/// to its left and right; the ratio is `2 * matched / (len(a) + len(b))`.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let total = a_chars.len() + b_chars.len();
    if total == 0 {
        return 1.0;
    }
    let matched = matching_block_total(&a_chars, &b_chars);
    2.0 * matched as f64 / total as f64
}

/// Total characters covered by recursively-found longest common substrings.
fn matching_block_total(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    // Longest common substring via rolling DP row; earliest occurrence wins
    // on ties.
    let mut best_len = 0usize;
    let mut best_a = 0usize;
    let mut best_b = 0usize;
    let mut prev = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        let mut curr = vec![0usize; b.len() + 1];
        for (j, &cb) in b.iter().enumerate() {
            if ca == cb {
                let run = prev[j] + 1;
                curr[j + 1] = run;
                if run > best_len {
                    best_len = run;
                    best_a = i + 1 - run;
                    best_b = j + 1 - run;
                }
            }
        }
        prev = curr;
    }

    if best_len == 0 {
        return 0;
    }

    best_len
        + matching_block_total(&a[..best_a], &b[..best_b])
        + matching_block_total(&a[best_a + best_len..], &b[best_b + best_len..])
}

/// Round a score to four decimal places for stable serialized output.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
