//! Similarity scoring between song titles and uploaded file names.
//!
//! This module contains:
//! - Normalized Levenshtein similarity
//! - Per-candidate scoring over the name variants
//! - Best-candidate selection under a confidence threshold

use crate::models::FileCandidate;
use crate::normalize::CaseFolding;

// ============================================================================
// Score Thresholds
// ============================================================================

/// Minimum score a candidate must exceed to be accepted
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Candidates above this score are reported as close matches
pub const CLOSE_MATCH_THRESHOLD: f64 = 0.3;

/// Extensions appended to the title and compared against the raw file name.
/// Catches files named literally "<title>.mp3" whatever the stripping does.
pub const EXTENSION_VARIANTS: [&str; 2] = [".mp3", ".wav"];

// ============================================================================
// Similarity
// ============================================================================

/// Levenshtein distance over chars, full (len(a)+1) x (len(b)+1) matrix.
pub fn levenshtein(a: &[char], b: &[char]) -> usize {
    let a_len = a.len();
    let b_len = b.len();

    let mut matrix = vec![vec![0usize; b_len + 1]; a_len + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=a_len {
        for j in 1..=b_len {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            matrix[i][j] = (matrix[i - 1][j] + 1) // deletion
                .min(matrix[i][j - 1] + 1) // insertion
                .min(matrix[i - 1][j - 1] + cost); // substitution
        }
    }

    matrix[a_len][b_len]
}

/// Similarity ratio in [0, 1]: `1 - distance / max(len(a), len(b))`.
///
/// Case sensitive; callers fold case first. Two empty strings are identical
/// (1.0); an empty string against a non-empty one scores 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() && b_chars.is_empty() {
        return 1.0;
    }
    if a_chars.is_empty() || b_chars.is_empty() {
        return 0.0;
    }

    let dist = levenshtein(&a_chars, &b_chars);
    let max_len = a_chars.len().max(b_chars.len());
    1.0 - (dist as f64 / max_len as f64)
}

// ============================================================================
// Candidate Scoring
// ============================================================================

/// Score a folded title against one candidate: the best of the direct
/// normalized-name match and the title-plus-extension matches against the
/// folded raw name. An empty title scores 0.
pub fn score_candidate(title_folded: &str, candidate: &FileCandidate, folding: CaseFolding) -> f64 {
    if title_folded.is_empty() {
        return 0.0;
    }

    let direct = similarity(title_folded, &candidate.normalized_name);
    let raw_folded = folding.fold(&candidate.raw_name);

    EXTENSION_VARIANTS
        .iter()
        .map(|ext| similarity(&format!("{title_folded}{ext}"), &raw_folded))
        .fold(direct, f64::max)
}

/// A candidate's position in the pool with its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    pub index: usize,
    pub score: f64,
}

/// Outcome of scoring a title against the whole pool.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Strictly highest score above the threshold; first in pool order on ties
    pub best: Option<ScoredCandidate>,
    /// Every candidate above [`CLOSE_MATCH_THRESHOLD`], in pool order
    pub close_matches: Vec<ScoredCandidate>,
}

/// Pick the best candidate for a folded title.
/// The best score must be strictly greater than `threshold`.
pub fn select_best(
    title_folded: &str,
    pool: &[FileCandidate],
    threshold: f64,
    folding: CaseFolding,
) -> Selection {
    let mut selection = Selection::default();

    for (index, candidate) in pool.iter().enumerate() {
        let score = score_candidate(title_folded, candidate, folding);
        let scored = ScoredCandidate { index, score };

        if score > CLOSE_MATCH_THRESHOLD {
            selection.close_matches.push(scored);
        }

        if score > threshold && selection.best.map_or(true, |best| score > best.score) {
            selection.best = Some(scored);
        }
    }

    selection
}

// ============================================================================
// TESTS
// ============================================================================
