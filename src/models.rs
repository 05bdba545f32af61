//! Core data models for genre filing.
//!
//! This module contains the handle types, the per-row entries read from the
//! metadata sheet, the per-row results produced by the planner, and the run
//! statistics.

use serde::Serialize;
use std::fmt;

use crate::normalize::{first_token, normalize_file_name, CaseFolding, MANUAL_REVIEW};

// ============================================================================
// Handles
// ============================================================================

/// Opaque folder handle. Only the store that issued it can interpret it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FolderId(pub String);

/// Opaque file handle. Only the store that issued it can interpret it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FileId(pub String);

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Input Models
// ============================================================================

/// One metadata row. Immutable once read.
#[derive(Clone, Debug, PartialEq)]
pub struct SongEntry {
    pub title: String,
    pub genre: String,
    pub parent_genre: String,
    pub row_index: usize,
}

impl SongEntry {
    /// Build an entry from raw comma-joined genre fields.
    /// If either first token is empty, both fields become the manual-review sentinel.
    pub fn new(title: &str, genres: &str, parent_genres: &str, row_index: usize) -> Self {
        let genre = first_token(genres);
        let parent_genre = first_token(parent_genres);
        let (genre, parent_genre) = if genre.is_empty() || parent_genre.is_empty() {
            (MANUAL_REVIEW, MANUAL_REVIEW)
        } else {
            (genre, parent_genre)
        };
        Self {
            title: title.trim().to_string(),
            genre: genre.to_string(),
            parent_genre: parent_genre.to_string(),
            row_index,
        }
    }

    pub fn needs_manual_review(&self) -> bool {
        self.genre == MANUAL_REVIEW && self.parent_genre == MANUAL_REVIEW
    }

    pub fn destination(&self) -> Destination {
        Destination {
            parent: self.parent_genre.clone(),
            genre: self.genre.clone(),
        }
    }
}

/// An uploaded file in the candidate pool.
#[derive(Clone, Debug, PartialEq)]
pub struct FileCandidate {
    pub id: FileId,
    pub raw_name: String,
    pub normalized_name: String,
}

impl FileCandidate {
    pub fn new(id: FileId, raw_name: &str, folding: CaseFolding) -> Self {
        Self {
            id,
            raw_name: raw_name.to_string(),
            normalized_name: normalize_file_name(raw_name, folding),
        }
    }
}

/// Two-level destination key `(parent genre, genre)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Destination {
    pub parent: String,
    pub genre: String,
}

impl Destination {
    pub fn manual_review() -> Self {
        Self {
            parent: MANUAL_REVIEW.to_string(),
            genre: MANUAL_REVIEW.to_string(),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.parent, self.genre)
    }
}

// ============================================================================
// Output Models
// ============================================================================

/// Why a row ended without a move.
#[derive(Clone, Debug, PartialEq)]
pub enum UnmatchedReason {
    /// No candidate scored above the threshold (includes an empty pool)
    BelowThreshold,
    /// Destination folder could not be created or opened
    FolderUnavailable(String),
    /// Duplicate check or move failed in the store
    MoveFailed(String),
}

/// Terminal state of a row.
#[derive(Clone, Debug, PartialEq)]
pub enum RowOutcome {
    Assigned,
    /// Destination already holds a file of the same name; nothing was moved
    DuplicateSkipped,
    Unmatched(UnmatchedReason),
}

/// Result for one metadata row. Never revised after creation.
#[derive(Clone, Debug)]
pub struct MatchResult {
    pub song: SongEntry,
    /// Best candidate above the threshold, if any
    pub file: Option<FileCandidate>,
    pub score: f64,
    pub destination: Destination,
    pub outcome: RowOutcome,
}

impl MatchResult {
    pub fn is_assigned(&self) -> bool {
        self.outcome == RowOutcome::Assigned
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Counters for a filing run, written to `--stats` as JSON.
#[derive(Default, Debug, Clone, Serialize)]
pub struct RunStats {
    pub total_rows: usize,
    pub rows_processed: usize,
    pub pool_size: usize,

    pub moved: usize,
    pub duplicates_skipped: usize,
    pub unmatched: usize,
    pub move_failures: usize,
    pub folder_failures: usize,
    pub manual_review_rows: usize,

    pub destinations_resolved: usize,
    pub files_remaining: usize,

    /// Time budget ran out before every row was processed
    pub stopped_early: bool,
    pub elapsed_seconds: f64,
}

impl RunStats {
    pub fn record(&mut self, result: &MatchResult) {
        self.rows_processed += 1;
        if result.song.needs_manual_review() {
            self.manual_review_rows += 1;
        }
        match &result.outcome {
            RowOutcome::Assigned => self.moved += 1,
            RowOutcome::DuplicateSkipped => self.duplicates_skipped += 1,
            RowOutcome::Unmatched(reason) => {
                self.unmatched += 1;
                match reason {
                    UnmatchedReason::BelowThreshold => {}
                    UnmatchedReason::FolderUnavailable(_) => self.folder_failures += 1,
                    UnmatchedReason::MoveFailed(_) => self.move_failures += 1,
                }
            }
        }
    }

    /// Moved rows as a percentage of processed rows
    pub fn match_rate(&self) -> f64 {
        if self.rows_processed == 0 {
            0.0
        } else {
            100.0 * self.moved as f64 / self.rows_processed as f64
        }
    }

    /// Write stats to a JSON file
    pub fn write_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
