//! Normalization of song titles, file names and genre fields.
//!
//! Titles and file names must go through the same case folding before they
//! are scored, otherwise the scorer compares differently-folded strings.

use any_ascii::any_ascii;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// Constants
// ============================================================================

/// Sentinel genre/parent-genre for rows with incomplete genre metadata.
/// Also the name of the manual-review folder, nested inside itself.
pub const MANUAL_REVIEW: &str = "NeedsManualReview";

/// Trailing extension: a dot followed by anything but `/` or `.` up to the end.
pub static FILE_EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.[^/.]+$").unwrap());

// ============================================================================
// Case folding
// ============================================================================

/// Case folding applied to titles and file names before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseFolding {
    /// Unicode lower-casing, locale independent
    #[default]
    Lowercase,
    /// NFKD + combining marks stripped + ASCII transliteration, then lower-cased
    AsciiFold,
}

impl CaseFolding {
    pub fn fold(self, s: &str) -> String {
        match self {
            CaseFolding::Lowercase => s.to_lowercase(),
            CaseFolding::AsciiFold => fold_to_ascii(s),
        }
    }
}

/// Check if a character is a Unicode combining mark (diacritical mark).
pub fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF | 0xFE20..=0xFE2F)
}

/// Fold Unicode text to lower-case ASCII.
/// e.g., "Beyoncé" → "beyonce", "Кино" → "kino"
pub fn fold_to_ascii(s: &str) -> String {
    let stripped: String = s.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    any_ascii(&stripped).to_lowercase()
}

// ============================================================================
// File names
// ============================================================================

/// Remove a trailing `.<ext>` from a file name.
pub fn strip_extension(name: &str) -> &str {
    match FILE_EXTENSION.find(name) {
        Some(m) => &name[..m.start()],
        None => name,
    }
}

/// Normalized name of an uploaded file: extension stripped, case folded.
pub fn normalize_file_name(raw: &str, folding: CaseFolding) -> String {
    folding.fold(strip_extension(raw))
}

// ============================================================================
// Genre fields
// ============================================================================

/// First comma-separated token of a genre list, trimmed.
/// e.g., "House, Deep House" → "House"
pub fn first_token(field: &str) -> &str {
    field.split(',').next().unwrap_or("").trim()
}

// ============================================================================
// TESTS
// ============================================================================
