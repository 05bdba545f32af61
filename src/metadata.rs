//! Song metadata sources.
//!
//! Rows come from a sheet export with one song per row. Column positions are
//! fixed per run (see [`ColumnMap`]); there is no header sniffing.

use std::io;
use std::path::Path;

use crate::error::{FilingError, Result};
use crate::models::SongEntry;

/// One sheet row before genre extraction. Genre fields are comma-joined lists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRow {
    pub title: String,
    pub genres: String,
    pub parent_genres: String,
}

impl RawRow {
    pub fn new(title: &str, genres: &str, parent_genres: &str) -> Self {
        Self {
            title: title.to_string(),
            genres: genres.to_string(),
            parent_genres: parent_genres.to_string(),
        }
    }
}

/// Ordered source of raw rows.
pub trait MetadataSource {
    fn rows(&mut self) -> Result<Vec<RawRow>>;
}

/// Turn raw rows into song entries. Row indices are 1-based data rows
/// (the header is row 0).
pub fn read_songs(source: &mut dyn MetadataSource) -> Result<Vec<SongEntry>> {
    Ok(source
        .rows()?
        .iter()
        .enumerate()
        .map(|(i, row)| SongEntry::new(&row.title, &row.genres, &row.parent_genres, i + 1))
        .collect())
}

// ============================================================================
// Column mapping
// ============================================================================

/// Zero-based column indices in the sheet export.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnMap {
    pub title: usize,
    pub genre: usize,
    pub parent_genre: usize,
}

impl Default for ColumnMap {
    /// Layout of the playlist-analysis export: B = track name,
    /// F = genres, G = parent genres.
    fn default() -> Self {
        Self {
            title: 1,
            genre: 5,
            parent_genre: 6,
        }
    }
}

// ============================================================================
// CSV source
// ============================================================================

/// Reads a CSV export. The first record is a header and is skipped;
/// short rows yield empty fields.
pub struct CsvMetadataSource<R: io::Read> {
    reader: csv::Reader<R>,
    columns: ColumnMap,
}

impl CsvMetadataSource<std::fs::File> {
    pub fn open(path: &Path, columns: ColumnMap) -> Result<Self> {
        if !path.is_file() {
            return Err(FilingError::ConfigurationMissing(format!(
                "metadata sheet {}",
                path.display()
            )));
        }
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;
        Ok(Self { reader, columns })
    }
}

impl<R: io::Read> CsvMetadataSource<R> {
    pub fn from_reader(reader: R, columns: ColumnMap) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        Self { reader, columns }
    }
}

impl<R: io::Read> MetadataSource for CsvMetadataSource<R> {
    fn rows(&mut self) -> Result<Vec<RawRow>> {
        let mut rows = Vec::new();
        for record in self.reader.records() {
            let record = record?;
            let cell = |i: usize| record.get(i).unwrap_or("").to_string();
            rows.push(RawRow {
                title: cell(self.columns.title),
                genres: cell(self.columns.genre),
                parent_genres: cell(self.columns.parent_genre),
            });
        }
        Ok(rows)
    }
}

// ============================================================================
// Fixed rows
// ============================================================================

/// Rows held in memory.
pub struct VecMetadataSource(pub Vec<RawRow>);

impl MetadataSource for VecMetadataSource {
    fn rows(&mut self) -> Result<Vec<RawRow>> {
        Ok(self.0.clone())
    }
}
