//! Run report sinks and the end-of-run summary.

use log::{info, warn};
use std::io::Write;

use crate::models::{FileCandidate, MatchResult, RowOutcome, RunStats};

/// Append-only destination for human-readable report lines.
pub trait ReportSink {
    fn append(&mut self, line: &str);
}

/// Emits each line through the `log` facade at info level.
#[derive(Default)]
pub struct LogReport;

impl ReportSink for LogReport {
    fn append(&mut self, line: &str) {
        info!("{}", line);
    }
}

/// Collects lines in memory.
#[derive(Default, Debug)]
pub struct MemoryReport {
    pub lines: Vec<String>,
}

impl MemoryReport {
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}

impl ReportSink for MemoryReport {
    fn append(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

/// Writes one line per append. Write errors are logged, not propagated.
pub struct WriterReport<W: Write> {
    writer: W,
}

impl<W: Write> WriterReport<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for WriterReport<W> {
    fn append(&mut self, line: &str) {
        if let Err(e) = writeln!(self.writer, "{}", line).and_then(|_| self.writer.flush()) {
            warn!("report write failed: {e}");
        }
    }
}

/// Sends every line to two sinks.
pub struct Tee<A, B>(pub A, pub B);

impl<A: ReportSink, B: ReportSink> ReportSink for Tee<A, B> {
    fn append(&mut self, line: &str) {
        self.0.append(line);
        self.1.append(line);
    }
}

/// Score as a percentage with one decimal, e.g. "87.5%".
pub fn percent(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// Append the end-of-run summary: counters, moved files, unmatched songs,
/// and files still in the upload folder.
pub fn write_summary(
    sink: &mut dyn ReportSink,
    stats: &RunStats,
    results: &[MatchResult],
    remaining: &[FileCandidate],
) {
    sink.append("===== SUMMARY =====");
    sink.append(&format!("Total execution time: {:.2} seconds", stats.elapsed_seconds));
    sink.append(&format!("Total songs in sheet: {}", stats.total_rows));
    sink.append(&format!("Songs processed: {}", stats.rows_processed));
    if stats.stopped_early {
        sink.append(&format!(
            "Stopped early: processed {} of {} songs",
            stats.rows_processed, stats.total_rows
        ));
    }
    sink.append(&format!("Total files moved: {}", stats.moved));
    sink.append(&format!("Duplicates skipped: {}", stats.duplicates_skipped));
    sink.append(&format!("Unmatched: {}", stats.unmatched));
    sink.append(&format!("Files remaining in upload folder: {}", remaining.len()));

    let moved: Vec<&MatchResult> = results.iter().filter(|r| r.is_assigned()).collect();
    if !moved.is_empty() {
        sink.append("Files moved successfully:");
        for result in moved {
            if let Some(file) = &result.file {
                sink.append(&format!(
                    "  - {} → {} (Match: {})",
                    file.raw_name,
                    result.destination,
                    percent(result.score)
                ));
            }
        }
    }

    let unmatched: Vec<&MatchResult> = results
        .iter()
        .filter(|r| matches!(r.outcome, RowOutcome::Unmatched(_)))
        .collect();
    if !unmatched.is_empty() {
        sink.append(&format!("Unmatched songs ({}):", unmatched.len()));
        for result in unmatched {
            sink.append(&format!("  - {}", result.song.title));
        }
    }

    if !remaining.is_empty() {
        sink.append("Remaining files in upload folder:");
        for file in remaining {
            sink.append(&format!("  - {}", file.raw_name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Destination, FileId, SongEntry, UnmatchedReason};
    use crate::normalize::CaseFolding;

    #[test]
    fn test_writer_report_lines() {
        let mut sink = WriterReport::new(Vec::new());
        sink.append("first");
        sink.append("second");
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text, "first\nsecond\n");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1.0), "100.0%");
        assert_eq!(percent(4.0 / 7.0), "57.1%");
    }

    #[test]
    fn test_summary_lists_moves_and_unmatched() {
        let file = FileCandidate::new(FileId("file:0".into()), "midnight.wav", CaseFolding::Lowercase);
        let leftover = FileCandidate::new(FileId("file:1".into()), "unrelated.mp3", CaseFolding::Lowercase);
        let results = vec![
            MatchResult {
                song: SongEntry::new("Midnight", "House", "Electronic", 1),
                file: Some(file),
                score: 1.0,
                destination: Destination {
                    parent: "Electronic".into(),
                    genre: "House".into(),
                },
                outcome: RowOutcome::Assigned,
            },
            MatchResult {
                song: SongEntry::new("Ghost", "", "", 2),
                file: None,
                score: 0.0,
                destination: Destination::manual_review(),
                outcome: RowOutcome::Unmatched(UnmatchedReason::BelowThreshold),
            },
        ];
        let mut stats = RunStats {
            total_rows: 2,
            ..Default::default()
        };
        for r in &results {
            stats.record(r);
        }

        let mut sink = MemoryReport::default();
        write_summary(&mut sink, &stats, &results, &[leftover]);

        assert!(sink.contains("Songs processed: 2"));
        assert!(sink.contains("Total files moved: 1"));
        assert!(sink.contains("Unmatched: 1"));
        assert!(sink.contains("midnight.wav → Electronic/House (Match: 100.0%)"));
        assert!(sink.contains("Unmatched songs (1):"));
        assert!(sink.contains("  - Ghost"));
        assert!(sink.contains("  - unrelated.mp3"));
        assert!(!sink.contains("Stopped early"));
    }

    #[test]
    fn test_tee_writes_both() {
        let mut tee = Tee(MemoryReport::default(), MemoryReport::default());
        tee.append("hello");
        assert_eq!(tee.0.lines, vec!["hello"]);
        assert_eq!(tee.1.lines, vec!["hello"]);
    }
}
