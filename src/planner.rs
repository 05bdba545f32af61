//! Matching and filing planner.
//!
//! Rows are processed strictly in sheet order against one snapshot of the
//! upload folder. Each row ends `Assigned`, `DuplicateSkipped` or
//! `Unmatched`; a file claimed by a row leaves the pool and is never offered
//! to a later row. There is no backtracking: earlier rows have priority.

use log::{debug, warn};
use rustc_hash::FxHashMap;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{FilingError, Result};
use crate::models::{
    Destination, FileCandidate, FolderId, MatchResult, RowOutcome, RunStats, SongEntry,
    UnmatchedReason,
};
use crate::normalize::{CaseFolding, MANUAL_REVIEW};
use crate::report::{percent, ReportSink};
use crate::scoring::{select_best, DEFAULT_THRESHOLD};
use crate::store::{FolderStore, StoreResult};

// ============================================================================
// Configuration
// ============================================================================

/// Delay policy applied before every move call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pacing {
    #[default]
    None,
    FixedDelay(Duration),
}

impl Pacing {
    pub fn pause(self) {
        if let Pacing::FixedDelay(delay) = self {
            if !delay.is_zero() {
                thread::sleep(delay);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// A candidate must score strictly above this
    pub threshold: f64,
    pub folding: CaseFolding,
    /// Wall-clock budget for the row loop; `None` = unlimited
    pub time_budget: Option<Duration>,
    pub pacing: Pacing,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            folding: CaseFolding::default(),
            time_budget: None,
            pacing: Pacing::default(),
        }
    }
}

/// Wall-clock budget measured from run start.
#[derive(Debug, Clone, Copy)]
pub struct TimeBudget {
    started: Instant,
    limit: Option<Duration>,
}

impl TimeBudget {
    pub fn start(limit: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn exhausted(&self) -> bool {
        self.limit.is_some_and(|limit| self.elapsed() >= limit)
    }
}

// ============================================================================
// Destination cache
// ============================================================================

/// Destination folders keyed by `(parent genre, genre)`.
/// Each pair goes through the store's get-or-create once per run.
#[derive(Debug, Default)]
pub struct DestinationCache {
    parents: FxHashMap<String, FolderId>,
    folders: FxHashMap<(String, String), FolderId>,
}

impl DestinationCache {
    pub fn resolve<S: FolderStore + ?Sized>(
        &mut self,
        store: &mut S,
        root: &FolderId,
        dest: &Destination,
    ) -> StoreResult<FolderId> {
        let key = (dest.parent.clone(), dest.genre.clone());
        if let Some(folder) = self.folders.get(&key) {
            return Ok(folder.clone());
        }

        let parent = self.parent(store, root, &dest.parent)?;
        let folder = store.get_or_create_child(&parent, &dest.genre)?;
        debug!("destination {} -> {}", dest, folder);
        self.folders.insert(key, folder.clone());
        Ok(folder)
    }

    fn parent<S: FolderStore + ?Sized>(
        &mut self,
        store: &mut S,
        root: &FolderId,
        name: &str,
    ) -> StoreResult<FolderId> {
        if let Some(folder) = self.parents.get(name) {
            return Ok(folder.clone());
        }
        let folder = store.get_or_create_child(root, name)?;
        self.parents.insert(name.to_string(), folder.clone());
        Ok(folder)
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

// ============================================================================
// Planner
// ============================================================================

/// Everything a run produced.
#[derive(Debug)]
pub struct RunReport {
    pub results: Vec<MatchResult>,
    pub stats: RunStats,
    /// Pool left after the run, in listing order
    pub remaining: Vec<FileCandidate>,
}

pub struct Planner<'a, S: FolderStore + ?Sized> {
    store: &'a mut S,
    sink: &'a mut dyn ReportSink,
    config: PlannerConfig,
    budget: TimeBudget,
    root: FolderId,
    pool: Vec<FileCandidate>,
    destinations: DestinationCache,
}

impl<'a, S: FolderStore + ?Sized> Planner<'a, S> {
    /// Locate the upload folder, ensure the manual-review folder, and take
    /// the one snapshot of uploaded files the whole run works from.
    /// The time budget starts here.
    pub fn prepare(
        store: &'a mut S,
        sink: &'a mut dyn ReportSink,
        config: PlannerConfig,
        upload_folder: &str,
    ) -> Result<Self> {
        let budget = TimeBudget::start(config.time_budget);
        let root = store.root();

        let upload = store.find_child(&root, upload_folder)?.ok_or_else(|| {
            FilingError::ConfigurationMissing(format!(
                "upload folder '{upload_folder}' under {root}"
            ))
        })?;
        sink.append(&format!("Upload folder found: {upload_folder} ({upload})"));

        let mut destinations = DestinationCache::default();
        destinations.parent(store, &root, MANUAL_REVIEW)?;

        let pool: Vec<FileCandidate> = store
            .list_files(&upload)?
            .into_iter()
            .map(|f| FileCandidate::new(f.id, &f.name, config.folding))
            .collect();
        sink.append(&format!("Found {} files in upload folder", pool.len()));

        Ok(Self {
            store,
            sink,
            config,
            budget,
            root,
            pool,
            destinations,
        })
    }

    pub fn pool(&self) -> &[FileCandidate] {
        &self.pool
    }

    pub fn run(self, songs: &[SongEntry]) -> RunReport {
        self.run_with(songs, |_| {})
    }

    /// Process every row in order, calling `on_row` after each one.
    /// Stops before the next row once the time budget is spent.
    pub fn run_with(
        mut self,
        songs: &[SongEntry],
        mut on_row: impl FnMut(&MatchResult),
    ) -> RunReport {
        let mut stats = RunStats {
            total_rows: songs.len(),
            pool_size: self.pool.len(),
            ..Default::default()
        };
        let mut results = Vec::with_capacity(songs.len());

        if self.pool.is_empty() {
            self.sink.append("No files found in upload folder. Nothing to organize.");
        }

        for (position, song) in songs.iter().enumerate() {
            if self.budget.exhausted() {
                warn!("time budget exhausted at row {}", song.row_index);
                self.sink.append(&format!(
                    "WARNING: Approaching execution time limit. Stopping early at song {} of {}",
                    position + 1,
                    songs.len()
                ));
                stats.stopped_early = true;
                break;
            }
            let result = self.process_row(song);
            stats.record(&result);
            on_row(&result);
            results.push(result);
        }

        stats.files_remaining = self.pool.len();
        stats.destinations_resolved = self.destinations.len();
        stats.elapsed_seconds = self.budget.elapsed().as_secs_f64();

        RunReport {
            results,
            stats,
            remaining: self.pool,
        }
    }

    /// Resolve, score, guard and move one row.
    pub fn process_row(&mut self, song: &SongEntry) -> MatchResult {
        let destination = song.destination();
        self.sink.append(&format!(
            "Processing song #{}: {} (Genre: {}, Parent: {})",
            song.row_index, song.title, song.genre, song.parent_genre
        ));
        if song.needs_manual_review() {
            self.sink.append(&format!(
                "Song has missing genre info - will place in {MANUAL_REVIEW}"
            ));
        }

        let folder = match self
            .destinations
            .resolve(&mut *self.store, &self.root, &destination)
        {
            Ok(folder) => folder,
            Err(e) => {
                self.sink
                    .append(&format!("ERROR creating destination folder '{destination}': {e}"));
                return unmatched(
                    song,
                    destination,
                    None,
                    0.0,
                    UnmatchedReason::FolderUnavailable(e.to_string()),
                );
            }
        };

        let title = self.config.folding.fold(&song.title);
        let selection = select_best(&title, &self.pool, self.config.threshold, self.config.folding);

        if !selection.close_matches.is_empty() {
            self.sink.append(&format!("Close matches for '{}':", song.title));
            for close in &selection.close_matches {
                self.sink.append(&format!(
                    "  - {} ({})",
                    self.pool[close.index].raw_name,
                    percent(close.score)
                ));
            }
        }

        let Some(best) = selection.best else {
            self.sink.append(&format!("File not found: {}", song.title));
            return unmatched(
                song,
                destination,
                None,
                0.0,
                UnmatchedReason::BelowThreshold,
            );
        };
        let candidate = self.pool[best.index].clone();
        debug!(
            "row {}: best {:?} score {:.4}",
            song.row_index, candidate.raw_name, best.score
        );

        match self.store.find_file_by_name(&folder, &candidate.raw_name) {
            Ok(None) => {}
            Ok(Some(_)) => {
                self.sink.append(&format!(
                    "Duplicate skipped: {} ({} match)",
                    candidate.raw_name,
                    percent(best.score)
                ));
                // Claimed: a skipped duplicate is not offered to later rows
                self.pool.remove(best.index);
                return MatchResult {
                    song: song.clone(),
                    file: Some(candidate),
                    score: best.score,
                    destination,
                    outcome: RowOutcome::DuplicateSkipped,
                };
            }
            Err(e) => {
                self.sink.append(&format!("Error checking for duplicates: {e}"));
                return unmatched(
                    song,
                    destination,
                    Some(candidate),
                    best.score,
                    UnmatchedReason::MoveFailed(e.to_string()),
                );
            }
        }

        self.config.pacing.pause();
        if let Err(e) = self.store.move_file(&candidate.id, &folder) {
            self.sink
                .append(&format!("Error moving file: {} - {e}", candidate.raw_name));
            return unmatched(
                song,
                destination,
                Some(candidate),
                best.score,
                UnmatchedReason::MoveFailed(e.to_string()),
            );
        }

        self.sink.append(&format!(
            "Moved: {} ({} match to \"{}\")",
            candidate.raw_name,
            percent(best.score),
            song.title
        ));
        self.pool.remove(best.index);

        MatchResult {
            song: song.clone(),
            file: Some(candidate),
            score: best.score,
            destination,
            outcome: RowOutcome::Assigned,
        }
    }
}

fn unmatched(
    song: &SongEntry,
    destination: Destination,
    file: Option<FileCandidate>,
    score: f64,
    reason: UnmatchedReason,
) -> MatchResult {
    MatchResult {
        song: song.clone(),
        file,
        score,
        destination,
        outcome: RowOutcome::Unmatched(reason),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::MemoryReport;
    use crate::store::{FsFolderStore, MemoryFolderStore};
    use std::fs;
    use tempfile::tempdir;

    const UPLOAD: &str = "UploadHere!!";

    fn store_with(files: &[&str]) -> MemoryFolderStore {
        let mut store = MemoryFolderStore::new("record_pool");
        let root = store.root();
        let upload = store.create_child(&root, UPLOAD).unwrap();
        for name in files {
            store.add_file(&upload, name).unwrap();
        }
        store
    }

    fn song(title: &str, genre: &str, parent: &str, row: usize) -> SongEntry {
        SongEntry::new(title, genre, parent, row)
    }

    fn run(store: &mut MemoryFolderStore, songs: &[SongEntry], config: PlannerConfig) -> (RunReport, MemoryReport) {
        let mut sink = MemoryReport::default();
        let report = Planner::prepare(store, &mut sink, config, UPLOAD)
            .unwrap()
            .run(songs);
        (report, sink)
    }

    fn names(files: &[FileCandidate]) -> Vec<&str> {
        files.iter().map(|f| f.raw_name.as_str()).collect()
    }

    #[test]
    fn test_assigns_best_and_leaves_rest() {
        let mut store = store_with(&["songA.mp3", "songB.mp3"]);
        let songs = [song("songA", "House", "Electronic", 1)];
        let (report, _) = run(&mut store, &songs, PlannerConfig::default());

        let result = &report.results[0];
        assert_eq!(result.outcome, RowOutcome::Assigned);
        assert_eq!(result.file.as_ref().unwrap().raw_name, "songA.mp3");
        assert_eq!(result.score, 1.0);
        assert_eq!(names(&report.remaining), vec!["songB.mp3"]);

        let house = store.resolve("Electronic/House").unwrap();
        assert_eq!(store.file_names(&house).unwrap(), vec!["songA.mp3"]);
    }

    #[test]
    fn test_end_to_end_with_manual_review_row() {
        let mut store = store_with(&["midnight.wav", "unrelated.mp3"]);
        let songs = [song("Midnight", "House", "Electronic", 1), song("", "", "", 2)];
        let (report, sink) = run(&mut store, &songs, PlannerConfig::default());

        assert_eq!(report.results[0].outcome, RowOutcome::Assigned);
        assert_eq!(report.results[0].destination.to_string(), "Electronic/House");

        let second = &report.results[1];
        assert_eq!(second.destination, Destination::manual_review());
        assert_eq!(second.outcome, RowOutcome::Unmatched(UnmatchedReason::BelowThreshold));
        assert!(second.file.is_none());

        // The manual-review bucket nests inside itself
        let bucket = store.resolve("NeedsManualReview/NeedsManualReview").unwrap();
        assert!(store.file_names(&bucket).unwrap().is_empty());

        assert_eq!(names(&report.remaining), vec!["unrelated.mp3"]);
        assert_eq!(report.stats.moved, 1);
        assert_eq!(report.stats.unmatched, 1);
        assert_eq!(report.stats.manual_review_rows, 1);
        assert!(sink.contains("Moved: midnight.wav (100.0% match to \"Midnight\")"));
    }

    #[test]
    fn test_destination_created_once() {
        let mut store = store_with(&["one.mp3", "two.mp3"]);
        let before = store.folders_created();
        let songs = [
            song("one", "House", "Electronic", 1),
            song("two", "House", "Electronic", 2),
        ];
        let (report, _) = run(&mut store, &songs, PlannerConfig::default());

        assert_eq!(report.stats.moved, 2);
        // NeedsManualReview + Electronic + House
        assert_eq!(store.folders_created(), before + 3);
        assert_eq!(report.stats.destinations_resolved, 1);
    }

    #[test]
    fn test_cache_returns_same_handle() {
        let mut store = MemoryFolderStore::new("root");
        let root = store.root();
        let mut cache = DestinationCache::default();
        let dest = Destination {
            parent: "Electronic".into(),
            genre: "House".into(),
        };
        let a = cache.resolve(&mut store, &root, &dest).unwrap();
        let b = cache.resolve(&mut store, &root, &dest).unwrap();
        assert_eq!(a, b);
        assert_eq!(store.folders_created(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_existing_destination_is_reused() {
        let mut store = store_with(&["one.mp3"]);
        let root = store.root();
        let electronic = store.create_child(&root, "Electronic").unwrap();
        store.create_child(&electronic, "House").unwrap();
        let before = store.folders_created();

        let songs = [song("one", "House", "Electronic", 1)];
        run(&mut store, &songs, PlannerConfig::default());
        // Only the manual-review parent is new
        assert_eq!(store.folders_created(), before + 1);
    }

    #[test]
    fn test_duplicate_guard_skips_move() {
        let mut store = store_with(&["midnight.wav", "midnight (1).wav"]);
        let root = store.root();
        let electronic = store.create_child(&root, "Electronic").unwrap();
        let house = store.create_child(&electronic, "House").unwrap();
        store.add_file(&house, "midnight.wav").unwrap();

        let songs = [
            song("Midnight", "House", "Electronic", 1),
            song("Midnight", "Techno", "Electronic", 2),
        ];
        let (report, sink) = run(&mut store, &songs, PlannerConfig::default());

        assert_eq!(report.results[0].outcome, RowOutcome::DuplicateSkipped);
        assert!(sink.contains("Duplicate skipped: midnight.wav"));
        assert_eq!(store.moves(), 1);
        // The skipped file is not offered again; row 2 takes the next best
        assert_eq!(
            report.results[1].file.as_ref().unwrap().raw_name,
            "midnight (1).wav"
        );
        assert_eq!(report.results[1].outcome, RowOutcome::Assigned);
        assert!(report.remaining.is_empty());
        assert_eq!(report.stats.duplicates_skipped, 1);
    }

    #[test]
    fn test_assigned_file_not_reused() {
        let mut store = store_with(&["anthem.mp3"]);
        let songs = [
            song("Anthem", "House", "Electronic", 1),
            song("Anthem", "Rock", "Guitar", 2),
        ];
        let (report, _) = run(&mut store, &songs, PlannerConfig::default());

        assert_eq!(report.results[0].outcome, RowOutcome::Assigned);
        assert_eq!(
            report.results[1].outcome,
            RowOutcome::Unmatched(UnmatchedReason::BelowThreshold)
        );
        assert_eq!(store.moves(), 1);
    }

    #[test]
    fn test_move_failure_keeps_candidate() {
        let mut store = store_with(&["locked.mp3", "free.mp3"]);
        store.fail_moves_for("locked.mp3");
        let songs = [
            song("locked", "House", "Electronic", 1),
            song("free", "House", "Electronic", 2),
        ];
        let (report, sink) = run(&mut store, &songs, PlannerConfig::default());

        assert!(matches!(
            report.results[0].outcome,
            RowOutcome::Unmatched(UnmatchedReason::MoveFailed(_))
        ));
        assert_eq!(report.results[1].outcome, RowOutcome::Assigned);
        assert_eq!(names(&report.remaining), vec!["locked.mp3"]);
        assert_eq!(report.stats.move_failures, 1);
        assert!(sink.contains("Error moving file: locked.mp3"));
    }

    #[test]
    fn test_folder_failure_keeps_candidate() {
        let mut store = store_with(&["one.mp3", "two.mp3"]);
        store.fail_folders_named("Broken");
        let songs = [
            song("one", "Broken", "Electronic", 1),
            song("two", "House", "Electronic", 2),
        ];
        let (report, sink) = run(&mut store, &songs, PlannerConfig::default());

        assert!(matches!(
            report.results[0].outcome,
            RowOutcome::Unmatched(UnmatchedReason::FolderUnavailable(_))
        ));
        assert!(report.results[0].file.is_none());
        assert_eq!(report.results[1].outcome, RowOutcome::Assigned);
        assert_eq!(names(&report.remaining), vec!["one.mp3"]);
        assert_eq!(report.stats.folder_failures, 1);
        assert!(sink.contains("ERROR creating destination folder 'Electronic/Broken'"));
    }

    #[test]
    fn test_duplicate_check_failure_keeps_candidate() {
        let mut store = store_with(&["one.mp3", "two.mp3"]);
        store.fail_lookups_for("one.mp3");
        let songs = [
            song("one", "House", "Electronic", 1),
            song("two", "House", "Electronic", 2),
        ];
        let (report, sink) = run(&mut store, &songs, PlannerConfig::default());

        assert!(matches!(
            report.results[0].outcome,
            RowOutcome::Unmatched(UnmatchedReason::MoveFailed(_))
        ));
        assert_eq!(report.results[0].file.as_ref().unwrap().raw_name, "one.mp3");
        assert_eq!(report.results[1].outcome, RowOutcome::Assigned);
        assert_eq!(names(&report.remaining), vec!["one.mp3"]);
        assert_eq!(store.moves(), 1);
        assert!(sink.contains("Error checking for duplicates"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_upload_never_enters_pool() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let upload = dir.path().join(UPLOAD);
        fs::create_dir(&upload).unwrap();
        let odd = upload.join(OsStr::from_bytes(b"caf\xe9.mp3"));
        fs::write(&odd, b"audio").unwrap();

        let mut store = FsFolderStore::open(dir.path()).unwrap();
        let mut sink = MemoryReport::default();
        let report = Planner::prepare(&mut store, &mut sink, PlannerConfig::default(), UPLOAD)
            .unwrap()
            .run(&[song("cafx", "House", "Electronic", 1)]);

        assert_eq!(
            report.results[0].outcome,
            RowOutcome::Unmatched(UnmatchedReason::BelowThreshold)
        );
        assert_eq!(report.stats.pool_size, 0);
        assert!(odd.is_file());
    }

    #[test]
    fn test_threshold_is_configurable() {
        // "midnight.mp3" vs "midnite.mp3": 1 - 3/12 = 0.75
        let mut store = store_with(&["midnite.mp3"]);
        let songs = [song("Midnight", "House", "Electronic", 1)];
        let config = PlannerConfig {
            threshold: 0.8,
            ..Default::default()
        };
        let (report, _) = run(&mut store, &songs, config);
        assert!(!report.results[0].is_assigned());

        let mut store = store_with(&["midnite.mp3"]);
        let (report, _) = run(&mut store, &songs, PlannerConfig::default());
        assert!(report.results[0].is_assigned());
    }

    #[test]
    fn test_ascii_fold_matches_accents() {
        let songs = [song("Déjà Vu", "Pop", "Pop", 1)];
        let config = PlannerConfig {
            folding: CaseFolding::AsciiFold,
            ..Default::default()
        };
        let mut store = store_with(&["deja vu.mp3"]);
        let (report, _) = run(&mut store, &songs, config);
        assert_eq!(report.results[0].score, 1.0);

        let mut store = store_with(&["deja vu.mp3"]);
        let (report, _) = run(&mut store, &songs, PlannerConfig::default());
        assert!(report.results[0].score < 1.0);
    }

    #[test]
    fn test_spent_budget_stops_before_rows() {
        let mut store = store_with(&["one.mp3"]);
        let songs = [song("one", "House", "Electronic", 1)];
        let config = PlannerConfig {
            time_budget: Some(Duration::ZERO),
            ..Default::default()
        };
        let (report, sink) = run(&mut store, &songs, config);

        assert!(report.stats.stopped_early);
        assert_eq!(report.stats.rows_processed, 0);
        assert_eq!(report.stats.total_rows, 1);
        assert_eq!(names(&report.remaining), vec!["one.mp3"]);
        assert!(sink.contains("Stopping early at song 1 of 1"));
    }

    #[test]
    fn test_missing_upload_folder_is_fatal() {
        let mut store = MemoryFolderStore::new("record_pool");
        let mut sink = MemoryReport::default();
        let err = Planner::prepare(&mut store, &mut sink, PlannerConfig::default(), UPLOAD)
            .err()
            .unwrap();
        assert!(matches!(err, FilingError::ConfigurationMissing(_)));
        assert_eq!(store.folders_created(), 0);
    }

    #[test]
    fn test_close_matches_reported() {
        let mut store = store_with(&["midnight city.mp3", "qqqqqqqqqqqqqqqq.wav"]);
        let songs = [song("Midnight", "House", "Electronic", 1)];
        let (_, sink) = run(&mut store, &songs, PlannerConfig::default());
        assert!(sink.contains("Close matches for 'Midnight':"));
        assert!(sink.contains("  - midnight city.mp3"));
        assert!(!sink.contains("  - qqqqqqqqqqqqqqqq.wav"));
    }

    #[test]
    fn test_rerun_does_not_move_again() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(UPLOAD)).unwrap();
        fs::write(dir.path().join(UPLOAD).join("midnight.wav"), b"audio").unwrap();
        let songs = [song("Midnight", "House", "Electronic", 1)];

        let mut store = FsFolderStore::open(dir.path()).unwrap();
        let mut sink = MemoryReport::default();
        let report = Planner::prepare(&mut store, &mut sink, PlannerConfig::default(), UPLOAD)
            .unwrap()
            .run(&songs);
        assert_eq!(report.results[0].outcome, RowOutcome::Assigned);
        assert!(dir.path().join("Electronic/House/midnight.wav").is_file());
        assert!(dir.path().join("NeedsManualReview").is_dir());

        // Same name uploaded again: the guard leaves both copies alone
        fs::write(dir.path().join(UPLOAD).join("midnight.wav"), b"again").unwrap();
        let mut store = FsFolderStore::open(dir.path()).unwrap();
        let mut sink = MemoryReport::default();
        let report = Planner::prepare(&mut store, &mut sink, PlannerConfig::default(), UPLOAD)
            .unwrap()
            .run(&songs);
        assert_eq!(report.results[0].outcome, RowOutcome::DuplicateSkipped);
        assert_eq!(
            fs::read(dir.path().join("Electronic/House/midnight.wav")).unwrap(),
            b"audio"
        );
        assert!(dir.path().join(UPLOAD).join("midnight.wav").is_file());
    }

    #[test]
    fn test_pacing_zero_delay_is_noop() {
        Pacing::FixedDelay(Duration::ZERO).pause();
        Pacing::None.pause();
    }
}
