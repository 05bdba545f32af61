//! Dry run: show which file each sheet row would claim, without touching disk.
//!
//! Usage: preview-matches --root <library> --sheet <export.csv> [--threshold 0.5]
//!
//! The library is mirrored into memory and the planner runs against the
//! mirror, so the plan reflects pool exhaustion and the duplicate guard.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

use genre_filer::metadata::{read_songs, ColumnMap, CsvMetadataSource};
use genre_filer::models::{RowOutcome, UnmatchedReason};
use genre_filer::normalize::CaseFolding;
use genre_filer::planner::{Planner, PlannerConfig};
use genre_filer::progress::{create_spinner, format_duration};
use genre_filer::report::{percent, write_summary, MemoryReport};
use genre_filer::scoring::DEFAULT_THRESHOLD;
use genre_filer::store::MemoryFolderStore;

#[derive(Parser)]
#[command(name = "preview-matches")]
#[command(about = "Preview the filing plan without moving anything")]
struct Args {
    #[arg(long)]
    root: PathBuf,

    #[arg(long, default_value = "UploadHere!!")]
    upload: String,

    #[arg(long)]
    sheet: PathBuf,

    #[arg(long, default_value = "1")]
    title_col: usize,

    #[arg(long, default_value = "5")]
    genre_col: usize,

    #[arg(long, default_value = "6")]
    parent_genre_col: usize,

    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,

    #[arg(long)]
    ascii_fold: bool,

    /// Print every report line, not just the plan
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let start = Instant::now();

    let columns = ColumnMap {
        title: args.title_col,
        genre: args.genre_col,
        parent_genre: args.parent_genre_col,
    };
    let mut source = CsvMetadataSource::open(&args.sheet, columns)
        .with_context(|| format!("Failed to open metadata sheet {:?}", args.sheet))?;
    let songs = read_songs(&mut source)?;

    let spinner = create_spinner("Mirroring library");
    let mut store = MemoryFolderStore::mirror(&args.root)
        .with_context(|| format!("Failed to read library {:?}", args.root))?;
    spinner.finish_and_clear();

    let config = PlannerConfig {
        threshold: args.threshold,
        folding: if args.ascii_fold {
            CaseFolding::AsciiFold
        } else {
            CaseFolding::Lowercase
        },
        ..Default::default()
    };

    let mut sink = MemoryReport::default();
    let report = Planner::prepare(&mut store, &mut sink, config, &args.upload)?.run(&songs);

    println!("\n{:-<100}", "");
    println!("{:>5}  {:<32} {:<10} {:<30} DESTINATION", "ROW", "TITLE", "SCORE", "FILE");
    println!("{:-<100}", "");
    for result in &report.results {
        let file = result.file.as_ref().map_or("-", |f| f.raw_name.as_str());
        let status = match &result.outcome {
            RowOutcome::Assigned => result.destination.to_string(),
            RowOutcome::DuplicateSkipped => format!("{} (duplicate)", result.destination),
            RowOutcome::Unmatched(UnmatchedReason::BelowThreshold) => "(no match)".to_string(),
            RowOutcome::Unmatched(reason) => format!("(failed: {:?})", reason),
        };
        println!(
            "{:>5}  {:<32} {:<10} {:<30} {}",
            result.song.row_index,
            truncate(&result.song.title, 32),
            percent(result.score),
            truncate(file, 30),
            status
        );
    }

    if args.verbose {
        println!();
        for line in &sink.lines {
            println!("{}", line);
        }
    }

    let mut summary = MemoryReport::default();
    write_summary(&mut summary, &report.stats, &report.results, &report.remaining);
    println!();
    for line in summary.lines.iter().filter(|l| !l.starts_with("Total execution")) {
        println!("{}", line);
    }
    println!("\nFolders that would be created: {}", store.folders_created());
    println!("Preview took {}", format_duration(start.elapsed()));

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max - 1).collect();
        format!("{cut}…")
    }
}
