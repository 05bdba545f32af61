use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use genre_filer::metadata::{read_songs, ColumnMap, CsvMetadataSource};
use genre_filer::normalize::CaseFolding;
use genre_filer::planner::{Pacing, Planner, PlannerConfig};
use genre_filer::progress::{create_progress_bar, format_duration, log_progress, set_log_only};
use genre_filer::report::{write_summary, LogReport, ReportSink, Tee, WriterReport};
use genre_filer::scoring::DEFAULT_THRESHOLD;
use genre_filer::store::FsFolderStore;

#[derive(Parser)]
#[command(name = "genre-filer")]
#[command(about = "Match uploaded audio files to sheet rows and file them into genre folders")]
struct Args {
    /// Library root holding the upload folder and the genre folders
    #[arg(long)]
    root: PathBuf,

    /// Upload folder name under the root
    #[arg(long, default_value = "UploadHere!!")]
    upload: String,

    /// Metadata sheet exported as CSV (first row is a header)
    #[arg(long)]
    sheet: PathBuf,

    /// Zero-based column of the song title
    #[arg(long, default_value = "1")]
    title_col: usize,

    /// Zero-based column of the comma-joined genres
    #[arg(long, default_value = "5")]
    genre_col: usize,

    /// Zero-based column of the comma-joined parent genres
    #[arg(long, default_value = "6")]
    parent_genre_col: usize,

    /// Minimum similarity a file must exceed to be moved
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Fold accents and transliterate to ASCII before comparing
    #[arg(long)]
    ascii_fold: bool,

    /// Stop before the next row after this many seconds (0 = unlimited)
    #[arg(long, default_value = "330")]
    time_budget_secs: u64,

    /// Delay before each move, in milliseconds
    #[arg(long, default_value = "50")]
    pace_ms: u64,

    /// Also write the report lines to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write run stats as JSON
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Log to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Hide progress bars and log progress lines instead
    #[arg(long)]
    log_only: bool,

    /// Debug-level logging (candidate scores, folder handles)
    #[arg(long)]
    debug: bool,
}

fn init_logging(args: &Args) {
    let level = if args.debug { LevelFilter::Debug } else { LevelFilter::Info };
    let default_filter = if args.debug { "debug" } else { "info" };

    if let Some(path) = &args.log_file {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match File::create(path) {
            Ok(file) => {
                let cfg = ConfigBuilder::new()
                    .set_time_format_rfc3339()
                    .set_target_level(LevelFilter::Off)
                    .build();
                if let Err(e) = WriteLogger::init(level, cfg, file) {
                    eprintln!("[warn] file logger init failed: {e}");
                } else {
                    println!("Logs → {:?}", path);
                    return;
                }
            }
            Err(e) => eprintln!("[warn] cannot create log file {:?}: {e}", path),
        }
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    set_log_only(args.log_only);
    init_logging(&args);

    let start = Instant::now();

    let columns = ColumnMap {
        title: args.title_col,
        genre: args.genre_col,
        parent_genre: args.parent_genre_col,
    };
    info!("Reading metadata sheet: {:?}", args.sheet);
    let mut source = CsvMetadataSource::open(&args.sheet, columns)
        .with_context(|| format!("Failed to open metadata sheet {:?}", args.sheet))?;
    let songs = read_songs(&mut source).context("Failed to read metadata rows")?;
    info!("Loaded {} songs", songs.len());

    let mut store = FsFolderStore::open(&args.root)
        .with_context(|| format!("Library root {:?} is not a directory", args.root))?;

    let mut sink: Box<dyn ReportSink> = match &args.report {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create report file {:?}", path))?;
            Box::new(Tee(LogReport, WriterReport::new(file)))
        }
        None => Box::new(LogReport),
    };

    let config = PlannerConfig {
        threshold: args.threshold,
        folding: if args.ascii_fold {
            CaseFolding::AsciiFold
        } else {
            CaseFolding::Lowercase
        },
        time_budget: (args.time_budget_secs > 0).then(|| Duration::from_secs(args.time_budget_secs)),
        pacing: Pacing::FixedDelay(Duration::from_millis(args.pace_ms)),
    };
    debug!("planner config: {:?}", config);

    let planner = Planner::prepare(&mut store, sink.as_mut(), config, &args.upload)
        .context("Failed to prepare filing run")?;

    let total = songs.len() as u64;
    let pb = create_progress_bar(total, "Filing");
    let mut done = 0u64;
    let report = planner.run_with(&songs, |_| {
        done += 1;
        pb.inc(1);
        log_progress("filing", done, total, 25);
    });
    pb.finish_and_clear();

    if report.stats.stopped_early {
        warn!(
            "Stopped early after {} of {} rows",
            report.stats.rows_processed, report.stats.total_rows
        );
    }

    write_summary(sink.as_mut(), &report.stats, &report.results, &report.remaining);

    if let Some(path) = &args.stats {
        report
            .stats
            .write_to_file(path)
            .with_context(|| format!("Failed to write stats to {:?}", path))?;
        info!("Stats written to {:?}", path);
    }

    println!("\n{:=<60}", "");
    println!("Filing complete!");
    println!("  Rows processed: {}/{}", report.stats.rows_processed, report.stats.total_rows);
    println!("  Moved: {} ({:.1}%)", report.stats.moved, report.stats.match_rate());
    println!("  Duplicates skipped: {}", report.stats.duplicates_skipped);
    println!("  Unmatched: {}", report.stats.unmatched);
    println!("  Files remaining: {}", report.stats.files_remaining);
    println!("  Elapsed: {}", format_duration(start.elapsed()));
    println!("{:=<60}", "");

    Ok(())
}
