use std::fs;
use std::io::{stderr, stdout, BufWriter};
use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use csv::WriterBuilder;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use milk_ingest::memory::{
    check_memory_availability, check_memory_pressure, estimate_file, format_file_size, memory_info,
    validate_file, MemoryMonitor, SystemMemoryProbe
};
use milk_ingest::{parse_streaming_file, CollectionRecord, ParseOptions, ParseResult, DEFAULT_CHUNK_SIZE};

/// Extracts milk collection records from CSV, Excel and DBF exports.
#[derive(Debug, Parser)]
#[command(name = "milk-ingest", version)]
struct Args {
    /// Collection export to parse (.csv, .xlsx, .xls or .dbf)
    input: PathBuf,

    /// Keep only records collected on this BS date (dd/mm/yyyy)
    #[arg(short, long)]
    date: Option<String>,

    /// Rows processed between progress updates
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Keep member codes exactly as they appear in the file
    #[arg(long)]
    no_normalize: bool,

    /// Log level: error, warn, info, debug or trace
    #[arg(long, default_value = "error")]
    log_level: String,

    /// Print statistics only, without writing records to stdout
    #[arg(long)]
    stats_only: bool
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(parse_log_level(&args.log_level));

    let file_name = args.input.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();

    let mut options = ParseOptions::new()
        .with_chunk_size(args.chunk_size)
        .with_member_code_normalization(!args.no_normalize);

    if let Some(date) = args.date {
        options = options.with_filter_date(date);
    }

    let size = fs::metadata(&args.input)
        .with_context(|| format!("Unable to read {}", args.input.display()))?
        .len();

    let estimate = estimate_file(size);
    info!("{file_name}: {}, roughly {} records", format_file_size(size), estimate.estimated_records);

    if let Some(advisory) = estimate.advisory {
        warn!("{}", advisory.message());
    }

    //NOTE: Oversize and empty files are refused here, before the file is even read into memory
    if let Err(error) = validate_file(&file_name, size, options.max_file_size) {
        eprintln!("{error}");
        exit(1);
    }

    let probe = Arc::new(SystemMemoryProbe::new());

    if !check_memory_availability(probe.as_ref()).can_process_large_file {
        warn!("Less than 200MB of memory available, parsing may be slow");
    }

    check_memory_pressure(probe.as_ref());

    let bytes = fs::read(&args.input)
        .with_context(|| format!("Unable to read {}", args.input.display()))?;

    let progress_bar = ProgressBar::new(100);
    progress_bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% | {msg}")?
            .progress_chars("█▉▊▋▌▍▎▏  ")
    );

    let mut monitor = MemoryMonitor::new(probe.clone());
    monitor.start();

    let outcome = parse_streaming_file(bytes, &file_name, options, |progress| {
        progress_bar.set_position(progress.progress as u64);
        progress_bar.set_message(progress.message);
    }).await;

    progress_bar.finish_and_clear();

    let report = monitor.stop();
    info!(
        "Process memory during parse: start {}MB, peak {}MB, now {}MB ({:+}MB)",
        report.start_mb, report.peak_mb, report.current_mb, report.increase_mb
    );
    info!("{}", memory_info(probe.as_ref()));
    check_memory_pressure(probe.as_ref());

    let result = match outcome {
        Ok(result) => result,
        Err(error) => {
            eprintln!("{error}");
            exit(1);
        }
    };

    if !args.stats_only {
        write_records_to_stdout(&result)?;
    }

    eprintln!("{}", result.stats);

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: Records go to stdout, so logging has to use stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn write_records_to_stdout(result: &ParseResult) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(stdout().lock()));

    writer.write_record(CollectionRecord::COLUMN_NAMES)?;

    for record in &result.records {
        writer.serialize(record)?;
    }

    writer.flush()?;

    Ok(())
}
