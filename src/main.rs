//! Dashcam Telemetry CLI
//!
//! Runs OCR over extracted overlay frames, assembles `dashcam.csv`, and
//! cleans it into `filtered_dashcam.csv`.

use clap::{Parser, Subcommand};
use dashcam_telemetry::{
    analysis::{clean, TripSummary},
    config::{ConfigError, FileConfig},
    dataset::{read_records, write_indexed, write_records, AssembleError, Assembler, Record, TableError},
    metrics::{MetricsError, PipelineMetrics},
    ocr::TesseractEngine,
    stream::StreamBuilder,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "dashcam-telemetry", version, about)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory for output tables (overrides the configuration).
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Write Prometheus metrics to this file at the end of the run.
    #[arg(long, global = true)]
    metrics_out: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// OCR frame images and write the assembled table.
    Extract {
        /// Directory of `<video>/{gps,speed,time}/` frame images.
        frames_root: PathBuf,
    },
    /// Reindex and filter an assembled table.
    Clean {
        /// Assembled table (`dashcam.csv`).
        input: PathBuf,
    },
    /// Extract and clean in one run.
    Run {
        /// Directory of `<video>/{gps,speed,time}/` frame images.
        frames_root: PathBuf,
    },
}

#[derive(Debug, Error)]
enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Assemble(#[from] AssembleError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Metrics(#[from] MetricsError),
    #[error("failed to build OCR worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("failed to install Ctrl-C handler: {0}")]
    Signal(#[from] ctrlc::Error),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Dashcam Telemetry v{}", dashcam_telemetry::VERSION);

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), PipelineError> {
    let mut config = match &cli.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    if let Some(dir) = cli.output_dir {
        config.output.output_dir = dir;
    }

    let metrics = PipelineMetrics::new()?;

    match cli.command {
        Command::Extract { frames_root } => {
            extract(&config, &frames_root, &metrics)?;
        }
        Command::Clean { input } => {
            let records = read_records(&input)?;
            clean_and_write(&config, records, &metrics)?;
        }
        Command::Run { frames_root } => {
            let records = extract(&config, &frames_root, &metrics)?;
            clean_and_write(&config, records, &metrics)?;
        }
    }

    if let Some(path) = cli.metrics_out {
        write_metrics(&path, &metrics)?;
    }
    Ok(())
}

fn extract(config: &FileConfig, frames_root: &Path, metrics: &PipelineMetrics) -> Result<Vec<Record>, PipelineError> {
    let cancel = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        warn!("Interrupt received, stopping after in-flight images");
        handler_flag.store(true, Ordering::Relaxed);
    })?;

    let engine = TesseractEngine::from_config(&config.ocr);
    let assembler = Assembler::new(StreamBuilder::new(&engine).with_cancel_flag(cancel));

    let assembly = if config.ocr.workers > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.ocr.workers)
            .build()?;
        pool.install(|| assembler.assemble_all(frames_root))?
    } else {
        assembler.assemble_all(frames_root)?
    };

    metrics.record_assembly(&assembly);
    for video in &assembly.videos {
        info!(
            video = %video.video,
            rows = video.rows,
            dropped = video.dropped_frames,
            "Video summary"
        );
    }

    write_records(config.output.raw_path(), &assembly.records)?;
    Ok(assembly.records)
}

fn clean_and_write(config: &FileConfig, records: Vec<Record>, metrics: &PipelineMetrics) -> Result<(), PipelineError> {
    let outcome = clean(records, &config.filter);
    metrics.record_filter(outcome.interval, &outcome.report);

    for pass in &outcome.report.passes {
        info!(
            "{}: {} -> {} rows ({} removed)",
            pass.pass,
            pass.rows_before,
            pass.rows_after,
            pass.removed()
        );
    }
    match TripSummary::from_records(outcome.records()) {
        Some(summary) => info!("Trip: {}", summary),
        None => warn!("No rows survived filtering"),
    }

    write_indexed(config.output.cleaned_path(), outcome.records())?;
    Ok(())
}

fn write_metrics(path: &Path, metrics: &PipelineMetrics) -> Result<(), PipelineError> {
    let io_error = |source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, metrics.encode()?).map_err(io_error)?;
    info!(path = %path.display(), "Wrote metrics");
    Ok(())
}
