//! armwatch - robotic arm maintenance telemetry pipeline.
//!
//! Single-pass batch run: parse the raw sources, build the events table,
//! write the CSV snapshot, and validate it.
//!
//! # Usage
//!
//! ```bash
//! # Run over ./data_raw, writing to ./data_structured and ./validation
//! armwatch
//!
//! # Explicit directories and a custom config
//! armwatch --data-dir /srv/robot/raw --out-dir /srv/robot/out \
//!     --config thresholds.toml
//! ```
//!
//! # Environment Variables
//!
//! - `ARMWATCH_CONFIG`: path to a TOML config file
//! - `RUST_LOG`: logging level (default: info)

use anyhow::{Context, Result};
use armwatch::config::PipelineConfig;
use armwatch::{build_events, ingest, report};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "armwatch")]
#[command(about = "Robotic arm maintenance telemetry correlation pipeline")]
#[command(version)]
struct CliArgs {
    /// Directory containing the raw source files
    /// (error_logs.txt, system_alerts.txt, maintenance_notes.txt,
    /// torque_cycles.csv)
    #[arg(long, default_value = "data_raw")]
    data_dir: PathBuf,

    /// Directory for the events table snapshot
    #[arg(long, default_value = "data_structured")]
    out_dir: PathBuf,

    /// Directory for the validation report and summary
    #[arg(long, default_value = "validation")]
    validation_dir: PathBuf,

    /// Path to a TOML config file (overrides the standard search order)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => PipelineConfig::load_from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => PipelineConfig::load(),
    };

    info!(data_dir = %args.data_dir.display(), "Parsing raw sources");
    let paths = ingest::InputPaths::from_dir(&args.data_dir);
    let tables = ingest::load_sources(&paths, &config).context("loading raw sources")?;

    info!("Building events");
    let events = build_events(&tables, &config);

    let events_path = args.out_dir.join("events.csv");
    report::events_csv::write(&events_path, &events).context("writing events table")?;

    info!("Validating events");
    let report = report::validate::validate_events(
        &events_path,
        &args.validation_dir.join("events_quality_report.json"),
        &args.validation_dir.join("events_quality_summary.txt"),
    )
    .context("validating events table")?;

    info!(
        events = report.total_events,
        coverage = %format!("{:.2}%", report.coverage_ratio * 100.0),
        "Pipeline complete"
    );
    Ok(())
}
