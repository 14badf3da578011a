//! Raw source ingestion.
//!
//! Each parser turns one raw maintenance-telemetry source into a normalized,
//! typed table. Every source is independently optional: an absent file
//! degrades to an empty table with a warning, never a failure. The engine
//! then nulls whatever output fields depended on the missing source.

pub mod error_logs;
pub mod maintenance_notes;
pub mod system_alerts;
pub mod torque_cycles;

use crate::config::PipelineConfig;
use crate::types::SourceTables;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Ingest errors. Only genuinely unreadable inputs surface as errors;
/// a missing file is not one of them.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Raw input file locations, conventionally under one data directory.
#[derive(Debug, Clone)]
pub struct InputPaths {
    pub error_logs: PathBuf,
    pub system_alerts: PathBuf,
    pub maintenance_notes: PathBuf,
    pub torque_cycles: PathBuf,
}

impl InputPaths {
    /// Standard file names under a raw data directory.
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            error_logs: dir.join("error_logs.txt"),
            system_alerts: dir.join("system_alerts.txt"),
            maintenance_notes: dir.join("maintenance_notes.txt"),
            torque_cycles: dir.join("torque_cycles.csv"),
        }
    }
}

/// Load all four sources, tolerating absent files.
pub fn load_sources(paths: &InputPaths, config: &PipelineConfig) -> Result<SourceTables, IngestError> {
    let default_date = config.ingest.default_log_date;

    let errors = match read_optional(&paths.error_logs)? {
        Some(raw) => error_logs::parse(&raw, default_date),
        None => Vec::new(),
    };
    let alerts = match read_optional(&paths.system_alerts)? {
        Some(raw) => system_alerts::parse(&raw, default_date),
        None => Vec::new(),
    };
    let notes = match read_optional(&paths.maintenance_notes)? {
        Some(raw) => maintenance_notes::parse(&raw),
        None => Vec::new(),
    };
    let cycles = match read_optional(&paths.torque_cycles)? {
        Some(raw) => torque_cycles::parse(&raw),
        None => Vec::new(),
    };

    info!(
        errors = errors.len(),
        alerts = alerts.len(),
        notes = notes.len(),
        cycles = cycles.len(),
        "Loaded raw sources"
    );

    Ok(SourceTables {
        errors,
        alerts,
        notes,
        cycles,
    })
}

/// Read a file to string, mapping "not found" to `None` with a warning.
fn read_optional(path: &Path) -> Result<Option<String>, IngestError> {
    match std::fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "Source file missing — treating as empty table");
            Ok(None)
        }
        Err(source) => Err(IngestError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Parse a timestamp string leniently into UTC.
///
/// Accepts RFC 3339 plus the date-time layouts the raw exports use.
/// Naive timestamps are taken as already being UTC.
pub(crate) fn parse_timestamp_lenient(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    const LAYOUTS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for layout in LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, layout) {
            return Some(naive.and_utc());
        }
    }
    None
}
