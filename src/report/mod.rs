//! Output snapshot and downstream validation.

pub mod events_csv;
pub mod validate;

use std::path::PathBuf;
use thiserror::Error;

/// Report-side errors. A missing events table is the one fatal,
/// user-visible condition at the pipeline boundary.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Events table not found at {path} — run the build stage first")]
    EventsFileMissing { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed events table at {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}
