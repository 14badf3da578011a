//! Events quality report.
//!
//! Downstream consumer of the written events table. Produces a JSON report
//! plus a human-readable text summary: row counts, missing-field counts,
//! severity and collision-type histograms, and a coverage ratio (rows
//! carrying both a timestamp and an error code).
//!
//! Unlike the engine, this stage does fail loudly: a missing events table
//! means the build stage never ran, which is a user-visible pipeline
//! error.

use crate::report::ReportError;
use crate::tabular::split_line;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

/// Quality metrics over one events table.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub total_events: usize,
    pub missing_timestamps: usize,
    pub missing_error_code: usize,
    pub missing_axis: usize,
    /// Sorted maps keep the serialized report deterministic.
    pub severity_counts: BTreeMap<String, usize>,
    pub collision_type_counts: BTreeMap<String, usize>,
    /// Share of rows with both a timestamp and an error code.
    pub coverage_ratio: f64,
}

/// Validate the events table at `events_path`, writing the JSON report and
/// text summary.
pub fn validate_events(
    events_path: &Path,
    report_path: &Path,
    summary_path: &Path,
) -> Result<ValidationReport, ReportError> {
    let raw = match std::fs::read_to_string(events_path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ReportError::EventsFileMissing {
                path: events_path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(ReportError::Read {
                path: events_path.to_path_buf(),
                source,
            });
        }
    };

    let report = analyze(&raw, events_path)?;

    write_file(report_path, &to_json(&report, report_path)?)?;
    write_file(summary_path, &render_summary(&report))?;

    info!(
        path = %events_path.display(),
        total = report.total_events,
        coverage = report.coverage_ratio,
        "Validated events table"
    );
    Ok(report)
}

/// Compute the report from raw CSV text.
fn analyze(raw: &str, path: &Path) -> Result<ValidationReport, ReportError> {
    let mut lines = raw.lines();
    let header = lines.next().ok_or_else(|| ReportError::Malformed {
        path: path.to_path_buf(),
        reason: "empty file".to_string(),
    })?;
    let columns = split_line(header);
    let col = |name: &str| -> Result<usize, ReportError> {
        columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| ReportError::Malformed {
                path: path.to_path_buf(),
                reason: format!("missing column '{name}'"),
            })
    };
    let idx_timestamp = col("timestamp")?;
    let idx_error_code = col("error_code")?;
    let idx_axis = col("axis")?;
    let idx_severity = col("severity")?;
    let idx_collision = col("collision_type")?;

    let mut report = ValidationReport {
        total_events: 0,
        missing_timestamps: 0,
        missing_error_code: 0,
        missing_axis: 0,
        severity_counts: BTreeMap::new(),
        collision_type_counts: BTreeMap::new(),
        coverage_ratio: 0.0,
    };
    let mut covered = 0usize;

    for line in lines.filter(|l| !l.trim().is_empty()) {
        let fields = split_line(line);
        let field = |idx: usize| fields.get(idx).map(String::as_str).unwrap_or("").trim();

        report.total_events += 1;
        let has_timestamp = !field(idx_timestamp).is_empty();
        let has_code = !field(idx_error_code).is_empty();
        if !has_timestamp {
            report.missing_timestamps += 1;
        }
        if !has_code {
            report.missing_error_code += 1;
        }
        if field(idx_axis).is_empty() {
            report.missing_axis += 1;
        }
        if has_timestamp && has_code {
            covered += 1;
        }

        let severity = field(idx_severity);
        let severity = if severity.is_empty() { "(none)" } else { severity };
        *report.severity_counts.entry(severity.to_string()).or_default() += 1;

        let collision = field(idx_collision);
        let collision = if collision.is_empty() { "(none)" } else { collision };
        *report
            .collision_type_counts
            .entry(collision.to_string())
            .or_default() += 1;
    }

    report.coverage_ratio = if report.total_events > 0 {
        covered as f64 / report.total_events as f64
    } else {
        0.0
    };
    Ok(report)
}

fn to_json(report: &ValidationReport, path: &Path) -> Result<String, ReportError> {
    serde_json::to_string_pretty(report).map_err(|e| ReportError::Malformed {
        path: path.to_path_buf(),
        reason: format!("report serialization failed: {e}"),
    })
}

/// Render the human-readable summary.
fn render_summary(report: &ValidationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total events: {}", report.total_events);
    let _ = writeln!(out, "Missing timestamps: {}", report.missing_timestamps);
    let _ = writeln!(out, "Missing error_code: {}", report.missing_error_code);
    let _ = writeln!(out, "Missing axis: {}", report.missing_axis);
    let _ = writeln!(out, "Coverage ratio: {:.2}%", report.coverage_ratio * 100.0);
    let _ = writeln!(out);
    let _ = writeln!(out, "Severity counts:");
    for (severity, count) in &report.severity_counts {
        let _ = writeln!(out, "  {severity}: {count}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Collision type counts:");
    for (collision, count) in &report.collision_type_counts {
        let _ = writeln!(out, "  {collision}: {count}");
    }
    out
}

fn write_file(path: &Path, contents: &str) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, contents).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
