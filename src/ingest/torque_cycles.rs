//! Torque-cycle CSV reader.
//!
//! The torque-cycle export comes from a vendor tool with unstable column
//! naming ("Cycle_ID", "Peak_Torque_pct_of_rated", ...). Headers are
//! normalized by substring rules, taking the first matching header in
//! header order for each canonical column.
//!
//! The peak-torque column is resolved once per run through a fallback
//! chain: a usable `peak_torque_pct` column, else the exact
//! `Peak_Torque_pct_of_rated` header, else the first header whose name
//! contains "torque" (header order), else the field stays null for every
//! cycle.

use crate::ingest::parse_timestamp_lenient;
use crate::tabular::split_line;
use crate::types::{RecordStatus, TorqueCycle};
use tracing::{debug, warn};

/// Indices of the canonical columns within the raw header.
#[derive(Debug, Default)]
struct ColumnMap {
    cycle_id: Option<usize>,
    cycle_start: Option<usize>,
    cycle_end: Option<usize>,
    axis: Option<usize>,
    peak_torque_pct: Option<usize>,
    related_error_code: Option<usize>,
}

impl ColumnMap {
    /// Classify each header by substring rules; first match per canonical
    /// column wins.
    fn from_header(header: &[String]) -> Self {
        let mut map = Self::default();
        for (i, col) in header.iter().enumerate() {
            let lc = col.to_lowercase();
            if lc.contains("cycle") && lc.contains("id") {
                map.cycle_id.get_or_insert(i);
            } else if lc.contains("start") {
                map.cycle_start.get_or_insert(i);
            } else if lc.contains("end") {
                map.cycle_end.get_or_insert(i);
            } else if lc.contains("axis") {
                map.axis.get_or_insert(i);
            } else if lc.contains("peak")
                && (lc.contains("pct") || lc.contains("percent") || lc.contains('%'))
            {
                map.peak_torque_pct.get_or_insert(i);
            } else if lc.contains("error") && lc.contains("code") {
                map.related_error_code.get_or_insert(i);
            }
        }
        map
    }
}

/// Parse the raw torque-cycle CSV into cleaned, typed rows.
pub fn parse(raw: &str) -> Vec<TorqueCycle> {
    let mut lines = raw.lines().filter(|l| !l.trim().is_empty());
    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let header = split_line(header_line);
    let columns = ColumnMap::from_header(&header);

    let rows: Vec<Vec<String>> = lines.map(split_line).collect();

    let torque_col = resolve_torque_column(&header, &columns, &rows);

    rows.iter()
        .map(|fields| build_cycle(fields, &columns, torque_col))
        .collect()
}

/// Resolve which column feeds `peak_torque_pct`. Runs once per file, not
/// per row.
fn resolve_torque_column(
    header: &[String],
    columns: &ColumnMap,
    rows: &[Vec<String>],
) -> Option<usize> {
    // 1) A recognized peak-torque column with at least one usable value.
    if let Some(idx) = columns.peak_torque_pct {
        let any_usable = rows
            .iter()
            .any(|fields| field_f64(fields, Some(idx)).is_some());
        if any_usable {
            return Some(idx);
        }
    }

    // 2) The exact vendor header.
    if let Some(idx) = header.iter().position(|c| c == "Peak_Torque_pct_of_rated") {
        debug!(column = %header[idx], "peak_torque_pct unusable; falling back to vendor header");
        return Some(idx);
    }

    // 3) First header containing "torque", in header order.
    if let Some(idx) = header
        .iter()
        .position(|c| c.to_lowercase().contains("torque"))
    {
        debug!(column = %header[idx], "peak_torque_pct unusable; inferred torque column by name");
        return Some(idx);
    }

    warn!("No torque-like column found — peak_torque_pct will be null for all cycles");
    None
}

fn build_cycle(fields: &[String], columns: &ColumnMap, torque_col: Option<usize>) -> TorqueCycle {
    let cycle_start = field_str(fields, columns.cycle_start).and_then(parse_timestamp_lenient);
    let cycle_end = field_str(fields, columns.cycle_end).and_then(parse_timestamp_lenient);
    let peak_torque_pct = field_f64(fields, torque_col);

    let missing_ts = cycle_start.is_none() || cycle_end.is_none();
    let missing_torque = peak_torque_pct.is_none();
    let (status, notes) = match (missing_ts, missing_torque) {
        (true, true) => (
            RecordStatus::PartialMissing,
            "Missing cycle_start/end and peak_torque_pct",
        ),
        (true, false) => (
            RecordStatus::PartialMissing,
            "Missing cycle_start and/or cycle_end timestamp",
        ),
        (false, true) => (RecordStatus::PartialMissing, "Missing peak_torque_pct"),
        (false, false) => (RecordStatus::Valid, ""),
    };

    TorqueCycle {
        cycle_id: field_str(fields, columns.cycle_id).map(str::to_string),
        cycle_start,
        cycle_end,
        axis: field_f64(fields, columns.axis)
            .filter(|a| *a >= 0.0)
            .map_or(0, |a| a as u32),
        peak_torque_pct,
        related_error_code: field_str(fields, columns.related_error_code).map(str::to_string),
        status,
        notes: notes.to_string(),
    }
}

/// Non-empty trimmed field at a mapped column.
fn field_str(fields: &[String], idx: Option<usize>) -> Option<&str> {
    let value = fields.get(idx?)?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn field_f64(fields: &[String], idx: Option<usize>) -> Option<f64> {
    field_str(fields, idx)?.parse::<f64>().ok()
}
