//! Events table CSV snapshot.
//!
//! The events table is interchanged as a flat CSV with a fixed column
//! order. Written once per run; the writer is the sole producer of the
//! output table.

use crate::report::ReportError;
use crate::tabular::join_line;
use crate::types::Event;
use chrono::SecondsFormat;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Stable output column order.
pub const COLUMNS: &[&str] = &[
    "event_id",
    "timestamp",
    "timestamp_source",
    "error_code",
    "error_group",
    "message_raw",
    "axis",
    "cycle_id",
    "peak_torque_pct",
    "alert_level",
    "alert_type",
    "alert_message",
    "last_maintenance_date",
    "last_maintenance_task",
    "days_since_last_maintenance",
    "severity",
    "repeats_24h",
    "collision_type",
    "location",
    "force_value",
    "status",
];

/// Write the events table to `path`, creating parent directories as
/// needed.
pub fn write(path: &Path, events: &[Event]) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    let mut out = String::new();
    out.push_str(&COLUMNS.join(","));
    out.push('\n');
    for event in events {
        out.push_str(&join_line(&row_fields(event)));
        out.push('\n');
    }

    let mut file = std::fs::File::create(path).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(out.as_bytes())
        .map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    info!(path = %path.display(), rows = events.len(), "Wrote events table");
    Ok(())
}

fn row_fields(event: &Event) -> Vec<String> {
    vec![
        event.event_id.to_string(),
        event
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        event.timestamp_source.as_str().to_string(),
        event.error_code.clone().unwrap_or_default(),
        event.error_group.clone().unwrap_or_default(),
        event.message_raw.clone(),
        event.axis.to_string(),
        event.cycle_id.clone().unwrap_or_default(),
        event
            .peak_torque_pct
            .map(|v| v.to_string())
            .unwrap_or_default(),
        event
            .alert_level
            .map(|l| l.as_str().to_string())
            .unwrap_or_default(),
        event
            .alert_type
            .map(|t| t.as_str().to_string())
            .unwrap_or_default(),
        event.alert_message.clone().unwrap_or_default(),
        event
            .last_maintenance_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        event
            .last_maintenance_task
            .map(|t| t.as_str().to_string())
            .unwrap_or_default(),
        event
            .days_since_last_maintenance
            .map(|d| d.to_string())
            .unwrap_or_default(),
        event.severity.as_str().to_string(),
        event.repeats_24h.to_string(),
        event.collision_type.as_str().to_string(),
        event.location.clone(),
        event.force_value.to_string(),
        event.status.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CollisionType, Severity, TimestampSource, EVENT_STATUS_PENDING};
    use chrono::{TimeZone, Utc};

    fn sample_event() -> Event {
        Event {
            event_id: 1,
            timestamp: Utc.with_ymd_and_hms(2025, 11, 17, 9, 0, 0).unwrap(),
            timestamp_source: TimestampSource::FullDatetime,
            error_code: Some("SRVO-050".to_string()),
            error_group: Some("SRVO".to_string()),
            message_raw: "Collision detected, axis stalled".to_string(),
            axis: 3,
            cycle_id: Some("C-1".to_string()),
            peak_torque_pct: Some(85.0),
            alert_level: None,
            alert_type: None,
            alert_message: None,
            last_maintenance_date: None,
            last_maintenance_task: None,
            days_since_last_maintenance: None,
            severity: Severity::Critical,
            repeats_24h: 0,
            collision_type: CollisionType::HardImpact,
            location: "J3".to_string(),
            force_value: 85.0,
            status: EVENT_STATUS_PENDING,
        }
    }

    #[test]
    fn header_matches_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.csv");
        write(&path, &[sample_event()]).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let header = raw.lines().next().unwrap();
        assert_eq!(header, COLUMNS.join(","));
    }

    #[test]
    fn comma_in_message_is_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.csv");
        write(&path, &[sample_event()]).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let row = raw.lines().nth(1).unwrap();
        assert!(row.contains("\"Collision detected, axis stalled\""));
        let fields = crate::tabular::split_line(row);
        assert_eq!(fields.len(), COLUMNS.len());
        assert_eq!(fields[0], "1");
        assert_eq!(fields[1], "2025-11-17T09:00:00Z");
        assert_eq!(fields[20], "pending_inspection");
    }

    #[test]
    fn rewrite_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        let events = [sample_event()];
        write(&a, &events).unwrap();
        write(&b, &events).unwrap();
        assert_eq!(
            std::fs::read(&a).unwrap(),
            std::fs::read(&b).unwrap()
        );
    }
}
