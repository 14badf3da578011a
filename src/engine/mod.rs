//! Event correlation and enrichment engine.
//!
//! Fuses the four normalized source tables into the unified events table:
//! filter error events down to safety-relevant incidents, join torque
//! cycles by interval containment, attach the best system alert in a
//! symmetric time window, look back to the most recent maintenance note
//! per axis, classify severity and collision type, count repeats in a
//! trailing window, and finalize IDs and status.
//!
//! The engine is a single batch pass over read-only inputs. It never fails
//! on data quality: a missing source or field degrades to null output
//! fields on the affected rows.

pub mod alerts;
pub mod collision;
pub mod cycles;
pub mod maintenance;
pub mod repeats;
pub mod severity;

use crate::config::PipelineConfig;
use crate::types::{
    AlertLevel, AlertType, ErrorEvent, Event, MaintenanceTask, SourceTables, TimestampSource,
    EVENT_STATUS_PENDING,
};
use alerts::AlertIndex;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use cycles::CycleIndex;
use maintenance::MaintenanceIndex;
use rayon::prelude::*;
use repeats::RepeatKey;
use tracing::{debug, info};

/// Safety keyword vocabulary. An error event is retained only when its
/// message contains one of these, case-insensitively.
const SAFETY_KEYWORDS: &[&str] = &[
    "collision",
    "torque limit",
    "overtravel",
    "singularity",
    "e-stop",
    "fence open",
];

/// A retained incident mid-enrichment, before classification and IDs.
struct Draft {
    timestamp: DateTime<Utc>,
    timestamp_source: TimestampSource,
    error_code: Option<String>,
    error_group: Option<String>,
    message_raw: String,
    axis: u32,
    cycle_id: Option<String>,
    peak_torque_pct: Option<f64>,
    alert_level: Option<AlertLevel>,
    alert_type: Option<AlertType>,
    alert_message: Option<String>,
    last_maintenance_date: Option<NaiveDate>,
    last_maintenance_task: Option<MaintenanceTask>,
    days_since_last_maintenance: Option<i64>,
}

/// Build the events table from the normalized sources.
///
/// Deterministic: identical inputs produce identical output, including the
/// `event_id` assignment. Rows with equal timestamps keep their input
/// order through the stable sort.
pub fn build_events(tables: &SourceTables, config: &PipelineConfig) -> Vec<Event> {
    // Filter to safety-relevant incidents with a usable timestamp, then
    // fix the output order once. Everything downstream indexes into this
    // ordering.
    let mut retained: Vec<&ErrorEvent> = tables
        .errors
        .iter()
        .filter(|e| is_safety_relevant(&e.message_raw))
        .filter(|e| e.timestamp.is_some())
        .collect();
    retained.sort_by_key(|e| e.timestamp);

    debug!(
        total = tables.errors.len(),
        retained = retained.len(),
        "Filtered error events to safety vocabulary"
    );

    let cycle_index = CycleIndex::new(&tables.cycles);
    let alert_index = AlertIndex::new(&tables.alerts);
    let maintenance_index = MaintenanceIndex::new(&tables.notes);
    let alert_radius = Duration::seconds(config.windows.alert_radius_secs);

    let drafts: Vec<Draft> = retained
        .iter()
        .map(|event| {
            // Retained events always have a timestamp; the filter above
            // guarantees it.
            let ts = event.timestamp.unwrap_or_default();

            // 1) Torque cycle by interval containment. Axis is inherited
            //    only when the event's own axis is unknown.
            let cycle = cycle_index.containing(ts);
            let (cycle_id, peak_torque_pct) = match cycle {
                Some(c) => (c.cycle_id.clone(), c.peak_torque_pct),
                None => (None, None),
            };
            let axis = match (event.axis, cycle.map(|c| c.axis)) {
                (0, Some(cycle_axis)) if cycle_axis != 0 => cycle_axis,
                (axis, _) => axis,
            };

            // 2) Best alert in the symmetric window.
            let alert = alert_index.best_in_window(ts, alert_radius);
            let (alert_level, alert_type, alert_message) = match alert {
                Some(a) => (
                    Some(a.alert_level),
                    a.alert_type,
                    Some(a.alert_message.clone()),
                ),
                None => (None, None, None),
            };

            // 3) Maintenance lookback on the finalized axis.
            let maint = maintenance_index.last_on_or_before(axis, ts.date_naive());
            let (last_maintenance_date, last_maintenance_task, days_since_last_maintenance) =
                match maint {
                    Some(m) => (Some(m.date), m.note.task_type, Some(m.days_since)),
                    None => (None, None, None),
                };

            Draft {
                timestamp: ts,
                timestamp_source: event.timestamp_source,
                error_code: event.error_code.clone(),
                error_group: event.error_group.clone(),
                message_raw: event.message_raw.clone(),
                axis,
                cycle_id,
                peak_torque_pct,
                alert_level,
                alert_type,
                alert_message,
                last_maintenance_date,
                last_maintenance_task,
                days_since_last_maintenance,
            }
        })
        .collect();

    // Repeat counting needs the finalized axes of the whole retained set.
    let repeat_keys: Vec<RepeatKey> = drafts
        .iter()
        .map(|d| RepeatKey {
            axis: d.axis,
            error_code: d.error_code.clone(),
            timestamp: d.timestamp,
        })
        .collect();
    let repeat_counts = repeats::count_repeats(
        &repeat_keys,
        Duration::hours(config.windows.repeat_window_hours),
    );

    // Severity and collision type are pure per-row functions; classify in
    // parallel and assign IDs from the already-fixed ordering.
    let events: Vec<Event> = drafts
        .into_par_iter()
        .zip(repeat_counts)
        .enumerate()
        .map(|(i, (d, repeats_24h))| {
            let severity = severity::classify(
                d.peak_torque_pct,
                d.alert_level,
                &d.message_raw,
                &config.severity,
            );
            let collision_type = collision::classify(&d.message_raw, d.error_code.as_deref());
            Event {
                event_id: i as u64 + 1,
                timestamp: d.timestamp,
                timestamp_source: d.timestamp_source,
                error_code: d.error_code,
                error_group: d.error_group,
                message_raw: d.message_raw,
                axis: d.axis,
                cycle_id: d.cycle_id,
                force_value: d.peak_torque_pct.unwrap_or(0.0),
                peak_torque_pct: d.peak_torque_pct,
                alert_level: d.alert_level,
                alert_type: d.alert_type,
                alert_message: d.alert_message,
                last_maintenance_date: d.last_maintenance_date,
                last_maintenance_task: d.last_maintenance_task,
                days_since_last_maintenance: d.days_since_last_maintenance,
                severity,
                repeats_24h,
                collision_type,
                location: Event::location_for_axis(d.axis),
                status: EVENT_STATUS_PENDING,
            }
        })
        .collect();

    info!(events = events.len(), "Built events table");
    events
}

/// Case-insensitive substring match against the safety vocabulary.
fn is_safety_relevant(message: &str) -> bool {
    let msg = message.to_lowercase();
    SAFETY_KEYWORDS.iter().any(|kw| msg.contains(kw))
}
