//! Maintenance-history lookback.
//!
//! For each incident, the most recent maintenance note for the same axis
//! dated on or before the incident's calendar date. Notes are date-only;
//! the incident timestamp is reduced to its UTC calendar date before
//! comparing.

use crate::types::MaintenanceNote;
use chrono::NaiveDate;
use std::collections::HashMap;

/// The resolved maintenance context for one incident.
#[derive(Debug, Clone, Copy)]
pub struct MaintenanceMatch<'a> {
    pub note: &'a MaintenanceNote,
    pub date: NaiveDate,
    /// Whole days between note date and incident date, ≥ 0 by construction.
    pub days_since: i64,
}

/// Per-axis index of dated notes, each list sorted by date ascending.
/// Notes without a date or axis are excluded; they can never qualify.
pub struct MaintenanceIndex<'a> {
    by_axis: HashMap<u32, Vec<(NaiveDate, &'a MaintenanceNote)>>,
}

impl<'a> MaintenanceIndex<'a> {
    pub fn new(notes: &'a [MaintenanceNote]) -> Self {
        let mut by_axis: HashMap<u32, Vec<(NaiveDate, &'a MaintenanceNote)>> = HashMap::new();
        for note in notes {
            if let (Some(date), Some(axis)) = (note.date, note.axis) {
                by_axis.entry(axis).or_default().push((date, note));
            }
        }
        for list in by_axis.values_mut() {
            // Stable: equal dates keep input order, so the latest-listed
            // note wins the lookback, matching the source file order.
            list.sort_by_key(|(date, _)| *date);
        }
        Self { by_axis }
    }

    /// Most recent note for `axis` dated on or before `event_date`.
    pub fn last_on_or_before(
        &self,
        axis: u32,
        event_date: NaiveDate,
    ) -> Option<MaintenanceMatch<'a>> {
        let list = self.by_axis.get(&axis)?;
        let idx = list.partition_point(|&(date, _)| date <= event_date);
        let &(date, note) = list[..idx].last()?;
        Some(MaintenanceMatch {
            note,
            date,
            days_since: (event_date - date).num_days(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MaintenanceTask;

    fn note(date: &str, axis: u32, text: &str) -> MaintenanceNote {
        MaintenanceNote {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            axis: Some(axis),
            task_type: MaintenanceTask::detect(text),
            note_raw: text.to_string(),
        }
    }

    fn d(date: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn most_recent_prior_note_wins() {
        let notes = vec![
            note("2025-11-01", 2, "Lubricated axis 2"),
            note("2025-11-10", 2, "Replaced motor on axis 2"),
            note("2025-11-20", 2, "Checked belts on axis 2"),
        ];
        let index = MaintenanceIndex::new(&notes);
        let hit = index.last_on_or_before(2, d("2025-11-17")).unwrap();
        assert_eq!(hit.date, d("2025-11-10"));
        assert_eq!(hit.days_since, 7);
        assert_eq!(hit.note.task_type, Some(MaintenanceTask::ReplaceMotor));
    }

    #[test]
    fn same_day_note_qualifies() {
        let notes = vec![note("2025-11-17", 3, "Calibrated joint 3")];
        let index = MaintenanceIndex::new(&notes);
        let hit = index.last_on_or_before(3, d("2025-11-17")).unwrap();
        assert_eq!(hit.days_since, 0);
    }

    #[test]
    fn wrong_axis_or_future_note_is_ignored() {
        let notes = vec![
            note("2025-11-10", 1, "Lubricated axis 1"),
            note("2025-11-20", 2, "Future work on axis 2"),
        ];
        let index = MaintenanceIndex::new(&notes);
        assert!(index.last_on_or_before(2, d("2025-11-17")).is_none());
        assert!(index.last_on_or_before(5, d("2025-11-17")).is_none());
    }

    #[test]
    fn undated_or_axisless_notes_excluded() {
        let notes = vec![
            MaintenanceNote {
                date: None,
                axis: Some(2),
                task_type: None,
                note_raw: "undated".to_string(),
            },
            MaintenanceNote {
                date: Some(d("2025-11-10")),
                axis: None,
                task_type: None,
                note_raw: "no axis".to_string(),
            },
        ];
        let index = MaintenanceIndex::new(&notes);
        assert!(index.last_on_or_before(2, d("2025-11-17")).is_none());
    }
}
