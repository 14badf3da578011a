//! Sliding-window repeat counting.
//!
//! Counts, for each retained incident, how many earlier retained incidents
//! share its (axis, error_code) within the trailing window
//! `[ts − window, ts)` — start inclusive, end exclusive, so an incident
//! never counts itself or anything at or after its own timestamp.
//!
//! Incidents are grouped by (axis, error_code) and each group is searched
//! with binary bounds over its timestamp-sorted members; no cross join.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// The per-incident key fields the counter needs.
#[derive(Debug, Clone)]
pub struct RepeatKey {
    pub axis: u32,
    pub error_code: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Repeat counts, index-aligned with the input slice.
///
/// Incidents without an error code get 0. Unknown axis (0) incidents group
/// with each other, matching the upstream normalization of unknown axis
/// to 0.
pub fn count_repeats(items: &[RepeatKey], window: Duration) -> Vec<u32> {
    let mut groups: HashMap<(u32, &str), Vec<DateTime<Utc>>> = HashMap::new();
    for item in items {
        if let Some(code) = item.error_code.as_deref() {
            groups
                .entry((item.axis, code))
                .or_default()
                .push(item.timestamp);
        }
    }
    for timestamps in groups.values_mut() {
        timestamps.sort_unstable();
    }

    items
        .iter()
        .map(|item| {
            let Some(code) = item.error_code.as_deref() else {
                return 0;
            };
            let Some(timestamps) = groups.get(&(item.axis, code)) else {
                return 0;
            };
            let lo = timestamps.partition_point(|t| *t < item.timestamp - window);
            let hi = timestamps.partition_point(|t| *t < item.timestamp);
            (hi - lo) as u32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn key(axis: u32, code: Option<&str>, hour: u32, min: u32) -> RepeatKey {
        RepeatKey {
            axis,
            error_code: code.map(str::to_string),
            timestamp: Utc.with_ymd_and_hms(2025, 11, 17, hour, min, 0).unwrap(),
        }
    }

    #[test]
    fn second_occurrence_counts_first() {
        let items = vec![
            key(3, Some("SRVO-160"), 9, 0),
            key(3, Some("SRVO-160"), 11, 0),
        ];
        let counts = count_repeats(&items, Duration::hours(24));
        assert_eq!(counts, vec![0, 1]);
    }

    #[test]
    fn window_start_inclusive_end_exclusive() {
        let items = vec![
            key(1, Some("SRVO-001"), 9, 0),
            key(1, Some("SRVO-001"), 10, 0),
            RepeatKey {
                axis: 1,
                error_code: Some("SRVO-001".to_string()),
                timestamp: Utc.with_ymd_and_hms(2025, 11, 18, 9, 0, 0).unwrap(),
            },
        ];
        let counts = count_repeats(&items, Duration::hours(24));
        // The day-two incident sees both prior ones: the first sits exactly
        // on the window start, which is inclusive.
        assert_eq!(counts[2], 2);
    }

    #[test]
    fn equal_timestamps_do_not_count_each_other() {
        let items = vec![
            key(2, Some("MOTN-017"), 9, 30),
            key(2, Some("MOTN-017"), 9, 30),
        ];
        let counts = count_repeats(&items, Duration::hours(24));
        assert_eq!(counts, vec![0, 0]);
    }

    #[test]
    fn different_axis_or_code_do_not_mix() {
        let items = vec![
            key(1, Some("SRVO-160"), 9, 0),
            key(2, Some("SRVO-160"), 10, 0),
            key(1, Some("SRVO-161"), 10, 0),
            key(1, Some("SRVO-160"), 10, 0),
        ];
        let counts = count_repeats(&items, Duration::hours(24));
        assert_eq!(counts, vec![0, 0, 0, 1]);
    }

    #[test]
    fn outside_window_not_counted() {
        let items = vec![
            key(1, Some("SRVO-001"), 9, 0),
            RepeatKey {
                axis: 1,
                error_code: Some("SRVO-001".to_string()),
                timestamp: Utc.with_ymd_and_hms(2025, 11, 18, 9, 0, 1).unwrap(),
            },
        ];
        let counts = count_repeats(&items, Duration::hours(24));
        assert_eq!(counts[1], 0);
    }

    #[test]
    fn missing_code_counts_zero() {
        let items = vec![key(1, None, 9, 0), key(1, None, 10, 0)];
        let counts = count_repeats(&items, Duration::hours(24));
        assert_eq!(counts, vec![0, 0]);
    }
}
