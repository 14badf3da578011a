//! Torque-cycle interval containment.
//!
//! Maps a point-in-time incident to the torque cycle whose
//! `[cycle_start, cycle_end]` interval contains it (inclusive on both
//! ends). Cycles missing either endpoint never match. Overlapping cycles
//! should not occur but can with malformed exports; the first candidate by
//! ascending `cycle_start` wins, deterministically.

use crate::types::TorqueCycle;
use chrono::{DateTime, Utc};

/// Cycles with complete intervals, sorted by `cycle_start` ascending.
/// The sort is stable, so equal starts keep input order.
pub struct CycleIndex<'a> {
    cycles: Vec<(DateTime<Utc>, DateTime<Utc>, &'a TorqueCycle)>,
}

impl<'a> CycleIndex<'a> {
    pub fn new(cycles: &'a [TorqueCycle]) -> Self {
        let mut indexed: Vec<_> = cycles
            .iter()
            .filter_map(|c| Some((c.cycle_start?, c.cycle_end?, c)))
            .collect();
        indexed.sort_by_key(|(start, _, _)| *start);
        Self { cycles: indexed }
    }

    /// Find the cycle containing `ts`, first-by-start on overlap.
    pub fn containing(&self, ts: DateTime<Utc>) -> Option<&'a TorqueCycle> {
        // Cycles starting after ts can never contain it.
        let upper = self.cycles.partition_point(|(start, _, _)| *start <= ts);
        self.cycles[..upper]
            .iter()
            .find(|&&(_, end, _)| end >= ts)
            .map(|&(_, _, cycle)| cycle)
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordStatus;
    use chrono::TimeZone;

    fn cycle(id: &str, start: &str, end: &str, axis: u32, pct: f64) -> TorqueCycle {
        TorqueCycle {
            cycle_id: Some(id.to_string()),
            cycle_start: crate::ingest::parse_timestamp_lenient(start),
            cycle_end: crate::ingest::parse_timestamp_lenient(end),
            axis,
            peak_torque_pct: Some(pct),
            related_error_code: None,
            status: RecordStatus::Valid,
            notes: String::new(),
        }
    }

    fn ts(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 17, h, m, s).unwrap()
    }

    #[test]
    fn containment_is_inclusive_both_ends() {
        let cycles = vec![cycle("C-1", "2025-11-17 09:00:00", "2025-11-17 09:20:00", 3, 85.0)];
        let index = CycleIndex::new(&cycles);
        assert!(index.containing(ts(9, 0, 0)).is_some());
        assert!(index.containing(ts(9, 20, 0)).is_some());
        assert!(index.containing(ts(9, 20, 1)).is_none());
        assert!(index.containing(ts(8, 59, 59)).is_none());
    }

    #[test]
    fn overlap_resolved_by_earliest_start() {
        let cycles = vec![
            cycle("C-late", "2025-11-17 09:10:00", "2025-11-17 09:40:00", 2, 50.0),
            cycle("C-early", "2025-11-17 09:00:00", "2025-11-17 09:30:00", 1, 70.0),
        ];
        let index = CycleIndex::new(&cycles);
        let hit = index.containing(ts(9, 15, 0)).unwrap();
        assert_eq!(hit.cycle_id.as_deref(), Some("C-early"));
    }

    #[test]
    fn incomplete_intervals_never_match() {
        let mut c = cycle("C-1", "2025-11-17 09:00:00", "2025-11-17 09:20:00", 1, 50.0);
        c.cycle_end = None;
        let cycles = vec![c];
        let index = CycleIndex::new(&cycles);
        assert!(index.is_empty());
        assert!(index.containing(ts(9, 10, 0)).is_none());
    }
}
