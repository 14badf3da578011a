//! Nearest-alert window correlation.
//!
//! For each incident, the system alerts within a closed symmetric time
//! window around the incident timestamp are ranked by level; the highest
//! rank wins. Rank ties go to the earliest alert in the window, and to
//! input order when timestamps are equal too. One alert may be attached to
//! many incidents; each incident gets at most one alert.

use crate::types::SystemAlert;
use chrono::{DateTime, Duration, Utc};

/// Timestamped alerts sorted ascending. Stable sort preserves input order
/// among equal timestamps, which fixes the tie-break order.
pub struct AlertIndex<'a> {
    alerts: Vec<(DateTime<Utc>, &'a SystemAlert)>,
}

impl<'a> AlertIndex<'a> {
    pub fn new(alerts: &'a [SystemAlert]) -> Self {
        let mut indexed: Vec<_> = alerts
            .iter()
            .filter_map(|a| Some((a.timestamp?, a)))
            .collect();
        indexed.sort_by_key(|(ts, _)| *ts);
        Self { alerts: indexed }
    }

    /// Highest-ranked alert within `[ts - radius, ts + radius]`, or `None`
    /// when the window is empty.
    pub fn best_in_window(&self, ts: DateTime<Utc>, radius: Duration) -> Option<&'a SystemAlert> {
        let lo = self.alerts.partition_point(|(t, _)| *t < ts - radius);
        let hi = self.alerts.partition_point(|(t, _)| *t <= ts + radius);

        let mut best: Option<&'a SystemAlert> = None;
        for &(_, alert) in &self.alerts[lo..hi] {
            // Strictly-greater keeps the earliest alert on rank ties.
            if best.map_or(true, |b| alert.alert_level.rank() > b.alert_level.rank()) {
                best = Some(alert);
            }
        }
        best
    }
}
