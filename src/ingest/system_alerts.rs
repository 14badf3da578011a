//! System-alert line parser.
//!
//! Alert lines carry a time-of-day, a level, and a message:
//!
//! ```text
//! 10:03:00 NOTICE: Vibration spike on base joint
//! ```
//!
//! The date comes from the configured default log date. A line that does not
//! split into time + body is kept with a null timestamp and unknown level so
//! nothing silently disappears; the correlation window simply never matches
//! it.

use crate::types::{AlertLevel, AlertType, SystemAlert};
use chrono::{NaiveDate, NaiveTime};

/// Parse the raw system-alert text into normalized rows, sorted by
/// timestamp ascending with missing timestamps last.
pub fn parse(raw: &str, default_date: NaiveDate) -> Vec<SystemAlert> {
    let mut rows: Vec<SystemAlert> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| parse_line(line, default_date))
        .collect();

    rows.sort_by_key(|r| (r.timestamp.is_none(), r.timestamp));
    rows
}

fn parse_line(line: &str, default_date: NaiveDate) -> SystemAlert {
    let Some((time_part, rest)) = line.split_once(' ') else {
        // No time/body split at all; keep the raw text as the message.
        return SystemAlert {
            timestamp: None,
            alert_level: AlertLevel::Unknown,
            alert_type: None,
            alert_message: line.to_string(),
        };
    };

    let timestamp = NaiveTime::parse_from_str(time_part, "%H:%M:%S")
        .ok()
        .map(|time| default_date.and_time(time).and_utc());

    let (alert_level, message) = match rest.split_once(':') {
        Some((level_part, msg)) => (AlertLevel::parse(level_part), msg.trim().to_string()),
        None => (AlertLevel::Unknown, rest.trim().to_string()),
    };

    let alert_type = AlertType::detect(&message);

    SystemAlert {
        timestamp,
        alert_level,
        alert_type,
        alert_message: message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn default_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 17).unwrap()
    }

    #[test]
    fn well_formed_alert_line() {
        let rows = parse("10:03:00 NOTICE: Vibration spike on base joint", default_date());
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.alert_level, AlertLevel::Notice);
        assert_eq!(row.alert_type, Some(AlertType::Vibration));
        assert_eq!(row.alert_message, "Vibration spike on base joint");
        let ts = row.timestamp.unwrap();
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.date_naive(), default_date());
    }

    #[test]
    fn unknown_level_kept() {
        let rows = parse("10:03:00 BOGUS: something odd", default_date());
        assert_eq!(rows[0].alert_level, AlertLevel::Unknown);
        assert!(rows[0].timestamp.is_some());
    }

    #[test]
    fn line_without_level_colon() {
        let rows = parse("10:03:00 free-form note", default_date());
        let row = &rows[0];
        assert_eq!(row.alert_level, AlertLevel::Unknown);
        assert_eq!(row.alert_message, "free-form note");
    }

    #[test]
    fn unsplittable_line_keeps_raw_message() {
        let rows = parse("gibberish", default_date());
        let row = &rows[0];
        assert_eq!(row.timestamp, None);
        assert_eq!(row.alert_message, "gibberish");
    }

    #[test]
    fn sorted_by_timestamp() {
        let raw = "10:30:00 WARN: later\n09:30:00 INFO: earlier\n";
        let rows = parse(raw, default_date());
        assert_eq!(rows[0].alert_level, AlertLevel::Info);
        assert_eq!(rows[1].alert_level, AlertLevel::Warn);
    }
}
