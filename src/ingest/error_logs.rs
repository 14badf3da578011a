//! Error-log line parser.
//!
//! Controller error logs arrive as free text, one fault per line, in two
//! timestamp shapes:
//!
//! ```text
//! [09:14:38] SRVO-160: Torque limit reached
//! 2025-11-17 09:14:38 - SRVO-160: Torque limit reached
//! ```
//!
//! Time-only lines get the configured default log date and are flagged
//! `estimated`; lines with no recognizable timestamp are flagged
//! `missing_timestamp` and are dropped later by the engine (correlation
//! needs a timestamp). Lines where neither a fault code nor a message can
//! be extracted are flagged `parse_error` but still carried, with the raw
//! remainder as the message.

use crate::types::{ErrorEvent, RecordStatus, TimestampSource};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// `[HH:MM:SS] rest` — time only, date comes from config.
fn bracket_time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\[(?P<time>\d{2}:\d{2}:\d{2})\]\s+(?P<rest>.+)$")
            .unwrap_or_else(|e| panic!("invalid bracket-time pattern: {e}"))
    })
}

/// `YYYY-MM-DD HH:MM:SS - rest` — full datetime in the line.
fn date_time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<date>\d{4}[-/]\d{2}[-/]\d{2})\s+(?P<time>\d{2}:\d{2}:\d{2})\s*-?\s*(?P<rest>.+)$",
        )
        .unwrap_or_else(|e| panic!("invalid date-time pattern: {e}"))
    })
}

/// `SRVO-160: message` — fault code followed by the message text.
fn error_code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?P<code>[A-Z]{3,4}-\d{3})[:\s-]+(?P<msg>.+)")
            .unwrap_or_else(|e| panic!("invalid error-code pattern: {e}"))
    })
}

/// Parse the raw error-log text into normalized rows, sorted by timestamp
/// ascending with missing timestamps last.
pub fn parse(raw: &str, default_date: NaiveDate) -> Vec<ErrorEvent> {
    let mut rows: Vec<ErrorEvent> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| parse_line(line, default_date))
        .collect();

    // Stable sort keeps input order among equal timestamps.
    rows.sort_by_key(|r| (r.timestamp.is_none(), r.timestamp));
    rows
}

fn parse_line(line: &str, default_date: NaiveDate) -> ErrorEvent {
    let (timestamp, timestamp_source, ts_note, rest) = extract_timestamp(line, default_date);

    let (error_code, message) = match error_code_re().captures(rest) {
        Some(caps) => (
            Some(caps["code"].trim().to_string()),
            Some(caps["msg"].trim().to_string()),
        ),
        None => (None, None),
    };

    // Group is the code prefix before the dash (SRVO, MOTN, ...).
    let error_group = error_code
        .as_deref()
        .and_then(|code| code.split('-').next())
        .map(str::to_string);

    let mut status = match timestamp_source {
        TimestampSource::FullDatetime => RecordStatus::Valid,
        TimestampSource::TimeOnlyDefaultDate => RecordStatus::Estimated,
        TimestampSource::Missing => RecordStatus::MissingTimestamp,
    };
    let mut notes: Vec<&str> = Vec::new();
    if let Some(note) = ts_note {
        notes.push(note);
    }
    if error_code.is_none() && message.is_none() {
        status = RecordStatus::ParseError;
        notes.push("Could not extract error_code or message from line");
    }

    ErrorEvent {
        timestamp,
        timestamp_source,
        error_code,
        error_group,
        message_raw: message.unwrap_or_else(|| rest.to_string()),
        axis: 0,
        status,
        notes: notes.join("; "),
    }
}

/// Pull the timestamp off the front of a line.
///
/// Returns (timestamp, source, hygiene note, remainder of the line).
fn extract_timestamp(
    line: &str,
    default_date: NaiveDate,
) -> (
    Option<DateTime<Utc>>,
    TimestampSource,
    Option<&'static str>,
    &str,
) {
    if let Some(caps) = bracket_time_re().captures(line) {
        let rest = caps.name("rest").map_or(line, |m| m.as_str()).trim();
        return match parse_time(&caps["time"]) {
            Some(time) => (
                Some(default_date.and_time(time).and_utc()),
                TimestampSource::TimeOnlyDefaultDate,
                Some("Date inferred from default log date"),
                rest,
            ),
            None => (
                None,
                TimestampSource::Missing,
                Some("Failed to parse time-only timestamp"),
                rest,
            ),
        };
    }

    if let Some(caps) = date_time_re().captures(line) {
        let rest = caps.name("rest").map_or(line, |m| m.as_str()).trim();
        let date_str = caps["date"].replace('/', "-");
        let parsed = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .ok()
            .zip(parse_time(&caps["time"]));
        return match parsed {
            Some((date, time)) => (
                Some(date.and_time(time).and_utc()),
                TimestampSource::FullDatetime,
                None,
                rest,
            ),
            None => (
                None,
                TimestampSource::Missing,
                Some("Failed to parse full datetime"),
                rest,
            ),
        };
    }

    (
        None,
        TimestampSource::Missing,
        Some("No timestamp present in line"),
        line,
    )
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S").ok()
}
