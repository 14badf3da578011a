//! Maintenance-note line parser.
//!
//! Notes are date-prefixed free text, split on the first ` - ` (ASCII
//! hyphen or en dash):
//!
//! ```text
//! 2025-11-19 - Replaced motor on axis 3.
//! ```
//!
//! The axis is pulled out of the body via `axis N` / `joint N`, and the
//! task is categorized by keyword. Notes without a parseable date are kept
//! with a null date; the history lookback simply never selects them.

use crate::types::{MaintenanceNote, MaintenanceTask};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// ` - ` or ` – ` separating the date prefix from the note body.
fn date_split_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\s[-–]\s").unwrap_or_else(|e| panic!("invalid date-split pattern: {e}"))
    })
}

/// `axis 3` / `Joint 2` anywhere in the body.
fn axis_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(axis|joint)\s*(?P<num>\d+)")
            .unwrap_or_else(|e| panic!("invalid axis pattern: {e}"))
    })
}

/// Parse the raw maintenance-note text into normalized rows.
pub fn parse(raw: &str) -> Vec<MaintenanceNote> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> MaintenanceNote {
    let (date_str, rest) = match date_split_re().splitn(line, 2).collect::<Vec<_>>()[..] {
        [date_str, rest] => (Some(date_str), rest),
        _ => (None, line),
    };

    let date = date_str.and_then(parse_date);

    let axis = axis_re()
        .captures(rest)
        .and_then(|caps| caps["num"].parse::<u32>().ok());

    MaintenanceNote {
        date,
        axis,
        task_type: MaintenanceTask::detect(rest),
        note_raw: rest.to_string(),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    const LAYOUTS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];
    LAYOUTS
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(trimmed, layout).ok())
}
