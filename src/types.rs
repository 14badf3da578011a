//! Core domain types shared across the pipeline.
//!
//! Four normalized source tables feed the correlation engine:
//! error events, system alerts, maintenance notes, and torque cycles.
//! The engine fuses them into one [`Event`] row per retained incident.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status value stamped on every emitted event.
pub const EVENT_STATUS_PENDING: &str = "pending_inspection";

// ============================================================================
// Alert levels
// ============================================================================

/// System alert level, ordered by severity rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertLevel {
    Critical,
    Alert,
    Warn,
    Notice,
    Info,
    /// Unrecognized level string in the source line.
    Unknown,
}

impl AlertLevel {
    /// Fixed severity rank: CRITICAL(5) > ALERT(4) > WARN(3) > NOTICE(2)
    /// > INFO(1) > unknown(0).
    pub fn rank(self) -> u8 {
        match self {
            Self::Critical => 5,
            Self::Alert => 4,
            Self::Warn => 3,
            Self::Notice => 2,
            Self::Info => 1,
            Self::Unknown => 0,
        }
    }

    /// Parse a level token leniently (case-insensitive, unknown tolerated).
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CRITICAL" => Self::Critical,
            "ALERT" => Self::Alert,
            "WARN" | "WARNING" => Self::Warn,
            "NOTICE" => Self::Notice,
            "INFO" => Self::Info,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Alert => "ALERT",
            Self::Warn => "WARN",
            Self::Notice => "NOTICE",
            Self::Info => "INFO",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived alert category, keyed off the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Temperature,
    Vibration,
    Network,
    Servo,
    Battery,
}

impl AlertType {
    /// First keyword match wins; `None` when no category keyword appears.
    pub fn detect(message: &str) -> Option<Self> {
        let m = message.to_lowercase();
        if m.contains("temperature") || m.contains("temp") {
            Some(Self::Temperature)
        } else if m.contains("vibration") {
            Some(Self::Vibration)
        } else if m.contains("network") {
            Some(Self::Network)
        } else if m.contains("servo") {
            Some(Self::Servo)
        } else if m.contains("battery") {
            Some(Self::Battery)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Vibration => "vibration",
            Self::Network => "network",
            Self::Servo => "servo",
            Self::Battery => "battery",
        }
    }
}

// ============================================================================
// Classifier outputs
// ============================================================================

/// Incident severity tier. Always defined for every emitted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Incident category derived from message text and error-code prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionType {
    HardImpact,
    TorqueLimit,
    Overtravel,
    PathSingularity,
    SafetyFence,
    EmergencyStop,
    ServoFault,
    MotionFault,
    Other,
}

impl CollisionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HardImpact => "hard_impact",
            Self::TorqueLimit => "torque_limit",
            Self::Overtravel => "overtravel",
            Self::PathSingularity => "path_singularity",
            Self::SafetyFence => "safety_fence",
            Self::EmergencyStop => "emergency_stop",
            Self::ServoFault => "servo_fault",
            Self::MotionFault => "motion_fault",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for CollisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Hygiene metadata
// ============================================================================

/// How an error-log timestamp was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampSource {
    /// Full date and time present in the line.
    FullDatetime,
    /// Time only; date filled from the configured default log date.
    TimeOnlyDefaultDate,
    Missing,
}

impl TimestampSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullDatetime => "full_datetime",
            Self::TimeOnlyDefaultDate => "time_only_default_date",
            Self::Missing => "missing",
        }
    }
}

/// Data hygiene status attached to parsed source rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Valid,
    /// Timestamp was inferred rather than read from the line.
    Estimated,
    MissingTimestamp,
    ParseError,
    /// One or more required fields are absent (torque cycles).
    PartialMissing,
}

impl RecordStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Estimated => "estimated",
            Self::MissingTimestamp => "missing_timestamp",
            Self::ParseError => "parse_error",
            Self::PartialMissing => "partial_missing",
        }
    }
}

// ============================================================================
// Maintenance task categories
// ============================================================================

/// Categorized maintenance task, keyed off the note text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceTask {
    ReplaceMotor,
    LubricateAxis,
    CheckBelts,
    CleanSensors,
    InspectWiring,
    CalibrateJoints,
}

impl MaintenanceTask {
    /// First keyword match wins; `None` when no task keyword appears.
    pub fn detect(note: &str) -> Option<Self> {
        let lower = note.to_lowercase();
        if lower.contains("replace") && lower.contains("motor") {
            Some(Self::ReplaceMotor)
        } else if lower.contains("lubric") {
            Some(Self::LubricateAxis)
        } else if lower.contains("belt") {
            Some(Self::CheckBelts)
        } else if lower.contains("sensor") {
            Some(Self::CleanSensors)
        } else if lower.contains("wire") {
            Some(Self::InspectWiring)
        } else if lower.contains("calib") {
            Some(Self::CalibrateJoints)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReplaceMotor => "replace_motor",
            Self::LubricateAxis => "lubricate_axis",
            Self::CheckBelts => "check_belts",
            Self::CleanSensors => "clean_sensors",
            Self::InspectWiring => "inspect_wiring",
            Self::CalibrateJoints => "calibrate_joints",
        }
    }
}

// ============================================================================
// Normalized source tables
// ============================================================================

/// One parsed error-log line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub timestamp: Option<DateTime<Utc>>,
    pub timestamp_source: TimestampSource,
    /// Fault code, `LETTERS-DIGITS` (e.g. SRVO-160).
    pub error_code: Option<String>,
    /// Code prefix before the dash (SRVO, MOTN, ...).
    pub error_group: Option<String>,
    pub message_raw: String,
    /// Robot joint number, 0 = unknown.
    pub axis: u32,
    pub status: RecordStatus,
    pub notes: String,
}

/// One parsed system-alert line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemAlert {
    pub timestamp: Option<DateTime<Utc>>,
    pub alert_level: AlertLevel,
    pub alert_type: Option<AlertType>,
    pub alert_message: String,
}

/// One parsed maintenance-note line. Dates carry no time component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceNote {
    pub date: Option<NaiveDate>,
    pub axis: Option<u32>,
    pub task_type: Option<MaintenanceTask>,
    pub note_raw: String,
}

/// One cleaned torque-cycle record. The interval is inclusive on both ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TorqueCycle {
    pub cycle_id: Option<String>,
    pub cycle_start: Option<DateTime<Utc>>,
    pub cycle_end: Option<DateTime<Utc>>,
    /// Robot joint number, 0 = unknown.
    pub axis: u32,
    /// Percent of rated torque at cycle peak.
    pub peak_torque_pct: Option<f64>,
    pub related_error_code: Option<String>,
    pub status: RecordStatus,
    pub notes: String,
}

/// The four normalized tables handed to the engine. Each is independently
/// optional upstream; an absent source arrives here as an empty vec.
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub errors: Vec<ErrorEvent>,
    pub alerts: Vec<SystemAlert>,
    pub notes: Vec<MaintenanceNote>,
    pub cycles: Vec<TorqueCycle>,
}

// ============================================================================
// Output table
// ============================================================================

/// One fully enriched incident row in the output events table.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    /// Dense 1..N sequence assigned after the final timestamp sort.
    pub event_id: u64,
    pub timestamp: DateTime<Utc>,
    pub timestamp_source: TimestampSource,
    pub error_code: Option<String>,
    pub error_group: Option<String>,
    pub message_raw: String,
    /// Finalized joint number after cycle inheritance, 0 = unknown.
    pub axis: u32,
    pub cycle_id: Option<String>,
    pub peak_torque_pct: Option<f64>,
    pub alert_level: Option<AlertLevel>,
    pub alert_type: Option<AlertType>,
    pub alert_message: Option<String>,
    pub last_maintenance_date: Option<NaiveDate>,
    pub last_maintenance_task: Option<MaintenanceTask>,
    pub days_since_last_maintenance: Option<i64>,
    pub severity: Severity,
    pub repeats_24h: u32,
    pub collision_type: CollisionType,
    /// `J{axis}` for axis > 0, else `J0`.
    pub location: String,
    /// Mirrors `peak_torque_pct`, 0.0 when no cycle matched.
    pub force_value: f64,
    pub status: &'static str,
}

impl Event {
    /// Location label derived from a joint number.
    pub fn location_for_axis(axis: u32) -> String {
        if axis == 0 {
            "J0".to_string()
        } else {
            format!("J{axis}")
        }
    }
}
