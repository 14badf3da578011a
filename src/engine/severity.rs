//! Severity classification.
//!
//! Pure rule chain over torque context, correlated alert level, and the
//! raw message. Evaluated in fixed precedence; first match wins:
//!
//! 1. Collision / e-stop message: critical at or above the critical torque
//!    threshold, otherwise high.
//! 2. Known torque: critical ≥ critical threshold, medium ≥ medium
//!    threshold, below that fall through.
//! 3. Alert level: CRITICAL → critical, ALERT/WARN → medium,
//!    NOTICE/INFO → low.
//! 4. No signal → low.

use crate::config::SeverityThresholds;
use crate::types::{AlertLevel, Severity};

pub fn classify(
    peak_torque_pct: Option<f64>,
    alert_level: Option<AlertLevel>,
    message_raw: &str,
    thresholds: &SeverityThresholds,
) -> Severity {
    let msg = message_raw.to_lowercase();

    if msg.contains("collision") || msg.contains("e-stop") {
        return match peak_torque_pct {
            Some(pct) if pct >= thresholds.torque_critical_pct => Severity::Critical,
            _ => Severity::High,
        };
    }

    if let Some(pct) = peak_torque_pct {
        if pct >= thresholds.torque_critical_pct {
            return Severity::Critical;
        }
        if pct >= thresholds.torque_medium_pct {
            return Severity::Medium;
        }
        // Low torque alone is not a signal; defer to the alert level.
    }

    match alert_level {
        Some(AlertLevel::Critical) => Severity::Critical,
        Some(AlertLevel::Alert) | Some(AlertLevel::Warn) => Severity::Medium,
        Some(AlertLevel::Notice) | Some(AlertLevel::Info) => Severity::Low,
        Some(AlertLevel::Unknown) | None => Severity::Low,
    }
}
