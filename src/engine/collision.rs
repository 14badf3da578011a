//! Collision-type classification.
//!
//! Pure first-match-wins substring rules over the lower-cased message,
//! then the error-code prefix when no message keyword matched.

use crate::types::CollisionType;

pub fn classify(message_raw: &str, error_code: Option<&str>) -> CollisionType {
    let msg = message_raw.to_lowercase();

    if msg.contains("collision") {
        return CollisionType::HardImpact;
    }
    if msg.contains("torque limit") {
        return CollisionType::TorqueLimit;
    }
    if msg.contains("overtravel") {
        return CollisionType::Overtravel;
    }
    if msg.contains("singularity") {
        return CollisionType::PathSingularity;
    }
    if msg.contains("fence open") {
        return CollisionType::SafetyFence;
    }
    if msg.contains("e-stop") || msg.contains("estop") {
        return CollisionType::EmergencyStop;
    }

    let code = error_code.unwrap_or("").to_uppercase();
    if code.starts_with("SRVO") {
        return CollisionType::ServoFault;
    }
    if code.starts_with("MOTN") {
        return CollisionType::MotionFault;
    }
    CollisionType::Other
}
