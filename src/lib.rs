//! armwatch: robotic arm maintenance telemetry correlation.
//!
//! Batch pipeline that fuses heterogeneous maintenance telemetry — error
//! logs, system alerts, maintenance notes, and torque-cycle records — into
//! one unified events table, one row per safety-relevant incident.
//!
//! ## Architecture
//!
//! - **Ingest**: per-source line/CSV parsers producing normalized tables
//! - **Engine**: the correlation core — interval joins, alert windows,
//!   maintenance lookback, severity/collision classification, repeat
//!   counting, ID assignment
//! - **Report**: events CSV snapshot and the downstream quality report

pub mod config;
pub mod engine;
pub mod ingest;
pub mod report;
pub mod tabular;
pub mod types;

// Re-export the engine entry point
pub use engine::build_events;

// Re-export commonly used types
pub use config::{PipelineConfig, SeverityThresholds, WindowConfig};
pub use types::{
    AlertLevel, AlertType, CollisionType, ErrorEvent, Event, MaintenanceNote, MaintenanceTask,
    RecordStatus, Severity, SourceTables, SystemAlert, TimestampSource, TorqueCycle,
};

// Re-export pipeline stage interfaces
pub use ingest::{load_sources, InputPaths};
pub use report::validate::{validate_events, ValidationReport};
