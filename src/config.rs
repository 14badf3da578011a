//! Pipeline configuration — all tunable thresholds as TOML values.
//!
//! Every threshold the engine uses is a field here with a `Default` matching
//! the values the pipeline has always shipped with, so behavior is unchanged
//! when no config file is present.
//!
//! ## Loading order
//!
//! 1. `ARMWATCH_CONFIG` environment variable (path to a TOML file)
//! 2. `armwatch.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The config is passed explicitly into the engine entry point rather than
//! held in a process-wide global, so tests can vary thresholds freely.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Root pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Severity classifier thresholds
    #[serde(default)]
    pub severity: SeverityThresholds,

    /// Join/aggregation window sizes
    #[serde(default)]
    pub windows: WindowConfig,

    /// Raw source parsing knobs
    #[serde(default)]
    pub ingest: IngestConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            severity: SeverityThresholds::default(),
            windows: WindowConfig::default(),
            ingest: IngestConfig::default(),
        }
    }
}

/// Torque-percent cutoffs for the severity classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeverityThresholds {
    /// Peak torque (% of rated) at or above which an incident is medium.
    pub torque_medium_pct: f64,
    /// Peak torque (% of rated) at or above which an incident is critical.
    pub torque_critical_pct: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            torque_medium_pct: 60.0,
            torque_critical_pct: 80.0,
        }
    }
}

/// Window sizes for the correlation joins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Symmetric radius for the alert correlation window (seconds).
    pub alert_radius_secs: i64,
    /// Trailing window for repeat-event counting (hours).
    pub repeat_window_hours: i64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            alert_radius_secs: 30,
            repeat_window_hours: 24,
        }
    }
}

/// Raw source parsing knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Date attached to log/alert lines that carry a time but no date.
    /// Should match the date of the sampled robot logs.
    pub default_log_date: NaiveDate,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            // Matches the date used in the sample robot logs / torque cycles.
            default_log_date: NaiveDate::from_ymd_opt(2025, 11, 17)
                .unwrap_or(NaiveDate::MIN),
        }
    }
}

impl PipelineConfig {
    /// Load configuration using the standard search order:
    /// 1. `$ARMWATCH_CONFIG` environment variable
    /// 2. `./armwatch.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("ARMWATCH_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded pipeline config from ARMWATCH_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from ARMWATCH_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "ARMWATCH_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("armwatch.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded pipeline config from ./armwatch.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./armwatch.toml, using defaults");
                }
            }
        }

        info!("No armwatch.toml found — using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_constants() {
        let config = PipelineConfig::default();
        assert_eq!(config.severity.torque_medium_pct, 60.0);
        assert_eq!(config.severity.torque_critical_pct, 80.0);
        assert_eq!(config.windows.alert_radius_secs, 30);
        assert_eq!(config.windows.repeat_window_hours, 24);
        assert_eq!(
            config.ingest.default_log_date,
            NaiveDate::from_ymd_opt(2025, 11, 17).unwrap()
        );
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: PipelineConfig = toml::from_str(
            r#"
            [severity]
            torque_medium_pct = 55.0
            torque_critical_pct = 75.0
            "#,
        )
        .unwrap();
        assert_eq!(config.severity.torque_medium_pct, 55.0);
        assert_eq!(config.severity.torque_critical_pct, 75.0);
        // untouched sections keep defaults
        assert_eq!(config.windows.alert_radius_secs, 30);
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let config: PipelineConfig = toml::from_str("").unwrap();
        assert_eq!(config.severity.torque_critical_pct, 80.0);
    }
}
