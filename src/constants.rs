//! # Constants
//!
//! Classification enums and default thresholds shared by the timeline and
//! dependency-graph components.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker prepended to external source dependencies
pub const SOURCE_PREFIX: &str = "source:";

/// Whole minutes below which a run is classified as success
pub const DEFAULT_WARNING_THRESHOLD_MINUTES: i64 = 5;

/// Whole minutes below which a run is classified as warning
pub const DEFAULT_DANGER_THRESHOLD_MINUTES: i64 = 15;

/// Invocations sampled by the performance history view
pub const DEFAULT_HISTORY_RUN_LIMIT: i64 = 5;

/// Historical samples kept per model in the performance view
pub const MAX_HISTORICAL_SAMPLES: usize = 5;

pub const MILLIS_PER_SECOND: f64 = 1000.0;
pub const MILLIS_PER_MINUTE: i64 = 60_000;

/// Execution duration classification shown on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionTimeStatus {
    Success,
    Warning,
    Danger,
}

impl ExecutionTimeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

impl fmt::Display for ExecutionTimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a timeline's rows came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Live,
    Demo,
}

impl DataSource {
    pub fn is_demo(&self) -> bool {
        matches!(self, Self::Demo)
    }
}

/// Pipeline layer inferred from schema or model name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineLayer {
    Staging,
    Intermediate,
    Marts,
}

impl PipelineLayer {
    /// Classify by schema name first, then by conventional name prefix
    pub fn classify(schema: &str, model_name: &str) -> Self {
        if schema.contains("staging") || model_name.starts_with("stg_") {
            Self::Staging
        } else if schema.contains("intermediate") || model_name.starts_with("int_") {
            Self::Intermediate
        } else if schema.contains("marts")
            || ["dim_", "fct_", "mart_"]
                .iter()
                .any(|prefix| model_name.starts_with(prefix))
        {
            Self::Marts
        } else {
            Self::Staging
        }
    }
}

/// Latest-run performance relative to fixed limits and the model's own average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceStatus {
    Critical,
    Slow,
    Fast,
    Normal,
}

impl PerformanceStatus {
    pub const CRITICAL_SECONDS: f64 = 5.0;
    pub const SLOW_SECONDS: f64 = 2.0;
    pub const FAST_RATIO: f64 = 0.8;

    pub fn classify(latest_seconds: f64, average_seconds: f64) -> Self {
        if latest_seconds > Self::CRITICAL_SECONDS {
            Self::Critical
        } else if latest_seconds > Self::SLOW_SECONDS {
            Self::Slow
        } else if latest_seconds < average_seconds * Self::FAST_RATIO {
            Self::Fast
        } else {
            Self::Normal
        }
    }
}
