//! # Timeline Types
//!
//! Derived, transient values rebuilt per request. Nothing here is mutated after
//! construction.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::config::TimelineSettings;
use crate::constants::{DataSource, ExecutionTimeStatus};
use crate::error::{Result, TimelineError};
use crate::models::ProjectRef;

/// One requested day: inclusive `[date 00:00:00, date 23:59:59]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub date: NaiveDate,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DayRange {
    pub const DATE_FORMAT: &'static str = "%Y-%m-%d";

    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date,
            start: date.and_time(NaiveTime::MIN),
            end: date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)),
        }
    }

    /// Parse a `YYYY-MM-DD` date string
    pub fn parse(input: &str) -> Result<Self> {
        NaiveDate::parse_from_str(input.trim(), Self::DATE_FORMAT)
            .map(Self::for_date)
            .map_err(|e| TimelineError::invalid_date(input, e.to_string()))
    }

    /// Second-granularity inclusive containment
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }

    /// Extent used when the day has no executions: `[00:00:00, next day 00:00:00)`.
    ///
    /// The last representable day ends at its final second instead.
    pub fn full_day_extent(&self) -> TimeExtent {
        let end = self
            .start
            .checked_add_signed(Duration::days(1))
            .unwrap_or(self.end);
        TimeExtent::new(self.start, end)
    }
}

/// Minimal interval covering all rendered windows; serialized as `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    into = "(NaiveDateTime, NaiveDateTime)",
    from = "(NaiveDateTime, NaiveDateTime)"
)]
pub struct TimeExtent {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeExtent {
    /// Build an extent, ordering the bounds so `start <= end` always holds
    pub fn new(a: NaiveDateTime, b: NaiveDateTime) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn span_millis(&self) -> i64 {
        self.duration().num_milliseconds()
    }
}

impl From<TimeExtent> for (NaiveDateTime, NaiveDateTime) {
    fn from(extent: TimeExtent) -> Self {
        (extent.start, extent.end)
    }
}

impl From<(NaiveDateTime, NaiveDateTime)> for TimeExtent {
    fn from((start, end): (NaiveDateTime, NaiveDateTime)) -> Self {
        Self::new(start, end)
    }
}

/// Whole-minute thresholds; boundary values fall into the slower bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusThresholds {
    pub warning_minutes: i64,
    pub danger_minutes: i64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self::from(&TimelineSettings::default())
    }
}

impl From<&TimelineSettings> for StatusThresholds {
    fn from(settings: &TimelineSettings) -> Self {
        Self {
            warning_minutes: settings.warning_threshold_minutes,
            danger_minutes: settings.danger_threshold_minutes,
        }
    }
}

impl StatusThresholds {
    pub fn classify(&self, duration_minutes: i64) -> ExecutionTimeStatus {
        if duration_minutes < self.warning_minutes {
            ExecutionTimeStatus::Success
        } else if duration_minutes < self.danger_minutes {
            ExecutionTimeStatus::Warning
        } else {
            ExecutionTimeStatus::Danger
        }
    }
}

/// Per-model derived view of one execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineWindow {
    pub model_execution_id: String,
    pub model_name: String,
    pub database: String,
    pub schema: String,
    pub dependencies: Vec<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// Milliseconds
    pub duration: i64,
    pub execution_time_status: ExecutionTimeStatus,
}

impl TimelineWindow {
    pub fn duration_minutes(&self) -> i64 {
        crate::timeline::builder::duration_minutes(self.duration)
    }
}

/// Timeline of one project for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineData {
    pub project: ProjectRef,
    pub executions: Vec<TimelineWindow>,
    pub time_extent: TimeExtent,
    pub data_source: DataSource,
}

impl TimelineData {
    pub fn is_empty(&self) -> bool {
        self.executions.is_empty()
    }

    pub fn is_demo(&self) -> bool {
        self.data_source.is_demo()
    }
}
