//! # Timeline Builder
//!
//! Pure transformation from raw execution rows into a classified, time-bounded
//! timeline. Rows are trusted to arrive in ascending start order (the store
//! queries them that way) and are never re-sorted.

use chrono::Duration;
use tracing::{debug, warn};

use crate::constants::{DataSource, MILLIS_PER_MINUTE, MILLIS_PER_SECOND};
use crate::models::{ExecutionRecord, ProjectRef};

use super::types::{DayRange, StatusThresholds, TimeExtent, TimelineData, TimelineWindow};

/// Convert fractional seconds to whole milliseconds, rounding half away from zero.
///
/// Negative and non-finite runtimes clamp to zero.
pub fn duration_millis(runtime_seconds: f64) -> i64 {
    if !runtime_seconds.is_finite() || runtime_seconds <= 0.0 {
        return 0;
    }
    (runtime_seconds * MILLIS_PER_SECOND).round() as i64
}

/// Whole minutes, integer division
pub fn duration_minutes(duration_ms: i64) -> i64 {
    duration_ms / MILLIS_PER_MINUTE
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineBuilder {
    thresholds: StatusThresholds,
}

impl TimelineBuilder {
    pub fn new(thresholds: StatusThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> StatusThresholds {
        self.thresholds
    }

    /// Derive the window for a single execution
    pub fn window(&self, record: &ExecutionRecord) -> TimelineWindow {
        if !record.total_runtime_seconds.is_finite() || record.total_runtime_seconds < 0.0 {
            warn!(
                unit = %record.unit_name,
                runtime_seconds = record.total_runtime_seconds,
                "Invalid runtime clamped to zero"
            );
        }

        let start_time = record.run_started_at;
        let mut duration_ms = duration_millis(record.total_runtime_seconds);
        let end_time = match Duration::try_milliseconds(duration_ms)
            .and_then(|runtime| start_time.checked_add_signed(runtime))
        {
            Some(end_time) => end_time,
            None => {
                warn!(
                    unit = %record.unit_name,
                    runtime_seconds = record.total_runtime_seconds,
                    "Runtime overflows the timestamp range, clamped to zero"
                );
                duration_ms = 0;
                start_time
            }
        };

        TimelineWindow {
            model_execution_id: record.unit_id.clone(),
            model_name: record.unit_name.clone(),
            database: record.namespace.clone(),
            schema: record.schema.clone(),
            dependencies: record.dependency_list.clone(),
            start_time,
            end_time,
            duration: duration_ms,
            execution_time_status: self.thresholds.classify(duration_minutes(duration_ms)),
        }
    }

    /// Build a live timeline for `project` on `day`
    pub fn build(
        &self,
        project: ProjectRef,
        day: &DayRange,
        rows: &[ExecutionRecord],
    ) -> TimelineData {
        self.build_tagged(project, day, rows, DataSource::Live)
    }

    /// Build a timeline tagged with its data source
    pub fn build_tagged(
        &self,
        project: ProjectRef,
        day: &DayRange,
        rows: &[ExecutionRecord],
        data_source: DataSource,
    ) -> TimelineData {
        let executions: Vec<TimelineWindow> = rows.iter().map(|row| self.window(row)).collect();
        let time_extent = compute_extent(&executions).unwrap_or_else(|| day.full_day_extent());

        debug!(
            project_id = project.id,
            date = %day.date,
            windows = executions.len(),
            data_source = ?data_source,
            "Built timeline"
        );

        TimelineData {
            project,
            executions,
            time_extent,
            data_source,
        }
    }
}

/// `(min, max)` over every start and end timestamp; `None` for no windows
pub fn compute_extent(windows: &[TimelineWindow]) -> Option<TimeExtent> {
    windows
        .iter()
        .flat_map(|w| [w.start_time, w.end_time])
        .fold(None, |acc, ts| match acc {
            None => Some((ts, ts)),
            Some((lo, hi)) => Some((lo.min(ts), hi.max(ts))),
        })
        .map(|(lo, hi)| TimeExtent::new(lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ExecutionTimeStatus;
    use chrono::NaiveDateTime;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn record(name: &str, start: &str, runtime_seconds: f64) -> ExecutionRecord {
        ExecutionRecord {
            unit_id: format!("{name}-exec"),
            unit_name: name.to_string(),
            namespace: "warehouse".to_string(),
            schema: "analytics".to_string(),
            dependency_list: vec![],
            run_started_at: ts(start),
            total_runtime_seconds: runtime_seconds,
        }
    }

    fn project() -> ProjectRef {
        ProjectRef {
            id: 1,
            name: "jaffle_shop".to_string(),
            description: None,
            created_at: None,
        }
    }

    #[test]
    fn test_two_record_example() {
        let builder = TimelineBuilder::default();
        let day = DayRange::parse("2024-01-01").unwrap();
        let rows = vec![
            record("A", "2024-01-01T10:00:00", 120.0),
            record("B", "2024-01-01T10:05:00", 1000.0),
        ];

        let timeline = builder.build(project(), &day, &rows);

        let a = &timeline.executions[0];
        assert_eq!(a.model_name, "A");
        assert_eq!(a.duration, 120_000);
        assert_eq!(a.duration_minutes(), 2);
        assert_eq!(a.end_time, ts("2024-01-01T10:02:00"));
        assert_eq!(a.execution_time_status, ExecutionTimeStatus::Success);

        let b = &timeline.executions[1];
        assert_eq!(b.duration, 1_000_000);
        assert_eq!(b.execution_time_status, ExecutionTimeStatus::Danger);

        assert_eq!(timeline.time_extent.start, ts("2024-01-01T10:00:00"));
        assert_eq!(timeline.time_extent.end, ts("2024-01-01T10:21:40"));
        assert_eq!(timeline.data_source, DataSource::Live);
    }

    #[test]
    fn test_empty_rows_use_full_day_extent() {
        let builder = TimelineBuilder::default();
        let day = DayRange::parse("2024-03-10").unwrap();

        let timeline = builder.build(project(), &day, &[]);

        assert!(timeline.is_empty());
        assert_eq!(timeline.time_extent.start, ts("2024-03-10T00:00:00"));
        assert_eq!(timeline.time_extent.end, ts("2024-03-11T00:00:00"));
    }

    #[test]
    fn test_boundary_minutes() {
        let builder = TimelineBuilder::default();
        let five = builder.window(&record("five", "2024-01-01T00:00:00", 300.0));
        let fifteen = builder.window(&record("fifteen", "2024-01-01T00:00:00", 900.0));
        let almost = builder.window(&record("almost", "2024-01-01T00:00:00", 299.999));

        assert_eq!(five.execution_time_status, ExecutionTimeStatus::Warning);
        assert_eq!(fifteen.execution_time_status, ExecutionTimeStatus::Danger);
        // 299.999 s rounds to 299_999 ms, still under five whole minutes
        assert_eq!(almost.duration, 299_999);
        assert_eq!(almost.execution_time_status, ExecutionTimeStatus::Success);
    }

    #[test]
    fn test_rounding_not_truncation() {
        assert_eq!(duration_millis(0.0016), 2);
        assert_eq!(duration_millis(1.2346), 1235);
        assert_eq!(duration_millis(0.0004), 0);
        assert_eq!(duration_millis(-3.0), 0);
        assert_eq!(duration_millis(f64::NAN), 0);
    }

    #[test]
    fn test_huge_runtime_is_clamped_instead_of_overflowing() {
        let builder = TimelineBuilder::default();
        let day = DayRange::parse("2024-01-01").unwrap();
        let rows = vec![
            record("corrupt", "2024-01-01T10:00:00", 1e13),
            record("saturated", "2024-01-01T10:00:00", f64::MAX),
            record("normal", "2024-01-01T10:05:00", 60.0),
        ];

        let timeline = builder.build(project(), &day, &rows);

        assert_eq!(timeline.executions.len(), 3);
        for window in &timeline.executions[..2] {
            assert_eq!(window.duration, 0);
            assert_eq!(window.end_time, window.start_time);
            assert_eq!(window.execution_time_status, ExecutionTimeStatus::Success);
        }
        assert_eq!(timeline.executions[2].duration, 60_000);
        assert_eq!(timeline.time_extent.end, ts("2024-01-01T10:06:00"));
    }

    #[test]
    fn test_input_order_is_preserved() {
        let builder = TimelineBuilder::default();
        let day = DayRange::parse("2024-01-01").unwrap();
        let rows = vec![
            record("late", "2024-01-01T12:00:00", 1.0),
            record("early", "2024-01-01T08:00:00", 1.0),
        ];

        let timeline = builder.build(project(), &day, &rows);
        let names: Vec<_> = timeline
            .executions
            .iter()
            .map(|w| w.model_name.as_str())
            .collect();
        assert_eq!(names, vec!["late", "early"]);
        assert_eq!(timeline.time_extent.start, ts("2024-01-01T08:00:00"));
        assert_eq!(timeline.time_extent.end, ts("2024-01-01T12:00:01"));
    }

    #[test]
    fn test_custom_thresholds() {
        let builder = TimelineBuilder::new(StatusThresholds {
            warning_minutes: 1,
            danger_minutes: 2,
        });
        let window = builder.window(&record("m", "2024-01-01T00:00:00", 90.0));
        assert_eq!(window.execution_time_status, ExecutionTimeStatus::Warning);
    }
}
