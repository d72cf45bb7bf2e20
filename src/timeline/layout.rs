//! # Visible-Range Layout
//!
//! Projects timeline windows onto a visible time range as percentage offsets,
//! the shape a horizontal bar chart consumes.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::types::{TimeExtent, TimelineData};

/// Narrowest bar emitted, so very short runs stay visible
pub const MIN_WIDTH_PERCENT: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRow {
    pub model_name: String,
    pub start_percent: f64,
    pub width_percent: f64,
    pub dependencies: Vec<String>,
}

/// Rows for every window overlapping `visible`, clamped to it
pub fn layout_rows(data: &TimelineData, visible: TimeExtent) -> Vec<TimelineRow> {
    let span = visible.span_millis();
    if span <= 0 {
        return Vec::new();
    }
    let span = span as f64;

    data.executions
        .iter()
        .filter(|w| w.end_time >= visible.start && w.start_time <= visible.end)
        .map(|w| {
            let clamped_start = w.start_time.max(visible.start);
            let clamped_end = w.end_time.min(visible.end);

            TimelineRow {
                model_name: w.model_name.clone(),
                start_percent: millis_between(visible.start, clamped_start) / span * 100.0,
                width_percent: (millis_between(clamped_start, clamped_end) / span * 100.0)
                    .max(MIN_WIDTH_PERCENT),
                dependencies: w.dependencies.clone(),
            }
        })
        .collect()
}

fn millis_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64
}
