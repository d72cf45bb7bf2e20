//! # Timeline Service
//!
//! Request path for the execution timeline: date parsing, project lookup, row
//! fetch, and the explicit fallback policy for an unreachable store.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::TimelineSettings;
use crate::database::{TimelineInputs, TimelineStore};
use crate::error::{Result, TimelineError};
use crate::logging::log_error;
use crate::models::ModelPerformance;
use crate::timeline::{DayRange, StatusThresholds, TimelineBuilder, TimelineData};

use super::demo::demo_timeline;

/// Result of a timeline request that did not fail
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TimelineOutcome {
    /// Built from the store
    Live(TimelineData),
    /// Store unavailable; placeholder data substituted
    Demo { data: TimelineData, reason: String },
}

impl TimelineOutcome {
    pub fn data(&self) -> &TimelineData {
        match self {
            Self::Live(data) | Self::Demo { data, .. } => data,
        }
    }

    pub fn into_data(self) -> TimelineData {
        match self {
            Self::Live(data) | Self::Demo { data, .. } => data,
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, Self::Demo { .. })
    }

    /// Why demo data was substituted, if it was
    pub fn demo_reason(&self) -> Option<&str> {
        match self {
            Self::Live(_) => None,
            Self::Demo { reason, .. } => Some(reason),
        }
    }
}

#[derive(Clone)]
pub struct TimelineService {
    store: Arc<dyn TimelineStore>,
    builder: TimelineBuilder,
    demo_fallback_enabled: bool,
    history_run_limit: i64,
}

impl std::fmt::Debug for TimelineService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineService")
            .field("builder", &self.builder)
            .field("demo_fallback_enabled", &self.demo_fallback_enabled)
            .field("history_run_limit", &self.history_run_limit)
            .finish_non_exhaustive()
    }
}

impl TimelineService {
    pub fn new(store: Arc<dyn TimelineStore>, settings: &TimelineSettings) -> Self {
        Self {
            store,
            builder: TimelineBuilder::new(StatusThresholds::from(settings)),
            demo_fallback_enabled: settings.demo_fallback_enabled,
            history_run_limit: settings.history_run_limit,
        }
    }

    pub fn builder(&self) -> &TimelineBuilder {
        &self.builder
    }

    /// Timeline for `project_id` on `date` (`YYYY-MM-DD`).
    ///
    /// `NotFound` and `InvalidDate` always propagate. `UpstreamUnavailable` is
    /// replaced by a demo-tagged outcome only when demo fallback is enabled.
    pub async fn get_timeline(&self, project_id: i32, date: &str) -> Result<TimelineOutcome> {
        let day = DayRange::parse(date)?;

        match self.store.load_timeline_inputs(project_id, &day).await {
            Ok(TimelineInputs {
                project: Some(project),
                rows,
            }) => {
                let data = self.builder.build(project, &day, &rows);
                info!(
                    project_id = project_id,
                    date = %day.date,
                    windows = data.executions.len(),
                    "Timeline built"
                );
                Ok(TimelineOutcome::Live(data))
            }
            Ok(TimelineInputs { project: None, .. }) => {
                let err = TimelineError::not_found("Project", project_id);
                log_error("timeline_service", "get_timeline", &err.to_string(), None);
                Err(err)
            }
            Err(err) if err.is_upstream_unavailable() && self.demo_fallback_enabled => {
                warn!(
                    project_id = project_id,
                    date = %day.date,
                    error = %err,
                    "Store unavailable, serving demo timeline"
                );
                Ok(TimelineOutcome::Demo {
                    data: demo_timeline(&self.builder, project_id, &day),
                    reason: err.to_string(),
                })
            }
            Err(err) => {
                log_error(
                    "timeline_service",
                    "get_timeline",
                    &err.to_string(),
                    Some(date),
                );
                Err(err)
            }
        }
    }

    /// Per-model performance over the most recent invocations, slowest average first
    pub async fn history(&self) -> Result<Vec<ModelPerformance>> {
        let rows = self
            .store
            .fetch_performance_history(self.history_run_limit)
            .await
            .inspect_err(|err| {
                log_error("timeline_service", "history", &err.to_string(), None);
            })?;

        Ok(rows.into_iter().map(ModelPerformance::from).collect())
    }
}
