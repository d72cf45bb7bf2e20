//! # Timeline Store
//!
//! The storage seam between services and the dbt_artifacts database. Services
//! depend on [`TimelineStore`] only; [`PgTimelineStore`] is the PostgreSQL
//! implementation. Every call acquires exactly one pooled connection, and the
//! connection returns to the pool when the guard drops on every exit path.

use async_trait::async_trait;
use sqlx::{pool::PoolConnection, PgPool, Postgres};
use std::time::Instant;

use crate::config::DatabaseConfig;
use crate::error::{Result, TimelineError};
use crate::logging::log_store_operation;
use crate::models::{DependencyEdge, ExecutionRecord, ModelPerformanceRow, ProjectRef};
use crate::timeline::DayRange;

/// Project lookup and execution rows fetched for one timeline request
#[derive(Debug, Clone, Default)]
pub struct TimelineInputs {
    pub project: Option<ProjectRef>,
    pub rows: Vec<ExecutionRecord>,
}

#[async_trait]
pub trait TimelineStore: Send + Sync {
    /// All projects, ascending by id
    async fn list_projects(&self) -> Result<Vec<ProjectRef>>;

    async fn find_project(&self, project_id: i32) -> Result<Option<ProjectRef>>;

    /// Project lookup plus the day's execution rows, read over a single connection.
    ///
    /// Rows are not fetched when the project does not exist.
    async fn load_timeline_inputs(&self, project_id: i32, day: &DayRange) -> Result<TimelineInputs>;

    async fn fetch_dependency_edges(&self) -> Result<Vec<DependencyEdge>>;

    async fn fetch_performance_history(&self, run_limit: i64) -> Result<Vec<ModelPerformanceRow>>;
}

#[derive(Debug, Clone)]
pub struct PgTimelineStore {
    pool: PgPool,
    schema: String,
    artifacts_schema: String,
}

impl PgTimelineStore {
    pub fn new(pool: PgPool, config: &DatabaseConfig) -> Self {
        Self {
            pool,
            schema: config.schema.clone(),
            artifacts_schema: config.artifacts_schema.clone(),
        }
    }

    async fn acquire(&self, operation: &str) -> Result<PoolConnection<Postgres>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| TimelineError::upstream(operation, e.to_string()))
    }
}

fn elapsed_ms(started: Instant) -> Option<u64> {
    Some(started.elapsed().as_millis() as u64)
}

#[async_trait]
impl TimelineStore for PgTimelineStore {
    async fn list_projects(&self) -> Result<Vec<ProjectRef>> {
        let started = Instant::now();
        let mut conn = self.acquire("list_projects").await?;

        let projects = ProjectRef::list_all(&mut conn, &self.schema)
            .await
            .map_err(|e| TimelineError::upstream("list_projects", e.to_string()))?;

        log_store_operation(
            "list_projects",
            None,
            "ok",
            Some(projects.len()),
            elapsed_ms(started),
        );
        Ok(projects)
    }

    async fn find_project(&self, project_id: i32) -> Result<Option<ProjectRef>> {
        let started = Instant::now();
        let mut conn = self.acquire("find_project").await?;

        let project = ProjectRef::find_by_id(&mut conn, &self.schema, project_id)
            .await
            .map_err(|e| TimelineError::upstream("find_project", e.to_string()))?;

        log_store_operation(
            "find_project",
            Some(i64::from(project_id)),
            if project.is_some() { "ok" } else { "missing" },
            None,
            elapsed_ms(started),
        );
        Ok(project)
    }

    async fn load_timeline_inputs(&self, project_id: i32, day: &DayRange) -> Result<TimelineInputs> {
        let started = Instant::now();
        let mut conn = self.acquire("load_timeline").await?;

        let project = ProjectRef::find_by_id(&mut conn, &self.schema, project_id)
            .await
            .map_err(|e| TimelineError::upstream("load_timeline", e.to_string()))?;

        if project.is_none() {
            log_store_operation(
                "load_timeline",
                Some(i64::from(project_id)),
                "missing",
                None,
                elapsed_ms(started),
            );
            return Ok(TimelineInputs::default());
        }

        let rows = ExecutionRecord::fetch_for_project_range(
            &mut conn,
            &self.schema,
            project_id,
            day.start,
            day.end,
        )
        .await
        .map_err(|e| TimelineError::upstream("load_timeline", e.to_string()))?;

        log_store_operation(
            "load_timeline",
            Some(i64::from(project_id)),
            "ok",
            Some(rows.len()),
            elapsed_ms(started),
        );
        Ok(TimelineInputs { project, rows })
    }

    async fn fetch_dependency_edges(&self) -> Result<Vec<DependencyEdge>> {
        let started = Instant::now();
        let mut conn = self.acquire("fetch_dependency_edges").await?;

        let edges = DependencyEdge::list_all(&mut conn, &self.artifacts_schema)
            .await
            .map_err(|e| TimelineError::upstream("fetch_dependency_edges", e.to_string()))?;

        log_store_operation(
            "fetch_dependency_edges",
            None,
            "ok",
            Some(edges.len()),
            elapsed_ms(started),
        );
        Ok(edges)
    }

    async fn fetch_performance_history(&self, run_limit: i64) -> Result<Vec<ModelPerformanceRow>> {
        let started = Instant::now();
        let mut conn = self.acquire("fetch_performance_history").await?;

        let rows = ModelPerformanceRow::fetch_recent(&mut conn, &self.artifacts_schema, run_limit)
            .await
            .map_err(|e| TimelineError::upstream("fetch_performance_history", e.to_string()))?;

        log_store_operation(
            "fetch_performance_history",
            None,
            "ok",
            Some(rows.len()),
            elapsed_ms(started),
        );
        Ok(rows)
    }
}
