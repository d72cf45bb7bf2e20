//! In-memory TimelineStore for driving the services without a database

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use dbt_timeline::database::{TimelineInputs, TimelineStore};
use dbt_timeline::models::{DependencyEdge, ExecutionRecord, ModelPerformanceRow, ProjectRef};
use dbt_timeline::timeline::DayRange;
use dbt_timeline::{Result, TimelineError};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    projects: Vec<ProjectRef>,
    executions: Vec<(i32, ExecutionRecord)>,
    edges: Vec<DependencyEdge>,
    history: Vec<ModelPerformanceRow>,
    unavailable: bool,
    calls: AtomicUsize,
    last_run_limit: AtomicI64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with UpstreamUnavailable
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn with_project(mut self, project: ProjectRef) -> Self {
        self.projects.push(project);
        self
    }

    pub fn with_execution(mut self, project_id: i32, record: ExecutionRecord) -> Self {
        self.executions.push((project_id, record));
        self
    }

    pub fn with_edge(mut self, source: &str, target: &str) -> Self {
        self.edges.push(DependencyEdge::new(source, target));
        self
    }

    pub fn with_history(mut self, row: ModelPerformanceRow) -> Self {
        self.history.push(row);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_run_limit(&self) -> i64 {
        self.last_run_limit.load(Ordering::SeqCst)
    }

    fn check(&self, operation: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(TimelineError::upstream(operation, "connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl TimelineStore for InMemoryStore {
    async fn list_projects(&self) -> Result<Vec<ProjectRef>> {
        self.check("list_projects")?;
        let mut projects = self.projects.clone();
        projects.sort_by_key(|p| p.id);
        Ok(projects)
    }

    async fn find_project(&self, project_id: i32) -> Result<Option<ProjectRef>> {
        self.check("find_project")?;
        Ok(self.projects.iter().find(|p| p.id == project_id).cloned())
    }

    async fn load_timeline_inputs(&self, project_id: i32, day: &DayRange) -> Result<TimelineInputs> {
        self.check("load_timeline")?;

        let Some(project) = self.projects.iter().find(|p| p.id == project_id).cloned() else {
            return Ok(TimelineInputs::default());
        };

        let mut rows: Vec<ExecutionRecord> = self
            .executions
            .iter()
            .filter(|(id, record)| *id == project_id && day.contains(record.run_started_at))
            .map(|(_, record)| record.clone())
            .collect();
        rows.sort_by_key(|r| r.run_started_at);

        Ok(TimelineInputs {
            project: Some(project),
            rows,
        })
    }

    async fn fetch_dependency_edges(&self) -> Result<Vec<DependencyEdge>> {
        self.check("fetch_dependency_edges")?;
        Ok(self.edges.clone())
    }

    async fn fetch_performance_history(&self, run_limit: i64) -> Result<Vec<ModelPerformanceRow>> {
        self.check("fetch_performance_history")?;
        self.last_run_limit.store(run_limit, Ordering::SeqCst);
        Ok(self.history.clone())
    }
}
