use std::sync::Arc;
use tracing::debug;

use crate::database::TimelineStore;
use crate::error::{Result, TimelineError};
use crate::models::ProjectRef;

/// Read-only project lookup
#[derive(Clone)]
pub struct ProjectCatalog {
    store: Arc<dyn TimelineStore>,
}

impl std::fmt::Debug for ProjectCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectCatalog").finish_non_exhaustive()
    }
}

impl ProjectCatalog {
    pub fn new(store: Arc<dyn TimelineStore>) -> Self {
        Self { store }
    }

    /// Fetch a project, `NotFound` when no project has `project_id`
    pub async fn get_project(&self, project_id: i32) -> Result<ProjectRef> {
        self.store
            .find_project(project_id)
            .await?
            .ok_or_else(|| TimelineError::not_found("Project", project_id))
    }

    /// All projects, ascending by id
    pub async fn list_projects(&self) -> Result<Vec<ProjectRef>> {
        let projects = self.store.list_projects().await?;
        debug!(count = projects.len(), "Listed projects");
        Ok(projects)
    }
}
