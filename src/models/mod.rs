//! # Models
//!
//! Row types read from the dbt_artifacts store. Queries use runtime
//! `sqlx::query_as` because schema names come from configuration.

pub mod dependency_edge;
pub mod execution_record;
pub mod model_performance;
pub mod project;

pub use dependency_edge::DependencyEdge;
pub use execution_record::ExecutionRecord;
pub use model_performance::{ModelPerformance, ModelPerformanceRow};
pub use project::ProjectRef;
