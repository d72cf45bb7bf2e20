#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # dbt Timeline
//!
//! Execution timeline and dependency graph reconstruction for dbt projects whose
//! run artifacts are stored in PostgreSQL by `dbt_artifacts`.
//!
//! ## Overview
//!
//! Two read-only views are derived on demand:
//!
//! - **Execution timeline**: per-model execution windows for one project on one
//!   calendar day, with millisecond durations, a warning/danger classification
//!   and the overall time extent.
//! - **Dependency graph**: which models each model reads from, extracted from
//!   model source text (`ref(...)` / `source(...)`) or folded from stored edges.
//!
//! Nothing is persisted. Every request reads from the store and derives fresh.
//!
//! ## Module Organization
//!
//! - [`timeline`] - pure timeline construction and layout
//! - [`graph`] - reference matching and dependency extraction
//! - [`services`] - request paths: catalog, timeline, graph, demo fallback
//! - [`database`] - the [`TimelineStore`] seam and its PostgreSQL implementation
//! - [`models`] - row types read from the store
//! - [`config`] - layered configuration
//! - [`logging`] - structured tracing setup
//! - [`error`] - structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dbt_timeline::config::ConfigLoader;
//! use dbt_timeline::database::{DatabaseConnection, PgTimelineStore};
//! use dbt_timeline::services::TimelineService;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new().load()?;
//! let db = DatabaseConnection::connect(&config.database).await?;
//! let store = Arc::new(PgTimelineStore::new(db.pool().clone(), &config.database));
//!
//! let service = TimelineService::new(store, &config.timeline);
//! let outcome = service.get_timeline(1, "2024-01-01").await?;
//! println!("{} executions", outcome.data().executions.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! Unit tests run without a database. Integration tests under `tests/` drive
//! the services through an in-memory store.
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests
//! ```

pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod graph;
pub mod logging;
pub mod models;
pub mod services;
pub mod timeline;

pub use config::{ConfigLoader, TimelineConfig};
pub use constants::{DataSource, ExecutionTimeStatus};
pub use database::{PgTimelineStore, TimelineStore};
pub use error::{Result, TimelineError};
pub use graph::{DependencyGraph, GraphExtractor, SourceSnapshot};
pub use models::{DependencyEdge, ExecutionRecord, ModelPerformance, ProjectRef};
pub use services::{GraphService, ProjectCatalog, TimelineOutcome, TimelineService};
pub use timeline::{DayRange, TimelineBuilder, TimelineData, TimelineWindow};
