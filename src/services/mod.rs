//! # Services
//!
//! Request-level operations composed over a [`TimelineStore`](crate::database::TimelineStore).
//!
//! - [`catalog`] - project listing and lookup
//! - [`timeline_service`] - timeline requests with the demo fallback policy
//! - [`graph_service`] - extracted and stored dependency graphs
//! - [`demo`] - the placeholder dataset

pub mod catalog;
pub mod demo;
pub mod graph_service;
pub mod timeline_service;

pub use catalog::ProjectCatalog;
pub use graph_service::GraphService;
pub use timeline_service::{TimelineOutcome, TimelineService};
