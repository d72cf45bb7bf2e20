//! # Dependency Graph
//!
//! Static extraction of model-to-model and model-to-source dependencies from
//! dbt model source text.
//!
//! - [`matcher`] - the [`ReferenceMatcher`] seam with regex and template implementations
//! - [`snapshot`] - model source texts captured for one extraction
//! - [`extractor`] - graph assembly with self-reference exclusion and source marking
//!
//! ```rust
//! use dbt_timeline::graph::{GraphExtractor, SourceSnapshot};
//!
//! let snapshot = SourceSnapshot::new().with_unit(
//!     "orders_enriched",
//!     "select * from {{ ref('orders') }} join {{ source('raw','customers') }}",
//! );
//! let graph = GraphExtractor::default().extract(&snapshot);
//! assert_eq!(graph.to_mapping()["orders_enriched"], vec!["orders", "source:raw.customers"]);
//! ```

pub mod extractor;
pub mod matcher;
pub mod snapshot;

pub use extractor::{DependencyDescriptor, DependencyGraph, GraphExtractor};
pub use matcher::{MatchError, Reference, ReferenceMatcher, RegexReferenceMatcher, TemplateMatcher};
pub use snapshot::{SkippedUnit, SourceSnapshot};
