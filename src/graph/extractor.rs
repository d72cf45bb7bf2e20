//! # Graph Extractor
//!
//! Builds the model dependency mapping from a [`SourceSnapshot`]. Every readable
//! model appears as a key, self-references are dropped, duplicates are kept as
//! found, and external sources carry the configured marker prefix.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::config::{GraphConfig, MatcherKind};
use crate::error::TimelineError;
use crate::logging::log_graph_operation;
use crate::models::DependencyEdge;

use super::matcher::{Reference, ReferenceMatcher, RegexReferenceMatcher, TemplateMatcher};
use super::snapshot::{SkippedUnit, SourceSnapshot};

/// One entry of a model's dependency list; serializes as a plain string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum DependencyDescriptor {
    /// Internal edge: bare model name
    Model(String),
    /// Leaf edge: marked external source, e.g. `source:raw.customers`
    Source(String),
}

impl DependencyDescriptor {
    pub fn label(&self) -> &str {
        match self {
            Self::Model(name) | Self::Source(name) => name,
        }
    }

    pub fn is_source(&self) -> bool {
        matches!(self, Self::Source(_))
    }
}

/// Mapping from model name to what it depends on
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DependencyGraph {
    pub dependencies: BTreeMap<String, Vec<DependencyDescriptor>>,
    pub skipped: Vec<SkippedUnit>,
}

impl DependencyGraph {
    /// Fold stored edges into a graph; every endpoint becomes a key
    pub fn from_edges(edges: &[DependencyEdge]) -> Self {
        let mut dependencies: BTreeMap<String, Vec<DependencyDescriptor>> = BTreeMap::new();

        for edge in edges {
            dependencies.entry(edge.source_model.clone()).or_default();
            let deps = dependencies.entry(edge.target_model.clone()).or_default();
            if !edge.is_self_edge() {
                deps.push(DependencyDescriptor::Model(edge.source_model.clone()));
            }
        }

        Self {
            dependencies,
            skipped: Vec::new(),
        }
    }

    pub fn get(&self, unit: &str) -> Option<&[DependencyDescriptor]> {
        self.dependencies.get(unit).map(Vec::as_slice)
    }

    pub fn contains_unit(&self, unit: &str) -> bool {
        self.dependencies.contains_key(unit)
    }

    pub fn unit_count(&self) -> usize {
        self.dependencies.len()
    }

    /// `(dependency -> model)` pairs in key order
    pub fn edges(&self) -> Vec<DependencyEdge> {
        self.dependencies
            .iter()
            .flat_map(|(target, deps)| {
                deps.iter()
                    .map(move |dep| DependencyEdge::new(dep.label(), target.as_str()))
            })
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.dependencies.values().map(Vec::len).sum()
    }

    /// Plain string mapping, as exposed to the serving layer
    pub fn to_mapping(&self) -> BTreeMap<String, Vec<String>> {
        self.dependencies
            .iter()
            .map(|(unit, deps)| {
                (
                    unit.clone(),
                    deps.iter().map(|d| d.label().to_string()).collect(),
                )
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct GraphExtractor {
    matcher: Box<dyn ReferenceMatcher>,
    source_prefix: String,
}

impl Default for GraphExtractor {
    fn default() -> Self {
        Self::from_config(&GraphConfig::default())
    }
}

impl GraphExtractor {
    pub fn new(matcher: Box<dyn ReferenceMatcher>, source_prefix: impl Into<String>) -> Self {
        Self {
            matcher,
            source_prefix: source_prefix.into(),
        }
    }

    pub fn from_config(config: &GraphConfig) -> Self {
        let matcher: Box<dyn ReferenceMatcher> = match config.matcher {
            MatcherKind::Regex => Box::new(RegexReferenceMatcher),
            MatcherKind::Template => Box::new(TemplateMatcher),
        };
        Self::new(matcher, config.source_prefix.clone())
    }

    pub fn matcher_name(&self) -> &'static str {
        self.matcher.name()
    }

    /// Extract dependencies for every model in the snapshot
    pub fn extract(&self, snapshot: &SourceSnapshot) -> DependencyGraph {
        let mut graph = DependencyGraph {
            dependencies: BTreeMap::new(),
            skipped: snapshot.skipped().to_vec(),
        };

        for (unit, text) in snapshot.units() {
            match self.matcher.find_references(text) {
                Ok(references) => {
                    graph
                        .dependencies
                        .insert(unit.to_string(), self.describe(unit, references));
                }
                Err(e) => {
                    let skipped = SkippedUnit {
                        unit: unit.to_string(),
                        reason: e.to_string(),
                    };
                    warn!(
                        matcher = self.matcher.name(),
                        error = %TimelineError::from(&skipped),
                        "Model source could not be parsed"
                    );
                    graph.skipped.push(skipped);
                }
            }
        }

        debug!(matcher = self.matcher.name(), "Dependency extraction finished");
        log_graph_operation(
            "extract",
            graph.unit_count(),
            graph.skipped.len(),
            graph.edge_count(),
        );

        graph
    }

    fn describe(&self, unit: &str, references: Vec<Reference>) -> Vec<DependencyDescriptor> {
        references
            .into_iter()
            .filter_map(|reference| match reference {
                Reference::Model { name } if name == unit => None,
                Reference::Model { name } => Some(DependencyDescriptor::Model(name)),
                source @ Reference::Source { .. } => Some(DependencyDescriptor::Source(format!(
                    "{}{}",
                    self.source_prefix,
                    source.qualified_name()
                ))),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(graph: &DependencyGraph, unit: &str) -> Vec<String> {
        graph
            .get(unit)
            .unwrap()
            .iter()
            .map(|d| d.label().to_string())
            .collect()
    }

    #[test]
    fn test_orders_enriched_example() {
        let snapshot = SourceSnapshot::new().with_unit(
            "orders_enriched",
            "select * from {{ ref('orders') }} join {{ source('raw','customers') }} \
             union all select * from {{ ref('orders_enriched') }}",
        );

        let graph = GraphExtractor::default().extract(&snapshot);

        assert_eq!(
            labels(&graph, "orders_enriched"),
            vec!["orders", "source:raw.customers"]
        );
        let deps = graph.get("orders_enriched").unwrap();
        assert!(!deps[0].is_source());
        assert!(deps[1].is_source());
    }

    #[test]
    fn test_units_without_references_have_empty_sets() {
        let snapshot = SourceSnapshot::new()
            .with_unit("seed_like", "select 1 as id")
            .with_unit("stg_orders", "select * from {{ source('raw', 'orders') }}");

        let graph = GraphExtractor::default().extract(&snapshot);

        assert!(graph.contains_unit("seed_like"));
        assert!(graph.get("seed_like").unwrap().is_empty());
        assert_eq!(graph.unit_count(), 2);
    }

    #[test]
    fn test_duplicates_are_preserved() {
        let snapshot = SourceSnapshot::new().with_unit(
            "fct_orders",
            "{{ ref('stg_orders') }} {{ ref('stg_orders') }}",
        );

        let graph = GraphExtractor::default().extract(&snapshot);
        assert_eq!(labels(&graph, "fct_orders"), vec!["stg_orders", "stg_orders"]);
    }

    #[test]
    fn test_template_matcher_skips_bad_unit_and_continues() {
        let extractor = GraphExtractor::from_config(&GraphConfig {
            matcher: MatcherKind::Template,
            ..Default::default()
        });
        let snapshot = SourceSnapshot::new()
            .with_unit("broken", "select * from {{ ref('orders') ")
            .with_unit("fine", "select * from {{ ref('orders') }}");

        let graph = extractor.extract(&snapshot);

        assert_eq!(extractor.matcher_name(), "template");
        assert!(!graph.contains_unit("broken"));
        assert_eq!(labels(&graph, "fine"), vec!["orders"]);
        assert_eq!(graph.skipped.len(), 1);
        assert_eq!(graph.skipped[0].unit, "broken");
    }

    #[test]
    fn test_custom_source_prefix() {
        let extractor = GraphExtractor::new(Box::new(RegexReferenceMatcher), "ext::");
        let snapshot = SourceSnapshot::new().with_unit("a", "{{ source('raw', 'events') }}");
        let graph = extractor.extract(&snapshot);
        assert_eq!(labels(&graph, "a"), vec!["ext::raw.events"]);
    }

    #[test]
    fn test_edges_and_mapping() {
        let snapshot = SourceSnapshot::new()
            .with_unit("a", "{{ ref('b') }} {{ source('raw', 'c') }}")
            .with_unit("b", "select 1");

        let graph = GraphExtractor::default().extract(&snapshot);

        assert_eq!(
            graph.edges(),
            vec![
                DependencyEdge::new("b", "a"),
                DependencyEdge::new("source:raw.c", "a"),
            ]
        );
        assert_eq!(graph.edge_count(), 2);

        let json = serde_json::to_value(graph.to_mapping()).unwrap();
        assert_eq!(json["a"], serde_json::json!(["b", "source:raw.c"]));
        assert_eq!(json["b"], serde_json::json!([]));
    }

    #[test]
    fn test_descriptor_serializes_as_string() {
        let json = serde_json::to_string(&DependencyDescriptor::Source(
            "source:raw.customers".to_string(),
        ))
        .unwrap();
        assert_eq!(json, "\"source:raw.customers\"");
    }

    #[test]
    fn test_graph_from_stored_edges() {
        let edges = vec![
            DependencyEdge::new("staging.stg_orders", "marts.fct_orders"),
            DependencyEdge::new("marts.fct_orders", "marts.fct_orders"),
            DependencyEdge::new("staging.stg_customers", "marts.fct_orders"),
        ];

        let graph = DependencyGraph::from_edges(&edges);

        assert_eq!(
            labels(&graph, "marts.fct_orders"),
            vec!["staging.stg_orders", "staging.stg_customers"]
        );
        assert!(graph.get("staging.stg_orders").unwrap().is_empty());
        assert_eq!(graph.unit_count(), 3);
    }
}
