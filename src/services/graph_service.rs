use std::sync::Arc;
use tracing::info;

use crate::config::GraphConfig;
use crate::database::TimelineStore;
use crate::error::Result;
use crate::graph::{DependencyGraph, GraphExtractor, SourceSnapshot};
use crate::logging::{log_error, log_graph_operation};

/// Dependency views: extracted from model source text, or read from stored edges
pub struct GraphService {
    store: Arc<dyn TimelineStore>,
    extractor: GraphExtractor,
}

impl std::fmt::Debug for GraphService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphService")
            .field("extractor", &self.extractor)
            .finish_non_exhaustive()
    }
}

impl GraphService {
    pub fn new(store: Arc<dyn TimelineStore>, config: &GraphConfig) -> Self {
        Self {
            store,
            extractor: GraphExtractor::from_config(config),
        }
    }

    /// Parse failures are recorded on the graph, never returned as errors
    pub fn extract(&self, snapshot: &SourceSnapshot) -> DependencyGraph {
        self.extractor.extract(snapshot)
    }

    /// Graph folded from the store's recorded edges; store failure is fatal
    pub async fn stored_graph(&self) -> Result<DependencyGraph> {
        let edges = self.store.fetch_dependency_edges().await.inspect_err(|err| {
            log_error("graph_service", "stored_graph", &err.to_string(), None);
        })?;

        let graph = DependencyGraph::from_edges(&edges);
        log_graph_operation("stored_graph", graph.unit_count(), 0, graph.edge_count());
        info!(edges = edges.len(), "Stored dependency graph loaded");
        Ok(graph)
    }
}
