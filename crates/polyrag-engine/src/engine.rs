//! Abstract engine traits (ports) consumed by the instance pool.

use std::sync::Arc;

use async_trait::async_trait;

use polyrag_types::{KnowledgeGraph, SourceGraph};

use crate::config::EngineConfig;
use crate::error::EngineError;

/// One tenant's graph retrieval engine.
///
/// Lifecycle: `initialize` must complete before any query; `finalize`
/// must not be called twice without an intervening construction. The
/// instance pool owns both transitions; route handlers only issue
/// queries on references handed out by the pool.
#[async_trait]
pub trait Engine: std::fmt::Debug + Send + Sync {
    /// Brings up storage and loads the tenant's graph index.
    async fn initialize(&self) -> Result<(), EngineError>;

    /// Releases storage and drops the in-memory index.
    async fn finalize(&self) -> Result<(), EngineError>;

    /// Returns all labels present in the graph, sorted and deduplicated.
    async fn graph_labels(&self) -> Result<Vec<String>, EngineError>;

    /// Returns the connected subgraph around nodes carrying `label`.
    ///
    /// Traversal is breadth-first up to `max_depth` hops. When the
    /// `max_nodes` budget forces truncation, nodes closer to the start
    /// are kept first, then higher-degree nodes within the same hop.
    async fn knowledge_graph(
        &self,
        label: &str,
        max_depth: usize,
        max_nodes: usize,
    ) -> Result<KnowledgeGraph, EngineError>;

    /// Returns `node_id`, its immediate neighbors, and the connecting edges.
    async fn node_edges(&self, node_id: &str) -> Result<KnowledgeGraph, EngineError>;

    /// Returns all nodes and relationships extracted from one source document.
    ///
    /// # Errors
    /// Returns `EngineError::SourceNotFound` when no node references the
    /// source document.
    async fn source_graph(&self, source_id: &str) -> Result<SourceGraph, EngineError>;
}

/// Constructs engines from a resolved configuration.
///
/// `construct` does not initialize: the pool performs construct +
/// initialize as one atomic admission step and registers the engine
/// only when both succeed.
#[async_trait]
pub trait EngineFactory: Send + Sync {
    /// Constructs an engine for the given (already namespace-scoped) config.
    async fn construct(&self, config: &EngineConfig) -> Result<Arc<dyn Engine>, EngineError>;
}
