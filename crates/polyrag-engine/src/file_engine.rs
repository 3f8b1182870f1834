//! File-backed engine implementation.
//!
//! Loads the tenant's graph snapshot from
//! `<working_dir>/<namespace>/graph.json` at `initialize` and serves all
//! queries from the in-memory `GraphIndex`. A missing snapshot file is
//! a valid empty graph, not an error: the pool constructs engines for
//! any tenant id it is asked about.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use polyrag_types::{KnowledgeGraph, SourceGraph};

use crate::config::EngineConfig;
use crate::engine::{Engine, EngineFactory};
use crate::error::EngineError;
use crate::index::{GraphIndex, GraphSnapshot};

/// Name of the snapshot file inside a tenant's namespace directory.
const SNAPSHOT_FILE: &str = "graph.json";

/// Engine backed by a JSON graph snapshot on disk.
#[derive(Debug)]
pub struct GraphEngine {
    config: EngineConfig,
    index: RwLock<Option<GraphIndex>>,
}

impl GraphEngine {
    /// Creates an uninitialized engine for the given config.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            index: RwLock::new(None),
        }
    }

    /// Path of this engine's snapshot file.
    pub fn snapshot_path(&self) -> PathBuf {
        self.config
            .working_dir
            .join(&self.config.namespace)
            .join(SNAPSHOT_FILE)
    }

    async fn load_snapshot(&self) -> Result<GraphSnapshot, EngineError> {
        let path = self.snapshot_path();
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(namespace = %self.config.namespace, "no snapshot on disk, starting empty");
                return Ok(GraphSnapshot::default());
            }
            Err(e) => {
                return Err(EngineError::Snapshot {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };
        serde_json::from_slice(&bytes).map_err(|e| EngineError::Parse {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[async_trait]
impl Engine for GraphEngine {
    async fn initialize(&self) -> Result<(), EngineError> {
        let snapshot = self.load_snapshot().await?;
        let index = GraphIndex::build(snapshot);
        info!(namespace = %self.config.namespace, nodes = index.node_count(), "engine initialized");
        *self.index.write().await = Some(index);
        Ok(())
    }

    async fn finalize(&self) -> Result<(), EngineError> {
        let dropped = self.index.write().await.take();
        debug!(
            namespace = %self.config.namespace,
            was_initialized = dropped.is_some(),
            "engine finalized"
        );
        Ok(())
    }

    async fn graph_labels(&self) -> Result<Vec<String>, EngineError> {
        let guard = self.index.read().await;
        let index = guard.as_ref().ok_or(EngineError::NotInitialized)?;
        Ok(index.labels())
    }

    async fn knowledge_graph(
        &self,
        label: &str,
        max_depth: usize,
        max_nodes: usize,
    ) -> Result<KnowledgeGraph, EngineError> {
        let guard = self.index.read().await;
        let index = guard.as_ref().ok_or(EngineError::NotInitialized)?;
        Ok(index.subgraph(label, max_depth, max_nodes))
    }

    async fn node_edges(&self, node_id: &str) -> Result<KnowledgeGraph, EngineError> {
        let guard = self.index.read().await;
        let index = guard.as_ref().ok_or(EngineError::NotInitialized)?;
        index.neighbors(node_id).ok_or_else(|| EngineError::NodeNotFound {
            node_id: node_id.to_string(),
        })
    }

    async fn source_graph(&self, source_id: &str) -> Result<SourceGraph, EngineError> {
        let guard = self.index.read().await;
        let index = guard.as_ref().ok_or(EngineError::NotInitialized)?;
        let graph = index.by_source(source_id);
        if graph.nodes.is_empty() {
            return Err(EngineError::SourceNotFound {
                source_id: source_id.to_string(),
            });
        }
        Ok(graph)
    }
}

/// Default factory producing `GraphEngine` instances.
#[derive(Debug, Default, Clone)]
pub struct GraphEngineFactory;

#[async_trait]
impl EngineFactory for GraphEngineFactory {
    async fn construct(&self, config: &EngineConfig) -> Result<Arc<dyn Engine>, EngineError> {
        if config.namespace.is_empty() {
            return Err(EngineError::Config("namespace must not be empty".into()));
        }
        Ok(Arc::new(GraphEngine::new(config.clone())))
    }
}
