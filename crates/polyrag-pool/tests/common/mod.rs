//! Shared mock engine and factory for pool tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use polyrag_engine::{Engine, EngineConfig, EngineError, EngineFactory};
use polyrag_pool::InstancePool;
use polyrag_types::{KnowledgeGraph, SourceGraph, TenantId};

/// In-memory engine that records its lifecycle transitions.
#[derive(Debug)]
pub struct MockEngine {
    namespace: String,
    fail_finalize: bool,
    finalized_log: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Engine for MockEngine {
    async fn initialize(&self) -> Result<(), EngineError> {
        Ok(())
    }

    async fn finalize(&self) -> Result<(), EngineError> {
        self.finalized_log
            .lock()
            .expect("log lock")
            .push(self.namespace.clone());
        if self.fail_finalize {
            return Err(EngineError::Finalize("mock finalize failure".into()));
        }
        Ok(())
    }

    async fn graph_labels(&self) -> Result<Vec<String>, EngineError> {
        Ok(vec![self.namespace.clone()])
    }

    async fn knowledge_graph(
        &self,
        _label: &str,
        _max_depth: usize,
        _max_nodes: usize,
    ) -> Result<KnowledgeGraph, EngineError> {
        Ok(KnowledgeGraph::default())
    }

    async fn node_edges(&self, node_id: &str) -> Result<KnowledgeGraph, EngineError> {
        Err(EngineError::NodeNotFound {
            node_id: node_id.to_string(),
        })
    }

    async fn source_graph(&self, source_id: &str) -> Result<SourceGraph, EngineError> {
        Err(EngineError::SourceNotFound {
            source_id: source_id.to_string(),
        })
    }
}

/// Factory with scriptable per-tenant failures and construction counting.
#[derive(Default)]
pub struct MockFactory {
    constructed: AtomicUsize,
    construction_delay: Option<std::time::Duration>,
    fail_construct: HashSet<String>,
    fail_initialize: HashSet<String>,
    fail_finalize: HashSet<String>,
    finalized_log: Arc<Mutex<Vec<String>>>,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `construct` fail for the given tenant.
    pub fn fail_construct_for(mut self, tenant: &str) -> Self {
        self.fail_construct.insert(namespace_of(tenant));
        self
    }

    /// Makes `initialize` fail for the given tenant.
    pub fn fail_initialize_for(mut self, tenant: &str) -> Self {
        self.fail_initialize.insert(namespace_of(tenant));
        self
    }

    /// Makes `finalize` fail for the given tenant.
    pub fn fail_finalize_for(mut self, tenant: &str) -> Self {
        self.fail_finalize.insert(namespace_of(tenant));
        self
    }

    /// Adds an artificial construction delay to widen race windows.
    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.construction_delay = Some(delay);
        self
    }

    /// Number of successful constructions so far.
    pub fn constructed(&self) -> usize {
        self.constructed.load(Ordering::SeqCst)
    }

    /// Namespaces finalized so far, in order.
    pub fn finalized(&self) -> Vec<String> {
        self.finalized_log.lock().expect("log lock").clone()
    }
}

#[async_trait]
impl EngineFactory for MockFactory {
    async fn construct(&self, config: &EngineConfig) -> Result<Arc<dyn Engine>, EngineError> {
        if let Some(delay) = self.construction_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_construct.contains(&config.namespace) {
            return Err(EngineError::Config("mock construction failure".into()));
        }
        self.constructed.fetch_add(1, Ordering::SeqCst);
        let engine = MockEngine {
            namespace: config.namespace.clone(),
            fail_finalize: self.fail_finalize.contains(&config.namespace),
            finalized_log: self.finalized_log.clone(),
        };
        if self.fail_initialize.contains(&config.namespace) {
            return Ok(Arc::new(FailingInitEngine(engine)));
        }
        Ok(Arc::new(engine))
    }
}

/// Wraps a `MockEngine` so that `initialize` always fails.
#[derive(Debug)]
struct FailingInitEngine(MockEngine);

#[async_trait]
impl Engine for FailingInitEngine {
    async fn initialize(&self) -> Result<(), EngineError> {
        Err(EngineError::Snapshot {
            path: "mock".into(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "mock init failure"),
        })
    }

    async fn finalize(&self) -> Result<(), EngineError> {
        self.0.finalize().await
    }

    async fn graph_labels(&self) -> Result<Vec<String>, EngineError> {
        self.0.graph_labels().await
    }

    async fn knowledge_graph(
        &self,
        label: &str,
        max_depth: usize,
        max_nodes: usize,
    ) -> Result<KnowledgeGraph, EngineError> {
        self.0.knowledge_graph(label, max_depth, max_nodes).await
    }

    async fn node_edges(&self, node_id: &str) -> Result<KnowledgeGraph, EngineError> {
        self.0.node_edges(node_id).await
    }

    async fn source_graph(&self, source_id: &str) -> Result<SourceGraph, EngineError> {
        self.0.source_graph(source_id).await
    }
}

/// The namespace the pool derives for a tenant id.
pub fn namespace_of(tenant: &str) -> String {
    format!("tenant_{tenant}")
}

pub fn id(s: &str) -> TenantId {
    TenantId::new(s).expect("tenant id")
}

/// Pool over a fresh mock factory with the given capacity.
pub fn pool_with(factory: Arc<MockFactory>, capacity: usize) -> InstancePool {
    InstancePool::new(factory, EngineConfig::default(), capacity)
}
