//! Graph payload types returned by the engine query surface.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A node in a tenant's knowledge graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Unique node id within the tenant's graph.
    pub id: String,
    /// Labels attached to the node (entity types, topics).
    #[serde(default)]
    pub labels: Vec<String>,
    /// Free-form node properties (description, source_id, ...).
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl GraphNode {
    /// Returns the `source_id` property, if present.
    pub fn source_id(&self) -> Option<&str> {
        self.properties.get("source_id").and_then(Value::as_str)
    }
}

/// A directed relationship between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Relationship type.
    pub relation: String,
    /// Free-form edge properties.
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// A (possibly truncated) subgraph returned by graph queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    /// Nodes in the subgraph.
    pub nodes: Vec<GraphNode>,
    /// Edges whose endpoints are both in `nodes`.
    pub edges: Vec<GraphEdge>,
    /// True when the node budget cut the traversal short.
    #[serde(default)]
    pub is_truncated: bool,
}

/// Nodes and relationships extracted from one source document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceGraph {
    /// Nodes extracted from the source document.
    pub nodes: Vec<GraphNode>,
    /// Relationships between those nodes.
    pub relationships: Vec<GraphEdge>,
}
