//! # polyrag-types
//!
//! Shared domain types for polyrag (DOMAIN layer).
//! Tenant identity, graph payload types, and the unified error type
//! used at the transport boundary.

pub mod error;
pub mod graph;
pub mod tenant;

pub use error::{ErrorKind, PolyragError};
pub use graph::{GraphEdge, GraphNode, KnowledgeGraph, SourceGraph};
pub use tenant::TenantId;
