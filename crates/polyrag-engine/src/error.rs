//! Engine-specific error types.

use polyrag_types::{ErrorKind, PolyragError};
use thiserror::Error;

/// Errors from engine construction, lifecycle, and queries.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine configuration is unusable.
    #[error("engine configuration error: {0}")]
    Config(String),
    /// The graph snapshot file could not be read.
    #[error("failed to read snapshot {path}: {source}")]
    Snapshot {
        /// Path of the snapshot file.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The graph snapshot file is not valid JSON.
    #[error("failed to parse snapshot {path}: {source}")]
    Parse {
        /// Path of the snapshot file.
        path: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A query was issued before `initialize` or after `finalize`.
    #[error("engine not initialized")]
    NotInitialized,
    /// The requested node does not exist in the tenant's graph.
    #[error("node not found: {node_id}")]
    NodeNotFound { node_id: String },
    /// No nodes were extracted from the requested source document.
    #[error("no nodes found for source document {source_id}")]
    SourceNotFound { source_id: String },
    /// Finalization failed.
    #[error("finalize failed: {0}")]
    Finalize(String),
}

impl From<EngineError> for PolyragError {
    fn from(e: EngineError) -> Self {
        let kind = match &e {
            EngineError::NodeNotFound { .. } | EngineError::SourceNotFound { .. } => {
                ErrorKind::NotFound
            }
            EngineError::Config(_) => ErrorKind::InvalidInput,
            EngineError::NotInitialized => ErrorKind::Unavailable,
            EngineError::Snapshot { .. } | EngineError::Parse { .. } | EngineError::Finalize(_) => {
                ErrorKind::Internal
            }
        };
        PolyragError::new(kind, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_not_found_maps_to_not_found() {
        let err: PolyragError = EngineError::SourceNotFound {
            source_id: "doc-1".into(),
        }
        .into();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn not_initialized_maps_to_unavailable() {
        let err: PolyragError = EngineError::NotInitialized.into();
        assert_eq!(err.kind, ErrorKind::Unavailable);
    }

    #[test]
    fn snapshot_error_displays_path() {
        let err = EngineError::Snapshot {
            path: "/data/tenant_x/graph.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("tenant_x"));
    }
}
