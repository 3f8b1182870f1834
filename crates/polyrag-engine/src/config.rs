//! Engine construction parameters.
//!
//! `EngineConfig` is the immutable template shared by all tenants; the
//! pool substitutes the per-tenant `namespace` before handing it to the
//! factory. `EngineOverrides` carries optional per-call overrides with
//! explicit field-by-field merge semantics.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Construction parameters for one engine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Root directory holding all tenant namespaces.
    pub working_dir: PathBuf,
    /// Storage namespace for this instance (derived from the tenant id).
    pub namespace: String,
    /// Key-value storage backend selector.
    pub kv_backend: String,
    /// Graph storage backend selector.
    pub graph_backend: String,
    /// Vector storage backend selector.
    pub vector_backend: String,
    /// Token budget per chunk at ingestion time.
    pub chunk_token_size: usize,
    /// Token overlap between adjacent chunks.
    pub chunk_overlap_token_size: usize,
    /// Name of the LLM used for extraction and answering.
    pub llm_model_name: String,
    /// Maximum concurrent LLM calls per engine.
    pub llm_max_async: usize,
    /// Name of the embedding model.
    pub embedding_model_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("./data"),
            namespace: String::new(),
            kv_backend: "json_kv".to_string(),
            graph_backend: "json_graph".to_string(),
            vector_backend: "nano_vector".to_string(),
            chunk_token_size: 1200,
            chunk_overlap_token_size: 100,
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_max_async: 4,
            embedding_model_name: "text-embedding-3-small".to_string(),
        }
    }
}

impl EngineConfig {
    /// Returns a copy with `namespace` replaced.
    pub fn with_namespace(&self, namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..self.clone()
        }
    }

    /// Merges per-call overrides onto this config.
    ///
    /// Each `Some` field in `overrides` replaces the corresponding base
    /// field; `None` fields leave the base value untouched. The receiver
    /// is not mutated.
    pub fn merge(&self, overrides: &EngineOverrides) -> Self {
        let mut merged = self.clone();
        if let Some(v) = &overrides.working_dir {
            merged.working_dir = v.clone();
        }
        if let Some(v) = &overrides.kv_backend {
            merged.kv_backend = v.clone();
        }
        if let Some(v) = &overrides.graph_backend {
            merged.graph_backend = v.clone();
        }
        if let Some(v) = &overrides.vector_backend {
            merged.vector_backend = v.clone();
        }
        if let Some(v) = overrides.chunk_token_size {
            merged.chunk_token_size = v;
        }
        if let Some(v) = overrides.chunk_overlap_token_size {
            merged.chunk_overlap_token_size = v;
        }
        if let Some(v) = &overrides.llm_model_name {
            merged.llm_model_name = v.clone();
        }
        if let Some(v) = overrides.llm_max_async {
            merged.llm_max_async = v;
        }
        if let Some(v) = &overrides.embedding_model_name {
            merged.embedding_model_name = v.clone();
        }
        merged
    }
}

/// Optional per-call overrides for `EngineConfig`.
///
/// `namespace` is deliberately absent: it is always derived from the
/// tenant id by the pool and cannot be overridden.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineOverrides {
    pub working_dir: Option<PathBuf>,
    pub kv_backend: Option<String>,
    pub graph_backend: Option<String>,
    pub vector_backend: Option<String>,
    pub chunk_token_size: Option<usize>,
    pub chunk_overlap_token_size: Option<usize>,
    pub llm_model_name: Option<String>,
    pub llm_max_async: Option<usize>,
    pub embedding_model_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_with_empty_overrides_is_identity() {
        let base = EngineConfig::default();
        assert_eq!(base.merge(&EngineOverrides::default()), base);
    }

    #[test]
    fn merge_replaces_only_some_fields() {
        let base = EngineConfig::default();
        let overrides = EngineOverrides {
            chunk_token_size: Some(800),
            llm_model_name: Some("gpt-4o".into()),
            ..EngineOverrides::default()
        };
        let merged = base.merge(&overrides);
        assert_eq!(merged.chunk_token_size, 800);
        assert_eq!(merged.llm_model_name, "gpt-4o");
        assert_eq!(merged.chunk_overlap_token_size, base.chunk_overlap_token_size);
        assert_eq!(merged.kv_backend, base.kv_backend);
    }

    #[test]
    fn with_namespace_leaves_rest_untouched() {
        let base = EngineConfig::default();
        let scoped = base.with_namespace("tenant_cs101");
        assert_eq!(scoped.namespace, "tenant_cs101");
        assert_eq!(scoped.working_dir, base.working_dir);
    }
}
