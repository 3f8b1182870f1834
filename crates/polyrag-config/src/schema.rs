//! Configuration schema types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use polyrag_engine::EngineConfig;

/// Top-level polyrag configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolyragConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Instance pool settings.
    #[serde(default)]
    pub pool: PoolSettings,
    /// Engine construction defaults shared by all tenants.
    #[serde(default)]
    pub engine: EngineDefaults,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Optional Bearer token; `None` disables authentication.
    #[serde(default)]
    pub token: Option<String>,
    /// Path of the tenant roster document.
    #[serde(default = "default_roster_path")]
    pub roster_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            token: None,
            roster_path: default_roster_path(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8620
}
fn default_roster_path() -> PathBuf {
    PathBuf::from("./data/tenants.json")
}

/// Instance pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSettings {
    /// Maximum number of simultaneously resident engines.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: usize,
    /// Whether to preload the roster at startup.
    #[serde(default = "default_preload")]
    pub preload: bool,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
            preload: default_preload(),
        }
    }
}

fn default_max_capacity() -> usize {
    10
}
fn default_preload() -> bool {
    true
}

/// Engine construction defaults.
///
/// Mirrors `EngineConfig` minus `namespace`, which is always derived
/// from the tenant id by the pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineDefaults {
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,
    #[serde(default = "default_kv_backend")]
    pub kv_backend: String,
    #[serde(default = "default_graph_backend")]
    pub graph_backend: String,
    #[serde(default = "default_vector_backend")]
    pub vector_backend: String,
    #[serde(default = "default_chunk_token_size")]
    pub chunk_token_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap_token_size: usize,
    #[serde(default = "default_llm_model")]
    pub llm_model_name: String,
    #[serde(default = "default_llm_max_async")]
    pub llm_max_async: usize,
    #[serde(default = "default_embedding_model")]
    pub embedding_model_name: String,
}

impl Default for EngineDefaults {
    fn default() -> Self {
        Self {
            working_dir: default_working_dir(),
            kv_backend: default_kv_backend(),
            graph_backend: default_graph_backend(),
            vector_backend: default_vector_backend(),
            chunk_token_size: default_chunk_token_size(),
            chunk_overlap_token_size: default_chunk_overlap(),
            llm_model_name: default_llm_model(),
            llm_max_async: default_llm_max_async(),
            embedding_model_name: default_embedding_model(),
        }
    }
}

impl EngineDefaults {
    /// Converts into the engine's base config (namespace left empty for
    /// the pool to fill per tenant).
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            working_dir: self.working_dir.clone(),
            namespace: String::new(),
            kv_backend: self.kv_backend.clone(),
            graph_backend: self.graph_backend.clone(),
            vector_backend: self.vector_backend.clone(),
            chunk_token_size: self.chunk_token_size,
            chunk_overlap_token_size: self.chunk_overlap_token_size,
            llm_model_name: self.llm_model_name.clone(),
            llm_max_async: self.llm_max_async,
            embedding_model_name: self.embedding_model_name.clone(),
        }
    }
}

fn default_working_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_kv_backend() -> String {
    "json_kv".to_string()
}
fn default_graph_backend() -> String {
    "json_graph".to_string()
}
fn default_vector_backend() -> String {
    "nano_vector".to_string()
}
fn default_chunk_token_size() -> usize {
    1200
}
fn default_chunk_overlap() -> usize {
    100
}
fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_llm_max_async() -> usize {
    4
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "polyrag=trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
