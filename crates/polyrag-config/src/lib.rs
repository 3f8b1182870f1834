//! # polyrag-config
//!
//! Configuration loading for polyrag.
//! Merges defaults, an optional TOML file, and `POLYRAG_`-prefixed
//! environment variables into a validated `PolyragConfig`.

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::{EngineDefaults, LoggingConfig, PolyragConfig, PoolSettings, ServerConfig};
