//! # polyrag-engine
//!
//! Per-tenant graph retrieval engine (INFRASTRUCTURE layer).
//!
//! An engine owns one tenant's storage artifacts under a dedicated
//! namespace and answers graph queries against an in-memory index.
//! Engines follow a two-phase lifecycle: `initialize` before first use,
//! `finalize` when evicted or at teardown. Both are async and perform I/O.
//!
//! Use `GraphEngineFactory` to construct engines from an `EngineConfig`;
//! the instance pool in `polyrag-pool` owns the lifecycle.

pub mod config;
pub mod engine;
pub mod error;
pub mod file_engine;
pub mod index;

pub use config::{EngineConfig, EngineOverrides};
pub use engine::{Engine, EngineFactory};
pub use error::EngineError;
pub use file_engine::{GraphEngine, GraphEngineFactory};
pub use index::{GraphIndex, GraphSnapshot};
