//! # polyrag-pool
//!
//! Bounded instance pool for per-tenant engines (APPLICATION layer).
//!
//! Engines are expensive and stateful, so the pool materializes them
//! lazily on first use, caps how many are resident at once, and evicts
//! the least-used tenant when capacity is exceeded. A single admission
//! lock serializes all membership changes; resident lookups stay on a
//! lock-free-counter fast path.

pub mod error;
pub mod pool;
pub mod tracker;

pub use error::PoolError;
pub use pool::{InstancePool, PreloadReport};
pub use tracker::AccessTracker;
