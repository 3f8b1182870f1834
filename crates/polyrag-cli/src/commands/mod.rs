//! CLI subcommands.

pub mod probe;
pub mod serve;
pub mod tenants;

use std::sync::Arc;

use polyrag_config::PolyragConfig;
use polyrag_engine::GraphEngineFactory;
use polyrag_pool::InstancePool;

/// Builds the instance pool from a loaded configuration.
pub(crate) fn build_pool(config: &PolyragConfig) -> Arc<InstancePool> {
    Arc::new(InstancePool::new(
        Arc::new(GraphEngineFactory),
        config.engine.to_engine_config(),
        config.pool.max_capacity,
    ))
}
