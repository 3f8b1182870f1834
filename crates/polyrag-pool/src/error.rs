//! Pool-specific error types.

use polyrag_engine::EngineError;
use polyrag_types::{ErrorKind, PolyragError, TenantId};
use thiserror::Error;

/// Errors surfaced by the instance pool.
///
/// Only the admission path fails loudly; teardown-path failures are
/// absorbed and logged so that finalization makes forward progress
/// across all tenants.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Engine construction or initialization failed; no entry was
    /// registered for the tenant.
    #[error("failed to initialize engine for tenant '{tenant}': {source}")]
    Initialization {
        /// The tenant whose admission failed.
        tenant: TenantId,
        /// The underlying engine error.
        #[source]
        source: EngineError,
    },
}

impl From<PoolError> for PolyragError {
    fn from(e: PoolError) -> Self {
        PolyragError::new(ErrorKind::Unavailable, e.to_string())
    }
}
