//! The instance pool: lazy admission, least-used eviction, teardown.
//!
//! All membership mutations go through a single admission lock, so at
//! most one construction or eviction transaction runs at a time. A cold
//! start for one tenant therefore delays cold starts for unrelated
//! tenants; that head-of-line blocking is an accepted cost of the
//! design. The resident fast path never takes the admission lock.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use polyrag_engine::{Engine, EngineConfig, EngineFactory, EngineOverrides};
use polyrag_types::TenantId;

use crate::error::PoolError;
use crate::tracker::AccessTracker;

/// Engine map and usage tracker, always mutated together.
///
/// Invariant: `engines` and `tracker` hold identical key sets.
struct PoolInner {
    engines: HashMap<TenantId, Arc<dyn Engine>>,
    tracker: AccessTracker,
}

/// Bounded pool of per-tenant engines.
///
/// Engines are constructed lazily on first `get` (or eagerly via
/// `preload`) and evicted least-used-first when the capacity bound is
/// hit. Handed-out `Arc<dyn Engine>` references stay valid across an
/// eviction of their tenant; the engine is merely finalized and
/// forgotten by the pool.
pub struct InstancePool {
    inner: RwLock<PoolInner>,
    /// Serializes admission and eviction transactions.
    admission: Mutex<()>,
    factory: Arc<dyn EngineFactory>,
    base: EngineConfig,
    max_capacity: usize,
}

/// Per-tenant outcome of a `preload` call.
#[derive(Debug, Default)]
pub struct PreloadReport {
    /// Tenants that are resident after the preload.
    pub succeeded: Vec<TenantId>,
    /// Tenants whose admission failed, with the failure.
    pub failed: Vec<(TenantId, PoolError)>,
}

impl InstancePool {
    /// Creates a pool over the given factory and base configuration.
    ///
    /// A capacity below one would make admission impossible, so it is
    /// clamped to one.
    pub fn new(factory: Arc<dyn EngineFactory>, base: EngineConfig, max_capacity: usize) -> Self {
        Self {
            inner: RwLock::new(PoolInner {
                engines: HashMap::new(),
                tracker: AccessTracker::new(),
            }),
            admission: Mutex::new(()),
            factory,
            base,
            max_capacity: max_capacity.max(1),
        }
    }

    /// Returns the tenant's engine, admitting it first if necessary.
    ///
    /// Counts as a usage event: the tenant's access count is bumped.
    /// Resident tenants are served from the read-locked fast path
    /// without touching the admission lock.
    ///
    /// # Errors
    /// Returns `PoolError::Initialization` when construction or
    /// initialization fails; the tenant is left absent from the pool.
    pub async fn get(&self, tenant: &TenantId) -> Result<Arc<dyn Engine>, PoolError> {
        {
            let inner = self.inner.read().await;
            if let Some(engine) = inner.engines.get(tenant) {
                inner.tracker.touch(tenant);
                return Ok(engine.clone());
            }
        }

        let engine = self.ensure(tenant, &EngineOverrides::default()).await?;
        // The touch can miss if an eviction raced us between admission
        // and here; the reference itself stays valid either way.
        self.inner.read().await.tracker.touch(tenant);
        Ok(engine)
    }

    /// Admits the tenant if absent, returning its engine.
    ///
    /// Holds the admission lock for the whole transaction: membership
    /// re-check, eviction when at capacity, construction plus
    /// initialization, and registration.
    #[tracing::instrument(skip(self, overrides), fields(tenant = %tenant))]
    async fn ensure(
        &self,
        tenant: &TenantId,
        overrides: &EngineOverrides,
    ) -> Result<Arc<dyn Engine>, PoolError> {
        let _admission = self.admission.lock().await;

        // Another task may have admitted this tenant while we waited.
        if let Some(engine) = self.inner.read().await.engines.get(tenant) {
            debug!("tenant admitted concurrently, reusing");
            return Ok(engine.clone());
        }

        if self.inner.read().await.engines.len() >= self.max_capacity {
            self.evict_one().await;
        }

        let config = self
            .base
            .merge(overrides)
            .with_namespace(tenant.namespace());
        let engine = self.factory.construct(&config).await.map_err(|e| {
            PoolError::Initialization {
                tenant: tenant.clone(),
                source: e,
            }
        })?;

        if let Err(e) = engine.initialize().await {
            // The half-built engine never becomes a pool entry; give it
            // a chance to release whatever construct acquired.
            if let Err(fin) = engine.finalize().await {
                warn!(error = %fin, "finalize after failed initialization also failed");
            }
            return Err(PoolError::Initialization {
                tenant: tenant.clone(),
                source: e,
            });
        }

        let mut inner = self.inner.write().await;
        inner.tracker.register(tenant.clone());
        inner.engines.insert(tenant.clone(), engine.clone());
        info!(resident = inner.engines.len(), "tenant admitted");
        Ok(engine)
    }

    /// Evicts the least-used tenant. Caller must hold the admission lock.
    async fn evict_one(&self) {
        let victim = {
            let inner = self.inner.read().await;
            inner.tracker.victim()
        };
        let Some(victim) = victim else { return };

        let engine = {
            let mut inner = self.inner.write().await;
            inner.tracker.remove(&victim);
            inner.engines.remove(&victim)
        };
        let Some(engine) = engine else { return };

        info!(tenant = %victim, "evicting least-used tenant");
        if let Err(e) = engine.finalize().await {
            // Bookkeeping already dropped the entry; a leaked engine
            // beats an eviction loop that never makes progress.
            warn!(tenant = %victim, error = %e, "finalize during eviction failed");
        }
    }

    /// Eagerly admits an ordered list of tenants.
    ///
    /// The list is truncated to the capacity bound; ids beyond it are
    /// silently ignored. Admissions are issued concurrently but each is
    /// serialized by the admission lock. Preload is not a usage event:
    /// counts stay at zero. One tenant's failure never aborts the rest;
    /// the report carries every per-tenant outcome.
    pub async fn preload(&self, tenants: &[TenantId], overrides: &EngineOverrides) -> PreloadReport {
        let retained = &tenants[..tenants.len().min(self.max_capacity)];
        if retained.len() < tenants.len() {
            debug!(
                requested = tenants.len(),
                retained = retained.len(),
                "preload list truncated to capacity"
            );
        }

        let admissions = retained.iter().map(|tenant| async move {
            (tenant.clone(), self.ensure(tenant, overrides).await)
        });

        let mut report = PreloadReport::default();
        for (tenant, outcome) in join_all(admissions).await {
            match outcome {
                Ok(_) => report.succeeded.push(tenant),
                Err(e) => {
                    warn!(%tenant, error = %e, "preload failed for tenant");
                    report.failed.push((tenant, e));
                }
            }
        }
        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "preload complete"
        );
        report
    }

    /// Probes whether the tenant's engine can be produced.
    ///
    /// Failure detail is discarded; callers needing diagnostics should
    /// use `get` directly.
    pub async fn switch(&self, tenant: &TenantId) -> bool {
        self.get(tenant).await.is_ok()
    }

    /// Finalizes every resident engine and clears the pool.
    ///
    /// Each tenant's finalize failure is logged independently and never
    /// stops the remaining finalizations; the pool and tracker are
    /// cleared unconditionally afterwards. Callers must stop issuing
    /// `get`/`preload` traffic before invoking this; the pool does not
    /// defend against concurrent admissions during teardown. Calling it
    /// again on an empty pool is a no-op.
    pub async fn cleanup(&self) {
        let resident: Vec<(TenantId, Arc<dyn Engine>)> = {
            let inner = self.inner.read().await;
            inner
                .engines
                .iter()
                .map(|(t, e)| (t.clone(), e.clone()))
                .collect()
        };

        for (tenant, engine) in resident {
            match engine.finalize().await {
                Ok(()) => info!(%tenant, "tenant finalized"),
                Err(e) => warn!(%tenant, error = %e, "finalize during cleanup failed"),
            }
        }

        let mut inner = self.inner.write().await;
        inner.engines.clear();
        inner.tracker.clear();
    }

    /// Number of resident tenants.
    pub async fn len(&self) -> usize {
        self.inner.read().await.engines.len()
    }

    /// True when no tenant is resident.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Sorted ids of all resident tenants.
    pub async fn resident_tenants(&self) -> Vec<TenantId> {
        self.inner.read().await.tracker.tenants()
    }

    /// Access count for a resident tenant, `None` when absent.
    pub async fn access_count(&self, tenant: &TenantId) -> Option<u64> {
        self.inner.read().await.tracker.count(tenant)
    }

    /// The configured capacity bound.
    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// True when the tenant is resident. Tracker and engine map share
    /// one key set, so either answers.
    pub async fn contains(&self, tenant: &TenantId) -> bool {
        self.inner.read().await.tracker.contains(tenant)
    }
}
