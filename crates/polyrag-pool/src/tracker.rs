//! Per-tenant usage tracking, the eviction signal.
//!
//! Counts are `AtomicU64` so the pool's fast path can bump them under a
//! read lock without losing updates. Membership changes (`register`,
//! `remove`, `clear`) require `&mut self` and only ever happen while
//! the pool holds its admission lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use polyrag_types::TenantId;

/// Usage bookkeeping for one resident tenant.
#[derive(Debug)]
struct TenantUsage {
    /// Successful `get` calls since admission.
    count: AtomicU64,
    /// Monotonic admission order, used to break count ties.
    admitted_seq: u64,
}

/// Maps resident tenants to their usage counters.
///
/// The pool keeps this key set identical to its engine map at all
/// times; both live behind the same lock.
#[derive(Debug, Default)]
pub struct AccessTracker {
    usage: HashMap<TenantId, TenantUsage>,
    next_seq: u64,
}

impl AccessTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tenant with a zero count and the next admission
    /// sequence number. A re-registered tenant starts fresh.
    pub fn register(&mut self, tenant: TenantId) {
        let admitted_seq = self.next_seq;
        self.next_seq += 1;
        self.usage.insert(
            tenant,
            TenantUsage {
                count: AtomicU64::new(0),
                admitted_seq,
            },
        );
    }

    /// Increments a tenant's count. Returns false for unknown tenants
    /// (the tenant raced an eviction; the lost touch is harmless).
    pub fn touch(&self, tenant: &TenantId) -> bool {
        match self.usage.get(tenant) {
            Some(usage) => {
                usage.count.fetch_add(1, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// Removes a tenant. Returns true if it was tracked.
    pub fn remove(&mut self, tenant: &TenantId) -> bool {
        self.usage.remove(tenant).is_some()
    }

    /// Drops all tenants.
    pub fn clear(&mut self) {
        self.usage.clear();
    }

    /// Current count for a tenant.
    pub fn count(&self, tenant: &TenantId) -> Option<u64> {
        self.usage
            .get(tenant)
            .map(|u| u.count.load(Ordering::Relaxed))
    }

    /// Selects the eviction victim: the globally minimum count, ties
    /// broken by earliest admission.
    pub fn victim(&self) -> Option<TenantId> {
        self.usage
            .iter()
            .min_by_key(|(_, u)| (u.count.load(Ordering::Relaxed), u.admitted_seq))
            .map(|(tenant, _)| tenant.clone())
    }

    /// Number of tracked tenants.
    pub fn len(&self) -> usize {
        self.usage.len()
    }

    /// True when no tenant is tracked.
    pub fn is_empty(&self) -> bool {
        self.usage.is_empty()
    }

    /// True when the tenant is tracked.
    pub fn contains(&self, tenant: &TenantId) -> bool {
        self.usage.contains_key(tenant)
    }

    /// All tracked tenant ids, sorted.
    pub fn tenants(&self) -> Vec<TenantId> {
        let mut ids: Vec<TenantId> = self.usage.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> TenantId {
        TenantId::new(s).unwrap()
    }

    #[test]
    fn register_starts_at_zero() {
        let mut tracker = AccessTracker::new();
        tracker.register(id("a"));
        assert_eq!(tracker.count(&id("a")), Some(0));
    }

    #[test]
    fn touch_increments() {
        let mut tracker = AccessTracker::new();
        tracker.register(id("a"));
        assert!(tracker.touch(&id("a")));
        assert!(tracker.touch(&id("a")));
        assert_eq!(tracker.count(&id("a")), Some(2));
    }

    #[test]
    fn touch_unknown_tenant_is_false() {
        let tracker = AccessTracker::new();
        assert!(!tracker.touch(&id("ghost")));
    }

    #[test]
    fn victim_is_minimum_count() {
        let mut tracker = AccessTracker::new();
        tracker.register(id("a"));
        tracker.register(id("b"));
        tracker.touch(&id("a"));
        assert_eq!(tracker.victim(), Some(id("b")));
    }

    #[test]
    fn victim_tie_breaks_to_earliest_admitted() {
        let mut tracker = AccessTracker::new();
        tracker.register(id("a"));
        tracker.register(id("b"));
        tracker.touch(&id("a"));
        tracker.touch(&id("b"));
        assert_eq!(tracker.victim(), Some(id("a")));
    }

    #[test]
    fn reregistration_resets_count_and_order() {
        let mut tracker = AccessTracker::new();
        tracker.register(id("a"));
        tracker.register(id("b"));
        tracker.touch(&id("a"));
        tracker.touch(&id("a"));
        tracker.remove(&id("a"));
        tracker.register(id("a"));
        // re-admission starts from a fresh zero count
        assert_eq!(tracker.count(&id("a")), Some(0));
        tracker.touch(&id("b"));
        assert_eq!(tracker.victim(), Some(id("a")));
    }

    #[test]
    fn clear_empties_tracker() {
        let mut tracker = AccessTracker::new();
        tracker.register(id("a"));
        tracker.clear();
        assert!(tracker.is_empty());
        assert_eq!(tracker.count(&id("a")), None);
    }
}
