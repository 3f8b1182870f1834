//! Tenant identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PolyragError;

/// Unique identifier for a tenant.
///
/// Opaque and stable for the tenant's lifetime. The only format
/// constraint is non-emptiness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Creates a new `TenantId`, rejecting empty ids.
    pub fn new(id: impl Into<String>) -> Result<Self, PolyragError> {
        let id = id.into();
        if id.is_empty() {
            return Err(PolyragError::invalid_input("tenant id cannot be empty"));
        }
        Ok(Self(id))
    }

    /// Returns the tenant id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the storage namespace derived from this tenant id.
    ///
    /// Every tenant's engine works under its own namespace so that
    /// storage artifacts never collide across tenants.
    pub fn namespace(&self) -> String {
        format!("tenant_{}", self.0)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TenantId {
    type Err = PolyragError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
