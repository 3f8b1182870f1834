//! The tenant roster boundary.
//!
//! A static JSON document enumerates the known tenant ids. The
//! document has exactly one recognized field, `tenantIds`, holding an
//! ordered list of id strings. An absent file is an empty roster, not
//! an error; an unreadable or unparseable file is a failure that is
//! surfaced, never silently defaulted.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use polyrag_types::TenantId;

/// Errors from reading the roster document.
#[derive(Debug, Error)]
pub enum RosterError {
    /// The document exists but could not be read.
    #[error("failed to read roster {path}: {source}")]
    Read {
        /// Path of the roster document.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid JSON or has the wrong shape.
    #[error("failed to parse roster {path}: {source}")]
    Parse {
        /// Path of the roster document.
        path: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The document lists an empty tenant id.
    #[error("roster {path} contains an empty tenant id")]
    InvalidId {
        /// Path of the roster document.
        path: String,
    },
}

#[derive(Debug, Deserialize)]
struct RosterDoc {
    #[serde(rename = "tenantIds", default)]
    tenant_ids: Vec<String>,
}

/// Reads the ordered tenant roster from `path`.
///
/// An absent file yields an empty roster.
pub async fn read_roster(path: &Path) -> Result<Vec<TenantId>, RosterError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(RosterError::Read {
                path: path.display().to_string(),
                source: e,
            })
        }
    };

    let doc: RosterDoc = serde_json::from_slice(&bytes).map_err(|e| RosterError::Parse {
        path: path.display().to_string(),
        source: e,
    })?;

    doc.tenant_ids
        .into_iter()
        .map(|id| {
            TenantId::new(id).map_err(|_| RosterError::InvalidId {
                path: path.display().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn absent_file_is_empty_roster() {
        let dir = tempfile::tempdir().expect("tempdir");
        let roster = read_roster(&dir.path().join("tenants.json"))
            .await
            .expect("read");
        assert!(roster.is_empty());
    }

    #[tokio::test]
    async fn reads_ordered_ids() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tenants.json");
        std::fs::write(&path, r#"{"tenantIds": ["cs101", "math202", "bio150"]}"#).expect("write");

        let roster = read_roster(&path).await.expect("read");
        let ids: Vec<&str> = roster.iter().map(TenantId::as_str).collect();
        assert_eq!(ids, vec!["cs101", "math202", "bio150"]);
    }

    #[tokio::test]
    async fn unrecognized_fields_are_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tenants.json");
        std::fs::write(&path, r#"{"tenantIds": ["cs101"], "revision": 7}"#).expect("write");

        let roster = read_roster(&path).await.expect("read");
        assert_eq!(roster.len(), 1);
    }

    #[tokio::test]
    async fn missing_field_is_empty_roster() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tenants.json");
        std::fs::write(&path, r#"{}"#).expect("write");

        let roster = read_roster(&path).await.expect("read");
        assert!(roster.is_empty());
    }

    #[tokio::test]
    async fn malformed_document_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tenants.json");
        std::fs::write(&path, b"not json at all").expect("write");

        let err = read_roster(&path).await.expect_err("parse failure");
        assert!(matches!(err, RosterError::Parse { .. }));
    }

    #[tokio::test]
    async fn empty_id_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tenants.json");
        std::fs::write(&path, r#"{"tenantIds": ["cs101", ""]}"#).expect("write");

        let err = read_roster(&path).await.expect_err("invalid id");
        assert!(matches!(err, RosterError::InvalidId { .. }));
    }
}
