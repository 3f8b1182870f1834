//! Unified error types for the polyrag domain layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of domain errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Resource not found (unknown node, unknown source document).
    NotFound,
    /// Invalid input data (empty tenant id, zero bounds).
    InvalidInput,
    /// Resource limit exceeded.
    ResourceExhausted,
    /// A backing engine could not be brought up.
    Unavailable,
    /// Internal error.
    Internal,
}

/// Domain-level error with structured context.
///
/// Crate-local errors (`EngineError`, `PoolError`, ...) convert into
/// this type at the transport boundary so HTTP handlers can map `kind`
/// to a status code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolyragError {
    /// The kind of error.
    pub kind: ErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional context.
    pub context: Option<String>,
}

impl PolyragError {
    /// Creates a new `PolyragError`.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: None,
        }
    }

    /// Adds context to the error.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Creates a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Creates an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unavailable, message)
    }
}

impl fmt::Display for PolyragError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, " ({})", ctx)?;
        }
        Ok(())
    }
}

impl std::error::Error for PolyragError {}
