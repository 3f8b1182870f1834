//! Error types for the HTTP transport layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use polyrag_engine::EngineError;
use polyrag_pool::PoolError;
use polyrag_types::{ErrorKind, PolyragError};

use crate::roster::RosterError;

/// Errors that can occur while running the HTTP server itself.
#[derive(Debug, Error)]
pub enum HttpTransportError {
    /// Failed to bind to the TCP address.
    #[error("failed to bind on {addr}: {source}")]
    Bind {
        /// The address string.
        addr: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The HTTP server encountered an I/O error while serving.
    #[error("server error: {0}")]
    Serve(String),
}

/// Request-scoped error, mapped to an HTTP status by `kind`.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or wrong Bearer token.
    Unauthorized,
    /// A domain error; the status follows its `kind`.
    Domain(PolyragError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Domain(e) => match e.kind {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
                ErrorKind::Unavailable | ErrorKind::ResourceExhausted => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Unauthorized => json!({"error": "unauthorized"}),
            Self::Domain(e) => json!({ "error": e }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<PolyragError> for ApiError {
    fn from(e: PolyragError) -> Self {
        Self::Domain(e)
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        Self::Domain(e.into())
    }
}

impl From<PoolError> for ApiError {
    fn from(e: PoolError) -> Self {
        Self::Domain(e.into())
    }
}

impl From<RosterError> for ApiError {
    fn from(e: RosterError) -> Self {
        Self::Domain(PolyragError::new(ErrorKind::Internal, e.to_string()))
    }
}
