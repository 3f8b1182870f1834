//! # polyrag-server
//!
//! HTTP transport for polyrag (TRANSPORT layer).
//! Thin axum adapters that translate requests into instance pool
//! operations and direct engine queries; all domain behavior lives in
//! `polyrag-pool` and `polyrag-engine`.

pub mod error;
pub mod roster;
pub mod router;
pub mod server;

pub use error::HttpTransportError;
pub use roster::{read_roster, RosterError};
pub use router::{build_router, AppState};
pub use server::HttpServer;
