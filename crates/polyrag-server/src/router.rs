//! Axum router for the polyrag graph API.
//!
//! Routes: tenant roster and probe, graph label/subgraph/neighbor
//! queries, source document lookup, and `GET /health` (liveness, never
//! authenticated). Handlers only translate requests into pool
//! operations and engine queries.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use polyrag_engine::Engine;
use polyrag_pool::InstancePool;
use polyrag_types::{KnowledgeGraph, PolyragError, SourceGraph, TenantId};

use crate::error::ApiError;
use crate::roster;

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// The instance pool multiplexing tenants over engines.
    pub pool: Arc<InstancePool>,
    /// Path of the tenant roster document.
    pub roster_path: PathBuf,
    /// Optional Bearer token (None = no authentication required).
    pub token: Option<String>,
}

/// Builds the axum `Router` with all graph API routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/tenants", get(handle_tenants))
        .route("/tenants/{tenant_id}/switch", post(handle_switch))
        .route("/graph/label/list", get(handle_labels))
        .route("/graphs", get(handle_knowledge_graph))
        .route("/graph/node/neighbors", get(handle_neighbors))
        .route("/source/{source_id}", get(handle_source))
        .with_state(state)
}

/// Guards a route behind the configured bearer token.
///
/// A pool without a token runs open; otherwise the request must carry
/// `Authorization: Bearer <token>` with an exact match.
fn require_auth(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    match state.token.as_deref() {
        None => Ok(()),
        Some(expected) if bearer_token_matches(headers, expected) => Ok(()),
        Some(_) => Err(ApiError::Unauthorized),
    }
}

fn bearer_token_matches(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|provided| provided == expected)
}

/// Resolves a tenant id string to its live engine via the pool.
async fn engine_for(state: &AppState, tenant_id: &str) -> Result<Arc<dyn Engine>, ApiError> {
    let tenant = TenantId::new(tenant_id)?;
    let engine = state.pool.get(&tenant).await?;
    Ok(engine)
}

async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let resident = state.pool.len().await;
    Json(json!({"status": "ok", "service": "polyrag", "resident_tenants": resident}))
}

async fn handle_tenants(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<TenantId>>, ApiError> {
    require_auth(&state, &headers)?;
    let roster = roster::read_roster(&state.roster_path).await?;
    Ok(Json(roster))
}

async fn handle_switch(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(tenant_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_auth(&state, &headers)?;
    let ok = match TenantId::new(tenant_id) {
        Ok(tenant) => state.pool.switch(&tenant).await,
        Err(_) => false,
    };
    Ok(Json(json!({ "ok": ok })))
}

#[derive(Debug, Deserialize)]
struct TenantQuery {
    tenant_id: String,
}

async fn handle_labels(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TenantQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    require_auth(&state, &headers)?;
    let engine = engine_for(&state, &query.tenant_id).await?;
    Ok(Json(engine.graph_labels().await?))
}

#[derive(Debug, Deserialize)]
struct GraphQuery {
    tenant_id: String,
    label: String,
    #[serde(default = "default_max_depth")]
    max_depth: usize,
    #[serde(default = "default_max_nodes")]
    max_nodes: usize,
}

fn default_max_depth() -> usize {
    3
}
fn default_max_nodes() -> usize {
    1000
}

async fn handle_knowledge_graph(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<GraphQuery>,
) -> Result<Json<KnowledgeGraph>, ApiError> {
    require_auth(&state, &headers)?;
    if query.max_depth < 1 || query.max_nodes < 1 {
        return Err(ApiError::Domain(PolyragError::invalid_input(
            "max_depth and max_nodes must be at least 1",
        )));
    }
    let engine = engine_for(&state, &query.tenant_id).await?;
    let graph = engine
        .knowledge_graph(&query.label, query.max_depth, query.max_nodes)
        .await?;
    Ok(Json(graph))
}

#[derive(Debug, Deserialize)]
struct NeighborQuery {
    tenant_id: String,
    node_id: String,
}

async fn handle_neighbors(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<NeighborQuery>,
) -> Result<Json<KnowledgeGraph>, ApiError> {
    require_auth(&state, &headers)?;
    let engine = engine_for(&state, &query.tenant_id).await?;
    Ok(Json(engine.node_edges(&query.node_id).await?))
}

async fn handle_source(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(source_id): Path<String>,
    Query(query): Query<TenantQuery>,
) -> Result<Json<SourceGraph>, ApiError> {
    require_auth(&state, &headers)?;
    let engine = engine_for(&state, &query.tenant_id).await?;
    Ok(Json(engine.source_graph(&source_id).await?))
}
