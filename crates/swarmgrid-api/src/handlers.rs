//! REST API handlers.
//!
//! Each handler forwards to one registry CRUD entry point and returns its
//! envelope as JSON. Requests the extractors reject (bad JSON, missing
//! content type, malformed query) also get an envelope, as `InvalidInput`.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use tracing::debug;

use swarmgrid_registry::{Envelope, ErrorKind, Operation, RegistryError};

use crate::ApiState;

/// HTTP status for an envelope: 200 on success, otherwise by error kind.
pub fn status_for(envelope: &Envelope) -> StatusCode {
    match envelope.error_kind() {
        None => StatusCode::OK,
        Some(ErrorKind::InvalidInput | ErrorKind::ReservedName) => StatusCode::BAD_REQUEST,
        Some(ErrorKind::DuplicateMember | ErrorKind::ActiveClusterProtected) => StatusCode::CONFLICT,
        Some(ErrorKind::NotFound) => StatusCode::NOT_FOUND,
        Some(ErrorKind::UnreachableNode) => StatusCode::BAD_GATEWAY,
        Some(
            ErrorKind::StorageDecode | ErrorKind::Storage | ErrorKind::PersistenceInconsistency,
        ) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond(envelope: Envelope) -> impl IntoResponse {
    (status_for(&envelope), Json(envelope))
}

fn rejected(op: Operation, reason: String) -> Envelope {
    debug!(?op, %reason, "request rejected by extractor");
    Envelope::failure(op, &RegistryError::InvalidInput(reason))
}

// ── Swarms ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SwarmQuery {
    pub query: Option<String>,
    #[serde(rename = "checkState", alias = "check_state", default)]
    pub check_state: bool,
}

/// GET /api/v1/swarms?query=...
pub async fn query_swarms(
    State(state): State<ApiState>,
    params: Result<Query<SwarmQuery>, QueryRejection>,
) -> impl IntoResponse {
    let envelope = match params {
        Ok(Query(params)) => {
            state
                .registry
                .handle_get(params.query.as_deref(), params.check_state)
                .await
        }
        Err(rejection) => rejected(Operation::Get, rejection.body_text()),
    };
    respond(envelope)
}

/// Register request body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddRequest {
    pub name: String,
    pub address: String,
}

/// POST /api/v1/swarms
pub async fn add_swarm(
    State(state): State<ApiState>,
    req: Result<Json<AddRequest>, JsonRejection>,
) -> impl IntoResponse {
    let envelope = match req {
        Ok(Json(req)) => state.registry.handle_post(&req.name, &req.address).await,
        Err(rejection) => rejected(Operation::Post, rejection.body_text()),
    };
    respond(envelope)
}

/// Unregister request body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RemoveRequest {
    pub name: String,
}

/// DELETE /api/v1/swarms
pub async fn remove_swarm(
    State(state): State<ApiState>,
    req: Result<Json<RemoveRequest>, JsonRejection>,
) -> impl IntoResponse {
    let envelope = match req {
        Ok(Json(req)) => state.registry.handle_delete(&req.name).await,
        Err(rejection) => rejected(Operation::Delete, rejection.body_text()),
    };
    respond(envelope)
}

/// Update request body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateRequest {
    pub name: String,
    #[serde(rename = "setActive", alias = "set_active")]
    pub set_active: bool,
}

/// PUT /api/v1/swarms
pub async fn update_swarm(
    State(state): State<ApiState>,
    req: Result<Json<UpdateRequest>, JsonRejection>,
) -> impl IntoResponse {
    let envelope = match req {
        Ok(Json(req)) => state.registry.handle_put(&req.name, req.set_active).await,
        Err(rejection) => rejected(Operation::Put, rejection.body_text()),
    };
    respond(envelope)
}

// ── Liveness ───────────────────────────────────────────────────

/// GET /healthz
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
