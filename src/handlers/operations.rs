//! `/operacoes` endpoints
//!
//! POST /operacoes                 create  → 201
//! PUT  /operacoes/{id}/aprovar    approve → 200
//! PUT  /operacoes/{id}/processar  process → 200
//! GET  /operacoes                 list    → 200

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, StatusCode},
    Json,
};
use tracing::debug;
use uuid::Uuid;

use crate::handlers::error::{api_error, map_service_error, ApiError};
use crate::models::operation::{CreateOperationRequest, OperationResponse};
use crate::services::session::Session;
use crate::AppState;

pub async fn create_operation(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<CreateOperationRequest>, JsonRejection>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<OperationResponse>), ApiError> {
    let Json(payload) =
        payload.map_err(|e| api_error(StatusCode::BAD_REQUEST, e.body_text()))?;

    debug!(
        "{} creating operation of {}",
        requester(&session),
        payload.amount
    );

    let created = state
        .operations
        .create(payload.amount)
        .await
        .map_err(map_service_error)?;

    let location = format!("/operacoes/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

pub async fn approve_operation(
    State(state): State<AppState>,
    session: Session,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<OperationResponse>, ApiError> {
    let id = operation_id(id)?;
    debug!("{} approving operation {}", requester(&session), id);

    state
        .operations
        .approve(id)
        .await
        .map(Json)
        .map_err(map_service_error)
}

pub async fn process_operation(
    State(state): State<AppState>,
    session: Session,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<OperationResponse>, ApiError> {
    let id = operation_id(id)?;
    debug!("{} processing operation {}", requester(&session), id);

    state
        .operations
        .process(id)
        .await
        .map(Json)
        .map_err(map_service_error)
}

pub async fn list_operations(
    State(state): State<AppState>,
    _session: Session,
) -> Result<Json<Vec<OperationResponse>>, ApiError> {
    state
        .operations
        .list()
        .await
        .map(Json)
        .map_err(map_service_error)
}

/// A path segment that is not a UUID cannot name any operation
fn operation_id(id: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    id.map(|Path(id)| id)
        .map_err(|_| api_error(StatusCode::NOT_FOUND, "Operation not found"))
}

fn requester(session: &Session) -> &str {
    session.user_name().unwrap_or("anonymous")
}
