//! HTTP handlers for the `/clients` resource.
//!
//! Thin adapters: shape in, pipeline call, shape out. Status codes and
//! error bodies come from [`ApiError`]'s response mapping.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::json;

use clientdesk_core::ClientId;

use crate::api_types::ClientResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::validate::{self, ClientPayload};

/// `GET /clients`
pub async fn list_clients(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> Result<Json<Vec<ClientResponse>>, ApiError> {
    let records = state.pipeline().list(&actor).await?;
    Ok(Json(records.into_iter().map(ClientResponse::from).collect()))
}

/// `POST /clients`
pub async fn create_client(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<ClientPayload>,
) -> Result<(StatusCode, Json<ClientResponse>), ApiError> {
    let new = validate::validate_create(payload)?;
    let record = state.pipeline().create(&actor, new).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// `GET /clients/{id}`
pub async fn view_client(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<ClientId>,
) -> Result<Json<ClientResponse>, ApiError> {
    let record = state.pipeline().view(&actor, id).await?;
    Ok(Json(record.into()))
}

/// `PUT /clients/{id}` and `PATCH /clients/{id}`
///
/// Both verbs share partial-update semantics: absent fields keep their
/// stored value.
pub async fn update_client(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<ClientId>,
    Json(payload): Json<ClientPayload>,
) -> Result<Json<ClientResponse>, ApiError> {
    let patch = validate::validate_update(payload)?;
    let record = state.pipeline().update(&actor, id, patch).await?;
    Ok(Json(record.into()))
}

/// `DELETE /clients/{id}`
pub async fn delete_client(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<ClientId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.pipeline().delete(&actor, id).await?;
    Ok(Json(json!({ "message": "Client deleted." })))
}
