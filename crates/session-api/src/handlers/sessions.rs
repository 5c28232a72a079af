// ============================================================================
// Session API - Session Handlers
// File: crates/session-api/src/handlers/sessions.rs
// ============================================================================
//! Session CRUD over the configured session store

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use session_core::{Attributes, SessionRecord};
use session_shared::utils::{new_session_id, now_millis};
use validator::Validate;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Create session request payload
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(length(min = 1, max = 1024, message = "Context path must be between 1 and 1024 characters"))]
    pub context_path: String,

    #[validate(length(min = 1, max = 255, message = "Virtual host must be between 1 and 255 characters"))]
    pub virtual_host: String,

    /// `<= 0` never expires
    #[serde(default)]
    pub max_inactive_ms: i64,

    #[serde(default)]
    pub attributes: Attributes,
}

#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// Create handler - POST /api/v1/sessions
pub async fn create_session(
    State(state): State<AppState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SessionRecord>>), ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let now = now_millis();
    let mut record = SessionRecord::new(
        new_session_id(),
        payload.context_path,
        payload.virtual_host,
        now,
        payload.max_inactive_ms,
    )?;
    record.cookie_set = now;
    record.attributes = payload.attributes;

    let id = record.id.clone();
    state.store.store(&id, &mut record).await?;
    tracing::info!(session_id = %id, "Session created");

    Ok((StatusCode::CREATED, Json(ApiResponse::session(id, record))))
}

/// Load handler - GET /api/v1/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SessionRecord>>, ApiError> {
    let record = state
        .store
        .load(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("session `{}`", id)))?;
    Ok(Json(ApiResponse::session(id, record)))
}

/// Store handler - PUT /api/v1/sessions/{id}
pub async fn put_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut record): Json<SessionRecord>,
) -> Result<Json<ApiResponse<SessionRecord>>, ApiError> {
    state.store.store(&id, &mut record).await?;
    Ok(Json(ApiResponse::session(id, record)))
}

/// Delete handler - DELETE /api/v1/sessions/{id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeleteResponse>>, ApiError> {
    let deleted = state.store.delete(&id).await?;
    Ok(Json(ApiResponse::session(id, DeleteResponse { deleted })))
}

/// Exists handler - GET /api/v1/sessions/{id}/exists
pub async fn session_exists(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ExistsResponse>>, ApiError> {
    let exists = state.store.exists(&id).await?;
    Ok(Json(ApiResponse::session(id, ExistsResponse { exists })))
}
