//! Response envelope for session endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use session_shared::utils::now_millis;

/// Failure class reported to clients; each maps to exactly one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    NotFound,
    InternalError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    /// Session the response is about, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
    /// Epoch ms, same clock as the session timestamps.
    pub timestamp: i64,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn session(id: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            session_id: Some(id.into()),
            data: Some(data),
            error: None,
            timestamp: now_millis(),
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            session_id: None,
            data: None,
            error: Some(ErrorBody {
                code,
                message: message.into(),
            }),
            timestamp: now_millis(),
        }
    }

    /// Failure body with the status its code maps to.
    pub fn failure_response(code: ErrorCode, message: impl Into<String>) -> Response {
        (code.status(), Json(Self::failure(code, message))).into_response()
    }
}
