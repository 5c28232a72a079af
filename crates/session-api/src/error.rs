//! Failure boundary: every error leaving a handler becomes a response here.

use std::any::Any;

use axum::response::{IntoResponse, Response};
use session_core::StoreError;
use thiserror::Error;

use crate::response::{ApiResponse, ErrorCode};

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn internal_error() -> Response {
    ApiResponse::<()>::failure_response(ErrorCode::InternalError, INTERNAL_MESSAGE)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            ApiError::BadRequest(msg) | ApiError::Store(StoreError::InvalidId(msg)) => {
                tracing::warn!("Bad request: {}", msg);
                (ErrorCode::BadRequest, msg)
            }
            ApiError::NotFound(msg) => {
                tracing::debug!("Not found: {}", msg);
                (ErrorCode::NotFound, msg)
            }
            ApiError::Store(err) => {
                // details stay in the log, the client only learns that it failed
                tracing::error!(error = %err, "Failed session request");
                return internal_error();
            }
        };

        ApiResponse::<()>::failure_response(code, message)
    }
}

/// Panic handler for `CatchPanicLayer`.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "Unhandled failure in request handler");
    internal_error()
}
