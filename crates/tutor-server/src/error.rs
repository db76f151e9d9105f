//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all API endpoints. It implements
//! `axum::response::IntoResponse` to produce JSON error responses of the form
//! `{"success": false, "error": "<message>", "code": "<CODE>"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use tutor_core::PlotError;

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Human-readable error message.
    pub error: String,
    /// Machine-readable error code (e.g., "BAD_REQUEST").
    pub code: &'static str,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Invalid request (400).
    #[error("{0}")]
    BadRequest(String),

    /// The LLM provider failed or returned something unusable (502).
    #[error("{0}")]
    Upstream(String),

    /// Internal server error (500).
    #[error("{0}")]
    InternalError(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Upstream(_) => "UPSTREAM_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "request failed");
        }
        let body = ApiErrorBody {
            success: false,
            error: self.to_string(),
            code: self.code(),
        };
        (status, axum::Json(body)).into_response()
    }
}

impl From<PlotError> for ApiError {
    fn from(err: PlotError) -> Self {
        if err.is_client_error() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::InternalError(err.to_string())
        }
    }
}
