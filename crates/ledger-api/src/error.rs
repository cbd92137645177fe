//! API error types.
//!
//! The HTTP status is a pure function of the error kind: validation
//! failures and malformed requests map to 400, everything else to 500.
//! Every failure is rendered as the `{error, code}` envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ledger_core::ValidationError;
use ledger_state::StateError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

/// API errors.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Engine validation failure; carries its own stable code.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Malformed request (missing or invalid parameter).
    #[error("{0}")]
    BadRequest(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StateError> for ApiError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::Validation(e) => ApiError::Validation(e),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Error response envelope.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message embedding the offending values.
    pub error: String,
    /// Stable machine code.
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: e.to_string(),
                    code: e.code().to_string(),
                },
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: msg.clone(),
                    code: "VALIDATION_ERROR".to_string(),
                },
            ),
            ApiError::Internal(msg) => {
                error!(detail = %msg, "Request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: msg.clone(),
                        code: "INTERNAL_SERVER_ERROR".to_string(),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
