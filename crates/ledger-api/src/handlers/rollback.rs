//! Rollback handler.

use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use super::blocks::MessageResponse;

/// Rollback query parameters.
///
/// The height arrives as a raw string so a non-integer value produces the
/// standard error envelope instead of an extractor rejection.
#[derive(Deserialize, ToSchema)]
pub struct RollbackParams {
    /// Target height to roll back to.
    pub height: Option<String>,
}

/// POST /rollback?height=<n>
///
/// Roll the entire state back to the given height. A target at or above the
/// current tip succeeds without mutation.
#[utoipa::path(
    post,
    path = "/rollback",
    tag = "rollback",
    params(
        ("height" = i64, Query, description = "Target height (>= 0)")
    ),
    responses(
        (status = 200, description = "Rollback completed", body = MessageResponse),
        (status = 400, description = "Missing, non-integer, or negative height", body = crate::error::ErrorResponse),
        (status = 500, description = "Store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn rollback(
    State(state): State<AppState>,
    Query(params): Query<RollbackParams>,
) -> ApiResult<Json<MessageResponse>> {
    let raw = params.height.ok_or_else(|| {
        ApiError::BadRequest("Missing required query parameter: height".to_string())
    })?;

    let height: i64 = raw.parse().map_err(|_| {
        ApiError::BadRequest(format!("Invalid height: expected an integer, got {}", raw))
    })?;

    state.ledger.rollback_to(height)?;

    Ok(Json(MessageResponse {
        message: format!("Rollback to height {} completed successfully", height),
    }))
}
