//! Block submission handler.

use crate::{ApiResult, AppState};
use axum::{extract::State, Json};
use ledger_core::Block;
use serde::Serialize;
use utoipa::ToSchema;

/// Success message response.
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    /// Confirmation message.
    #[schema(example = "Block processed successfully")]
    pub message: String,
}

/// POST /blocks
///
/// Validate a submitted block against the accumulated history and apply it
/// atomically.
#[utoipa::path(
    post,
    path = "/blocks",
    tag = "blocks",
    request_body = Block,
    responses(
        (status = 200, description = "Block accepted and indexed", body = MessageResponse),
        (status = 400, description = "Validation failure", body = crate::error::ErrorResponse),
        (status = 500, description = "Store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn submit_block(
    State(state): State<AppState>,
    Json(block): Json<Block>,
) -> ApiResult<Json<MessageResponse>> {
    state.ledger.submit_block(&block)?;

    Ok(Json(MessageResponse {
        message: "Block processed successfully".to_string(),
    }))
}
