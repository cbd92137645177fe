//! Node status handler.

use crate::{ApiResult, AppState};
use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

/// Node status response.
#[derive(Serialize, ToSchema)]
pub struct StatusResponse {
    /// Node name.
    #[schema(example = "ledger-indexer")]
    pub name: String,
    /// Current chain tip height (0 when empty).
    #[schema(example = 3)]
    pub height: u64,
}

/// GET /status
///
/// Node name and current tip height.
#[utoipa::path(
    get,
    path = "/status",
    tag = "status",
    responses(
        (status = 200, description = "Node status", body = StatusResponse)
    )
)]
pub async fn get_status(State(state): State<AppState>) -> ApiResult<Json<StatusResponse>> {
    let height = state.ledger.tip_height()?;
    Ok(Json(StatusResponse {
        name: state.node_name.clone(),
        height,
    }))
}
