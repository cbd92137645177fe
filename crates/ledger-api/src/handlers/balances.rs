//! Balance query handlers.

use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Balance response.
#[derive(Serialize, ToSchema)]
pub struct BalanceResponse {
    /// Sum of unspent output values for the address.
    #[schema(example = 10)]
    pub balance: i64,
}

/// GET /balance/:address
///
/// Point balance for an address, read from the cached balance view.
/// Addresses with no unspent outputs read as 0.
#[utoipa::path(
    get,
    path = "/balance/{address}",
    tag = "balance",
    params(
        ("address" = String, Path, description = "Address to query")
    ),
    responses(
        (status = 200, description = "Current balance", body = BalanceResponse),
        (status = 400, description = "Empty address segment", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<Json<BalanceResponse>> {
    if address.is_empty() {
        return Err(ApiError::BadRequest(
            "Address must not be empty".to_string(),
        ));
    }

    let balance = state.ledger.get_balance(&address)?;
    Ok(Json(BalanceResponse { balance }))
}

/// GET /balance and GET /balance/ (no address segment).
pub async fn missing_address() -> ApiError {
    ApiError::BadRequest("Address must not be empty".to_string())
}
