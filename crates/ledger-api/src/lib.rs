//! # ledger-api
//!
//! REST API for the UTXO ledger indexer:
//! - `POST /blocks` - Submit a block for validation and indexing
//! - `GET /balance/:address` - Point balance query
//! - `POST /rollback?height=<n>` - Roll state back to a prior height
//! - `GET /status` - Node name and current tip height

mod error;
mod handlers;
mod openapi;
mod routes;
mod state;

pub use error::{ApiError, ApiResult};
pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;

use axum::Router;

/// Default API port.
pub const DEFAULT_API_PORT: u16 = 3000;

/// Create the API router with all routes.
pub fn build_api(state: AppState) -> Router {
    create_router(state)
}
