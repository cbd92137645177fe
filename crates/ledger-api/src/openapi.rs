//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers::{balances, blocks, rollback, status};

/// Main OpenAPI documentation structure.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "UTXO Ledger Indexer API",
        description = "Block submission, balance queries, and rollback for a UTXO-model ledger.",
        version = "0.1.0"
    ),
    servers(
        (url = "http://0.0.0.0:3000", description = "Local node")
    ),
    tags(
        (name = "blocks", description = "Block submission"),
        (name = "balance", description = "Address balance queries"),
        (name = "rollback", description = "State rollback"),
        (name = "status", description = "Node status")
    ),
    paths(
        blocks::submit_block,
        balances::get_balance,
        rollback::rollback,
        status::get_status,
    ),
    components(
        schemas(
            ErrorResponse,
            blocks::MessageResponse,
            balances::BalanceResponse,
            status::StatusResponse,
            ledger_core::Block,
            ledger_core::Transaction,
            ledger_core::TxInput,
            ledger_core::TxOutput,
        )
    )
)]
pub struct ApiDoc;
