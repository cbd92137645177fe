//! Shared application state.

use ledger_state::LedgerManager;
use std::sync::Arc;

/// Shared application state for API handlers.
#[derive(Clone)]
pub struct AppState {
    /// Ledger state engine.
    pub ledger: Arc<LedgerManager>,
    /// Node name reported by the status endpoint.
    pub node_name: String,
}

impl AppState {
    /// Create a new app state.
    pub fn new(ledger: Arc<LedgerManager>, node_name: String) -> Self {
        Self { ledger, node_name }
    }
}
