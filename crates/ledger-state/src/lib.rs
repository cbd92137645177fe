//! # ledger-state
//!
//! State engine for the UTXO ledger indexer.
//!
//! This crate provides:
//! - Block validation against accumulated history (height, economics, hash)
//! - Atomic block application (outputs created, inputs spent, balances
//!   adjusted)
//! - Rollback to any prior height, restoring outputs and rebuilding the
//!   balance view
//! - Point balance queries from the cached view plus a recomputed audit sum
//!
//! ## Architecture
//!
//! Every mutating operation reads committed state through [`StoreView`],
//! stages its full effect into a single [`ledger_storage::WriteBatch`], and
//! commits it atomically. [`LedgerManager`] serializes writers and owns the
//! store handle.

mod apply;
mod balances;
mod error;
mod manager;
mod records;
mod rollback;
mod validator;
mod view;

pub use error::{StateError, StateResult};
pub use manager::LedgerManager;
pub use records::{BlockRecord, InputRecord, OutputRecord, TxRecord};
pub use validator::validate_block;
pub use view::StoreView;
