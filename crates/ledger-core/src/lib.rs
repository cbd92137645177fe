//! # ledger-core
//!
//! Domain model for the UTXO ledger indexer:
//! - Wire types for submitted blocks (`Block`, `Transaction`, inputs, outputs)
//! - Canonical block-id hashing
//! - Typed validation failures with stable machine codes

mod block;
mod error;
mod hasher;

pub use block::{Block, Transaction, TxInput, TxOutput};
pub use error::{ValidationError, ValidationResult};
pub use hasher::compute_block_id;
