//! # ledger-tests
//!
//! Integration tests for the UTXO ledger indexer:
//! - State tests for apply, rollback, and balance maintenance
//! - Validation tests for every rejection code
//! - API tests exercising the HTTP surface end to end
//! - Property-based tests for the engine invariants

pub mod generators;
pub mod harness;

#[cfg(test)]
mod state_tests;




pub use generators::*;
pub use harness::*;
