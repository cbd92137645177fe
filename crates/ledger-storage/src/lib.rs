//! # ledger-storage
//!
//! Storage layer for the UTXO ledger indexer.
//!
//! This crate provides a RocksDB-based storage abstraction with support for:
//! - Column families for the indexer's relations (blocks, transactions,
//!   outputs, inputs, balances)
//! - Atomic batch writes
//! - Idempotent schema bootstrap
//!
//! ## Column Families
//!
//! - `Blocks`: block records indexed by block id
//! - `HeightIndex`: height -> block id
//! - `Transactions`: transaction records indexed by tx id
//! - `Outputs`: output records indexed by (tx id, output index)
//! - `Inputs`: input records indexed by (tx id, input ordinal)
//! - `SpentIndex`: consumed output key -> spending tx id
//! - `AddressBalances`: cached balance per address
//! - `AddressIndex`: address -> output keys
//! - `Metadata`: tip height, schema version

mod batch;
mod database;
mod error;

pub use batch::WriteBatch;
pub use database::{ColumnFamily, Database, SCHEMA_VERSION};
pub use error::{StorageError, StorageResult};

/// Storage trait for abstracting database operations.
///
/// This allows for easy testing with mock implementations.
pub trait Storage: Send + Sync {
    /// Get a value by key from a column family.
    fn get(&self, cf: ColumnFamily, key: &[u8]) -> StorageResult<Option<Vec<u8>>>;

    /// Put a key-value pair into a column family.
    fn put(&self, cf: ColumnFamily, key: &[u8], value: &[u8]) -> StorageResult<()>;

    /// Delete a key from a column family.
    fn delete(&self, cf: ColumnFamily, key: &[u8]) -> StorageResult<()>;

    /// Check if a key exists in a column family.
    fn contains(&self, cf: ColumnFamily, key: &[u8]) -> StorageResult<bool> {
        Ok(self.get(cf, key)?.is_some())
    }

    /// Execute a batch of writes atomically.
    fn write_batch(&self, batch: WriteBatch) -> StorageResult<()>;

    /// Create an iterator over a column family.
    fn iter(&self, cf: ColumnFamily) -> StorageResult<Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + '_>>;
}
