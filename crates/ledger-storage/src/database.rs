//! RocksDB database implementation.

use crate::{Storage, StorageError, StorageResult, WriteBatch};
use parking_lot::RwLock;
use rocksdb::{ColumnFamilyDescriptor, DBWithThreadMode, MultiThreaded, Options};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Current schema version written to the `Metadata` column family.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

/// Column families for organizing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnFamily {
    /// Block records indexed by block id.
    Blocks,
    /// Height (big-endian u64) -> block id.
    HeightIndex,
    /// Transaction records indexed by tx id.
    Transactions,
    /// Output records indexed by (tx id, output index).
    Outputs,
    /// Input records indexed by (tx id, input ordinal).
    Inputs,
    /// Consumed output key -> spending tx id.
    SpentIndex,
    /// Cached per-address balance.
    AddressBalances,
    /// Address -> output keys owned by that address.
    AddressIndex,
    /// Engine metadata (tip height, schema version).
    Metadata,
    /// Default column family (required by RocksDB).
    Default,
}

impl ColumnFamily {
    /// Get the string name of the column family.
    pub fn name(&self) -> &'static str {
        match self {
            ColumnFamily::Blocks => "blocks",
            ColumnFamily::HeightIndex => "height_index",
            ColumnFamily::Transactions => "transactions",
            ColumnFamily::Outputs => "outputs",
            ColumnFamily::Inputs => "inputs",
            ColumnFamily::SpentIndex => "spent_index",
            ColumnFamily::AddressBalances => "address_balances",
            ColumnFamily::AddressIndex => "address_index",
            ColumnFamily::Metadata => "metadata",
            ColumnFamily::Default => "default",
        }
    }

    /// Get all column families.
    pub fn all() -> &'static [ColumnFamily] {
        &[
            ColumnFamily::Blocks,
            ColumnFamily::HeightIndex,
            ColumnFamily::Transactions,
            ColumnFamily::Outputs,
            ColumnFamily::Inputs,
            ColumnFamily::SpentIndex,
            ColumnFamily::AddressBalances,
            ColumnFamily::AddressIndex,
            ColumnFamily::Metadata,
            ColumnFamily::Default,
        ]
    }
}

/// RocksDB database wrapper.
pub struct Database {
    db: Arc<RwLock<DBWithThreadMode<MultiThreaded>>>,
}

impl Database {
    /// Open or create a database at the given path.
    ///
    /// Missing column families are created, so the on-disk schema is
    /// bootstrapped idempotently on every startup.
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let path = path.as_ref();
        info!("Opening database at {:?}", path);

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_max_open_files(256);
        opts.set_keep_log_file_num(1);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = ColumnFamily::all()
            .iter()
            .map(|cf| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
                ColumnFamilyDescriptor::new(cf.name(), cf_opts)
            })
            .collect();

        let db =
            DBWithThreadMode::<MultiThreaded>::open_cf_descriptors(&opts, path, cf_descriptors)?;

        debug!("Database opened successfully");

        Ok(Self {
            db: Arc::new(RwLock::new(db)),
        })
    }

    /// Verify the on-disk schema version, stamping it on first open.
    ///
    /// A store written by a newer schema is rejected rather than silently
    /// reinterpreted.
    pub fn ensure_schema(&self) -> StorageResult<()> {
        match self.get(ColumnFamily::Metadata, SCHEMA_VERSION_KEY)? {
            None => {
                self.put(
                    ColumnFamily::Metadata,
                    SCHEMA_VERSION_KEY,
                    &SCHEMA_VERSION.to_be_bytes(),
                )?;
                info!(version = SCHEMA_VERSION, "Initialized store schema");
                Ok(())
            }
            Some(bytes) if bytes.len() == 4 => {
                let found = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                if found > SCHEMA_VERSION {
                    return Err(StorageError::Corruption(format!(
                        "Store schema version {} is newer than supported version {}",
                        found, SCHEMA_VERSION
                    )));
                }
                debug!(version = found, "Store schema verified");
                Ok(())
            }
            Some(bytes) => Err(StorageError::Corruption(format!(
                "Malformed schema version record ({} bytes)",
                bytes.len()
            ))),
        }
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> StorageResult<()> {
        let db = self.db.read();
        for cf in ColumnFamily::all() {
            if let Some(handle) = db.cf_handle(cf.name()) {
                db.flush_cf(&handle)?;
            }
        }
        Ok(())
    }
}

impl Storage for Database {
    fn get(&self, cf: ColumnFamily, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        let db = self.db.read();
        let handle = db
            .cf_handle(cf.name())
            .ok_or_else(|| StorageError::ColumnFamilyNotFound(cf.name().to_string()))?;

        Ok(db.get_cf(&handle, key)?)
    }

    fn put(&self, cf: ColumnFamily, key: &[u8], value: &[u8]) -> StorageResult<()> {
        let db = self.db.read();
        let handle = db
            .cf_handle(cf.name())
            .ok_or_else(|| StorageError::ColumnFamilyNotFound(cf.name().to_string()))?;

        db.put_cf(&handle, key, value)?;
        Ok(())
    }

    fn delete(&self, cf: ColumnFamily, key: &[u8]) -> StorageResult<()> {
        let db = self.db.read();
        let handle = db
            .cf_handle(cf.name())
            .ok_or_else(|| StorageError::ColumnFamilyNotFound(cf.name().to_string()))?;

        db.delete_cf(&handle, key)?;
        Ok(())
    }

    fn write_batch(&self, batch: WriteBatch) -> StorageResult<()> {
        let db = self.db.read();
        let mut rocks_batch = rocksdb::WriteBatch::default();

        for op in batch.operations {
            let handle = db
                .cf_handle(op.cf.name())
                .ok_or_else(|| StorageError::ColumnFamilyNotFound(op.cf.name().to_string()))?;

            match op.kind {
                crate::batch::OperationKind::Put { value } => {
                    rocks_batch.put_cf(&handle, &op.key, &value);
                }
                crate::batch::OperationKind::Delete => {
                    rocks_batch.delete_cf(&handle, &op.key);
                }
            }
        }

        db.write(rocks_batch)?;
        Ok(())
    }

    fn iter(
        &self,
        cf: ColumnFamily,
    ) -> StorageResult<Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + '_>> {
        let db = self.db.read();
        let handle = db
            .cf_handle(cf.name())
            .ok_or_else(|| StorageError::ColumnFamilyNotFound(cf.name().to_string()))?;

        let iter = db.iterator_cf(&handle, rocksdb::IteratorMode::Start);

        let collected: Vec<_> = iter
            .filter_map(|r| r.ok())
            .map(|(k, v)| (k.to_vec(), v.to_vec()))
            .collect();

        Ok(Box::new(collected.into_iter()))
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
        }
    }
}
