//! Read-only view over committed store state.
//!
//! Every engine operation reads through this view. Reads always observe the
//! last committed state; writes staged in a pending batch are not visible,
//! so mutating operations compute their final effects in memory before
//! committing.

use crate::records::{
    deserialize_key_list, height_key, input_key, output_key, BlockRecord, InputRecord,
    OutputRecord, TxRecord, TIP_HEIGHT_KEY,
};
use crate::{StateError, StateResult};
use ledger_storage::{ColumnFamily, Storage};

/// Read-only accessor for the indexer's relations.
pub struct StoreView<'a> {
    storage: &'a dyn Storage,
}

impl<'a> StoreView<'a> {
    /// Create a view over the given storage.
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// Current maximum block height, or 0 when the chain is empty.
    pub fn tip_height(&self) -> StateResult<u64> {
        match self.storage.get(ColumnFamily::Metadata, TIP_HEIGHT_KEY)? {
            Some(bytes) if bytes.len() == 8 => {
                Ok(u64::from_be_bytes(bytes[..8].try_into().unwrap()))
            }
            Some(bytes) => Err(StateError::Corruption(format!(
                "Malformed tip height record ({} bytes)",
                bytes.len()
            ))),
            None => Ok(0),
        }
    }

    /// Block id at the given height, if a block exists there.
    pub fn block_id_at(&self, height: u64) -> StateResult<Option<String>> {
        match self
            .storage
            .get(ColumnFamily::HeightIndex, &height_key(height))?
        {
            Some(bytes) => {
                let id = String::from_utf8(bytes)
                    .map_err(|e| StateError::Serialization(e.to_string()))?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }

    /// Look up a block record by id.
    pub fn get_block(&self, block_id: &str) -> StateResult<Option<BlockRecord>> {
        match self.storage.get(ColumnFamily::Blocks, block_id.as_bytes())? {
            Some(bytes) => Ok(Some(BlockRecord::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Look up a transaction record by id.
    pub fn get_transaction(&self, tx_id: &str) -> StateResult<Option<TxRecord>> {
        match self
            .storage
            .get(ColumnFamily::Transactions, tx_id.as_bytes())?
        {
            Some(bytes) => Ok(Some(TxRecord::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Look up an output by `(tx_id, index)`.
    pub fn get_output(&self, tx_id: &str, index: u32) -> StateResult<Option<OutputRecord>> {
        match self
            .storage
            .get(ColumnFamily::Outputs, &output_key(tx_id, index))?
        {
            Some(bytes) => Ok(Some(OutputRecord::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Look up an input row by `(tx_id, ordinal)`.
    pub fn get_input(&self, tx_id: &str, ordinal: u32) -> StateResult<Option<InputRecord>> {
        match self
            .storage
            .get(ColumnFamily::Inputs, &input_key(tx_id, ordinal))?
        {
            Some(bytes) => Ok(Some(InputRecord::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Id of the transaction spending the given output, if any.
    pub fn spender_of(&self, tx_id: &str, index: u32) -> StateResult<Option<String>> {
        match self
            .storage
            .get(ColumnFamily::SpentIndex, &output_key(tx_id, index))?
        {
            Some(bytes) => {
                let id = String::from_utf8(bytes)
                    .map_err(|e| StateError::Serialization(e.to_string()))?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }

    /// Cached balance for an address. Absence reads as 0.
    pub fn cached_balance(&self, address: &str) -> StateResult<i64> {
        match self
            .storage
            .get(ColumnFamily::AddressBalances, address.as_bytes())?
        {
            Some(bytes) if bytes.len() == 8 => {
                Ok(i64::from_be_bytes(bytes[..8].try_into().unwrap()))
            }
            Some(bytes) => Err(StateError::Corruption(format!(
                "Malformed balance record for {} ({} bytes)",
                address,
                bytes.len()
            ))),
            None => Ok(0),
        }
    }

    /// Output keys recorded for an address (spent and unspent alike).
    pub fn address_outputs(&self, address: &str) -> StateResult<Vec<Vec<u8>>> {
        match self
            .storage
            .get(ColumnFamily::AddressIndex, address.as_bytes())?
        {
            Some(bytes) => deserialize_key_list(&bytes),
            None => Ok(Vec::new()),
        }
    }

    /// All output rows, as raw `(key, value)` pairs.
    pub fn iter_outputs(&self) -> StateResult<Vec<(Vec<u8>, Vec<u8>)>> {
        Ok(self.storage.iter(ColumnFamily::Outputs)?.collect())
    }

    /// All addresses present in the cached balance relation.
    pub fn balance_keys(&self) -> StateResult<Vec<Vec<u8>>> {
        Ok(self
            .storage
            .iter(ColumnFamily::AddressBalances)?
            .map(|(k, _)| k)
            .collect())
    }

    /// All addresses present in the address index.
    pub fn address_index_keys(&self) -> StateResult<Vec<Vec<u8>>> {
        Ok(self
            .storage
            .iter(ColumnFamily::AddressIndex)?
            .map(|(k, _)| k)
            .collect())
    }
}
