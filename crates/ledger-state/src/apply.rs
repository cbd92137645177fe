//! Block application.
//!
//! Stages the full effect of one validated block into a write batch:
//! block and transaction rows, spent flags on consumed outputs, new output
//! rows, and per-address balance and index updates. Balance deltas are
//! accumulated in memory and folded into one read-modify-write per address,
//! since reads see only committed state.

use crate::records::{
    height_key, input_key, output_key, serialize_key_list, BlockRecord, InputRecord, OutputRecord,
    TxRecord, TIP_HEIGHT_KEY,
};
use crate::{StateError, StateResult, StoreView};
use ledger_core::Block;
use ledger_storage::{ColumnFamily, WriteBatch};
use std::collections::{HashMap, HashSet};

/// Stage a validated block into a single atomic batch.
pub fn stage_block(view: &StoreView<'_>, block: &Block, created_at: u64) -> StateResult<WriteBatch> {
    let mut batch = WriteBatch::new();

    let block_record = BlockRecord {
        height: block.height,
        created_at,
        tx_ids: block.transactions.iter().map(|tx| tx.id.clone()).collect(),
    };
    batch.put(
        ColumnFamily::Blocks,
        block.id.as_bytes(),
        block_record.serialize(),
    );
    batch.put(
        ColumnFamily::HeightIndex,
        height_key(block.height).to_vec(),
        block.id.as_bytes(),
    );
    batch.put(
        ColumnFamily::Metadata,
        TIP_HEIGHT_KEY,
        block.height.to_be_bytes().to_vec(),
    );

    let mut deltas: HashMap<String, i64> = HashMap::new();
    let mut index_additions: HashMap<String, Vec<Vec<u8>>> = HashMap::new();
    let mut ids_in_block: HashSet<&str> = HashSet::new();

    for tx in &block.transactions {
        // Transaction ids are globally unique; a collision here is a
        // constraint violation the validator does not anticipate.
        if !ids_in_block.insert(&tx.id) || view.get_transaction(&tx.id)?.is_some() {
            return Err(StateError::Corruption(format!(
                "Transaction id already exists: {}",
                tx.id
            )));
        }

        let tx_record = TxRecord {
            block_id: block.id.clone(),
            created_at,
            n_inputs: tx.inputs.len() as u32,
            n_outputs: tx.outputs.len() as u32,
        };
        batch.put(
            ColumnFamily::Transactions,
            tx.id.as_bytes(),
            tx_record.serialize(),
        );

        for (ordinal, input) in tx.inputs.iter().enumerate() {
            let consumed_key = output_key(&input.tx_id, input.index);
            let mut consumed =
                view.get_output(&input.tx_id, input.index)?
                    .ok_or_else(|| {
                        StateError::Corruption(format!(
                            "Validated input references missing output {}:{}",
                            input.tx_id, input.index
                        ))
                    })?;

            consumed.spent = true;
            batch.put(
                ColumnFamily::Outputs,
                consumed_key.clone(),
                consumed.serialize(),
            );
            batch.put(
                ColumnFamily::Inputs,
                input_key(&tx.id, ordinal as u32),
                InputRecord {
                    spent_tx_id: input.tx_id.clone(),
                    spent_index: input.index,
                }
                .serialize(),
            );
            batch.put(ColumnFamily::SpentIndex, consumed_key, tx.id.as_bytes());

            let delta = consumed.value as i64;
            *deltas.entry(consumed.address).or_insert(0) -= delta;
        }

        for (index, output) in tx.outputs.iter().enumerate() {
            let key = output_key(&tx.id, index as u32);
            let record = OutputRecord {
                address: output.address.clone(),
                value: output.value,
                spent: false,
            };
            batch.put(ColumnFamily::Outputs, key.clone(), record.serialize());

            *deltas.entry(output.address.clone()).or_insert(0) += output.value as i64;
            index_additions
                .entry(output.address.clone())
                .or_default()
                .push(key);
        }
    }

    // Fold accumulated effects: one upsert per touched address.
    for (address, delta) in deltas {
        let balance = view.cached_balance(&address)? + delta;
        batch.put(
            ColumnFamily::AddressBalances,
            address.as_bytes(),
            balance.to_be_bytes().to_vec(),
        );
    }
    for (address, mut keys) in index_additions {
        let mut existing = view.address_outputs(&address)?;
        existing.append(&mut keys);
        batch.put(
            ColumnFamily::AddressIndex,
            address.as_bytes(),
            serialize_key_list(&existing),
        );
    }

    Ok(batch)
}
