//! Rollback to a prior height.
//!
//! Deletes every block above the target together with its transactions,
//! outputs, and inputs, flips back the spent flag on surviving outputs whose
//! referencing input is removed, and rebuilds the balance view from the
//! surviving unspent outputs. The whole reversal is staged into one batch;
//! a partial rollback is never observable.
//!
//! Un-spending works directly off the deleted inputs: an output has at most
//! one referencing input, so removing input `(ref_tx, ref_idx)` un-spends
//! that output exactly when `ref_tx` survives the rollback.

use crate::records::{
    decode_output_key, height_key, input_key, output_key, serialize_key_list, OutputRecord,
    TIP_HEIGHT_KEY,
};
use crate::{StateError, StateResult, StoreView};
use ledger_storage::{ColumnFamily, WriteBatch};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Stage a rollback to `target_height` into a single atomic batch.
///
/// Returns `None` when the chain is empty or the target is at or above the
/// current tip; those rollbacks succeed without mutation.
pub fn stage_rollback(view: &StoreView<'_>, target_height: u64) -> StateResult<Option<WriteBatch>> {
    let tip = view.tip_height()?;
    if tip == 0 || target_height >= tip {
        return Ok(None);
    }

    let mut batch = WriteBatch::new();

    // Walk the doomed heights and collect the transactions being removed.
    let mut rolled_blocks = Vec::new();
    let mut rolled_txs: HashSet<String> = HashSet::new();
    for height in target_height + 1..=tip {
        let block_id = view.block_id_at(height)?.ok_or_else(|| {
            StateError::Corruption(format!("Missing block at height {}", height))
        })?;
        let record = view.get_block(&block_id)?.ok_or_else(|| {
            StateError::Corruption(format!("Missing block record for {}", block_id))
        })?;
        rolled_txs.extend(record.tx_ids.iter().cloned());
        rolled_blocks.push((height, block_id, record));
    }

    // Cascade deletes, un-spending surviving outputs as their referencing
    // inputs disappear.
    let mut unspent_keys: HashSet<Vec<u8>> = HashSet::new();
    for (height, block_id, record) in &rolled_blocks {
        batch.delete(ColumnFamily::Blocks, block_id.as_bytes());
        batch.delete(ColumnFamily::HeightIndex, height_key(*height).to_vec());

        for tx_id in &record.tx_ids {
            let tx = view.get_transaction(tx_id)?.ok_or_else(|| {
                StateError::Corruption(format!("Missing transaction record for {}", tx_id))
            })?;
            batch.delete(ColumnFamily::Transactions, tx_id.as_bytes());

            for ordinal in 0..tx.n_inputs {
                let input = view.get_input(tx_id, ordinal)?.ok_or_else(|| {
                    StateError::Corruption(format!("Missing input {}#{}", tx_id, ordinal))
                })?;
                batch.delete(ColumnFamily::Inputs, input_key(tx_id, ordinal));

                let consumed_key = output_key(&input.spent_tx_id, input.spent_index);
                batch.delete(ColumnFamily::SpentIndex, consumed_key.clone());

                if !rolled_txs.contains(&input.spent_tx_id) {
                    let mut output = view
                        .get_output(&input.spent_tx_id, input.spent_index)?
                        .ok_or_else(|| {
                            StateError::Corruption(format!(
                                "Missing spent output {}:{}",
                                input.spent_tx_id, input.spent_index
                            ))
                        })?;
                    output.spent = false;
                    batch.put(ColumnFamily::Outputs, consumed_key.clone(), output.serialize());
                    unspent_keys.insert(consumed_key);
                }
            }

            for index in 0..tx.n_outputs {
                batch.delete(ColumnFamily::Outputs, output_key(tx_id, index));
            }
        }
    }

    // Rebuild the balance view and address index from surviving outputs.
    let mut balances: HashMap<String, i64> = HashMap::new();
    let mut address_index: HashMap<String, Vec<Vec<u8>>> = HashMap::new();
    for (key, value) in view.iter_outputs()? {
        let (tx_id, _) = decode_output_key(&key)?;
        if rolled_txs.contains(&tx_id) {
            continue;
        }
        let record = OutputRecord::deserialize(&value)?;
        let spent = record.spent && !unspent_keys.contains(&key);
        address_index
            .entry(record.address.clone())
            .or_default()
            .push(key);
        if !spent {
            *balances.entry(record.address).or_insert(0) += record.value as i64;
        }
    }

    // Clear both derived relations, then reinsert the recomputed rows.
    // Addresses left without unspent outputs are simply absent afterwards.
    for key in view.balance_keys()? {
        batch.delete(ColumnFamily::AddressBalances, key);
    }
    for key in view.address_index_keys()? {
        batch.delete(ColumnFamily::AddressIndex, key);
    }
    for (address, balance) in &balances {
        batch.put(
            ColumnFamily::AddressBalances,
            address.as_bytes(),
            balance.to_be_bytes().to_vec(),
        );
    }
    for (address, keys) in &address_index {
        batch.put(
            ColumnFamily::AddressIndex,
            address.as_bytes(),
            serialize_key_list(keys),
        );
    }

    batch.put(
        ColumnFamily::Metadata,
        TIP_HEIGHT_KEY,
        target_height.to_be_bytes().to_vec(),
    );

    debug!(
        from = tip,
        to = target_height,
        blocks = rolled_blocks.len(),
        "Staged rollback"
    );

    Ok(Some(batch))
}
