//! Block validation against accumulated history.
//!
//! Three groups of checks run in order; the first failure aborts:
//! height (must extend the tip), economics (every input references an
//! existing unspent output, at most once per block, and non-coinbase
//! transactions conserve value), and the canonical hash. Validation is
//! read-only.

use crate::{StateResult, StoreView};
use ledger_core::{Block, ValidationError};
use std::collections::HashSet;
use tracing::debug;

/// Validate a candidate block against the current committed state.
pub fn validate_block(view: &StoreView<'_>, block: &Block) -> StateResult<()> {
    check_height(view, block)?;
    check_economics(view, block)?;
    check_hash(block)?;
    debug!(block_id = %block.id, height = block.height, "Block validated");
    Ok(())
}

fn check_height(view: &StoreView<'_>, block: &Block) -> StateResult<()> {
    let expected = view.tip_height()? + 1;
    if block.height != expected {
        return Err(ValidationError::InvalidHeight {
            expected,
            actual: block.height,
        }
        .into());
    }
    Ok(())
}

fn check_economics(view: &StoreView<'_>, block: &Block) -> StateResult<()> {
    // Outputs consumed earlier in this same block. Outputs created earlier
    // in the block are not spendable here: lookups go against committed
    // state only.
    let mut spent_in_block: HashSet<(&str, u32)> = HashSet::new();

    for tx in &block.transactions {
        let mut input_sum: u64 = 0;

        for input in &tx.inputs {
            let reference = (input.tx_id.as_str(), input.index);
            if spent_in_block.contains(&reference) {
                return Err(ValidationError::DoubleSpend {
                    tx_id: input.tx_id.clone(),
                    index: input.index,
                }
                .into());
            }

            let output = view.get_output(&input.tx_id, input.index)?.ok_or_else(|| {
                ValidationError::NonexistentOutput {
                    tx_id: input.tx_id.clone(),
                    index: input.index,
                }
            })?;
            if output.spent {
                return Err(ValidationError::AlreadySpent {
                    tx_id: input.tx_id.clone(),
                    index: input.index,
                }
                .into());
            }

            spent_in_block.insert(reference);
            input_sum += output.value;
        }

        let output_sum = tx.output_sum();
        if !tx.inputs.is_empty() && input_sum != output_sum {
            return Err(ValidationError::SumMismatch {
                tx_id: tx.id.clone(),
                inputs: input_sum,
                outputs: output_sum,
            }
            .into());
        }
    }

    Ok(())
}

fn check_hash(block: &Block) -> StateResult<()> {
    let expected = block.computed_id();
    if block.id != expected {
        return Err(ValidationError::InvalidBlockId {
            expected,
            actual: block.id.clone(),
        }
        .into());
    }
    Ok(())
}
