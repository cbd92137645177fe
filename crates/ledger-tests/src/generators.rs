//! Test data generators for integration tests.
//!
//! Builders for blocks and transactions with canonical ids computed the
//! same way the validator expects them.

use ledger_core::{compute_block_id, Block, Transaction, TxInput, TxOutput};

/// Build a block at the given height with its canonical id.
pub fn block(height: u64, transactions: Vec<Transaction>) -> Block {
    let tx_ids: Vec<&str> = transactions.iter().map(|tx| tx.id.as_str()).collect();
    Block {
        id: compute_block_id(height, &tx_ids),
        height,
        transactions,
    }
}

/// Build a block with a deliberately wrong id.
pub fn block_with_bad_id(height: u64, transactions: Vec<Transaction>) -> Block {
    Block {
        id: "0".repeat(64),
        height,
        transactions,
    }
}

/// A coinbase-like transaction: no inputs, mints the given outputs.
pub fn coinbase(id: &str, outputs: &[(&str, u64)]) -> Transaction {
    Transaction {
        id: id.to_string(),
        inputs: vec![],
        outputs: outputs_of(outputs),
    }
}

/// A spending transaction consuming the given output references.
pub fn spend(id: &str, inputs: &[(&str, u32)], outputs: &[(&str, u64)]) -> Transaction {
    Transaction {
        id: id.to_string(),
        inputs: inputs
            .iter()
            .map(|(tx_id, index)| TxInput {
                tx_id: tx_id.to_string(),
                index: *index,
            })
            .collect(),
        outputs: outputs_of(outputs),
    }
}

fn outputs_of(outputs: &[(&str, u64)]) -> Vec<TxOutput> {
    outputs
        .iter()
        .map(|(address, value)| TxOutput {
            address: address.to_string(),
            value: *value,
        })
        .collect()
}

/// The three-block chain used by the split and rollback scenarios:
/// a genesis mint of 10 to addr1, a split into addr2/addr3, and a second
/// split of addr3's output across addr4/addr5/addr6.
pub fn three_block_chain() -> Vec<Block> {
    vec![
        block(1, vec![coinbase("tx1", &[("addr1", 10)])]),
        block(
            2,
            vec![spend("tx2", &[("tx1", 0)], &[("addr2", 4), ("addr3", 6)])],
        ),
        block(
            3,
            vec![spend(
                "tx3",
                &[("tx2", 1)],
                &[("addr4", 2), ("addr5", 2), ("addr6", 2)],
            )],
        ),
    ]
}
