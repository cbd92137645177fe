//! Wire model for submitted blocks.
//!
//! These types mirror the JSON accepted on `POST /blocks`. A block owns its
//! transactions; a transaction owns the outputs it creates and references
//! the outputs its inputs consume.

use crate::hasher::compute_block_id;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A candidate block as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Block {
    /// Canonical block id (64-char lowercase hex).
    #[schema(example = "9c4e1a0e0a1f0b8a1d8a0f9a2b3c4d5e6f708192a3b4c5d6e7f8091a2b3c4d5e")]
    pub id: String,
    /// 1-indexed position in the chain.
    #[schema(example = 1)]
    pub height: u64,
    /// Transactions in submission order.
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Recompute the canonical id from this block's height and tx ids.
    pub fn computed_id(&self) -> String {
        let tx_ids: Vec<&str> = self.transactions.iter().map(|tx| tx.id.as_str()).collect();
        compute_block_id(self.height, &tx_ids)
    }
}

/// A transaction inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    /// Transaction id.
    #[schema(example = "tx1")]
    pub id: String,
    /// Outputs consumed by this transaction. Empty for coinbase-like
    /// transactions, which mint value freely.
    #[serde(default)]
    pub inputs: Vec<TxInput>,
    /// Outputs created by this transaction, addressed by position.
    #[serde(default)]
    pub outputs: Vec<TxOutput>,
}

impl Transaction {
    /// Sum of the values this transaction creates.
    pub fn output_sum(&self) -> u64 {
        self.outputs.iter().map(|o| o.value).sum()
    }
}

/// A reference to the output a transaction consumes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TxInput {
    /// Id of the transaction that created the referenced output.
    #[schema(example = "tx1")]
    pub tx_id: String,
    /// Position of the referenced output within that transaction.
    #[schema(example = 0)]
    pub index: u32,
}

/// An output created by a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TxOutput {
    /// Receiving address.
    #[schema(example = "addr1")]
    pub address: String,
    /// Value carried by this output. Never negative.
    #[schema(example = 10)]
    pub value: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_json_shape() {
        let json = r#"{
            "id": "abc",
            "height": 2,
            "transactions": [
                {
                    "id": "tx2",
                    "inputs": [{"txId": "tx1", "index": 0}],
                    "outputs": [{"address": "addr2", "value": 4}]
                }
            ]
        }"#;

        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(block.height, 2);
        assert_eq!(block.transactions[0].inputs[0].tx_id, "tx1");
        assert_eq!(block.transactions[0].inputs[0].index, 0);
        assert_eq!(block.transactions[0].outputs[0].value, 4);
    }

    #[test]
    fn test_missing_inputs_and_outputs_default_empty() {
        let json = r#"{"id": "abc", "height": 1, "transactions": [{"id": "tx1"}]}"#;
        let block: Block = serde_json::from_str(json).unwrap();
        assert!(block.transactions[0].inputs.is_empty());
        assert!(block.transactions[0].outputs.is_empty());
    }

    #[test]
    fn test_input_serializes_camel_case() {
        let input = TxInput {
            tx_id: "tx1".to_string(),
            index: 3,
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["txId"], "tx1");
        assert_eq!(json["index"], 3);
    }

    #[test]
    fn test_output_sum() {
        let tx = Transaction {
            id: "tx1".to_string(),
            inputs: vec![],
            outputs: vec![
                TxOutput {
                    address: "a".to_string(),
                    value: 4,
                },
                TxOutput {
                    address: "b".to_string(),
                    value: 6,
                },
            ],
        };
        assert_eq!(tx.output_sum(), 10);
    }
}
