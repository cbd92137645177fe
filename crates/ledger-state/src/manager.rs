//! Single-writer coordinator for the ledger state.

use crate::{apply, balances, rollback, validator, StateResult, StoreView};
use ledger_core::{Block, ValidationError};
use ledger_storage::Storage;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, instrument, warn};

/// Owns the store handle and serializes mutating operations.
///
/// At most one submit or rollback runs at a time; the height check and
/// output lookups inside an operation therefore never observe interleaved
/// writes. Balance reads take no lock and see the last committed state.
pub struct LedgerManager {
    storage: Arc<dyn Storage>,
    write_lock: Mutex<()>,
}

impl LedgerManager {
    /// Create a manager over the given storage.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    /// Validate and apply a submitted block in one atomic transaction.
    ///
    /// Validation failures leave the store untouched and carry a stable
    /// machine code; store failures abort the staged batch unchanged.
    #[instrument(skip(self, block), fields(block_id = %block.id, height = block.height))]
    pub fn submit_block(&self, block: &Block) -> StateResult<()> {
        let _guard = self.write_lock.lock();
        let view = StoreView::new(self.storage.as_ref());

        if let Err(err) = validator::validate_block(&view, block) {
            warn!(%err, "Block rejected");
            return Err(err);
        }

        let batch = apply::stage_block(&view, block, unix_now())?;
        self.storage.write_batch(batch)?;

        info!(
            height = block.height,
            transactions = block.transactions.len(),
            "Block applied"
        );
        Ok(())
    }

    /// Roll the chain back to `target_height` in one atomic transaction.
    ///
    /// A target at or above the current tip succeeds without mutation.
    #[instrument(skip(self))]
    pub fn rollback_to(&self, target_height: i64) -> StateResult<()> {
        if target_height < 0 {
            return Err(ValidationError::InvalidTarget {
                height: target_height,
            }
            .into());
        }

        let _guard = self.write_lock.lock();
        let view = StoreView::new(self.storage.as_ref());

        match rollback::stage_rollback(&view, target_height as u64)? {
            Some(batch) => {
                self.storage.write_batch(batch)?;
                info!(target = target_height, "Rollback complete");
            }
            None => {
                info!(target = target_height, "Rollback is a no-op");
            }
        }
        Ok(())
    }

    /// Current chain tip height (0 when empty).
    pub fn tip_height(&self) -> StateResult<u64> {
        StoreView::new(self.storage.as_ref()).tip_height()
    }

    /// Cached balance for an address. Absence reads as 0.
    pub fn get_balance(&self, address: &str) -> StateResult<i64> {
        let view = StoreView::new(self.storage.as_ref());
        balances::cached_balance(&view, address)
    }

    /// Recomputed balance from unspent outputs, for auditing.
    pub fn compute_balance(&self, address: &str) -> StateResult<i64> {
        let view = StoreView::new(self.storage.as_ref());
        balances::computed_balance(&view, address)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::{compute_block_id, Transaction, TxInput, TxOutput};
    use ledger_storage::Database;
    use tempfile::TempDir;

    fn create_test_manager() -> (LedgerManager, TempDir) {
        let tmp = TempDir::new().unwrap();
        let db = Database::open(tmp.path()).unwrap();
        db.ensure_schema().unwrap();
        (LedgerManager::new(Arc::new(db)), tmp)
    }

    fn block(height: u64, transactions: Vec<Transaction>) -> Block {
        let tx_ids: Vec<&str> = transactions.iter().map(|tx| tx.id.as_str()).collect();
        Block {
            id: compute_block_id(height, &tx_ids),
            height,
            transactions,
        }
    }

    fn coinbase(id: &str, outputs: Vec<(&str, u64)>) -> Transaction {
        Transaction {
            id: id.to_string(),
            inputs: vec![],
            outputs: outputs
                .into_iter()
                .map(|(address, value)| TxOutput {
                    address: address.to_string(),
                    value,
                })
                .collect(),
        }
    }

    #[test]
    fn test_genesis_updates_balance() {
        let (manager, _tmp) = create_test_manager();

        let b1 = block(1, vec![coinbase("tx1", vec![("addr1", 10)])]);
        manager.submit_block(&b1).unwrap();

        assert_eq!(manager.tip_height().unwrap(), 1);
        assert_eq!(manager.get_balance("addr1").unwrap(), 10);
        assert_eq!(manager.compute_balance("addr1").unwrap(), 10);
    }

    #[test]
    fn test_spend_moves_value() {
        let (manager, _tmp) = create_test_manager();

        manager
            .submit_block(&block(1, vec![coinbase("tx1", vec![("addr1", 10)])]))
            .unwrap();

        let tx2 = Transaction {
            id: "tx2".to_string(),
            inputs: vec![TxInput {
                tx_id: "tx1".to_string(),
                index: 0,
            }],
            outputs: vec![
                TxOutput {
                    address: "addr2".to_string(),
                    value: 4,
                },
                TxOutput {
                    address: "addr3".to_string(),
                    value: 6,
                },
            ],
        };
        manager.submit_block(&block(2, vec![tx2])).unwrap();

        assert_eq!(manager.get_balance("addr1").unwrap(), 0);
        assert_eq!(manager.get_balance("addr2").unwrap(), 4);
        assert_eq!(manager.get_balance("addr3").unwrap(), 6);
    }

    #[test]
    fn test_rollback_restores_spent_output() {
        let (manager, _tmp) = create_test_manager();

        manager
            .submit_block(&block(1, vec![coinbase("tx1", vec![("addr1", 10)])]))
            .unwrap();

        let tx2 = Transaction {
            id: "tx2".to_string(),
            inputs: vec![TxInput {
                tx_id: "tx1".to_string(),
                index: 0,
            }],
            outputs: vec![TxOutput {
                address: "addr2".to_string(),
                value: 10,
            }],
        };
        manager.submit_block(&block(2, vec![tx2])).unwrap();

        manager.rollback_to(1).unwrap();

        assert_eq!(manager.tip_height().unwrap(), 1);
        assert_eq!(manager.get_balance("addr1").unwrap(), 10);
        assert_eq!(manager.get_balance("addr2").unwrap(), 0);
        assert_eq!(manager.compute_balance("addr1").unwrap(), 10);
    }

    #[test]
    fn test_rollback_negative_target_rejected() {
        let (manager, _tmp) = create_test_manager();
        let err = manager.rollback_to(-1).unwrap_err();
        assert!(err.to_string().contains("-1"));
    }

    #[test]
    fn test_rollback_at_tip_is_noop() {
        let (manager, _tmp) = create_test_manager();

        manager
            .submit_block(&block(1, vec![coinbase("tx1", vec![("addr1", 10)])]))
            .unwrap();

        manager.rollback_to(1).unwrap();
        manager.rollback_to(5).unwrap();

        assert_eq!(manager.tip_height().unwrap(), 1);
        assert_eq!(manager.get_balance("addr1").unwrap(), 10);
    }

    #[test]
    fn test_unknown_address_reads_zero() {
        let (manager, _tmp) = create_test_manager();
        assert_eq!(manager.get_balance("nobody").unwrap(), 0);
        assert_eq!(manager.compute_balance("nobody").unwrap(), 0);
    }
}
