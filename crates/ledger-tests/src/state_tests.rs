//! State engine tests: apply, rollback, and balance maintenance.

use crate::generators::{block, coinbase, spend, three_block_chain};
use crate::harness::test_manager;

// ============================================================================
// Apply
// ============================================================================

#[test]
fn test_genesis_block_credits_recipient() {
    let (manager, _db) = test_manager();

    manager
        .submit_block(&block(1, vec![coinbase("tx1", &[("addr1", 10)])]))
        .unwrap();

    assert_eq!(manager.tip_height().unwrap(), 1);
    assert_eq!(manager.get_balance("addr1").unwrap(), 10);
}

#[test]
fn test_split_spends_and_credits() {
    let (manager, _db) = test_manager();

    manager
        .submit_block(&block(1, vec![coinbase("tx1", &[("addr1", 10)])]))
        .unwrap();
    manager
        .submit_block(&block(
            2,
            vec![spend("tx2", &[("tx1", 0)], &[("addr2", 4), ("addr3", 6)])],
        ))
        .unwrap();

    assert_eq!(manager.get_balance("addr1").unwrap(), 0);
    assert_eq!(manager.get_balance("addr2").unwrap(), 4);
    assert_eq!(manager.get_balance("addr3").unwrap(), 6);
}

#[test]
fn test_multiple_transactions_in_one_block() {
    let (manager, _db) = test_manager();

    manager
        .submit_block(&block(
            1,
            vec![
                coinbase("tx1", &[("addr1", 10)]),
                coinbase("tx2", &[("addr1", 5), ("addr2", 7)]),
            ],
        ))
        .unwrap();

    assert_eq!(manager.get_balance("addr1").unwrap(), 15);
    assert_eq!(manager.get_balance("addr2").unwrap(), 7);
}

#[test]
fn test_spend_consumes_one_output_of_many() {
    let (manager, _db) = test_manager();

    manager
        .submit_block(&block(
            1,
            vec![coinbase("tx1", &[("addr1", 10), ("addr1", 3)])],
        ))
        .unwrap();
    manager
        .submit_block(&block(2, vec![spend("tx2", &[("tx1", 1)], &[("addr2", 3)])]))
        .unwrap();

    // Output 0 remains unspent.
    assert_eq!(manager.get_balance("addr1").unwrap(), 10);
    assert_eq!(manager.get_balance("addr2").unwrap(), 3);
}

#[test]
fn test_empty_transactions_block_is_accepted() {
    let (manager, _db) = test_manager();

    manager.submit_block(&block(1, vec![])).unwrap();

    assert_eq!(manager.tip_height().unwrap(), 1);
}

#[test]
fn test_cached_balance_agrees_with_computed() {
    let (manager, _db) = test_manager();

    for b in three_block_chain() {
        manager.submit_block(&b).unwrap();
    }

    for address in ["addr1", "addr2", "addr3", "addr4", "addr5", "addr6"] {
        assert_eq!(
            manager.get_balance(address).unwrap(),
            manager.compute_balance(address).unwrap(),
            "cached and computed balance diverge for {}",
            address
        );
    }
}

// ============================================================================
// Rollback
// ============================================================================

#[test]
fn test_rollback_restores_balances() {
    let (manager, _db) = test_manager();

    for b in three_block_chain() {
        manager.submit_block(&b).unwrap();
    }
    manager.rollback_to(2).unwrap();

    assert_eq!(manager.tip_height().unwrap(), 2);
    assert_eq!(manager.get_balance("addr1").unwrap(), 0);
    assert_eq!(manager.get_balance("addr2").unwrap(), 4);
    assert_eq!(manager.get_balance("addr3").unwrap(), 6);
    assert_eq!(manager.get_balance("addr4").unwrap(), 0);
    assert_eq!(manager.get_balance("addr5").unwrap(), 0);
    assert_eq!(manager.get_balance("addr6").unwrap(), 0);
}

#[test]
fn test_rollback_unspends_surviving_output() {
    let (manager, _db) = test_manager();

    for b in three_block_chain() {
        manager.submit_block(&b).unwrap();
    }
    // Block 3 spent tx2:1; after rollback it must be spendable again.
    manager.rollback_to(2).unwrap();

    manager
        .submit_block(&block(
            3,
            vec![spend("tx3b", &[("tx2", 1)], &[("addr7", 6)])],
        ))
        .unwrap();

    assert_eq!(manager.get_balance("addr7").unwrap(), 6);
    assert_eq!(manager.get_balance("addr3").unwrap(), 0);
}

#[test]
fn test_rollback_to_zero_empties_state() {
    let (manager, _db) = test_manager();

    for b in three_block_chain() {
        manager.submit_block(&b).unwrap();
    }
    manager.rollback_to(0).unwrap();

    assert_eq!(manager.tip_height().unwrap(), 0);
    for address in ["addr1", "addr2", "addr3", "addr4", "addr5", "addr6"] {
        assert_eq!(manager.get_balance(address).unwrap(), 0);
        assert_eq!(manager.compute_balance(address).unwrap(), 0);
    }

    // The chain restarts from height 1.
    manager
        .submit_block(&block(1, vec![coinbase("tx1b", &[("addr1", 8)])]))
        .unwrap();
    assert_eq!(manager.get_balance("addr1").unwrap(), 8);
}

#[test]
fn test_rollback_is_idempotent_at_or_above_tip() {
    let (manager, _db) = test_manager();

    manager
        .submit_block(&block(1, vec![coinbase("tx1", &[("addr1", 10)])]))
        .unwrap();

    manager.rollback_to(1).unwrap();
    manager.rollback_to(7).unwrap();
    manager.rollback_to(1).unwrap();

    assert_eq!(manager.tip_height().unwrap(), 1);
    assert_eq!(manager.get_balance("addr1").unwrap(), 10);
}

#[test]
fn test_rollback_on_empty_chain_is_noop() {
    let (manager, _db) = test_manager();

    manager.rollback_to(0).unwrap();
    manager.rollback_to(3).unwrap();

    assert_eq!(manager.tip_height().unwrap(), 0);
}

#[test]
fn test_rollback_then_reapply_same_blocks() {
    let (manager, _db) = test_manager();

    let chain = three_block_chain();
    for b in &chain {
        manager.submit_block(b).unwrap();
    }
    manager.rollback_to(1).unwrap();

    // Blocks 2 and 3 apply again exactly as before.
    manager.submit_block(&chain[1]).unwrap();
    manager.submit_block(&chain[2]).unwrap();

    assert_eq!(manager.tip_height().unwrap(), 3);
    assert_eq!(manager.get_balance("addr2").unwrap(), 4);
    assert_eq!(manager.get_balance("addr4").unwrap(), 2);
    assert_eq!(manager.get_balance("addr5").unwrap(), 2);
    assert_eq!(manager.get_balance("addr6").unwrap(), 2);
}

#[test]
fn test_validation_failure_leaves_state_untouched() {
    let (manager, _db) = test_manager();

    manager
        .submit_block(&block(1, vec![coinbase("tx1", &[("addr1", 10)])]))
        .unwrap();

    // Sum mismatch: spends 10, outputs 8.
    let bad = block(2, vec![spend("tx2", &[("tx1", 0)], &[("addr2", 8)])]);
    assert!(manager.submit_block(&bad).is_err());

    assert_eq!(manager.tip_height().unwrap(), 1);
    assert_eq!(manager.get_balance("addr1").unwrap(), 10);
    assert_eq!(manager.get_balance("addr2").unwrap(), 0);

    // The output is still spendable after the failed attempt.
    manager
        .submit_block(&block(2, vec![spend("tx2", &[("tx1", 0)], &[("addr2", 10)])]))
        .unwrap();
    assert_eq!(manager.get_balance("addr2").unwrap(), 10);
}
