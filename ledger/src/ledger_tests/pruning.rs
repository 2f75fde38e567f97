use opal_types::{Amount, PrivateKey};

use crate::{AnySet, BlockError, Ledger, LedgerInserter, LedgerSet};

#[test]
fn pruning_drops_cemented_block_bodies() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);

    let send1 = inserter.genesis().send(PrivateKey::from(1), Amount::raw(1));
    let send2 = inserter.genesis().send(PrivateKey::from(2), Amount::raw(1));
    ledger.confirm(send2.hash());

    let txn = ledger.store.begin_write();
    let (txn, pruned_count) = ledger.pruning_action(txn, &send2.hash(), 16);
    txn.commit();

    assert_eq!(pruned_count, 2);
    assert_eq!(ledger.pruned_count(), 2);

    // bodies are gone, the hashes are still known
    assert!(!ledger.any().block_exists(&send1.hash()));
    assert!(!ledger.any().block_exists(&send2.hash()));
    assert!(ledger.any().block_exists_or_pruned(&send1.hash()));
    assert!(ledger.any().block_exists_or_pruned(&send2.hash()));

    // the genesis block itself is never pruned
    assert!(ledger.any().block_exists(&ledger.genesis().hash()));
}

#[test]
fn reprocessing_a_pruned_block_is_old() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);

    let send = inserter.genesis().send(PrivateKey::from(1), Amount::raw(1));
    ledger.confirm(send.hash());

    let txn = ledger.store.begin_write();
    let (txn, _) = ledger.pruning_action(txn, &send.hash(), 16);
    txn.commit();

    assert_eq!(ledger.process_one(send.block()), Err(BlockError::Old));
}

#[test]
fn receiving_from_a_pruned_send() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let dest = PrivateKey::from(1);

    let send = inserter.genesis().send(&dest, Amount::raw(100));
    ledger.confirm(send.hash());

    let txn = ledger.store.begin_write();
    let (txn, _) = ledger.pruning_action(txn, &send.hash(), 16);
    txn.commit();

    // The pending entry survives pruning, the source hash is checked
    // against the pruned table
    let open = inserter.account(&dest).receive(send.hash());
    assert_eq!(open.balance(), Amount::raw(100));
    assert_eq!(ledger.any().account_balance(&dest.account()), Amount::raw(100));
}

#[test]
fn pruned_blocks_count_as_confirmed_dependencies() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let dest = PrivateKey::from(1);

    let send = inserter.genesis().send(&dest, Amount::raw(100));
    ledger.confirm(send.hash());

    let txn = ledger.store.begin_write();
    let (txn, _) = ledger.pruning_action(txn, &send.hash(), 16);
    txn.commit();

    let open = inserter.account(&dest).receive(send.hash());
    let cemented = ledger.confirm(open.hash());
    assert_eq!(cemented.len(), 1);
    assert_eq!(cemented[0].hash(), open.hash());
}
