use opal_types::{Account, Amount, Epoch, PendingKey, PrivateKey, PublicKey};

use super::assert_ledger_consistent;
use crate::{
    AnySet, DEV_GENESIS_ACCOUNT, DEV_GENESIS_HASH, DEV_GENESIS_PUB_KEY, Ledger, LedgerInserter,
    LedgerSet, RollbackError,
};

/// 10^24 raw
const K: Amount = Amount::raw(1_000_000_000_000_000_000_000_000);

#[test]
fn rollback_send_restores_the_genesis_state() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let receiver = PrivateKey::from(1);

    let send = inserter.genesis().send(&receiver, K);
    inserter.account(&receiver).receive(send.hash());

    // Rolling back the send must first roll back the receiving side
    let rolled_back = ledger.roll_back(&send.hash()).unwrap();
    assert_eq!(rolled_back.len(), 2);
    // LIFO: the dependent open block is rolled back before the send
    assert_eq!(rolled_back[1].hash(), send.hash());

    assert_eq!(ledger.block_count(), 1);
    assert_eq!(ledger.account_count(), 1);
    assert_eq!(ledger.any().get_account(&receiver.account()), None);
    assert_eq!(
        ledger.any().account_balance(&DEV_GENESIS_ACCOUNT),
        Amount::MAX
    );
    assert_eq!(
        ledger
            .any()
            .get_pending(&PendingKey::new(receiver.account(), send.hash())),
        None
    );
    assert_eq!(ledger.weight(&DEV_GENESIS_PUB_KEY), Amount::MAX);
    assert_eq!(ledger.weight(&receiver.public_key()), Amount::ZERO);
    assert_eq!(
        ledger.any().account_head(&DEV_GENESIS_ACCOUNT),
        Some(*DEV_GENESIS_HASH)
    );
    assert_eq!(ledger.any().block_successor(&DEV_GENESIS_HASH), None);
    assert_ledger_consistent(&ledger);
}

#[test]
fn rollback_receive_restores_the_pending_entry() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let receiver = PrivateKey::from(1);

    let send = inserter.genesis().send(&receiver, K);
    let open = inserter.account(&receiver).receive(send.hash());

    let rolled_back = ledger.roll_back(&open.hash()).unwrap();
    assert_eq!(rolled_back.len(), 1);

    let pending = ledger
        .any()
        .get_pending(&PendingKey::new(receiver.account(), send.hash()))
        .unwrap();
    assert_eq!(pending.source, *DEV_GENESIS_ACCOUNT);
    assert_eq!(pending.amount, K);
    assert_eq!(pending.epoch, Epoch::Epoch0);

    // the send itself stays
    assert!(ledger.any().block_exists(&send.hash()));
    assert_eq!(ledger.weight(&receiver.public_key()), Amount::ZERO);
    assert_ledger_consistent(&ledger);
}

#[test]
fn rollback_change_restores_the_previous_representative() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let new_rep = PublicKey::from(7);

    let change = inserter.genesis().change(new_rep);
    assert_eq!(ledger.weight(&new_rep), Amount::MAX);

    ledger.roll_back(&change.hash()).unwrap();

    assert_eq!(ledger.weight(&new_rep), Amount::ZERO);
    assert_eq!(ledger.weight(&DEV_GENESIS_PUB_KEY), Amount::MAX);
    let info = ledger.any().get_account(&DEV_GENESIS_ACCOUNT).unwrap();
    assert_eq!(info.representative, *DEV_GENESIS_PUB_KEY);
    assert_ledger_consistent(&ledger);
}

#[test]
fn rollback_epoch_restores_the_previous_version() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);

    let epoch = inserter.genesis().epoch(Epoch::Epoch1);
    assert_eq!(
        ledger.any().get_account(&DEV_GENESIS_ACCOUNT).unwrap().epoch,
        Epoch::Epoch1
    );

    ledger.roll_back(&epoch.hash()).unwrap();

    let info = ledger.any().get_account(&DEV_GENESIS_ACCOUNT).unwrap();
    assert_eq!(info.epoch, Epoch::Epoch0);
    assert_eq!(info.head, *DEV_GENESIS_HASH);
    assert_eq!(ledger.weight(&DEV_GENESIS_PUB_KEY), Amount::MAX);
    assert_ledger_consistent(&ledger);
}

#[test]
fn rollback_of_a_middle_block_takes_the_successors_with_it() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);

    let send1 = inserter.genesis().send(Account::from(1), Amount::raw(1));
    let send2 = inserter.genesis().send(Account::from(2), Amount::raw(2));
    let send3 = inserter.genesis().send(Account::from(3), Amount::raw(3));

    let rolled_back = ledger.roll_back(&send2.hash()).unwrap();

    let hashes: Vec<_> = rolled_back.iter().map(|b| b.hash()).collect();
    assert_eq!(hashes, vec![send3.hash(), send2.hash()]);
    assert!(ledger.any().block_exists(&send1.hash()));
    assert!(!ledger.any().block_exists(&send2.hash()));
    assert!(!ledger.any().block_exists(&send3.hash()));
    assert_ledger_consistent(&ledger);
}

#[test]
fn rollback_does_not_cross_the_confirmation_height() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);

    let send = inserter.genesis().send(Account::from(1), Amount::raw(1));
    ledger.confirm(send.hash());

    assert_eq!(
        ledger.roll_back(&send.hash()),
        Err(RollbackError::BlockConfirmed)
    );
    assert!(ledger.any().block_exists(&send.hash()));
}

#[test]
fn rollback_depth_bound() {
    // Each hop through a receiving account adds one level to the cascade
    let ledger = Ledger::new_null_builder().max_rollback_depth(2).finish();
    let inserter = LedgerInserter::new(&ledger);

    let a = PrivateKey::from(1);
    let b = PrivateKey::from(2);

    let send_to_a = inserter.genesis().send(&a, K);
    inserter.account(&a).receive(send_to_a.hash());
    let send_to_b = inserter.account(&a).send(&b, Amount::raw(100));
    inserter.account(&b).receive(send_to_b.hash());

    // genesis send -> a open -> a send -> b open is a cascade of depth 3
    let result = ledger.roll_back(&send_to_a.hash());
    assert_eq!(result, Err(RollbackError::MaxDepthExceeded));

    // Nothing was committed
    assert!(ledger.any().block_exists(&send_to_a.hash()));
    assert!(ledger.any().block_exists(&send_to_b.hash()));
    assert_ledger_consistent(&ledger);

    // With a higher bound the same rollback goes through
    let unbounded = Ledger::new_null_builder().finish();
    let inserter = LedgerInserter::new(&unbounded);
    let send_to_a = inserter.genesis().send(&a, K);
    inserter.account(&a).receive(send_to_a.hash());
    let send_to_b = inserter.account(&a).send(&b, Amount::raw(100));
    inserter.account(&b).receive(send_to_b.hash());

    let rolled_back = unbounded.roll_back(&send_to_a.hash()).unwrap();
    assert_eq!(rolled_back.len(), 4);
    assert_ledger_consistent(&unbounded);
}

#[test]
fn rollback_missing_block() {
    let ledger = Ledger::new_null();
    assert_eq!(
        ledger.roll_back(&opal_types::BlockHash::from(42)),
        Err(RollbackError::BlockNotFound)
    );
}
