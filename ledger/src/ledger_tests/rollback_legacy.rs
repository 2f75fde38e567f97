use opal_types::{Amount, Epoch, PendingKey, PrivateKey, PublicKey};

use super::assert_ledger_consistent;
use crate::{
    AnySet, DEV_GENESIS_ACCOUNT, DEV_GENESIS_HASH, DEV_GENESIS_PUB_KEY, Ledger, LedgerInserter,
    LedgerSet,
};

#[test]
fn rollback_legacy_send() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let dest = PrivateKey::from(1);

    let send = inserter.genesis().legacy_send(&dest, Amount::raw(100));
    ledger.roll_back(&send.hash()).unwrap();

    assert_eq!(ledger.block_count(), 1);
    assert_eq!(
        ledger.any().account_balance(&DEV_GENESIS_ACCOUNT),
        Amount::MAX
    );
    assert_eq!(
        ledger
            .any()
            .get_pending(&PendingKey::new(dest.account(), send.hash())),
        None
    );
    assert_eq!(ledger.weight(&DEV_GENESIS_PUB_KEY), Amount::MAX);
    assert_ledger_consistent(&ledger);
}

#[test]
fn rollback_legacy_open_restores_the_pending_entry() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let dest = PrivateKey::from(1);

    let send = inserter.genesis().legacy_send(&dest, Amount::raw(100));
    let open = inserter.account(&dest).legacy_open(send.hash());

    ledger.roll_back(&open.hash()).unwrap();

    assert_eq!(ledger.any().get_account(&dest.account()), None);
    let pending = ledger
        .any()
        .get_pending(&PendingKey::new(dest.account(), send.hash()))
        .unwrap();
    assert_eq!(pending.source, *DEV_GENESIS_ACCOUNT);
    assert_eq!(pending.amount, Amount::raw(100));
    assert_eq!(pending.epoch, Epoch::Epoch0);
    assert_eq!(ledger.weight(&dest.public_key()), Amount::ZERO);
    assert_ledger_consistent(&ledger);
}

#[test]
fn rollback_legacy_receive() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let dest = PrivateKey::from(1);

    let send1 = inserter.genesis().legacy_send(&dest, Amount::raw(100));
    let send2 = inserter.genesis().legacy_send(&dest, Amount::raw(50));
    let open = inserter.account(&dest).legacy_open(send1.hash());
    let receive = inserter.account(&dest).legacy_receive(send2.hash());

    ledger.roll_back(&receive.hash()).unwrap();

    let info = ledger.any().get_account(&dest.account()).unwrap();
    assert_eq!(info.head, open.hash());
    assert_eq!(info.balance, Amount::raw(100));
    assert_eq!(info.block_count, 1);
    assert!(
        ledger
            .any()
            .get_pending(&PendingKey::new(dest.account(), send2.hash()))
            .is_some()
    );
    assert_eq!(ledger.weight(&dest.public_key()), Amount::raw(100));
    assert_eq!(ledger.any().block_successor(&open.hash()), None);
    assert_ledger_consistent(&ledger);
}

#[test]
fn rollback_legacy_change() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let new_rep = PublicKey::from(7);

    let change = inserter.genesis().legacy_change(new_rep);
    ledger.roll_back(&change.hash()).unwrap();

    assert_eq!(ledger.weight(&new_rep), Amount::ZERO);
    assert_eq!(ledger.weight(&DEV_GENESIS_PUB_KEY), Amount::MAX);
    let info = ledger.any().get_account(&DEV_GENESIS_ACCOUNT).unwrap();
    assert_eq!(info.head, *DEV_GENESIS_HASH);
    assert_eq!(info.representative, *DEV_GENESIS_PUB_KEY);
    assert_ledger_consistent(&ledger);
}

#[test]
fn rollback_legacy_send_cascades_into_the_receiver() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let dest = PrivateKey::from(1);

    let send = inserter.genesis().legacy_send(&dest, Amount::raw(100));
    let open = inserter.account(&dest).legacy_open(send.hash());

    let rolled_back = ledger.roll_back(&send.hash()).unwrap();

    let hashes: Vec<_> = rolled_back.iter().map(|b| b.hash()).collect();
    assert_eq!(hashes, vec![open.hash(), send.hash()]);
    assert_eq!(ledger.block_count(), 1);
    assert_eq!(ledger.weight(&DEV_GENESIS_PUB_KEY), Amount::MAX);
    assert_ledger_consistent(&ledger);
}
