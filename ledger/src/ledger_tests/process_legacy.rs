use opal_types::{
    Amount, Block, DEV_GENESIS_KEY, PrivateKey, PublicKey, SendBlockArgs, WorkNonce,
};

use super::assert_ledger_consistent;
use crate::{AnySet, BlockError, Ledger, LedgerInserter, LedgerSet};

#[test]
fn legacy_send_and_open() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let dest = PrivateKey::from(1);

    let send = inserter.genesis().legacy_send(&dest, Amount::raw(100));
    let open = inserter.account(&dest).legacy_open(send.hash());

    assert_eq!(ledger.any().account_balance(&dest.account()), Amount::raw(100));
    assert_eq!(ledger.weight(&dest.public_key()), Amount::raw(100));
    assert_eq!(open.height(), 1);
    assert_eq!(open.source(), Some(send.hash()));
    assert_ledger_consistent(&ledger);
}

#[test]
fn legacy_receive() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let dest = PrivateKey::from(1);

    let send1 = inserter.genesis().legacy_send(&dest, Amount::raw(100));
    let send2 = inserter.genesis().legacy_send(&dest, Amount::raw(50));
    inserter.account(&dest).legacy_open(send1.hash());
    let receive = inserter.account(&dest).legacy_receive(send2.hash());

    assert_eq!(ledger.any().account_balance(&dest.account()), Amount::raw(150));
    assert_eq!(receive.balance(), Amount::raw(150));
    assert_eq!(receive.height(), 2);
    assert_ledger_consistent(&ledger);
}

#[test]
fn legacy_change_moves_weight() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let new_rep = PublicKey::from(7);

    inserter.genesis().legacy_change(new_rep);

    assert_eq!(ledger.weight(&new_rep), Amount::MAX);
    assert_eq!(
        ledger.weight(&DEV_GENESIS_KEY.public_key()),
        Amount::ZERO
    );
    assert_ledger_consistent(&ledger);
}

#[test]
fn negative_spend_is_rejected() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);

    let send = inserter.genesis().legacy_send(PrivateKey::from(1), Amount::raw(100));

    // A legacy send with a balance higher than the previous balance tries
    // to create money
    let negative: Block = SendBlockArgs {
        key: &DEV_GENESIS_KEY,
        previous: send.hash(),
        destination: PrivateKey::from(1).account(),
        balance: Amount::MAX,
        work: WorkNonce::new(u64::MAX),
    }
    .into();

    assert_eq!(ledger.process_one(&negative), Err(BlockError::NegativeSpend));
    assert_ledger_consistent(&ledger);
}

#[test]
fn legacy_fork() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);

    let send = inserter.genesis().legacy_send(PrivateKey::from(1), Amount::raw(100));

    let fork: Block = SendBlockArgs {
        key: &DEV_GENESIS_KEY,
        previous: send.previous(),
        destination: PrivateKey::from(2).account(),
        balance: send.balance(),
        work: WorkNonce::new(u64::MAX),
    }
    .into();

    assert_eq!(ledger.process_one(&fork), Err(BlockError::Fork));
}

#[test]
fn legacy_block_cannot_follow_a_state_block() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);

    let state_send = inserter.genesis().send(PrivateKey::from(1), Amount::raw(1));

    let legacy: Block = SendBlockArgs {
        key: &DEV_GENESIS_KEY,
        previous: state_send.hash(),
        destination: PrivateKey::from(2).account(),
        balance: state_send.balance() - Amount::raw(1),
        work: WorkNonce::new(u64::MAX),
    }
    .into();

    assert_eq!(ledger.process_one(&legacy), Err(BlockError::BlockPosition));
}

#[test]
fn legacy_receive_cannot_collect_a_send_from_an_upgraded_account() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let dest = PrivateKey::from(1);
    let other = PrivateKey::from(2);

    // dest stays on a legacy chain
    let send1 = inserter.genesis().legacy_send(&dest, Amount::raw(100));
    let open = inserter.account(&dest).legacy_open(send1.hash());

    // other upgrades to epoch 1 and sends to dest, marking the pending
    // entry with the higher epoch
    let send2 = inserter.genesis().legacy_send(&other, Amount::raw(100));
    inserter.account(&other).receive(send2.hash());
    inserter.account(&other).epoch(opal_types::Epoch::Epoch1);
    let send3 = inserter.account(&other).send(&dest, Amount::raw(50));

    let legacy_receive: Block = opal_types::ReceiveBlockArgs {
        key: &dest,
        previous: open.hash(),
        source: send3.hash(),
        work: WorkNonce::new(u64::MAX),
    }
    .into();

    assert_eq!(
        ledger.process_one(&legacy_receive),
        Err(BlockError::Unreceivable)
    );
    assert_ledger_consistent(&ledger);
}
