use opal_types::{
    Account, Amount, BlockHash, PrivateKey, PublicKey, Root, SavedBlock, TestBlockBuilder,
};

use crate::{
    AnySet, DEV_GENESIS_HASH, DEV_GENESIS_PUB_KEY, Ledger, LedgerInserter, LedgerSet,
};

mod cementation;
mod empty_ledger;
mod epoch_upgrade;
mod process_legacy;
mod process_state;
mod pruning;
mod receivable_iteration;
mod rollback_legacy;
mod rollback_state;

/// Recomputes every balance sum and asserts the ledger invariants
fn assert_ledger_consistent(ledger: &Ledger) {
    ledger.verify_balance_consistency(1);
}

#[test]
fn ledger_successor() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let send = inserter.genesis().send(Account::from(1), Amount::raw(1000));

    assert_eq!(
        ledger
            .any()
            .block_successor_by_qualified_root(&ledger.genesis().qualified_root()),
        Some(ledger.genesis().hash())
    );

    assert_eq!(
        ledger
            .any()
            .block_successor_by_qualified_root(&send.qualified_root()),
        Some(send.hash())
    );

    assert_eq!(
        ledger.any().block_successor(&ledger.genesis().hash()),
        Some(send.hash())
    );
    assert_eq!(ledger.any().block_successor(&send.hash()), None);
}

#[test]
fn latest_root_empty() {
    let ledger = Ledger::new_null();
    assert_eq!(ledger.any().latest_root(&Account::from(1)), Root::from(1));
}

#[test]
fn latest_root() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let send = inserter.genesis().send(Account::from(1), Amount::raw(1000));

    assert_eq!(
        ledger.any().latest_root(&ledger.genesis().account()),
        send.hash().into()
    );
}

#[test]
fn send_open_receive_vote_weight() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let receiver = PrivateKey::from(1);

    let send1 = inserter.genesis().send(&receiver, Amount::raw(50));
    let send2 = inserter.genesis().send(&receiver, Amount::raw(50));
    inserter.account(&receiver).receive(send1.hash());
    inserter.account(&receiver).receive(send2.hash());

    assert_eq!(ledger.weight(&receiver.public_key()), Amount::raw(100));
    assert_eq!(
        ledger.weight(&DEV_GENESIS_PUB_KEY),
        Amount::MAX - Amount::raw(100)
    );
    assert_ledger_consistent(&ledger);
}

#[test]
fn send_open_receive_rollback() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let receiver = PrivateKey::from(1);

    let send1 = inserter.genesis().send(&receiver, Amount::raw(50));
    let send2 = inserter.genesis().send(&receiver, Amount::raw(50));
    let open = inserter.account(&receiver).receive(send1.hash());
    let receive = inserter.account(&receiver).receive(send2.hash());

    let rep_account = PublicKey::from(2);
    let change = inserter.genesis().change(rep_account);

    ledger.roll_back(&receive.hash()).unwrap();

    assert_eq!(ledger.weight(&receiver.public_key()), Amount::raw(50));
    assert_eq!(ledger.weight(&DEV_GENESIS_PUB_KEY), Amount::ZERO);
    assert_eq!(ledger.weight(&rep_account), Amount::MAX - Amount::raw(100));

    ledger.roll_back(&open.hash()).unwrap();

    assert_eq!(ledger.weight(&receiver.public_key()), Amount::ZERO);
    assert_eq!(ledger.weight(&rep_account), Amount::MAX - Amount::raw(100));

    ledger.roll_back(&change.hash()).unwrap();

    assert_eq!(ledger.weight(&rep_account), Amount::ZERO);
    assert_eq!(
        ledger.weight(&DEV_GENESIS_PUB_KEY),
        Amount::MAX - Amount::raw(100)
    );

    ledger.roll_back(&send2.hash()).unwrap();

    assert_eq!(
        ledger.weight(&DEV_GENESIS_PUB_KEY),
        Amount::MAX - Amount::raw(50)
    );

    ledger.roll_back(&send1.hash()).unwrap();

    assert_eq!(ledger.weight(&receiver.public_key()), Amount::ZERO);
    assert_eq!(ledger.weight(&DEV_GENESIS_PUB_KEY), Amount::MAX);
    assert_ledger_consistent(&ledger);
}

#[test]
fn state_account() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let send = inserter.genesis().send(Account::from(1), Amount::raw(1000));

    assert_eq!(
        ledger.any().block_account(&send.hash()),
        Some(ledger.genesis().account())
    );
}

#[test]
fn rollbacks_can_be_tracked() {
    let ledger = Ledger::new_null();
    let rollback_tracker = ledger.track_rollbacks();
    let hash = BlockHash::from(123);

    let _ = ledger.roll_back(&hash);

    assert_eq!(rollback_tracker.output(), vec![hash]);
}

mod dependents_confirmed {
    use super::*;

    #[test]
    fn genesis_is_confirmed() {
        let ledger = Ledger::new_null();

        assert_eq!(
            ledger
                .any()
                .dependents_confirmed_for_unsaved_block(ledger.genesis()),
            true
        );
    }

    #[test]
    fn send_dependents_are_confirmed_if_previous_block_is_confirmed() {
        let ledger = Ledger::new_null();
        let inserter = LedgerInserter::new(&ledger);
        let send = inserter.genesis().send(Account::from(1), Amount::raw(1000));

        assert_eq!(
            ledger.any().dependents_confirmed_for_unsaved_block(&send),
            true
        );
    }

    #[test]
    fn send_dependents_are_unconfirmed_if_previous_block_is_unconfirmed() {
        let ledger = Ledger::new_null();
        let inserter = LedgerInserter::new(&ledger);

        inserter.genesis().send(Account::from(1), Amount::raw(1000));
        let send2 = inserter.genesis().send(Account::from(2), Amount::raw(2000));

        assert_eq!(
            ledger.any().dependents_confirmed_for_unsaved_block(&send2),
            false
        );
    }

    #[test]
    fn open_dependents_are_unconfirmed_if_send_block_is_unconfirmed() {
        let ledger = Ledger::new_null();
        let inserter = LedgerInserter::new(&ledger);
        let destination = PrivateKey::from(1);

        let send = inserter.genesis().send(&destination, Amount::raw(1000));
        let open = inserter.account(&destination).receive(send.hash());

        assert_eq!(
            ledger.any().dependents_confirmed_for_unsaved_block(&open),
            false
        );
    }

    #[test]
    fn open_dependents_are_confirmed_if_send_block_is_confirmed() {
        let ledger = Ledger::new_null();
        let inserter = LedgerInserter::new(&ledger);
        let destination = PrivateKey::from(1);

        let send = inserter.genesis().send(&destination, Amount::raw(1000));
        ledger.confirm(send.hash());

        let open = inserter.account(&destination).receive(send.hash());

        assert_eq!(
            ledger.any().dependents_confirmed_for_unsaved_block(&open),
            true
        );
    }

    #[test]
    fn receive_dependents_are_confirmed_if_previous_block_and_send_block_are_confirmed() {
        let ledger = Ledger::new_null();
        let inserter = LedgerInserter::new(&ledger);
        let destination = PrivateKey::from(1);

        let send1 = inserter.genesis().send(&destination, Amount::raw(1000));
        ledger.confirm(send1.hash());

        let send2 = inserter.genesis().send(&destination, Amount::raw(1000));
        ledger.confirm(send2.hash());

        let open = inserter.account(&destination).receive(send1.hash());
        ledger.confirm(open.hash());

        let receive = inserter.account(&destination).receive(send2.hash());

        assert_eq!(
            ledger
                .any()
                .dependents_confirmed_for_unsaved_block(&receive),
            true
        );
    }
}

#[test]
fn sideband_height() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let dest = PrivateKey::from(42);

    let send = inserter.genesis().legacy_send(&dest, Amount::raw(100));
    let open = inserter.account(&dest).legacy_open(send.hash());
    let change = inserter.genesis().legacy_change(PublicKey::from(123));
    let state_send = inserter.genesis().send(&dest, Amount::raw(1));
    let receive = inserter.account(&dest).receive(state_send.hash());

    let assert_sideband_height = |hash: &BlockHash, expected_height: u64| {
        let block = ledger.any().get_block(hash).unwrap();
        assert_eq!(block.height(), expected_height);
    };

    assert_sideband_height(&DEV_GENESIS_HASH, 1);
    assert_sideband_height(&send.hash(), 2);
    assert_sideband_height(&open.hash(), 1);
    assert_sideband_height(&change.hash(), 3);
    assert_sideband_height(&state_send.hash(), 4);
    assert_sideband_height(&receive.hash(), 2);
    assert_ledger_consistent(&ledger);
}

#[test]
fn block_priority_uses_previous_timestamp() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let dest = PrivateKey::from(1);

    let send = inserter.genesis().send(&dest, Amount::raw(500));
    let send2 = inserter.genesis().send(&dest, Amount::raw(1));

    let prio = ledger.block_priority(&send2);
    assert_eq!(prio.balance, send.balance());
    assert_eq!(prio.time, send.timestamp());
}

#[test]
fn linked_account_for_change_block() {
    let ledger = Ledger::new_null();
    let block = SavedBlock::new_test_change_block();
    assert_eq!(ledger.any().linked_account(&block), None);
}

#[test]
fn linked_account_for_send_block() {
    let ledger = Ledger::new_null();
    let block = SavedBlock::new_test_send_block();
    assert_eq!(
        ledger.any().linked_account(&block),
        Some(block.destination_or_link())
    );
}

#[test]
fn linked_account_for_receive_block() {
    let sender = PrivateKey::from(1);
    let receiver = PrivateKey::from(2);

    let send_block = TestBlockBuilder::state()
        .key(&sender)
        .link(receiver.account())
        .is_send()
        .build_saved();

    let receive_block = TestBlockBuilder::state()
        .key(&receiver)
        .link(send_block.hash())
        .is_receive()
        .build_saved();

    let ledger = Ledger::new_null_builder().block(&send_block).finish();
    assert_eq!(
        ledger.any().linked_account(&receive_block),
        Some(sender.account())
    );
}

#[test]
fn representative_block_walks_to_the_anchor() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let dest = PrivateKey::from(1);

    let send = inserter.genesis().legacy_send(&dest, Amount::raw(100));
    let send2 = inserter.genesis().legacy_send(&dest, Amount::raw(100));

    // Legacy sends carry no representative, the genesis open block anchors
    // the current representative
    assert_eq!(ledger.representative_block(&send.hash()), *DEV_GENESIS_HASH);
    assert_eq!(ledger.representative_block(&send2.hash()), *DEV_GENESIS_HASH);

    let change = inserter.genesis().legacy_change(PublicKey::from(7));
    assert_eq!(ledger.representative_block(&change.hash()), change.hash());
}

#[test]
fn unconfirmed_exists() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);

    assert_eq!(ledger.unconfirmed_exists(&DEV_GENESIS_HASH), false);

    let send = inserter.genesis().send(Account::from(1), Amount::raw(1));
    assert_eq!(ledger.unconfirmed_exists(&send.hash()), true);

    ledger.confirm(send.hash());
    assert_eq!(ledger.unconfirmed_exists(&send.hash()), false);
}

#[test]
fn backlog_size() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);

    assert_eq!(ledger.backlog_size(), 0);

    inserter.genesis().send(Account::from(1), Amount::raw(1));
    assert_eq!(ledger.backlog_size(), 1);
}
