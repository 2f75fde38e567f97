use opal_types::{
    Account, Amount, Block, DEV_GENESIS_KEY, Link, PendingInfo, PendingKey, PrivateKey,
    StateBlockArgs, WorkNonce,
};

use super::assert_ledger_consistent;
use crate::{AnySet, BlockError, DEV_GENESIS_ACCOUNT, Ledger, LedgerInserter, LedgerSet};

/// 10^24 raw
const K: Amount = Amount::raw(1_000_000_000_000_000_000_000_000);

#[test]
fn send_creates_pending_entry() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let receiver = PrivateKey::from(1);

    let send = inserter.genesis().send(&receiver, K);

    assert_eq!(
        ledger.any().account_balance(&DEV_GENESIS_ACCOUNT),
        Amount::MAX - K
    );
    assert_eq!(
        ledger
            .any()
            .get_pending(&PendingKey::new(receiver.account(), send.hash())),
        Some(PendingInfo::new(
            *DEV_GENESIS_ACCOUNT,
            K,
            opal_types::Epoch::Epoch0
        ))
    );
    assert!(send.is_send());
    assert_ledger_consistent(&ledger);
}

#[test]
fn receive_clears_pending_and_sets_self_representative_weight() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let receiver = PrivateKey::from(1);

    let send = inserter.genesis().send(&receiver, K);
    let open = inserter.account(&receiver).receive(send.hash());

    assert_eq!(
        ledger
            .any()
            .get_pending(&PendingKey::new(receiver.account(), send.hash())),
        None
    );
    assert_eq!(ledger.any().account_balance(&receiver.account()), K);
    assert_eq!(ledger.weight(&receiver.public_key()), K);
    assert!(open.is_receive());
    assert_eq!(open.height(), 1);
    assert_ledger_consistent(&ledger);
}

#[test]
fn fork_leaves_the_ledger_unchanged() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let receiver = PrivateKey::from(1);

    let send = inserter.genesis().send(&receiver, K);

    // Same previous as the first send, different destination
    let fork: Block = StateBlockArgs {
        key: &DEV_GENESIS_KEY,
        previous: send.previous(),
        representative: send.representative_field().unwrap(),
        balance: send.balance(),
        link: Account::from(9999).into(),
        work: WorkNonce::new(u64::MAX),
    }
    .into();

    let result = ledger.process_one(&fork);
    assert_eq!(result, Err(BlockError::Fork));

    // The loser is not part of the ledger
    assert_eq!(ledger.any().block_exists(&fork.hash()), false);
    assert_eq!(
        ledger.any().account_head(&DEV_GENESIS_ACCOUNT),
        Some(send.hash())
    );
    assert_ledger_consistent(&ledger);
}

#[test]
fn processing_a_block_twice_is_old() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);

    let send = inserter.genesis().send(Account::from(1), K);
    let result = ledger.process_one(send.block());

    assert_eq!(result, Err(BlockError::Old));
}

#[test]
fn gap_previous() {
    let ledger = Ledger::new_null();

    let block: Block = StateBlockArgs {
        key: &DEV_GENESIS_KEY,
        previous: 999.into(),
        representative: DEV_GENESIS_KEY.public_key(),
        balance: Amount::MAX - K,
        link: Account::from(1).into(),
        work: WorkNonce::new(u64::MAX),
    }
    .into();

    assert_eq!(ledger.process_one(&block), Err(BlockError::GapPrevious));
}

#[test]
fn gap_source_for_unknown_send() {
    let ledger = Ledger::new_null();
    let receiver = PrivateKey::from(1);

    let open: Block = StateBlockArgs {
        key: &receiver,
        previous: 0.into(),
        representative: receiver.public_key(),
        balance: K,
        link: Link::from(4242),
        work: WorkNonce::new(u64::MAX),
    }
    .into();

    assert_eq!(ledger.process_one(&open), Err(BlockError::GapSource));
}

#[test]
fn receive_with_wrong_amount_is_a_balance_mismatch() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let receiver = PrivateKey::from(1);

    let send = inserter.genesis().send(&receiver, K);

    let open: Block = StateBlockArgs {
        key: &receiver,
        previous: 0.into(),
        representative: receiver.public_key(),
        balance: K + Amount::raw(1),
        link: send.hash().into(),
        work: WorkNonce::new(u64::MAX),
    }
    .into();

    assert_eq!(ledger.process_one(&open), Err(BlockError::BalanceMismatch));
    assert_ledger_consistent(&ledger);
}

#[test]
fn double_receive_is_unreceivable() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let receiver = PrivateKey::from(1);

    let send = inserter.genesis().send(&receiver, K);
    let open = inserter.account(&receiver).receive(send.hash());

    let receive_again: Block = StateBlockArgs {
        key: &receiver,
        previous: open.hash(),
        representative: receiver.public_key(),
        balance: K + K,
        link: send.hash().into(),
        work: WorkNonce::new(u64::MAX),
    }
    .into();

    assert_eq!(
        ledger.process_one(&receive_again),
        Err(BlockError::Unreceivable)
    );
}

#[test]
fn bad_signature() {
    let ledger = Ledger::new_null();
    let wrong_key = PrivateKey::from(99);

    // A send for the genesis account signed with the wrong key
    let block: Block = opal_types::EpochBlockArgs {
        epoch_signer: &wrong_key,
        account: *DEV_GENESIS_ACCOUNT,
        previous: ledger.genesis().hash(),
        representative: DEV_GENESIS_KEY.public_key(),
        balance: Amount::MAX - K,
        link: Account::from(1).into(),
        work: WorkNonce::new(u64::MAX),
    }
    .into();

    assert_eq!(ledger.process_one(&block), Err(BlockError::BadSignature));
}

#[test]
fn cannot_open_the_burn_account() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    inserter.genesis().send(Account::ZERO, K);

    // Sending into the burn account works, opening it does not: there is
    // no key that signs for the zero account, so any open attempt names a
    // different account or fails the signature check. Sending from it is
    // impossible for the same reason.
    assert_eq!(ledger.any().account_balance(&Account::ZERO), Amount::ZERO);
    assert!(ledger.any().receivable_exists(Account::ZERO));
    assert_ledger_consistent(&ledger);
}

#[test]
fn state_change_keeps_the_balance() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);

    let change = inserter.genesis().change(opal_types::PublicKey::from(7));

    assert!(change.is_change());
    assert!(!change.is_send());
    assert!(!change.is_receive());
    assert_eq!(change.balance(), Amount::MAX);
    assert_eq!(ledger.weight(&opal_types::PublicKey::from(7)), Amount::MAX);
    assert_ledger_consistent(&ledger);
}

#[test]
fn state_change_with_balance_increase_is_a_balance_mismatch() {
    let ledger = Ledger::new_null();

    let block: Block = StateBlockArgs {
        key: &DEV_GENESIS_KEY,
        previous: ledger.genesis().hash(),
        representative: DEV_GENESIS_KEY.public_key(),
        balance: Amount::MAX, // cannot grow without a link
        link: Link::ZERO,
        work: WorkNonce::new(u64::MAX),
    }
    .into();

    // Balance unchanged with a zero link is a valid change block
    assert!(ledger.process_one(&block).is_ok());

    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    inserter.genesis().send(Account::from(1), K);

    let grow: Block = StateBlockArgs {
        key: &DEV_GENESIS_KEY,
        previous: ledger.any().account_head(&DEV_GENESIS_ACCOUNT).unwrap(),
        representative: DEV_GENESIS_KEY.public_key(),
        balance: Amount::MAX,
        link: Link::ZERO,
        work: WorkNonce::new(u64::MAX),
    }
    .into();

    assert_eq!(ledger.process_one(&grow), Err(BlockError::BalanceMismatch));
}
