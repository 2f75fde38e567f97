use opal_types::{
    Account, Amount, Block, DEV_GENESIS_KEY, Epoch, EpochBlockArgs, PrivateKey, PublicKey,
    WorkNonce,
};

use super::assert_ledger_consistent;
use crate::{AnySet, BlockError, DEV_GENESIS_ACCOUNT, Ledger, LedgerInserter, LedgerSet};

#[test]
fn epoch_upgrade_is_applied() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);

    let epoch = inserter.genesis().epoch(Epoch::Epoch1);

    let info = ledger.any().get_account(&DEV_GENESIS_ACCOUNT).unwrap();
    assert_eq!(info.epoch, Epoch::Epoch1);
    assert_eq!(info.balance, Amount::MAX);
    assert!(epoch.is_epoch());
    assert!(!epoch.is_send());
    assert!(!epoch.is_receive());
    assert_eq!(epoch.epoch(), Epoch::Epoch1);
    // weights are untouched by a metadata upgrade
    assert_eq!(ledger.weight(&DEV_GENESIS_KEY.public_key()), Amount::MAX);
    assert_ledger_consistent(&ledger);
}

#[test]
fn epoch_upgrades_are_sequential() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);

    // Jumping straight to epoch 2 skips an era
    let skip: Block = EpochBlockArgs {
        epoch_signer: &DEV_GENESIS_KEY,
        account: *DEV_GENESIS_ACCOUNT,
        previous: ledger.genesis().hash(),
        representative: DEV_GENESIS_KEY.public_key(),
        balance: Amount::MAX,
        link: ledger.epoch_link(Epoch::Epoch2).unwrap(),
        work: WorkNonce::new(u64::MAX),
    }
    .into();
    assert_eq!(ledger.process_one(&skip), Err(BlockError::BlockPosition));

    inserter.genesis().epoch(Epoch::Epoch1);

    // Upgrading to the same epoch again is not sequential either
    let again: Block = EpochBlockArgs {
        epoch_signer: &DEV_GENESIS_KEY,
        account: *DEV_GENESIS_ACCOUNT,
        previous: ledger.any().account_head(&DEV_GENESIS_ACCOUNT).unwrap(),
        representative: DEV_GENESIS_KEY.public_key(),
        balance: Amount::MAX,
        link: ledger.epoch_link(Epoch::Epoch1).unwrap(),
        work: WorkNonce::new(u64::MAX),
    }
    .into();
    assert_eq!(ledger.process_one(&again), Err(BlockError::BlockPosition));

    inserter.genesis().epoch(Epoch::Epoch2);
    let info = ledger.any().get_account(&DEV_GENESIS_ACCOUNT).unwrap();
    assert_eq!(info.epoch, Epoch::Epoch2);
    assert_ledger_consistent(&ledger);
}

#[test]
fn epoch_block_must_keep_the_representative() {
    let ledger = Ledger::new_null();

    let upgrade: Block = EpochBlockArgs {
        epoch_signer: &DEV_GENESIS_KEY,
        account: *DEV_GENESIS_ACCOUNT,
        previous: ledger.genesis().hash(),
        representative: PublicKey::from(999),
        balance: Amount::MAX,
        link: ledger.epoch_link(Epoch::Epoch1).unwrap(),
        work: WorkNonce::new(u64::MAX),
    }
    .into();

    assert_eq!(
        ledger.process_one(&upgrade),
        Err(BlockError::RepresentativeMismatch)
    );
}

#[test]
fn epoch_block_must_be_signed_by_the_epoch_signer() {
    let ledger = Ledger::new_null();
    let wrong_signer = PrivateKey::from(99);

    let upgrade: Block = EpochBlockArgs {
        epoch_signer: &wrong_signer,
        account: *DEV_GENESIS_ACCOUNT,
        previous: ledger.genesis().hash(),
        representative: DEV_GENESIS_KEY.public_key(),
        balance: Amount::MAX,
        link: ledger.epoch_link(Epoch::Epoch1).unwrap(),
        work: WorkNonce::new(u64::MAX),
    }
    .into();

    assert_eq!(ledger.process_one(&upgrade), Err(BlockError::BadSignature));
}

#[test]
fn epoch_open_requires_a_receivable_entry() {
    let ledger = Ledger::new_null();
    let unopened = PrivateKey::from(1);

    let epoch_open: Block = EpochBlockArgs {
        epoch_signer: &DEV_GENESIS_KEY,
        account: unopened.account(),
        previous: 0.into(),
        representative: PublicKey::ZERO,
        balance: Amount::ZERO,
        link: ledger.epoch_link(Epoch::Epoch1).unwrap(),
        work: WorkNonce::new(u64::MAX),
    }
    .into();

    assert_eq!(
        ledger.process_one(&epoch_open),
        Err(BlockError::GapEpochOpenPending)
    );
}

#[test]
fn epoch_open_for_an_account_with_a_receivable_entry() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let unopened = PrivateKey::from(1);

    inserter.genesis().send(&unopened, Amount::raw(100));

    let epoch_open: Block = EpochBlockArgs {
        epoch_signer: &DEV_GENESIS_KEY,
        account: unopened.account(),
        previous: 0.into(),
        representative: PublicKey::ZERO,
        balance: Amount::ZERO,
        link: ledger.epoch_link(Epoch::Epoch1).unwrap(),
        work: WorkNonce::new(u64::MAX),
    }
    .into();

    let saved = ledger.process_one(&epoch_open).unwrap();
    assert_eq!(saved.height(), 1);
    assert!(saved.is_epoch());

    let info = ledger.any().get_account(&unopened.account()).unwrap();
    assert_eq!(info.epoch, Epoch::Epoch1);
    assert_eq!(info.balance, Amount::ZERO);
    assert_eq!(info.block_count, 1);

    // The receivable entry is untouched by the upgrade
    assert!(ledger.any().receivable_exists(unopened.account()));
    assert_ledger_consistent(&ledger);
}

#[test]
fn epoch_block_for_the_burn_account_is_rejected() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    inserter.genesis().send(Account::ZERO, Amount::raw(100));

    let epoch_open: Block = EpochBlockArgs {
        epoch_signer: &DEV_GENESIS_KEY,
        account: Account::ZERO,
        previous: 0.into(),
        representative: PublicKey::ZERO,
        balance: Amount::ZERO,
        link: ledger.epoch_link(Epoch::Epoch1).unwrap(),
        work: WorkNonce::new(u64::MAX),
    }
    .into();

    assert_eq!(
        ledger.process_one(&epoch_open),
        Err(BlockError::OpenedBurnAccount)
    );
}

#[test]
fn receive_after_upgrade_inherits_the_source_epoch() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let dest = PrivateKey::from(1);

    inserter.genesis().epoch(Epoch::Epoch1);
    let send = inserter.genesis().send(&dest, Amount::raw(100));
    let open = inserter.account(&dest).receive(send.hash());

    // The freshly opened account is pulled up to the sender's epoch
    assert_eq!(open.source_epoch(), Epoch::Epoch1);
    assert_eq!(
        ledger.any().get_account(&dest.account()).unwrap().epoch,
        Epoch::Epoch1
    );
    assert_ledger_consistent(&ledger);
}

#[test]
fn state_send_to_the_epoch_link_account_is_a_send() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);

    let link = ledger.epoch_link(Epoch::Epoch1).unwrap();
    let send = inserter
        .genesis()
        .send(Account::from(link), Amount::raw(100));

    assert!(send.is_send());
    assert!(!send.is_epoch());
    assert_eq!(send.destination(), Some(Account::from(link)));
    assert_ledger_consistent(&ledger);
}
