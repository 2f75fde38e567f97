use opal_types::{
    Account, AccountInfo, Amount, Block, Epoch, PendingInfo, TestBlockBuilder, UnixTimestamp,
    WorkThresholds,
};

use super::BlockValidator;
use crate::{BlockError, LEDGER_CONSTANTS_STUB};

fn create_validator(block: &Block) -> BlockValidator<'_> {
    BlockValidator {
        block,
        epochs: &LEDGER_CONSTANTS_STUB.epochs,
        work: &LEDGER_CONSTANTS_STUB.work,
        account: block.account_field().unwrap_or_default(),
        block_exists: false,
        previous_block: None,
        old_account_info: None,
        pending_receive_info: None,
        any_pending_exists: false,
        source_block_exists: false,
        now: UnixTimestamp::new_test_instance(),
    }
}

#[test]
fn existing_block_is_old() {
    let block = TestBlockBuilder::state().previous(0).link(42).build();
    let mut validator = create_validator(&block);
    validator.block_exists = true;
    validator.source_block_exists = true;

    assert_eq!(validator.validate(), Err(BlockError::Old));
}

#[test]
fn state_send_classification() {
    let previous = TestBlockBuilder::state().balance(100).build_saved();
    let block = TestBlockBuilder::state()
        .previous(previous.hash())
        .balance(40)
        .link(Account::from(7))
        .build();

    let mut validator = create_validator(&block);
    validator.old_account_info = Some(AccountInfo {
        head: previous.hash(),
        balance: Amount::raw(100),
        ..AccountInfo::new_test_instance()
    });
    validator.previous_block = Some(previous);

    assert!(validator.is_send());
    assert!(!validator.is_receive());
    assert_eq!(validator.amount_sent(), Amount::raw(60));
}

#[test]
fn state_receive_classification() {
    let previous = TestBlockBuilder::state().balance(100).build_saved();
    let block = TestBlockBuilder::state()
        .previous(previous.hash())
        .balance(150)
        .link(42)
        .build();

    let mut validator = create_validator(&block);
    validator.old_account_info = Some(AccountInfo {
        head: previous.hash(),
        balance: Amount::raw(100),
        epoch: Epoch::Epoch0,
        ..AccountInfo::new_test_instance()
    });
    validator.previous_block = Some(previous);
    validator.source_block_exists = true;
    validator.pending_receive_info = Some(PendingInfo::new(
        Account::from(3),
        Amount::raw(50),
        Epoch::Epoch1,
    ));

    assert!(validator.is_receive());
    assert_eq!(validator.amount_received(), Amount::raw(50));
    // The account inherits the higher epoch of the source
    assert_eq!(validator.block_epoch(), Epoch::Epoch1);
}

#[test]
fn epoch_upgrade_classification() {
    let previous = TestBlockBuilder::state().balance(100).build_saved();
    let epoch_link = *LEDGER_CONSTANTS_STUB.epochs.link(Epoch::Epoch1).unwrap();
    let block = TestBlockBuilder::state()
        .previous(previous.hash())
        .balance(100)
        .link(epoch_link)
        .build();

    let mut validator = create_validator(&block);
    validator.previous_block = Some(previous);

    assert!(validator.is_epoch_block());
    assert!(!validator.is_send());
    assert!(!validator.is_receive());
    assert_eq!(validator.block_epoch(), Epoch::Epoch1);
}

#[test]
fn send_to_epoch_link_is_not_an_upgrade() {
    let previous = TestBlockBuilder::state().balance(100).build_saved();
    let epoch_link = *LEDGER_CONSTANTS_STUB.epochs.link(Epoch::Epoch1).unwrap();
    let block = TestBlockBuilder::state()
        .previous(previous.hash())
        .balance(50)
        .link(epoch_link)
        .build();

    let mut validator = create_validator(&block);
    validator.old_account_info = Some(AccountInfo {
        head: previous.hash(),
        balance: Amount::raw(100),
        ..AccountInfo::new_test_instance()
    });
    validator.previous_block = Some(previous);

    assert!(!validator.is_epoch_block());
    assert!(validator.is_send());
}

#[test]
fn insufficient_work() {
    let impossible = WorkThresholds::new(u64::MAX, u64::MAX, u64::MAX);
    let block = TestBlockBuilder::state().previous(0).link(42).build();
    let mut validator = create_validator(&block);
    validator.work = &impossible;
    validator.source_block_exists = true;
    validator.pending_receive_info = Some(PendingInfo::new(
        Account::from(3),
        Amount::raw(420),
        Epoch::Epoch0,
    ));

    assert_eq!(validator.validate(), Err(BlockError::InsufficientWork));
}

#[test]
fn sideband_carries_classification() {
    let block = TestBlockBuilder::state().previous(0).link(42).build();
    let mut validator = create_validator(&block);
    validator.source_block_exists = true;
    validator.pending_receive_info = Some(PendingInfo::new(
        Account::from(3),
        Amount::raw(420),
        Epoch::Epoch0,
    ));

    let instructions = validator.validate().unwrap();
    assert_eq!(instructions.set_sideband.height, 1);
    assert!(instructions.set_sideband.details.is_receive);
    assert!(!instructions.set_sideband.details.is_send);
    assert_eq!(instructions.set_account_info.block_count, 1);
    assert_eq!(instructions.set_account_info.head, block.hash());
}
