use opal_types::Amount;

use super::assert_ledger_consistent;
use crate::{
    ConfirmedSet, DEV_GENESIS_ACCOUNT, DEV_GENESIS_HASH, DEV_GENESIS_PUB_KEY, Ledger, LedgerSet,
};

#[test]
fn genesis_only_initialization() {
    let ledger = Ledger::new_null();

    assert_eq!(ledger.block_count(), 1);
    assert_eq!(ledger.account_count(), 1);
    assert_eq!(ledger.cemented_count(), 1);
    assert_eq!(ledger.pruned_count(), 0);
}

#[test]
fn genesis_weight_is_committed() {
    let ledger = Ledger::new_null();

    assert_eq!(ledger.weight(&DEV_GENESIS_PUB_KEY), Amount::MAX);
    assert_eq!(ledger.weight_exact(&DEV_GENESIS_PUB_KEY), Amount::MAX);
    assert_eq!(ledger.rep_weights.weight_committed(), Amount::MAX);
    assert_eq!(ledger.rep_weights.weight_unused(), Amount::ZERO);
}

#[test]
fn genesis_account_info() {
    let ledger = Ledger::new_null();

    let info = ledger.any().get_account(&DEV_GENESIS_ACCOUNT).unwrap();
    assert_eq!(info.head, *DEV_GENESIS_HASH);
    assert_eq!(info.open_block, *DEV_GENESIS_HASH);
    assert_eq!(info.balance, Amount::MAX);
    assert_eq!(info.block_count, 1);
    assert_eq!(info.representative, *DEV_GENESIS_PUB_KEY);
}

#[test]
fn genesis_is_confirmed() {
    let ledger = Ledger::new_null();

    let confirmed = ledger.confirmed();
    assert!(confirmed.block_exists(&DEV_GENESIS_HASH));
    let conf_info = confirmed.get_conf_info(&DEV_GENESIS_ACCOUNT).unwrap();
    assert_eq!(conf_info.height, 1);
    assert_eq!(conf_info.frontier, *DEV_GENESIS_HASH);
}

#[test]
fn genesis_ledger_is_consistent() {
    let ledger = Ledger::new_null();
    assert_ledger_consistent(&ledger);
}

#[test]
fn store_version_is_set() {
    let ledger = Ledger::new_null();
    assert_eq!(ledger.version(), opal_store::STORE_VERSION_CURRENT);
}
