use opal_types::{Amount, PrivateKey};

use crate::{ConfirmedSet, DEV_GENESIS_ACCOUNT, Ledger, LedgerInserter, LedgerSet};

#[test]
fn confirm_cements_a_three_block_chain_in_dependency_order() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let account = PrivateKey::from(1);

    let send1 = inserter.genesis().send(&account, Amount::raw(10));
    let send2 = inserter.genesis().send(&account, Amount::raw(20));
    let open = inserter.account(&account).receive(send1.hash());
    let receive = inserter.account(&account).receive(send2.hash());
    let change = inserter.account(&account).change(account.public_key());

    let cemented = ledger.confirm(change.hash());

    // The whole chain of the account plus the genesis sends it depends on
    let hashes: Vec<_> = cemented.iter().map(|b| b.hash()).collect();
    assert!(hashes.contains(&open.hash()));
    assert!(hashes.contains(&receive.hash()));
    assert!(hashes.contains(&change.hash()));

    // Dependency order: every block of the account in ascending height
    let index_of = |hash| hashes.iter().position(|h| *h == hash).unwrap();
    assert!(index_of(open.hash()) < index_of(receive.hash()));
    assert!(index_of(receive.hash()) < index_of(change.hash()));
    assert!(index_of(send1.hash()) < index_of(open.hash()));
    assert!(index_of(send2.hash()) < index_of(receive.hash()));

    let info = ledger
        .confirmed()
        .get_conf_info(&account.account())
        .unwrap();
    assert_eq!(info.height, 3);
    assert_eq!(info.frontier, change.hash());

    assert_eq!(ledger.cemented_count(), 1 + cemented.len() as u64);
}

#[test]
fn confirm_is_idempotent() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);

    let send = inserter.genesis().send(PrivateKey::from(1), Amount::raw(1));

    let first = ledger.confirm(send.hash());
    assert_eq!(first.len(), 1);

    let second = ledger.confirm(send.hash());
    assert_eq!(second.len(), 0);
    assert_eq!(ledger.cemented_count(), 2);
}

#[test]
fn confirmation_height_is_monotonic() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);

    let mut last_height = 1;
    for i in 0..5 {
        let send = inserter
            .genesis()
            .send(PrivateKey::from(i + 10), Amount::raw(1));
        ledger.confirm(send.hash());

        let info = ledger
            .confirmed()
            .get_conf_info(&DEV_GENESIS_ACCOUNT)
            .unwrap();
        assert!(info.height >= last_height);
        assert!(info.height <= ledger.any().get_account(&DEV_GENESIS_ACCOUNT).unwrap().block_count);
        last_height = info.height;
    }
}

#[test]
fn bounded_confirm_returns_a_partial_result() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);

    for i in 0..5 {
        inserter
            .genesis()
            .send(PrivateKey::from(i + 10), Amount::raw(1));
    }
    let head = inserter.genesis().send(PrivateKey::from(99), Amount::raw(1));

    let cemented = ledger.confirm_max(head.hash(), 3);
    assert_eq!(cemented.len(), 3);

    // The caller is expected to drive the cementation to completion
    let rest = ledger.confirm(head.hash());
    assert_eq!(rest.len(), 3);
    assert!(
        ledger.confirmed().block_exists(&head.hash()),
        "the whole chain must be cemented after the second call"
    );
}

#[test]
fn confirming_an_already_cemented_ancestor_is_a_no_op() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);

    let send1 = inserter.genesis().send(PrivateKey::from(1), Amount::raw(1));
    let send2 = inserter.genesis().send(PrivateKey::from(2), Amount::raw(1));
    ledger.confirm(send2.hash());

    assert_eq!(ledger.confirm(send1.hash()).len(), 0);
}
