use opal_types::{Account, Amount, BlockHash, PendingInfo, PendingKey, PrivateKey};

use crate::{AnySet, Ledger, LedgerInserter, LedgerSet};

#[test]
fn iterate_receivables_of_one_account() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let dest = PrivateKey::from(1);

    let send1 = inserter.genesis().send(&dest, Amount::raw(10));
    let send2 = inserter.genesis().send(&dest, Amount::raw(20));
    let send3 = inserter.genesis().send(&dest, Amount::raw(30));

    let any = ledger.any();
    let mut keys: Vec<_> = any
        .account_receivable_upper_bound(dest.account(), BlockHash::ZERO)
        .map(|(key, _)| key.send_block_hash)
        .collect();
    keys.sort();

    let mut expected = vec![send1.hash(), send2.hash(), send3.hash()];
    expected.sort();
    assert_eq!(keys, expected);
}

#[test]
fn account_receivable_sums_the_amounts() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let dest = PrivateKey::from(1);

    inserter.genesis().send(&dest, Amount::raw(10));
    inserter.genesis().send(&dest, Amount::raw(20));

    assert_eq!(
        ledger.any().account_receivable(&dest.account()),
        Amount::raw(30)
    );
    assert_eq!(
        ledger.any().account_receivable(&Account::from(999)),
        Amount::ZERO
    );
}

#[test]
fn receivable_iteration_stops_at_the_account_boundary() {
    let ledger = Ledger::new_null_builder()
        .pending(
            &PendingKey::new(Account::from(1), BlockHash::from(1)),
            &PendingInfo::new_test_instance(),
        )
        .pending(
            &PendingKey::new(Account::from(2), BlockHash::from(2)),
            &PendingInfo::new_test_instance(),
        )
        .finish();

    let any = ledger.any();
    let from_account_1: Vec<_> = any
        .account_receivable_upper_bound(Account::from(1), BlockHash::ZERO)
        .collect();
    assert_eq!(from_account_1.len(), 1);
    assert_eq!(from_account_1[0].0.receiving_account, Account::from(1));
}

#[test]
fn confirmed_receivable_requires_a_cemented_send() {
    let ledger = Ledger::new_null();
    let inserter = LedgerInserter::new(&ledger);
    let dest = PrivateKey::from(1);

    let send1 = inserter.genesis().send(&dest, Amount::raw(10));
    inserter.genesis().send(&dest, Amount::raw(20));
    ledger.confirm(send1.hash());

    let confirmed = ledger.confirmed();
    assert_eq!(
        confirmed.account_receivable(&dest.account()),
        Amount::raw(10)
    );
    assert_eq!(
        ledger.any().account_receivable(&dest.account()),
        Amount::raw(30)
    );
}
