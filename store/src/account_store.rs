use std::ops::RangeBounds;
use std::sync::Arc;

use opal_nullable_kv::{
    ConfiguredDatabase, Database, Environment, KvError, Transaction, WriteTransaction,
};
use opal_output_tracker::{OutputListenerMt, OutputTrackerMt};
use opal_types::{Account, AccountInfo};

use crate::{ACCOUNT_TEST_DATABASE, RangeIterator, TableIterator, parallel_traversal};

pub struct AccountStore {
    database: Database,
    put_listener: OutputListenerMt<(Account, AccountInfo)>,
    delete_listener: OutputListenerMt<Account>,
}

impl AccountStore {
    pub fn new(env: &Environment) -> anyhow::Result<Self> {
        let database = env.create_db(Some("accounts"))?;
        Ok(Self {
            database,
            put_listener: OutputListenerMt::new(),
            delete_listener: OutputListenerMt::new(),
        })
    }

    pub fn database(&self) -> Database {
        self.database
    }

    pub fn track_puts(&self) -> Arc<OutputTrackerMt<(Account, AccountInfo)>> {
        self.put_listener.track()
    }

    pub fn track_deletions(&self) -> Arc<OutputTrackerMt<Account>> {
        self.delete_listener.track()
    }

    pub fn put(&self, txn: &mut WriteTransaction, account: &Account, info: &AccountInfo) {
        if self.put_listener.is_tracked() {
            self.put_listener.emit((*account, info.clone()));
        }
        txn.put(self.database, account.as_bytes(), &info.to_bytes())
            .expect("Could not put account info");
    }

    pub fn get(&self, txn: &dyn Transaction, account: &Account) -> Option<AccountInfo> {
        match txn.get(self.database, account.as_bytes()) {
            Ok(bytes) => Some(
                AccountInfo::deserialize(&mut bytes.as_slice())
                    .expect("Should be valid account info"),
            ),
            Err(KvError::NotFound) => None,
            Err(e) => panic!("Could not load account info: {:?}", e),
        }
    }

    pub fn exists(&self, txn: &dyn Transaction, account: &Account) -> bool {
        txn.exists(self.database, account.as_bytes())
    }

    pub fn del(&self, txn: &mut WriteTransaction, account: &Account) {
        if self.delete_listener.is_tracked() {
            self.delete_listener.emit(*account);
        }
        txn.delete(self.database, account.as_bytes())
            .expect("Could not delete account info");
    }

    pub fn count(&self, txn: &dyn Transaction) -> u64 {
        txn.count(self.database)
    }

    pub fn iter<'tx>(
        &self,
        tx: &'tx dyn Transaction,
    ) -> impl Iterator<Item = (Account, AccountInfo)> + 'tx {
        let cursor = tx
            .cursor(self.database)
            .expect("Could not read from account store");
        TableIterator::new(cursor, read_account_record)
    }

    pub fn iter_range<'tx>(
        &self,
        tx: &'tx dyn Transaction,
        range: impl RangeBounds<Account> + 'static,
    ) -> RangeIterator<'tx, Account, AccountInfo> {
        let cursor = tx
            .cursor(self.database)
            .expect("Could not read from account store");
        RangeIterator::new(
            cursor,
            range.start_bound().map(|b| b.as_bytes().to_vec()),
            range.end_bound().map(|b| b.as_bytes().to_vec()),
            read_account_record,
        )
    }

    /// Visits every account in parallel key-space partitions, each with its
    /// own read transaction
    pub fn for_each_par(
        &self,
        env: &Environment,
        thread_count: usize,
        action: impl Fn(&mut dyn Iterator<Item = (Account, AccountInfo)>) + Send + Sync,
    ) {
        parallel_traversal(thread_count, &|start, end, is_last| {
            let tx = env.begin_read();
            let start = Account::from(start);
            let mut iter: Box<dyn Iterator<Item = (Account, AccountInfo)> + '_> = if is_last {
                Box::new(self.iter_range(&tx, start..))
            } else {
                Box::new(self.iter_range(&tx, start..Account::from(end)))
            };
            action(&mut iter);
        });
    }
}

fn read_account_record(key: &[u8], mut value: &[u8]) -> (Account, AccountInfo) {
    let account = Account::from_slice(key).expect("Should be a valid account key");
    let info = AccountInfo::deserialize(&mut value).expect("Should be valid account info");
    (account, info)
}

pub struct ConfiguredAccountDatabaseBuilder {
    database: ConfiguredDatabase,
}

impl ConfiguredAccountDatabaseBuilder {
    pub fn new() -> Self {
        Self {
            database: ConfiguredDatabase::new(ACCOUNT_TEST_DATABASE, "accounts"),
        }
    }

    pub fn account(mut self, account: &Account, info: &AccountInfo) -> Self {
        self.database.insert(account.as_bytes(), info.to_bytes());
        self
    }

    pub fn build(self) -> ConfiguredDatabase {
        self.database
    }

    pub fn create(accounts: Vec<(Account, AccountInfo)>) -> ConfiguredDatabase {
        let mut builder = Self::new();
        for (account, info) in accounts {
            builder = builder.account(&account, &info);
        }
        builder.build()
    }
}

impl Default for ConfiguredAccountDatabaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        env: Environment,
        store: AccountStore,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_stored_data(Vec::new())
        }

        fn with_stored_data(entries: Vec<(Account, AccountInfo)>) -> Self {
            let env = Environment::new_null_with_data(vec![
                ConfiguredAccountDatabaseBuilder::create(entries),
            ]);
            Self {
                store: AccountStore::new(&env).unwrap(),
                env,
            }
        }
    }

    #[test]
    fn empty_store() {
        let fixture = Fixture::new();
        let txn = fixture.env.begin_read();
        assert_eq!(fixture.store.get(&txn, &Account::from(1)), None);
        assert_eq!(fixture.store.exists(&txn, &Account::from(1)), false);
        assert_eq!(fixture.store.count(&txn), 0);
    }

    #[test]
    fn load_account() {
        let account = Account::from(1);
        let info = AccountInfo::new_test_instance();
        let fixture = Fixture::with_stored_data(vec![(account, info.clone())]);
        let txn = fixture.env.begin_read();

        assert_eq!(fixture.store.get(&txn, &account), Some(info));
    }

    #[test]
    fn iter_range_is_ordered() {
        let info = AccountInfo::new_test_instance();
        let fixture = Fixture::with_stored_data(vec![
            (Account::from(3), info.clone()),
            (Account::from(1), info.clone()),
            (Account::from(2), info.clone()),
        ]);
        let txn = fixture.env.begin_read();

        let accounts: Vec<_> = fixture
            .store
            .iter_range(&txn, Account::from(2)..)
            .map(|(account, _)| account)
            .collect();

        assert_eq!(accounts, vec![Account::from(2), Account::from(3)]);
    }

    #[test]
    fn tracks_puts() {
        let fixture = Fixture::new();
        let mut txn = fixture.env.begin_write();
        let put_tracker = fixture.store.track_puts();
        let info = AccountInfo::new_test_instance();

        fixture.store.put(&mut txn, &Account::from(1), &info);

        assert_eq!(put_tracker.output(), vec![(Account::from(1), info)]);
    }

    #[test]
    fn tracks_deletions() {
        let fixture = Fixture::new();
        let mut txn = fixture.env.begin_write();
        let delete_tracker = fixture.store.track_deletions();

        fixture.store.del(&mut txn, &Account::from(1));

        assert_eq!(delete_tracker.output(), vec![Account::from(1)]);
    }
}
