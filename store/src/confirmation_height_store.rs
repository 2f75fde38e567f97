use std::ops::RangeBounds;
use std::sync::Arc;

use opal_nullable_kv::{
    ConfiguredDatabase, Database, Environment, KvError, Transaction, WriteTransaction,
};
use opal_output_tracker::{OutputListenerMt, OutputTrackerMt};
use opal_types::{Account, ConfirmationHeightInfo};

use crate::{
    CONFIRMATION_HEIGHT_TEST_DATABASE, RangeIterator, TableIterator, parallel_traversal,
};

pub struct ConfirmationHeightStore {
    database: Database,
    put_listener: OutputListenerMt<(Account, ConfirmationHeightInfo)>,
    delete_listener: OutputListenerMt<Account>,
}

impl ConfirmationHeightStore {
    pub fn new(env: &Environment) -> anyhow::Result<Self> {
        let database = env.create_db(Some("confirmation_height"))?;
        Ok(Self {
            database,
            put_listener: OutputListenerMt::new(),
            delete_listener: OutputListenerMt::new(),
        })
    }

    pub fn track_puts(&self) -> Arc<OutputTrackerMt<(Account, ConfirmationHeightInfo)>> {
        self.put_listener.track()
    }

    pub fn track_deletions(&self) -> Arc<OutputTrackerMt<Account>> {
        self.delete_listener.track()
    }

    pub fn put(&self, txn: &mut WriteTransaction, account: &Account, info: &ConfirmationHeightInfo) {
        if self.put_listener.is_tracked() {
            self.put_listener.emit((*account, info.clone()));
        }
        txn.put(self.database, account.as_bytes(), &info.to_bytes())
            .expect("Could not put confirmation height");
    }

    pub fn get(&self, txn: &dyn Transaction, account: &Account) -> Option<ConfirmationHeightInfo> {
        match txn.get(self.database, account.as_bytes()) {
            Ok(bytes) => Some(
                ConfirmationHeightInfo::deserialize(&mut bytes.as_slice())
                    .expect("Should be valid confirmation height info"),
            ),
            Err(KvError::NotFound) => None,
            Err(e) => panic!("Could not load confirmation height: {:?}", e),
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
            .expect("Could not delete confirmation height");
    }

    pub fn count(&self, txn: &dyn Transaction) -> u64 {
        txn.count(self.database)
    }

    pub fn iter<'tx>(
        &self,
        tx: &'tx dyn Transaction,
    ) -> impl Iterator<Item = (Account, ConfirmationHeightInfo)> + 'tx {
        let cursor = tx
            .cursor(self.database)
            .expect("Could not read from confirmation height store");
        TableIterator::new(cursor, read_confirmation_height_record)
    }

    pub fn iter_range<'tx>(
        &self,
        tx: &'tx dyn Transaction,
        range: impl RangeBounds<Account> + 'static,
    ) -> RangeIterator<'tx, Account, ConfirmationHeightInfo> {
        let cursor = tx
            .cursor(self.database)
            .expect("Could not read from confirmation height store");
        RangeIterator::new(
            cursor,
            range.start_bound().map(|b| b.as_bytes().to_vec()),
            range.end_bound().map(|b| b.as_bytes().to_vec()),
            read_confirmation_height_record,
        )
    }

    /// Visits every entry in parallel key-space partitions, each with its
    /// own read transaction
    pub fn for_each_par(
        &self,
        env: &Environment,
        thread_count: usize,
        action: impl Fn(&mut dyn Iterator<Item = (Account, ConfirmationHeightInfo)>) + Send + Sync,
    ) {
        parallel_traversal(thread_count, &|start, end, is_last| {
            let tx = env.begin_read();
            let start = Account::from(start);
            let mut iter: Box<dyn Iterator<Item = (Account, ConfirmationHeightInfo)> + '_> = if is_last
            {
                Box::new(self.iter_range(&tx, start..))
            } else {
                Box::new(self.iter_range(&tx, start..Account::from(end)))
            };
            action(&mut iter);
        });
    }
}

fn read_confirmation_height_record(
    key: &[u8],
    mut value: &[u8],
) -> (Account, ConfirmationHeightInfo) {
    let account = Account::from_slice(key).expect("Should be a valid account key");
    let info = ConfirmationHeightInfo::deserialize(&mut value)
        .expect("Should be valid confirmation height info");
    (account, info)
}

pub struct ConfiguredConfirmationHeightDatabaseBuilder {
    database: ConfiguredDatabase,
}

impl ConfiguredConfirmationHeightDatabaseBuilder {
    pub fn new() -> Self {
        Self {
            database: ConfiguredDatabase::new(
                CONFIRMATION_HEIGHT_TEST_DATABASE,
                "confirmation_height",
            ),
        }
    }

    pub fn height(mut self, account: &Account, info: &ConfirmationHeightInfo) -> Self {
        self.database.insert(account.as_bytes(), info.to_bytes());
        self
    }

    pub fn build(self) -> ConfiguredDatabase {
        self.database
    }
}

impl Default for ConfiguredConfirmationHeightDatabaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
