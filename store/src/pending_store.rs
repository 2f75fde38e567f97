use std::ops::RangeBounds;
use std::sync::Arc;

use opal_nullable_kv::{
    ConfiguredDatabase, Database, Environment, KvError, Transaction, WriteTransaction,
};
use opal_output_tracker::{OutputListenerMt, OutputTrackerMt};
use opal_types::{Account, BlockHash, PendingInfo, PendingKey};

use crate::{PENDING_TEST_DATABASE, RangeIterator, TableIterator, parallel_traversal_u512};

pub struct PendingStore {
    database: Database,
    put_listener: OutputListenerMt<(PendingKey, PendingInfo)>,
    delete_listener: OutputListenerMt<PendingKey>,
}

impl PendingStore {
    pub fn new(env: &Environment) -> anyhow::Result<Self> {
        let database = env.create_db(Some("pending"))?;
        Ok(Self {
            database,
            put_listener: OutputListenerMt::new(),
            delete_listener: OutputListenerMt::new(),
        })
    }

    pub fn database(&self) -> Database {
        self.database
    }

    pub fn track_puts(&self) -> Arc<OutputTrackerMt<(PendingKey, PendingInfo)>> {
        self.put_listener.track()
    }

    pub fn track_deletions(&self) -> Arc<OutputTrackerMt<PendingKey>> {
        self.delete_listener.track()
    }

    pub fn put(&self, txn: &mut WriteTransaction, key: &PendingKey, pending: &PendingInfo) {
        if self.put_listener.is_tracked() {
            self.put_listener.emit((*key, pending.clone()));
        }
        txn.put(self.database, &key.to_bytes(), &pending.to_bytes())
            .expect("Could not put pending info");
    }

    pub fn del(&self, txn: &mut WriteTransaction, key: &PendingKey) {
        if self.delete_listener.is_tracked() {
            self.delete_listener.emit(*key);
        }
        txn.delete(self.database, &key.to_bytes())
            .expect("Could not delete pending info");
    }

    pub fn get(&self, txn: &dyn Transaction, key: &PendingKey) -> Option<PendingInfo> {
        match txn.get(self.database, &key.to_bytes()) {
            Ok(bytes) => Some(
                PendingInfo::deserialize(&mut bytes.as_slice())
                    .expect("Should be valid pending info"),
            ),
            Err(KvError::NotFound) => None,
            Err(e) => panic!("Could not load pending info: {:?}", e),
        }
    }

    pub fn exists(&self, txn: &dyn Transaction, key: &PendingKey) -> bool {
        txn.exists(self.database, &key.to_bytes())
    }

    /// True when the account has any receivable entry
    pub fn any(&self, tx: &dyn Transaction, account: &Account) -> bool {
        let key = PendingKey::new(*account, BlockHash::ZERO);
        self.iter_range(tx, key..)
            .next()
            .map(|(k, _)| k.receiving_account == *account)
            .unwrap_or(false)
    }

    pub fn count(&self, txn: &dyn Transaction) -> u64 {
        txn.count(self.database)
    }

    pub fn iter<'tx>(
        &self,
        tx: &'tx dyn Transaction,
    ) -> impl Iterator<Item = (PendingKey, PendingInfo)> + 'tx {
        let cursor = tx
            .cursor(self.database)
            .expect("Could not read from pending store");
        TableIterator::new(cursor, read_pending_record)
    }

    pub fn iter_range<'tx>(
        &self,
        tx: &'tx dyn Transaction,
        range: impl RangeBounds<PendingKey> + 'static,
    ) -> RangeIterator<'tx, PendingKey, PendingInfo> {
        let cursor = tx
            .cursor(self.database)
            .expect("Could not read from pending store");
        RangeIterator::new(
            cursor,
            range.start_bound().map(|b| b.to_bytes().to_vec()),
            range.end_bound().map(|b| b.to_bytes().to_vec()),
            read_pending_record,
        )
    }

    /// Visits every pending entry in parallel key-space partitions, each
    /// with its own read transaction
    pub fn for_each_par(
        &self,
        env: &Environment,
        thread_count: usize,
        action: impl Fn(&mut dyn Iterator<Item = (PendingKey, PendingInfo)>) + Send + Sync,
    ) {
        parallel_traversal_u512(thread_count, &|start, end, is_last| {
            let tx = env.begin_read();
            let start = PendingKey::from(start);
            let mut iter: Box<dyn Iterator<Item = (PendingKey, PendingInfo)> + '_> = if is_last {
                Box::new(self.iter_range(&tx, start..))
            } else {
                Box::new(self.iter_range(&tx, start..PendingKey::from(end)))
            };
            action(&mut iter);
        });
    }
}

pub fn read_pending_record(mut key: &[u8], mut value: &[u8]) -> (PendingKey, PendingInfo) {
    let key = PendingKey::deserialize(&mut key).expect("Should be a valid pending key");
    let info = PendingInfo::deserialize(&mut value).expect("Should be valid pending info");
    (key, info)
}

pub struct ConfiguredPendingDatabaseBuilder {
    database: ConfiguredDatabase,
}

impl ConfiguredPendingDatabaseBuilder {
    pub fn new() -> Self {
        Self {
            database: ConfiguredDatabase::new(PENDING_TEST_DATABASE, "pending"),
        }
    }

    pub fn pending(mut self, key: &PendingKey, info: &PendingInfo) -> Self {
        self.database.insert(key.to_bytes(), info.to_bytes());
        self
    }

    pub fn build(self) -> ConfiguredDatabase {
        self.database
    }

    pub fn create(entries: Vec<(PendingKey, PendingInfo)>) -> ConfiguredDatabase {
        let mut builder = Self::new();
        for (key, info) in entries {
            builder = builder.pending(&key, &info);
        }
        builder.build()
    }
}

impl Default for ConfiguredPendingDatabaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
