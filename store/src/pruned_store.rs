use std::sync::Arc;

use opal_nullable_kv::{ConfiguredDatabase, Database, Environment, Transaction, WriteTransaction};
use opal_output_tracker::{OutputListenerMt, OutputTrackerMt};
use opal_types::BlockHash;

use crate::{PRUNED_TEST_DATABASE, TableIterator};

/// The set of hashes whose block bodies have been dropped but which are
/// still known to be part of the cemented ledger
pub struct PrunedStore {
    database: Database,
    put_listener: OutputListenerMt<BlockHash>,
    delete_listener: OutputListenerMt<BlockHash>,
}

impl PrunedStore {
    pub fn new(env: &Environment) -> anyhow::Result<Self> {
        let database = env.create_db(Some("pruned"))?;
        Ok(Self {
            database,
            put_listener: OutputListenerMt::new(),
            delete_listener: OutputListenerMt::new(),
        })
    }

    pub fn track_puts(&self) -> Arc<OutputTrackerMt<BlockHash>> {
        self.put_listener.track()
    }

    pub fn track_deletions(&self) -> Arc<OutputTrackerMt<BlockHash>> {
        self.delete_listener.track()
    }

    pub fn put(&self, txn: &mut WriteTransaction, hash: &BlockHash) {
        if self.put_listener.is_tracked() {
            self.put_listener.emit(*hash);
        }
        txn.put(self.database, hash.as_bytes(), &[])
            .expect("Could not put pruned hash");
    }

    pub fn del(&self, txn: &mut WriteTransaction, hash: &BlockHash) {
        if self.delete_listener.is_tracked() {
            self.delete_listener.emit(*hash);
        }
        txn.delete(self.database, hash.as_bytes())
            .expect("Could not delete pruned hash");
    }

    pub fn exists(&self, txn: &dyn Transaction, hash: &BlockHash) -> bool {
        txn.exists(self.database, hash.as_bytes())
    }

    pub fn count(&self, txn: &dyn Transaction) -> u64 {
        txn.count(self.database)
    }

    pub fn iter<'tx>(&self, tx: &'tx dyn Transaction) -> impl Iterator<Item = BlockHash> + 'tx {
        let cursor = tx
            .cursor(self.database)
            .expect("Could not read from pruned store");
        TableIterator::new(cursor, read_pruned_record).map(|(hash, _)| hash)
    }
}

fn read_pruned_record(key: &[u8], _value: &[u8]) -> (BlockHash, ()) {
    (
        BlockHash::from_slice(key).expect("Should be a valid pruned hash"),
        (),
    )
}

pub struct ConfiguredPrunedDatabaseBuilder {
    database: ConfiguredDatabase,
}

impl ConfiguredPrunedDatabaseBuilder {
    pub fn new() -> Self {
        Self {
            database: ConfiguredDatabase::new(PRUNED_TEST_DATABASE, "pruned"),
        }
    }

    pub fn pruned(mut self, hash: &BlockHash) -> Self {
        self.database.insert(hash.as_bytes(), Vec::new());
        self
    }

    pub fn build(self) -> ConfiguredDatabase {
        self.database
    }
}

impl Default for ConfiguredPrunedDatabaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
