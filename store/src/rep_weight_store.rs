use std::sync::Arc;

use opal_nullable_kv::{
    ConfiguredDatabase, Database, Environment, KvError, Transaction, WriteTransaction,
};
use opal_output_tracker::{OutputListenerMt, OutputTrackerMt};
use opal_types::{Amount, PublicKey};

use crate::{REP_WEIGHT_TEST_DATABASE, RangeIterator, TableIterator, parallel_traversal};

/// Durable mirror of the committed representative weights
pub struct RepWeightStore {
    database: Database,
    put_listener: OutputListenerMt<(PublicKey, Amount)>,
    delete_listener: OutputListenerMt<PublicKey>,
}

impl RepWeightStore {
    pub fn new(env: &Environment) -> anyhow::Result<Self> {
        let database = env.create_db(Some("rep_weights"))?;
        Ok(Self {
            database,
            put_listener: OutputListenerMt::new(),
            delete_listener: OutputListenerMt::new(),
        })
    }

    pub fn track_puts(&self) -> Arc<OutputTrackerMt<(PublicKey, Amount)>> {
        self.put_listener.track()
    }

    pub fn track_deletions(&self) -> Arc<OutputTrackerMt<PublicKey>> {
        self.delete_listener.track()
    }

    pub fn get(&self, txn: &dyn Transaction, representative: &PublicKey) -> Option<Amount> {
        match txn.get(self.database, representative.as_bytes()) {
            Ok(bytes) => Some(
                Amount::deserialize(&mut bytes.as_slice()).expect("Should be a valid amount"),
            ),
            Err(KvError::NotFound) => None,
            Err(e) => panic!("Could not load rep weight: {:?}", e),
        }
    }

    pub fn put(&self, txn: &mut WriteTransaction, representative: PublicKey, weight: Amount) {
        if self.put_listener.is_tracked() {
            self.put_listener.emit((representative, weight));
        }
        txn.put(
            self.database,
            representative.as_bytes(),
            &weight.to_be_bytes(),
        )
        .expect("Could not put rep weight");
    }

    pub fn del(&self, txn: &mut WriteTransaction, representative: &PublicKey) {
        if self.delete_listener.is_tracked() {
            self.delete_listener.emit(*representative);
        }
        txn.delete(self.database, representative.as_bytes())
            .expect("Could not delete rep weight");
    }

    pub fn count(&self, txn: &dyn Transaction) -> u64 {
        txn.count(self.database)
    }

    pub fn iter<'tx>(
        &self,
        tx: &'tx dyn Transaction,
    ) -> impl Iterator<Item = (PublicKey, Amount)> + 'tx {
        let cursor = tx
            .cursor(self.database)
            .expect("Could not read from rep weight store");
        TableIterator::new(cursor, read_rep_weight_record)
    }

    /// Visits every weight in parallel key-space partitions, each with its
    /// own read transaction
    pub fn for_each_par(
        &self,
        env: &Environment,
        thread_count: usize,
        action: impl Fn(&mut dyn Iterator<Item = (PublicKey, Amount)>) + Send + Sync,
    ) {
        parallel_traversal(thread_count, &|start, end, is_last| {
            let tx = env.begin_read();
            let start = PublicKey::from(start);
            let cursor = tx
                .cursor(self.database)
                .expect("Could not read from rep weight store");
            let end_bound = if is_last {
                std::ops::Bound::Unbounded
            } else {
                std::ops::Bound::Excluded(PublicKey::from(end).as_bytes().to_vec())
            };
            let mut iter = RangeIterator::new(
                cursor,
                std::ops::Bound::Included(start.as_bytes().to_vec()),
                end_bound,
                read_rep_weight_record,
            );
            action(&mut iter);
        });
    }
}

fn read_rep_weight_record(key: &[u8], mut value: &[u8]) -> (PublicKey, Amount) {
    let representative = PublicKey::from_slice(key).expect("Should be a valid public key");
    let weight = Amount::deserialize(&mut value).expect("Should be a valid amount");
    (representative, weight)
}

pub struct ConfiguredRepWeightDatabaseBuilder {
    database: ConfiguredDatabase,
}

impl ConfiguredRepWeightDatabaseBuilder {
    pub fn new() -> Self {
        Self {
            database: ConfiguredDatabase::new(REP_WEIGHT_TEST_DATABASE, "rep_weights"),
        }
    }

    pub fn entry(mut self, representative: PublicKey, weight: Amount) -> Self {
        self.database
            .insert(representative.as_bytes(), weight.to_be_bytes());
        self
    }

    pub fn build(self) -> ConfiguredDatabase {
        self.database
    }

    pub fn create(weights: Vec<(PublicKey, Amount)>) -> ConfiguredDatabase {
        let mut builder = Self::new();
        for (representative, weight) in weights {
            builder = builder.entry(representative, weight);
        }
        builder.build()
    }
}

impl Default for ConfiguredRepWeightDatabaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
