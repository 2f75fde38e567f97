use std::ops::RangeBounds;
use std::sync::Arc;

use opal_nullable_kv::{
    ConfiguredDatabase, Database, Environment, KvError, Transaction, WriteTransaction,
};
use opal_output_tracker::{OutputListenerMt, OutputTrackerMt};
use opal_types::{BlockHash, SavedBlock};

use crate::{BLOCK_TEST_DATABASE, RangeIterator, parallel_traversal};

/// Maps a block hash to the block's native serialization followed by its
/// sideband
pub struct BlockStore {
    database: Database,
    put_listener: OutputListenerMt<SavedBlock>,
    delete_listener: OutputListenerMt<BlockHash>,
}

impl BlockStore {
    pub fn new(env: &Environment) -> anyhow::Result<Self> {
        let database = env.create_db(Some("blocks"))?;
        Ok(Self {
            database,
            put_listener: OutputListenerMt::new(),
            delete_listener: OutputListenerMt::new(),
        })
    }

    pub fn database(&self) -> Database {
        self.database
    }

    pub fn track_puts(&self) -> Arc<OutputTrackerMt<SavedBlock>> {
        self.put_listener.track()
    }

    pub fn track_deletions(&self) -> Arc<OutputTrackerMt<BlockHash>> {
        self.delete_listener.track()
    }

    pub fn put(&self, txn: &mut WriteTransaction, block: &SavedBlock) {
        if self.put_listener.is_tracked() {
            self.put_listener.emit(block.clone());
        }
        self.raw_put(txn, &block.serialize_with_sideband(), &block.hash());
    }

    pub fn raw_put(&self, txn: &mut WriteTransaction, data: &[u8], hash: &BlockHash) {
        txn.put(self.database, hash.as_bytes(), data)
            .expect("Could not put block");
    }

    pub fn exists(&self, txn: &dyn Transaction, hash: &BlockHash) -> bool {
        txn.exists(self.database, hash.as_bytes())
    }

    pub fn get(&self, txn: &dyn Transaction, hash: &BlockHash) -> Option<SavedBlock> {
        match txn.get(self.database, hash.as_bytes()) {
            Ok(bytes) => Some(
                SavedBlock::deserialize(&bytes)
                    .unwrap_or_else(|e| panic!("Could not deserialize block {}: {:?}", hash, e)),
            ),
            Err(KvError::NotFound) => None,
            Err(e) => panic!("Could not load block: {:?}", e),
        }
    }

    pub fn del(&self, txn: &mut WriteTransaction, hash: &BlockHash) {
        if self.delete_listener.is_tracked() {
            self.delete_listener.emit(*hash);
        }
        txn.delete(self.database, hash.as_bytes())
            .expect("Could not delete block");
    }

    /// Rewrites the successor pointer in a stored block's sideband
    pub fn successor_set(&self, txn: &mut WriteTransaction, hash: &BlockHash, successor: BlockHash) {
        let Some(mut block) = self.get(txn, hash) else {
            panic!("Could not set successor, block not found: {}", hash);
        };
        block.sideband.successor = successor;
        self.raw_put(txn, &block.serialize_with_sideband(), hash);
    }

    pub fn successor_clear(&self, txn: &mut WriteTransaction, hash: &BlockHash) {
        self.successor_set(txn, hash, BlockHash::ZERO);
    }

    pub fn successor(&self, txn: &dyn Transaction, hash: &BlockHash) -> Option<BlockHash> {
        self.get(txn, hash).and_then(|block| block.successor())
    }

    pub fn count(&self, txn: &dyn Transaction) -> u64 {
        txn.count(self.database)
    }

    pub fn iter<'tx>(&self, tx: &'tx dyn Transaction) -> impl Iterator<Item = SavedBlock> + 'tx {
        self.iter_range(tx, BlockHash::ZERO..)
    }

    pub fn iter_range<'tx>(
        &self,
        tx: &'tx dyn Transaction,
        range: impl RangeBounds<BlockHash> + 'static,
    ) -> impl Iterator<Item = SavedBlock> + 'tx {
        let cursor = tx
            .cursor(self.database)
            .expect("Could not read from block store");
        RangeIterator::new(
            cursor,
            range.start_bound().map(|b| b.as_bytes().to_vec()),
            range.end_bound().map(|b| b.as_bytes().to_vec()),
            read_block_record,
        )
        .map(|(_, block)| block)
    }

    /// Visits every block in parallel key-space partitions, each with its
    /// own read transaction
    pub fn for_each_par(
        &self,
        env: &Environment,
        thread_count: usize,
        action: impl Fn(&mut dyn Iterator<Item = SavedBlock>) + Send + Sync,
    ) {
        parallel_traversal(thread_count, &|start, end, is_last| {
            let tx = env.begin_read();
            let start = BlockHash::from(start);
            let mut iter: Box<dyn Iterator<Item = SavedBlock> + '_> = if is_last {
                Box::new(self.iter_range(&tx, start..))
            } else {
                Box::new(self.iter_range(&tx, start..BlockHash::from(end)))
            };
            action(&mut iter);
        });
    }
}

fn read_block_record(key: &[u8], value: &[u8]) -> (BlockHash, SavedBlock) {
    let hash = BlockHash::from_slice(key).expect("Should be a valid block hash key");
    let block = SavedBlock::deserialize(value).expect("Should be a valid block record");
    (hash, block)
}

pub struct ConfiguredBlockDatabaseBuilder {
    database: ConfiguredDatabase,
}

impl ConfiguredBlockDatabaseBuilder {
    pub fn new() -> Self {
        Self {
            database: ConfiguredDatabase::new(BLOCK_TEST_DATABASE, "blocks"),
        }
    }

    pub fn block(mut self, block: &SavedBlock) -> Self {
        self.database
            .insert(block.hash().as_bytes(), block.serialize_with_sideband());
        self
    }

    pub fn build(self) -> ConfiguredDatabase {
        self.database
    }
}

impl Default for ConfiguredBlockDatabaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
