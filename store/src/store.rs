use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use opal_nullable_kv::{Environment, ReadTransaction, WriteTransaction};

use crate::{
    AccountStore, BlockStore, ConfirmationHeightStore, FinalVoteStore, OnlineWeightStore,
    PeerStore, PendingStore, PrunedStore, RepWeightStore, VersionStore, WriteQueue,
};

/// Atomic counters that mirror table sizes. Updated inside write
/// transactions, eventually consistent with the store.
pub struct LedgerCache {
    pub block_count: AtomicU64,
    pub cemented_count: AtomicU64,
    pub account_count: AtomicU64,
    pub pruned_count: AtomicU64,
}

impl LedgerCache {
    pub fn new() -> Self {
        Self {
            block_count: AtomicU64::new(0),
            cemented_count: AtomicU64::new(0),
            account_count: AtomicU64::new(0),
            pruned_count: AtomicU64::new(0),
        }
    }

    pub fn reset(&self) {
        self.block_count.store(0, Ordering::SeqCst);
        self.cemented_count.store(0, Ordering::SeqCst);
        self.account_count.store(0, Ordering::SeqCst);
        self.pruned_count.store(0, Ordering::SeqCst);
    }
}

impl Default for LedgerCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Bundles the environment with one typed handle per table
pub struct Store {
    pub env: Environment,
    pub cache: Arc<LedgerCache>,
    pub write_queue: WriteQueue,
    pub block: BlockStore,
    pub account: AccountStore,
    pub pending: PendingStore,
    pub pruned: PrunedStore,
    pub rep_weight: Arc<RepWeightStore>,
    pub confirmation_height: ConfirmationHeightStore,
    pub final_vote: FinalVoteStore,
    pub online_weight: OnlineWeightStore,
    pub peer: PeerStore,
    pub version: VersionStore,
}

impl Store {
    pub fn new_null() -> Self {
        Self::new(Environment::new_null()).unwrap()
    }

    pub fn new(env: Environment) -> anyhow::Result<Self> {
        Ok(Self {
            cache: Arc::new(LedgerCache::new()),
            write_queue: WriteQueue::new(),
            block: BlockStore::new(&env)?,
            account: AccountStore::new(&env)?,
            pending: PendingStore::new(&env)?,
            pruned: PrunedStore::new(&env)?,
            rep_weight: Arc::new(RepWeightStore::new(&env)?),
            confirmation_height: ConfirmationHeightStore::new(&env)?,
            final_vote: FinalVoteStore::new(&env)?,
            online_weight: OnlineWeightStore::new(&env)?,
            peer: PeerStore::new(&env)?,
            version: VersionStore::new(&env)?,
            env,
        })
    }

    pub fn begin_read(&self) -> ReadTransaction {
        self.env.begin_read()
    }

    pub fn begin_write(&self) -> WriteTransaction {
        self.env.begin_write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opal_nullable_kv::{Backend, EnvironmentFactory, EnvironmentOptions};

    #[test]
    fn create_store_on_nulled_environment() {
        let options = EnvironmentOptions {
            backend: Backend::Lmdb,
            max_dbs: 100,
            map_size: 1024,
            path: "/nulled/store.ldb".into(),
            tables: crate::TABLE_NAMES.to_vec(),
        };
        let env = EnvironmentFactory::new_null().create(options).unwrap();
        let _ = Store::new(env).unwrap();
    }
}
