use std::{
    net::SocketAddrV6,
    ops::{Deref, DerefMut},
    sync::{Arc, Mutex, atomic::Ordering},
    time::SystemTime,
};

use primitive_types::U256;
use tracing::{debug, info};

use opal_nullable_kv::{Environment, Transaction, WriteTransaction};
use opal_output_tracker::{OutputListenerMt, OutputTrackerMt};
use opal_store::{
    ConfiguredAccountDatabaseBuilder, ConfiguredBlockDatabaseBuilder,
    ConfiguredConfirmationHeightDatabaseBuilder, ConfiguredPeersDatabaseBuilder,
    ConfiguredPendingDatabaseBuilder, ConfiguredPrunedDatabaseBuilder,
    ConfiguredRepWeightDatabaseBuilder, STORE_VERSION_CURRENT, Store, WriteGuard, Writer,
};
use opal_types::{
    Account, AccountInfo, Amount, Block, BlockHash, BlockPriority, ConfirmationHeightInfo,
    DependentBlocks, Epoch, Link, PendingInfo, PendingKey, PublicKey, QualifiedRoot, Root,
    SavedBlock,
};
use opal_utils::{
    container_info::{ContainerInfo, ContainerInfoProvider},
    stats::{DetailType, StatType, Stats},
};

use crate::{
    BlockRollbackPerformer, BorrowingAnySet, BorrowingConfirmedSet, GenerateCacheFlags,
    LedgerConstants, LedgerSet, OwningAnySet, OwningConfirmedSet, RepWeightCache,
    RepWeightsUpdater, RepresentativeBlockFinder, RollbackError,
    block_cementer::BlockCementer,
    block_insertion::{BlockInserter, BlockValidatorFactory},
    ledger_sets::AnySet,
};

/// Result code of processing a single block. Validation failures are
/// returned to the caller and leave the ledger untouched for that block.
#[derive(PartialEq, Eq, Debug, Clone, Copy, EnumCount, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum BlockError {
    /// Signature was bad, forged or transmission error
    BadSignature,
    /// Already seen and was valid
    Old,
    /// Malicious attempt to spend a negative amount
    NegativeSpend,
    /// Malicious fork based on previous
    Fork,
    /// Source block doesn't exist, has already been received, or requires an account upgrade (epoch blocks)
    Unreceivable,
    /// Block marked as previous is unknown
    GapPrevious,
    /// Block marked as source is unknown
    GapSource,
    /// Pending blocks required for epoch open block are unknown
    GapEpochOpenPending,
    /// Block attempts to open the burn account
    OpenedBurnAccount,
    /// Balance and amount delta don't match
    BalanceMismatch,
    /// Representative is changed when it is not allowed
    RepresentativeMismatch,
    /// This block cannot follow the previous block
    BlockPosition,
    /// Insufficient work for this block, even though it passed the minimal validation
    InsufficientWork,
    /// Block is malformed and could not be interpreted
    Invalid,
}

impl BlockError {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockError::BadSignature => "Bad signature",
            BlockError::Old => "Old",
            BlockError::NegativeSpend => "Negative spend",
            BlockError::Fork => "Fork",
            BlockError::Unreceivable => "Unreceivable",
            BlockError::GapPrevious => "Gap previous",
            BlockError::GapSource => "Gap source",
            BlockError::GapEpochOpenPending => "Gap epoch open pending",
            BlockError::OpenedBurnAccount => "Opened burn account",
            BlockError::BalanceMismatch => "Balance mismatch",
            BlockError::RepresentativeMismatch => "Representative mismatch",
            BlockError::BlockPosition => "Block position",
            BlockError::InsufficientWork => "Insufficient work",
            BlockError::Invalid => "Invalid",
        }
    }
}

/// The account-chain ledger engine. Validates, applies, rolls back,
/// confirms and queries the per-account chains.
pub struct Ledger {
    pub store: Store,
    pub rep_weights_updater: RepWeightsUpdater,
    pub rep_weights: Arc<RepWeightCache>,
    pub constants: LedgerConstants,
    pub(crate) stats: Arc<Stats>,
    rollback_listener: OutputListenerMt<BlockHash>,
    store_version: i32,
    max_backlog_size: u64,
    max_rollback_depth: usize,
}

pub struct NullLedgerBuilder {
    blocks: ConfiguredBlockDatabaseBuilder,
    accounts: ConfiguredAccountDatabaseBuilder,
    pending: ConfiguredPendingDatabaseBuilder,
    pruned: ConfiguredPrunedDatabaseBuilder,
    peers: ConfiguredPeersDatabaseBuilder,
    confirmation_height: ConfiguredConfirmationHeightDatabaseBuilder,
    rep_weights: Vec<(PublicKey, Amount)>,
    min_rep_weight: Amount,
    max_rollback_depth: usize,
}

impl NullLedgerBuilder {
    fn new() -> Self {
        Self {
            blocks: ConfiguredBlockDatabaseBuilder::new(),
            accounts: ConfiguredAccountDatabaseBuilder::new(),
            pending: ConfiguredPendingDatabaseBuilder::new(),
            pruned: ConfiguredPrunedDatabaseBuilder::new(),
            peers: ConfiguredPeersDatabaseBuilder::new(),
            confirmation_height: ConfiguredConfirmationHeightDatabaseBuilder::new(),
            rep_weights: Vec::new(),
            min_rep_weight: Amount::ZERO,
            max_rollback_depth: 4096,
        }
    }

    pub fn max_rollback_depth(mut self, depth: usize) -> Self {
        self.max_rollback_depth = depth;
        self
    }

    pub fn block(mut self, block: &SavedBlock) -> Self {
        self.blocks = self.blocks.block(block);
        self
    }

    pub fn blocks<'a>(mut self, blocks: impl IntoIterator<Item = &'a SavedBlock>) -> Self {
        for b in blocks.into_iter() {
            self.blocks = self.blocks.block(b);
        }
        self
    }

    pub fn peers(mut self, peers: impl IntoIterator<Item = (SocketAddrV6, SystemTime)>) -> Self {
        for (peer, time) in peers.into_iter() {
            self.peers = self.peers.peer(peer, time)
        }
        self
    }

    pub fn confirmation_height(mut self, account: &Account, info: &ConfirmationHeightInfo) -> Self {
        self.confirmation_height = self.confirmation_height.height(account, info);
        self
    }

    /// Configures the account entry and mirrors its balance into the
    /// rep weight table so that the seeded store is consistent
    pub fn account_info(mut self, account: &Account, info: &AccountInfo) -> Self {
        self.accounts = self.accounts.account(account, info);
        if !info.balance.is_zero() {
            self.rep_weights.push((info.representative, info.balance));
        }
        self
    }

    pub fn pending(mut self, key: &PendingKey, info: &PendingInfo) -> Self {
        self.pending = self.pending.pending(key, info);
        self
    }

    pub fn pruned(mut self, hash: &BlockHash) -> Self {
        self.pruned = self.pruned.pruned(hash);
        self
    }

    pub fn finish(self) -> Ledger {
        let mut merged_weights: Vec<(PublicKey, Amount)> = Vec::new();
        for (rep, weight) in self.rep_weights {
            match merged_weights.iter_mut().find(|(r, _)| *r == rep) {
                Some((_, total)) => *total += weight,
                None => merged_weights.push((rep, weight)),
            }
        }

        let env = Environment::new_null_with_data(vec![
            self.blocks.build(),
            self.accounts.build(),
            self.pending.build(),
            self.pruned.build(),
            self.confirmation_height.build(),
            self.peers.build(),
            ConfiguredRepWeightDatabaseBuilder::create(merged_weights),
        ]);

        Ledger::with_cache_flags(
            env,
            LedgerConstants::unit_test(),
            self.min_rep_weight,
            Arc::new(RepWeightCache::new()),
            Arc::new(Stats::default()),
            1,
            &GenerateCacheFlags::new(),
            0,
            self.max_rollback_depth,
        )
        .unwrap()
    }
}

impl Ledger {
    pub fn new_null() -> Self {
        Self::new(
            Environment::new_null(),
            LedgerConstants::unit_test(),
            Amount::ZERO,
            Arc::new(RepWeightCache::new()),
            Arc::new(Stats::default()),
            1,
        )
        .unwrap()
    }

    pub fn new_null_builder() -> NullLedgerBuilder {
        NullLedgerBuilder::new()
    }

    pub(crate) fn new(
        env: Environment,
        constants: LedgerConstants,
        min_rep_weight: Amount,
        rep_weights: Arc<RepWeightCache>,
        stats: Arc<Stats>,
        thread_count: usize,
    ) -> anyhow::Result<Self> {
        Self::with_cache_flags(
            env,
            constants,
            min_rep_weight,
            rep_weights,
            stats,
            thread_count,
            &GenerateCacheFlags::new(),
            0,
            4096,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn with_cache_flags(
        env: Environment,
        constants: LedgerConstants,
        min_rep_weight: Amount,
        rep_weights: Arc<RepWeightCache>,
        stats: Arc<Stats>,
        thread_count: usize,
        generate_cache: &GenerateCacheFlags,
        max_backlog_size: u64,
        max_rollback_depth: usize,
    ) -> anyhow::Result<Self> {
        let mut store = Store::new(env)?;
        store.cache = rep_weights.ledger_cache.clone();

        let rep_weights_updater =
            RepWeightsUpdater::new(store.rep_weight.clone(), min_rep_weight, &rep_weights);

        let mut ledger = Self {
            rep_weights,
            rep_weights_updater,
            store,
            constants,
            stats,
            rollback_listener: Default::default(),
            store_version: 0,
            max_backlog_size,
            max_rollback_depth,
        };

        ledger.initialize(thread_count, generate_cache)?;

        Ok(ledger)
    }

    fn initialize(
        &mut self,
        thread_count: usize,
        generate_cache: &GenerateCacheFlags,
    ) -> anyhow::Result<()> {
        info!("Loading ledger, this may take a while...");

        {
            let txn = self.store.begin_read();
            if self.store.account.iter(&txn).next().is_none() {
                info!("Initializing ledger with the genesis block");
                let mut txn = self.store.begin_write();
                self.add_genesis_block(&mut txn);
                txn.commit();
            }
        }

        {
            let txn = self.store.begin_read();
            self.store_version = self
                .store
                .version
                .get(&txn)
                .unwrap_or(STORE_VERSION_CURRENT);
            ensure!(
                self.store_version >= opal_store::STORE_VERSION_MINIMUM,
                "store version {} is too old",
                self.store_version
            );
        }

        if generate_cache.account_count || generate_cache.block_count {
            self.store
                .account
                .for_each_par(&self.store.env, thread_count, |iter| {
                    let mut block_count = 0;
                    let mut account_count = 0;

                    for (_, info) in iter {
                        block_count += info.block_count;
                        account_count += 1;
                    }
                    self.store
                        .cache
                        .block_count
                        .fetch_add(block_count, Ordering::SeqCst);

                    self.store
                        .cache
                        .account_count
                        .fetch_add(account_count, Ordering::SeqCst);
                });
        }

        if generate_cache.cemented_count {
            self.store
                .confirmation_height
                .for_each_par(&self.store.env, thread_count, |iter| {
                    let mut cemented_count = 0;
                    for (_, info) in iter {
                        cemented_count += info.height;
                    }
                    self.store
                        .cache
                        .cemented_count
                        .fetch_add(cemented_count, Ordering::SeqCst);
                });
        }

        {
            let txn = self.store.begin_read();
            let pruned_count = self.store.pruned.count(&txn);
            self.store
                .cache
                .pruned_count
                .store(pruned_count, Ordering::SeqCst);
        }

        if generate_cache.reps {
            self.store
                .rep_weight
                .for_each_par(&self.store.env, thread_count, |iter| {
                    for (representative, weight) in iter {
                        self.rep_weights_updater.put(representative, weight);
                    }
                });

            self.store
                .pending
                .for_each_par(&self.store.env, thread_count, |iter| {
                    for (_, info) in iter {
                        self.rep_weights_updater.put_unused(info.amount);
                    }
                });
        }

        if generate_cache.consistency_check {
            self.verify_balance_consistency(thread_count);
        }

        debug!(
            block_count = self.block_count(),
            cemented_count = self.cemented_count(),
            account_count = self.account_count(),
            pruned_count = self.pruned_count(),
            representatives = self.rep_weights.len(),
            "Ledger loaded"
        );

        Ok(())
    }

    /// Recomputes all balance sums and asserts the ledger invariants:
    /// account balances plus pending amounts equal the genesis amount,
    /// committed weights equal the active balances and unused weights
    /// equal the pending amounts including the burned ones.
    pub fn verify_balance_consistency(&self, thread_count: usize) {
        info!("Verifying ledger balance consistency...");

        let active_balance = Mutex::new(U256::zero());
        let pending_balance = Mutex::new(U256::zero());
        let burned_balance = Mutex::new(U256::zero());

        self.store
            .account
            .for_each_par(&self.store.env, thread_count, |iter| {
                let mut balance = U256::zero();
                for (account, info) in iter {
                    assert!(
                        account != self.constants.burn_account,
                        "the burn account must never be opened"
                    );
                    balance += U256::from(info.balance.number());
                }
                *active_balance.lock().unwrap() += balance;
            });

        self.store
            .pending
            .for_each_par(&self.store.env, thread_count, |iter| {
                let mut balance = U256::zero();
                let mut burned = U256::zero();
                for (key, info) in iter {
                    if key.receiving_account == self.constants.burn_account {
                        burned += U256::from(info.amount.number());
                    } else {
                        balance += U256::from(info.amount.number());
                    }
                }
                *pending_balance.lock().unwrap() += balance;
                *burned_balance.lock().unwrap() += burned;
            });

        let active = *active_balance.lock().unwrap();
        let pending = *pending_balance.lock().unwrap();
        let burned = *burned_balance.lock().unwrap();

        let genesis = U256::from(self.constants.genesis_amount.number());
        assert!(
            active + pending + burned == genesis,
            "ledger corruption detected: {} + {} + {} != {}",
            active,
            pending,
            burned,
            genesis
        );
        assert!(
            active == U256::from(self.rep_weights.weight_committed().number()),
            "active balance does not match the committed representative weights"
        );
        assert!(
            pending + burned == U256::from(self.rep_weights.weight_unused().number()),
            "pending balance does not match the unused representative weights"
        );

        self.rep_weights.verify_consistency(
            self.constants.genesis_amount,
            Amount::raw(burned.as_u128()),
        );

        info!("Ledger balance consistency verified");
    }

    fn add_genesis_block(&self, txn: &mut WriteTransaction) {
        let genesis = &self.constants.genesis_block;
        let genesis_hash = genesis.hash();
        let genesis_account = self.constants.genesis_account;

        self.store.block.put(txn, genesis);

        self.store.confirmation_height.put(
            txn,
            &genesis_account,
            &ConfirmationHeightInfo::new(1, genesis_hash),
        );

        self.store.account.put(
            txn,
            &genesis_account,
            &AccountInfo {
                head: genesis_hash,
                representative: genesis_account.into(),
                open_block: genesis_hash,
                balance: self.constants.genesis_amount,
                modified: genesis.timestamp(),
                block_count: 1,
                epoch: Epoch::Epoch0,
            },
        );

        self.store
            .rep_weight
            .put(txn, genesis_account.into(), self.constants.genesis_amount);

        self.store.version.put(txn, STORE_VERSION_CURRENT);
    }

    pub fn any(&self) -> OwningAnySet<'_> {
        OwningAnySet::new(&self.store, &self.constants)
    }

    pub fn confirmed(&self) -> OwningConfirmedSet<'_> {
        let tx = self.store.begin_read();
        OwningConfirmedSet::new(&self.store, tx)
    }

    fn begin_write_queued(&self, writer: Writer) -> (WriteGuard<'_>, WriteTransaction) {
        let guard = self.store.write_queue.wait(writer);
        (guard, self.store.begin_write())
    }

    pub fn process_one(&self, block: &Block) -> Result<SavedBlock, BlockError> {
        self.process_batch(std::iter::once(block))
            .pop()
            .expect("one result per processed block")
    }

    /// Validates and applies a batch of blocks under a single write
    /// transaction in the block processing lane
    pub fn process_batch<'a>(
        &self,
        batch: impl IntoIterator<Item = &'a Block>,
    ) -> Vec<Result<SavedBlock, BlockError>> {
        let mut results = Vec::new();
        {
            let (_guard, mut txn) = self.begin_write_queued(Writer::ProcessBatch);
            for block in batch {
                results.push(self.process_single(&mut txn, block));
            }
            txn.commit();
        }
        results
    }

    fn process_single(
        &self,
        txn: &mut WriteTransaction,
        block: &Block,
    ) -> Result<SavedBlock, BlockError> {
        let instructions = {
            let any = BorrowingAnySet::new(&self.store, txn, &self.constants);
            BlockValidatorFactory::new(&any, &self.constants, block)
                .create_validator()
                .validate()?
        };

        let saved_block = BlockInserter::new(self, txn, block, &instructions).insert();

        let detail = match block {
            Block::LegacySend(_) => DetailType::Send,
            Block::LegacyReceive(_) => DetailType::Receive,
            Block::LegacyOpen(_) => DetailType::Open,
            Block::LegacyChange(_) => DetailType::Change,
            Block::State(_) => {
                if instructions.is_epoch_block {
                    DetailType::EpochBlock
                } else {
                    DetailType::StateBlock
                }
            }
        };
        self.stats.inc(StatType::Ledger, detail);

        Ok(saved_block)
    }

    pub fn track_rollbacks(&self) -> Arc<OutputTrackerMt<BlockHash>> {
        self.rollback_listener.track()
    }

    /// Rollback blocks until `block` doesn't exist or it tries to
    /// penetrate the confirmation height. Cascades into receiving
    /// accounts. The returned list is in LIFO order. On error nothing is
    /// committed.
    pub fn roll_back(&self, block: &BlockHash) -> Result<Vec<SavedBlock>, RollbackError> {
        self.rollback_listener.emit(*block);

        let (_guard, mut txn) = self.begin_write_queued(Writer::Rollback);
        match self.roll_back_with_txn(&mut txn, block) {
            Ok(rolled_back) => {
                txn.commit();
                self.stats.add(
                    StatType::Rollback,
                    DetailType::All,
                    rolled_back.len() as u64,
                );
                Ok(rolled_back)
            }
            Err(e) => {
                self.stats.inc(StatType::Rollback, DetailType::RollbackFailed);
                Err(e)
            }
        }
    }

    /// Rolls back under the caller's transaction. Partially performed
    /// work stays in the transaction even on error, the caller decides
    /// whether to commit or discard it.
    pub fn roll_back_with_txn(
        &self,
        txn: &mut WriteTransaction,
        block: &BlockHash,
    ) -> Result<Vec<SavedBlock>, RollbackError> {
        let mut performer = BlockRollbackPerformer::new(self, txn, self.max_rollback_depth);
        performer.roll_back(block)?;
        Ok(performer.rolled_back)
    }

    /// Rolls back multiple targets, skipping the ones the given predicate
    /// rejects. Used by external backlog management.
    pub fn roll_back_batch<'a, T, F>(
        &self,
        targets: T,
        max_rollbacks: usize,
        mut can_roll_back: F,
    ) -> RollbackResults
    where
        T: IntoIterator<Item = &'a BlockHash>,
        F: FnMut(&BlockHash) -> bool,
    {
        let mut rolled_back_count = 0;
        let mut results = RollbackResults::new();
        {
            let (_guard, mut txn) = self.begin_write_queued(Writer::Rollback);

            for hash in targets {
                // The block may be in use by another component, this is
                // checked while holding the exclusive write lane
                if !can_roll_back(hash) {
                    results.push(RollbackResult {
                        target_hash: *hash,
                        target_root: QualifiedRoot::ZERO,
                        rolled_back: Vec::new(),
                        error: Some(RollbackError::Rejected),
                    });
                    continue;
                }

                if let Some(block) = self.store.block.get(&txn, hash) {
                    debug!(
                        "Rolling back: {}, account: {}",
                        hash,
                        block.account().encode_account()
                    );

                    let mut performer =
                        BlockRollbackPerformer::new(self, &mut txn, self.max_rollback_depth);
                    let error = performer.roll_back(hash).err();
                    let rollback_list = performer.rolled_back;

                    if error.is_some() {
                        self.stats
                            .inc(StatType::Rollback, DetailType::RollbackFailed);
                    }

                    rolled_back_count += rollback_list.len();
                    results.push(RollbackResult {
                        target_hash: *hash,
                        target_root: block.qualified_root(),
                        rolled_back: rollback_list,
                        error,
                    });

                    if rolled_back_count >= max_rollbacks {
                        break;
                    }
                } else {
                    rolled_back_count += 1;
                    results.push(RollbackResult {
                        target_hash: *hash,
                        target_root: QualifiedRoot::ZERO,
                        rolled_back: Vec::new(),
                        error: Some(RollbackError::BlockNotFound),
                    });
                }
            }
            txn.commit();
        }

        results
    }

    /// Cements the given block and its uncemented dependencies
    pub fn confirm(&self, hash: BlockHash) -> Vec<SavedBlock> {
        self.confirm_max(hash, 1024 * 128)
    }

    /// Both stack and result set are bounded to limit maximum memory
    /// usage. Callers must check that the target block was confirmed, and
    /// if not, call this function again.
    pub fn confirm_max(&self, target_hash: BlockHash, max_blocks: usize) -> Vec<SavedBlock> {
        let (_guard, txn) = self.begin_write_queued(Writer::ConfirmationHeight);
        let (txn, blocks) = BlockCementer::new(&self.store, &self.constants, &self.stats).confirm(
            txn,
            target_hash,
            max_blocks,
        );
        txn.commit();
        blocks
    }

    /// Drops the bodies of a cemented chain, walking from `hash` towards
    /// the open block, and records the hashes as pruned. Commits and
    /// renews the transaction every `batch_size` deletions.
    pub fn pruning_action(
        &self,
        mut txn: WriteTransaction,
        hash: &BlockHash,
        batch_size: u64,
    ) -> (WriteTransaction, u64) {
        let mut pruned_count = 0;
        let mut hash = *hash;
        let genesis_hash = self.constants.genesis_block.hash();

        while !hash.is_zero() && hash != genesis_hash {
            if let Some(block) = self.store.block.get(&txn, &hash) {
                assert!(
                    BorrowingConfirmedSet::new(&self.store, &txn).block_exists(&hash),
                    "only confirmed blocks can be pruned: {}",
                    hash
                );
                self.store.block.del(&mut txn, &hash);
                self.store.pruned.put(&mut txn, &hash);
                hash = block.previous();
                pruned_count += 1;
                self.store
                    .cache
                    .pruned_count
                    .fetch_add(1, Ordering::SeqCst);
                if pruned_count % batch_size == 0 {
                    txn = self.store.env.refresh(txn);
                }
            } else if self.store.pruned.exists(&txn, &hash) {
                hash = BlockHash::ZERO;
            } else {
                panic!("error finding block for pruning: {}", hash);
            }
        }

        self.stats
            .add(StatType::Pruning, DetailType::PrunedCount, pruned_count);

        (txn, pruned_count)
    }

    /// Blocks whose confirmation is a precondition for confirming this one
    pub fn dependent_blocks(&self, block: &SavedBlock) -> DependentBlocks {
        self.any().dependent_blocks(block)
    }

    pub fn dependents_confirmed(&self, block: &SavedBlock) -> bool {
        self.any().dependents_confirmed(block)
    }

    pub fn block_priority(&self, block: &SavedBlock) -> BlockPriority {
        self.any().block_priority(block)
    }

    /// Walks predecessors until a block that names the account's current
    /// representative is found
    pub fn representative_block(&self, hash: &BlockHash) -> BlockHash {
        let txn = self.store.begin_read();
        RepresentativeBlockFinder::new(&txn, &self.store).find_rep_block(*hash)
    }

    pub fn unconfirmed_exists(&self, hash: &BlockHash) -> bool {
        let txn = self.store.begin_read();
        let any = BorrowingAnySet::new(&self.store, &txn, &self.constants);
        any.block_exists(hash) && !any.confirmed().block_exists(hash)
    }

    pub fn bootstrap_weight_max_blocks(&self) -> u64 {
        self.rep_weights.bootstrap_weight_max_blocks()
    }

    pub fn bootstrap_height_reached(&self) -> bool {
        self.block_count() >= self.bootstrap_weight_max_blocks()
    }

    /// Returns the cached vote weight for the given representative.
    /// If the weight is below the cache limit it returns 0.
    /// During bootstrap it returns the preconfigured bootstrap weights.
    pub fn weight(&self, rep: &PublicKey) -> Amount {
        self.rep_weights.weight(rep)
    }

    /// Returns the exact vote weight by doing a database lookup
    pub fn weight_exact(&self, rep: &PublicKey) -> Amount {
        self.any().weight_exact(*rep)
    }

    pub fn rep_weights_snapshot(&self) -> std::collections::HashMap<PublicKey, Amount> {
        self.rep_weights.rep_amounts()
    }

    pub fn is_epoch_link(&self, link: &Link) -> bool {
        self.constants.epochs.is_epoch_link(link)
    }

    pub fn epoch_signer(&self, link: &Link) -> Option<Account> {
        self.constants.epochs.epoch_signer(link)
    }

    pub fn epoch_link(&self, epoch: Epoch) -> Option<Link> {
        self.constants.epochs.link(epoch).cloned()
    }

    pub(crate) fn update_account(
        &self,
        txn: &mut WriteTransaction,
        account: &Account,
        old_info: &AccountInfo,
        new_info: &AccountInfo,
    ) {
        if !new_info.head.is_zero() {
            if old_info.head.is_zero() && new_info.open_block == new_info.head {
                self.store
                    .cache
                    .account_count
                    .fetch_add(1, Ordering::SeqCst);
            }
            self.store.account.put(txn, account, new_info);
        } else {
            debug_assert!(!self.store.confirmation_height.exists(txn, account));
            self.store.account.del(txn, account);
            debug_assert!(self.store.cache.account_count.load(Ordering::SeqCst) > 0);
            self.store
                .cache
                .account_count
                .fetch_sub(1, Ordering::SeqCst);
        }
    }

    pub fn block_count(&self) -> u64 {
        self.store.cache.block_count.load(Ordering::SeqCst)
    }

    pub fn cemented_count(&self) -> u64 {
        self.store.cache.cemented_count.load(Ordering::SeqCst)
    }

    pub fn account_count(&self) -> u64 {
        self.store.cache.account_count.load(Ordering::SeqCst)
    }

    pub fn pruned_count(&self) -> u64 {
        self.store.cache.pruned_count.load(Ordering::SeqCst)
    }

    /// Number of blocks that are not yet cemented
    pub fn backlog_size(&self) -> u64 {
        let blocks = self.block_count();
        let cemented = self.cemented_count();
        blocks.saturating_sub(cemented)
    }

    /// Soft bound for the unconfirmed block count. While the cemented
    /// count is below the bootstrap weight block count an allowance is
    /// added so that bootstrapping does not immediately roll blocks back.
    pub fn max_backlog(&self) -> u64 {
        if self.max_backlog_size == 0 {
            return 0; // Unlimited backlog
        }

        let cemented = self.cemented_count();
        let max_bootstrap_count = self.bootstrap_weight_max_blocks();

        if cemented >= max_bootstrap_count {
            self.max_backlog_size
        } else {
            let allowed_backlog = max_bootstrap_count - cemented;
            allowed_backlog.max(self.max_backlog_size)
        }
    }

    pub fn genesis(&self) -> &SavedBlock {
        &self.constants.genesis_block
    }

    pub fn version(&self) -> i32 {
        self.store_version
    }
}

impl Drop for Ledger {
    fn drop(&mut self) {
        self.store.env.sync().expect("sync failed");
    }
}

impl ContainerInfoProvider for Ledger {
    fn container_info(&self) -> ContainerInfo {
        ContainerInfo::builder()
            .node("rep_weights", self.rep_weights.container_info())
            .finish()
    }
}

#[derive(Clone, Default)]
pub struct RollbackResults(Vec<RollbackResult>);

impl Deref for RollbackResults {
    type Target = Vec<RollbackResult>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for RollbackResults {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl RollbackResults {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn affected_accounts(&self) -> impl Iterator<Item = Account> + use<'_> {
        self.iter().flat_map(|i| i.affected_accounts())
    }

    pub fn hashes(&self) -> impl Iterator<Item = BlockHash> + use<'_> {
        self.iter().flat_map(|i| i.hashes())
    }

    pub fn roots(&self) -> impl Iterator<Item = Root> + use<'_> {
        self.iter().flat_map(|i| i.roots())
    }
}

#[derive(Clone)]
pub struct RollbackResult {
    pub target_hash: BlockHash,
    pub target_root: QualifiedRoot,
    pub rolled_back: Vec<SavedBlock>,
    pub error: Option<RollbackError>,
}

impl RollbackResult {
    pub fn affected_accounts(&self) -> impl Iterator<Item = Account> + use<'_> {
        self.rolled_back.iter().map(|b| b.account())
    }

    pub fn hashes(&self) -> impl Iterator<Item = BlockHash> + use<'_> {
        self.rolled_back.iter().map(|b| b.hash())
    }

    pub fn roots(&self) -> impl Iterator<Item = Root> + use<'_> {
        self.rolled_back.iter().map(|b| b.root())
    }
}
