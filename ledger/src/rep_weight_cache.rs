use std::{
    collections::HashMap,
    mem::size_of,
    sync::{
        Arc, RwLock, RwLockReadGuard,
        atomic::{AtomicBool, Ordering},
    },
};

use primitive_types::U256;

use opal_store::LedgerCache;
use opal_types::{Account, Amount, PublicKey};
use opal_utils::container_info::ContainerInfo;

/// Per-representative active weights plus two higher precision totals used
/// for consistency checking: the committed weight (balances of accounts
/// voting through each representative) and the unused weight (amounts
/// parked in pending transfers and the burn account).
#[derive(Default)]
pub struct RepWeights {
    rep_amounts: HashMap<PublicKey, Amount>,
    weight_committed: U256,
    weight_unused: U256,
}

impl RepWeights {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn weight(&self, rep: &PublicKey) -> Amount {
        self.rep_amounts.get(rep).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.rep_amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rep_amounts.is_empty()
            && self.weight_committed.is_zero()
            && self.weight_unused.is_zero()
    }

    pub fn rep_amounts(&self) -> HashMap<PublicKey, Amount> {
        self.rep_amounts.clone()
    }

    pub(crate) fn insert(&mut self, rep: PublicKey, weight: Amount) {
        self.rep_amounts.insert(rep, weight);
    }

    pub(crate) fn remove(&mut self, rep: &PublicKey) {
        self.rep_amounts.remove(rep);
    }

    pub(crate) fn add_committed(&mut self, amount: Amount) {
        self.weight_committed = self
            .weight_committed
            .overflowing_add(U256::from(amount.number()))
            .0;
        self.weight_unused = self
            .weight_unused
            .overflowing_sub(U256::from(amount.number()))
            .0;
    }

    pub(crate) fn sub_committed(&mut self, amount: Amount) {
        self.weight_committed = self
            .weight_committed
            .overflowing_sub(U256::from(amount.number()))
            .0;
        self.weight_unused = self
            .weight_unused
            .overflowing_add(U256::from(amount.number()))
            .0;
    }

    pub(crate) fn put_committed(&mut self, weight: Amount) {
        self.weight_committed = self
            .weight_committed
            .overflowing_add(U256::from(weight.number()))
            .0;
    }

    pub(crate) fn put_unused(&mut self, weight: Amount) {
        self.weight_unused = self
            .weight_unused
            .overflowing_add(U256::from(weight.number()))
            .0;
    }

    pub fn weight_committed(&self) -> Amount {
        assert!(
            self.weight_committed <= U256::from(u128::MAX),
            "committed weight exceeds the maximum amount"
        );
        Amount::raw(self.weight_committed.as_u128())
    }

    pub fn weight_unused(&self) -> Amount {
        assert!(
            self.weight_unused <= U256::from(u128::MAX),
            "unused weight exceeds the maximum amount"
        );
        Amount::raw(self.weight_unused.as_u128())
    }
}

#[derive(Default)]
pub struct BootstrapWeights {
    pub weights: HashMap<PublicKey, Amount>,
    pub max_blocks: u64,
}

/// Returns the cached vote weight for the given representative.
/// During bootstrap it returns the preconfigured bootstrap weights.
pub struct RepWeightCache {
    weights: Arc<RwLock<RepWeights>>,
    bootstrap_weights: RwLock<HashMap<PublicKey, Amount>>,
    max_blocks: u64,
    pub ledger_cache: Arc<LedgerCache>,
    check_bootstrap_weights: AtomicBool,
}

impl RepWeightCache {
    pub fn new() -> Self {
        Self {
            weights: Arc::new(RwLock::new(RepWeights::new())),
            bootstrap_weights: RwLock::new(HashMap::new()),
            max_blocks: 0,
            ledger_cache: Arc::new(LedgerCache::new()),
            check_bootstrap_weights: AtomicBool::new(false),
        }
    }

    pub fn with_bootstrap_weights(
        bootstrap_weights: BootstrapWeights,
        ledger_cache: Arc<LedgerCache>,
    ) -> Self {
        Self {
            weights: Arc::new(RwLock::new(RepWeights::new())),
            bootstrap_weights: RwLock::new(bootstrap_weights.weights),
            max_blocks: bootstrap_weights.max_blocks,
            ledger_cache,
            check_bootstrap_weights: AtomicBool::new(true),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, RepWeights> {
        self.weights.read().unwrap()
    }

    pub fn use_bootstrap_weights(&self) -> bool {
        if self.check_bootstrap_weights.load(Ordering::SeqCst) {
            if self.ledger_cache.block_count.load(Ordering::SeqCst) < self.max_blocks {
                return true;
            } else {
                self.check_bootstrap_weights.store(false, Ordering::SeqCst);
            }
        }
        false
    }

    pub fn weight(&self, rep: &PublicKey) -> Amount {
        if self.use_bootstrap_weights() {
            self.bootstrap_weights
                .read()
                .unwrap()
                .get(rep)
                .cloned()
                .unwrap_or_default()
        } else {
            self.weights.read().unwrap().weight(rep)
        }
    }

    /// Enumerated weights, without the dust representatives kept out of
    /// the cache
    pub fn rep_amounts(&self) -> HashMap<PublicKey, Amount> {
        if self.use_bootstrap_weights() {
            self.bootstrap_weights.read().unwrap().clone()
        } else {
            self.weights.read().unwrap().rep_amounts()
        }
    }

    pub fn weight_committed(&self) -> Amount {
        self.weights.read().unwrap().weight_committed()
    }

    pub fn weight_unused(&self) -> Amount {
        self.weights.read().unwrap().weight_unused()
    }

    pub fn bootstrap_weight_max_blocks(&self) -> u64 {
        self.max_blocks
    }

    pub fn bootstrap_weights(&self) -> HashMap<PublicKey, Amount> {
        self.bootstrap_weights.read().unwrap().clone()
    }

    pub fn block_count(&self) -> u64 {
        self.ledger_cache.block_count.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.weights.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.read().unwrap().is_empty()
    }

    /// Recomputes totals from the cached weights and asserts that the
    /// books balance: committed plus unused must equal the genesis amount
    /// and every cached weight must be backed by committed weight.
    pub fn verify_consistency(&self, genesis_amount: Amount, expected_burn_total: Amount) {
        let weights = self.weights.read().unwrap();

        let total = weights
            .weight_committed
            .overflowing_add(weights.weight_unused)
            .0;
        assert!(
            total == U256::from(genesis_amount.number()),
            "total weight does not match the genesis amount: {} + {} != {}",
            weights.weight_committed,
            weights.weight_unused,
            genesis_amount
        );

        let cached: U256 = weights
            .rep_amounts
            .values()
            .fold(U256::zero(), |sum, amount| {
                sum + U256::from(amount.number())
            });
        assert!(
            cached <= weights.weight_committed,
            "cached weights exceed the committed total: {} > {}",
            cached,
            weights.weight_committed
        );

        assert!(
            U256::from(expected_burn_total.number()) <= weights.weight_unused,
            "burned weight exceeds the unused total: {} > {}",
            expected_burn_total,
            weights.weight_unused
        );
    }

    pub(crate) fn inner(&self) -> Arc<RwLock<RepWeights>> {
        self.weights.clone()
    }

    pub fn container_info(&self) -> ContainerInfo {
        [("rep_weights", self.len(), size_of::<(Account, Amount)>())].into()
    }
}

impl Default for RepWeightCache {
    fn default() -> Self {
        Self::new()
    }
}
