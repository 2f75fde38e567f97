use std::sync::{Arc, RwLock};

use opal_nullable_kv::WriteTransaction;
use opal_store::RepWeightStore;
use opal_types::{Amount, PublicKey};

use crate::{RepWeightCache, RepWeights};

/// Applies representative weight changes to the durable table and the
/// in-memory cache within the same write transaction
pub struct RepWeightsUpdater {
    weight_cache: Arc<RwLock<RepWeights>>,
    store: Arc<RepWeightStore>,
    min_weight: Amount,
}

impl RepWeightsUpdater {
    pub fn new(store: Arc<RepWeightStore>, min_weight: Amount, cache: &RepWeightCache) -> Self {
        RepWeightsUpdater {
            weight_cache: cache.inner(),
            store,
            min_weight,
        }
    }

    /// Only use this method when loading committed weights from the
    /// database table
    pub fn put(&self, representative: PublicKey, weight: Amount) {
        let mut guard = self.weight_cache.write().unwrap();
        let previous = guard.weight(&representative);
        let new_weight = previous
            .checked_add(weight)
            .expect("loaded representative weight overflow");
        self.put_cache(&mut guard, representative, new_weight);
        guard.put_committed(weight);
    }

    /// Only use this method when loading the pending table
    pub fn put_unused(&self, weight: Amount) {
        self.weight_cache.write().unwrap().put_unused(weight);
    }

    /// Adds committed weight to the representative, taking it from the
    /// unused pool
    pub fn add(&self, txn: &mut WriteTransaction, representative: PublicKey, amount: Amount) {
        let previous_weight = self.store.get(txn, &representative).unwrap_or_default();
        let new_weight = previous_weight
            .checked_add(amount)
            .expect("representative weight overflow");
        self.put_store(txn, representative, previous_weight, new_weight);

        let mut guard = self.weight_cache.write().unwrap();
        self.put_cache(&mut guard, representative, new_weight);
        guard.add_committed(amount);
    }

    /// Removes committed weight from the representative, returning it to
    /// the unused pool
    pub fn sub(&self, txn: &mut WriteTransaction, representative: PublicKey, amount: Amount) {
        let previous_weight = self.store.get(txn, &representative).unwrap_or_default();
        let new_weight = previous_weight
            .checked_sub(amount)
            .expect("representative weight underflow");
        self.put_store(txn, representative, previous_weight, new_weight);

        let mut guard = self.weight_cache.write().unwrap();
        self.put_cache(&mut guard, representative, new_weight);
        guard.sub_committed(amount);
    }

    /// Moves committed weight from one representative to another
    pub fn move_weight(
        &self,
        txn: &mut WriteTransaction,
        source_rep: PublicKey,
        dest_rep: PublicKey,
        amount: Amount,
    ) {
        if source_rep == dest_rep {
            return;
        }

        let previous_weight_source = self.store.get(txn, &source_rep).unwrap_or_default();
        let previous_weight_dest = self.store.get(txn, &dest_rep).unwrap_or_default();

        let new_weight_source = previous_weight_source
            .checked_sub(amount)
            .expect("source representative has not enough weight to move");
        let new_weight_dest = previous_weight_dest
            .checked_add(amount)
            .expect("destination representative weight overflow");

        self.put_store(txn, source_rep, previous_weight_source, new_weight_source);
        self.put_store(txn, dest_rep, previous_weight_dest, new_weight_dest);

        let mut guard = self.weight_cache.write().unwrap();
        self.put_cache(&mut guard, source_rep, new_weight_source);
        self.put_cache(&mut guard, dest_rep, new_weight_dest);
    }

    /// Moves weight between representatives while applying a balance
    /// delta in the same step. Used when a single block both changes the
    /// representative and the balance.
    pub fn move_add_sub(
        &self,
        txn: &mut WriteTransaction,
        source_rep: PublicKey,
        amount_source: Amount,
        dest_rep: PublicKey,
        amount_dest: Amount,
    ) {
        if amount_source == amount_dest {
            self.move_weight(txn, source_rep, dest_rep, amount_source);
        } else if amount_dest > amount_source {
            self.move_weight(txn, source_rep, dest_rep, amount_source);
            self.add(txn, dest_rep, amount_dest - amount_source);
        } else {
            self.move_weight(txn, source_rep, dest_rep, amount_dest);
            self.sub(txn, source_rep, amount_source - amount_dest);
        }
    }

    fn put_cache(
        &self,
        weights: &mut RepWeights,
        representative: PublicKey,
        new_weight: Amount,
    ) {
        if new_weight < self.min_weight || new_weight.is_zero() {
            weights.remove(&representative);
        } else {
            weights.insert(representative, new_weight);
        }
    }

    fn put_store(
        &self,
        txn: &mut WriteTransaction,
        representative: PublicKey,
        previous_weight: Amount,
        new_weight: Amount,
    ) {
        if new_weight.is_zero() {
            if !previous_weight.is_zero() {
                self.store.del(txn, &representative);
            }
        } else {
            self.store.put(txn, representative, new_weight);
        }
    }
}
