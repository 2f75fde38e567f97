use std::{collections::VecDeque, sync::atomic::Ordering};

use opal_nullable_kv::{Transaction, WriteTransaction};
use opal_store::Store;
use opal_types::{BlockHash, ConfirmationHeightInfo, SavedBlock};
use opal_utils::stats::{DetailType, StatType, Stats};

use crate::LedgerConstants;

/// Cements blocks in the ledger by walking a block's dependency tree with
/// a bounded stack and committing confirmation heights in topological
/// order
pub(crate) struct BlockCementer<'a> {
    constants: &'a LedgerConstants,
    store: &'a Store,
    stats: &'a Stats,
}

impl<'a> BlockCementer<'a> {
    pub(crate) fn new(store: &'a Store, constants: &'a LedgerConstants, stats: &'a Stats) -> Self {
        Self {
            store,
            constants,
            stats,
        }
    }

    pub(crate) fn confirm(
        &self,
        mut txn: WriteTransaction,
        target_hash: BlockHash,
        max_blocks: usize,
    ) -> (WriteTransaction, Vec<SavedBlock>) {
        let mut result = Vec::new();

        let mut stack = VecDeque::new();
        stack.push_back(target_hash);
        while let Some(&hash) = stack.back() {
            let Some(block) = self.store.block.get(&txn, &hash) else {
                // Pruned dependency, nothing left to cement below it
                stack.pop_back();
                continue;
            };

            let dependents = block
                .dependent_blocks(&self.constants.epochs, &self.constants.genesis_account);
            for dependent in dependents.iter() {
                if !self.is_confirmed_or_pruned(&txn, dependent) {
                    self.stats.inc(
                        StatType::ConfirmationHeight,
                        DetailType::DependentUnconfirmed,
                    );

                    stack.push_back(*dependent);

                    // Limit the stack size to avoid excessive memory usage
                    // This will forget the bottom of the dependency tree
                    if stack.len() > max_blocks {
                        stack.pop_front();
                    }
                }
            }

            if stack.back() == Some(&hash) {
                stack.pop_back();
                if !self.is_confirmed_or_pruned(&txn, &hash) {
                    // We must only confirm blocks that have their
                    // dependencies confirmed

                    let conf_height = ConfirmationHeightInfo::new(block.height(), block.hash());

                    self.store
                        .confirmation_height
                        .put(&mut txn, &block.account(), &conf_height);
                    self.store
                        .cache
                        .cemented_count
                        .fetch_add(1, Ordering::SeqCst);

                    self.stats
                        .inc(StatType::ConfirmationHeight, DetailType::BlocksConfirmed);

                    result.push(block);
                }
            } else {
                // Unconfirmed dependencies were added
            }

            // Refresh the transaction to avoid long-running transactions.
            // Ensure that the block wasn't rolled back during the refresh.
            if txn.is_refresh_needed() {
                txn = self.store.env.refresh(txn);
                if !self.store.block.exists(&txn, &target_hash) {
                    break; // Block was rolled back during cementing
                }
            }

            // Early return might leave parts of the dependency tree
            // unconfirmed
            if result.len() >= max_blocks {
                break;
            }
        }
        (txn, result)
    }

    fn is_confirmed_or_pruned(&self, tx: &WriteTransaction, hash: &BlockHash) -> bool {
        if self.store.pruned.exists(tx, hash) {
            return true;
        }
        let Some(block) = self.store.block.get(tx, hash) else {
            return false;
        };
        let Some(info) = self.store.confirmation_height.get(tx, &block.account()) else {
            return false;
        };

        block.height() <= info.height
    }
}
