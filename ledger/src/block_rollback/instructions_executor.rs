use std::sync::atomic::Ordering;

use opal_nullable_kv::WriteTransaction;
use opal_utils::stats::{DetailType, StatType};

use super::rollback_planner::RollbackInstructions;
use crate::Ledger;

/// Applies the writes planned for the rollback of one block
pub(crate) struct RollbackInstructionsExecutor<'a> {
    ledger: &'a Ledger,
    txn: &'a mut WriteTransaction,
    instructions: &'a RollbackInstructions,
}

impl<'a> RollbackInstructionsExecutor<'a> {
    pub(crate) fn new(
        ledger: &'a Ledger,
        txn: &'a mut WriteTransaction,
        instructions: &'a RollbackInstructions,
    ) -> Self {
        Self {
            ledger,
            txn,
            instructions,
        }
    }

    pub(crate) fn execute(&mut self) {
        self.ledger
            .store
            .block
            .del(self.txn, &self.instructions.block_hash);

        if let Some(previous) = &self.instructions.clear_successor {
            self.ledger.store.block.successor_clear(self.txn, previous);
        }

        self.update_account();
        self.update_pending();
        self.update_rep_weights();

        debug_assert!(
            self.ledger
                .store
                .cache
                .block_count
                .load(Ordering::SeqCst)
                > 0
        );
        self.ledger
            .store
            .cache
            .block_count
            .fetch_sub(1, Ordering::SeqCst);

        self.ledger.stats.inc(StatType::Rollback, self.stat_detail());
    }

    fn update_account(&mut self) {
        self.ledger.update_account(
            self.txn,
            &self.instructions.account,
            &self.instructions.old_account_info,
            &self.instructions.new_account_info,
        );
    }

    fn update_pending(&mut self) {
        if let Some(key) = &self.instructions.remove_pending {
            self.ledger.store.pending.del(self.txn, key);
        }
        if let Some((key, info)) = &self.instructions.add_pending {
            self.ledger.store.pending.put(self.txn, key, info);
        }
    }

    fn update_rep_weights(&mut self) {
        let current = &self.instructions.old_account_info;
        let restored = &self.instructions.new_account_info;

        if restored.head.is_zero() {
            // The account disappears, its balance returns to the unused
            // pool
            self.ledger.rep_weights_updater.sub(
                self.txn,
                current.representative,
                current.balance,
            );
        } else {
            self.ledger.rep_weights_updater.move_add_sub(
                self.txn,
                current.representative,
                current.balance,
                restored.representative,
                restored.balance,
            );
        }
    }

    fn stat_detail(&self) -> DetailType {
        if self.instructions.is_open {
            DetailType::Open
        } else if self.instructions.is_send {
            DetailType::Send
        } else if self.instructions.is_receive {
            DetailType::Receive
        } else {
            DetailType::Change
        }
    }
}
