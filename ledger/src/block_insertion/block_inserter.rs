use std::sync::atomic::Ordering;

use opal_nullable_kv::WriteTransaction;
use opal_types::{
    Account, AccountInfo, Block, BlockSideband, PendingInfo, PendingKey, SavedBlock,
};

use crate::Ledger;

/// Everything the validator decided must be written for one block
#[derive(Debug, PartialEq)]
pub(crate) struct BlockInsertInstructions {
    pub account: Account,
    pub old_account_info: AccountInfo,
    pub set_account_info: AccountInfo,
    pub delete_pending: Option<PendingKey>,
    pub insert_pending: Option<(PendingKey, PendingInfo)>,
    pub set_sideband: BlockSideband,
    pub is_epoch_block: bool,
}

/// Inserts a new block into the ledger
pub(crate) struct BlockInserter<'a> {
    ledger: &'a Ledger,
    txn: &'a mut WriteTransaction,
    block: &'a Block,
    instructions: &'a BlockInsertInstructions,
}

impl<'a> BlockInserter<'a> {
    pub(crate) fn new(
        ledger: &'a Ledger,
        txn: &'a mut WriteTransaction,
        block: &'a Block,
        instructions: &'a BlockInsertInstructions,
    ) -> Self {
        Self {
            ledger,
            txn,
            block,
            instructions,
        }
    }

    pub(crate) fn insert(&mut self) -> SavedBlock {
        let sideband = self.instructions.set_sideband.clone();
        let saved_block = SavedBlock::new(self.block.clone(), sideband);
        self.ledger.store.block.put(self.txn, &saved_block);
        if !saved_block.previous().is_zero() {
            self.ledger.store.block.successor_set(
                self.txn,
                &saved_block.previous(),
                saved_block.hash(),
            );
        }
        self.update_account();
        self.delete_old_pending_info();
        self.insert_new_pending_info();
        self.update_rep_weights();
        self.ledger
            .store
            .cache
            .block_count
            .fetch_add(1, Ordering::SeqCst);

        saved_block
    }

    fn update_account(&mut self) {
        self.ledger.update_account(
            self.txn,
            &self.instructions.account,
            &self.instructions.old_account_info,
            &self.instructions.set_account_info,
        );
    }

    fn delete_old_pending_info(&mut self) {
        if let Some(key) = &self.instructions.delete_pending {
            self.ledger.store.pending.del(self.txn, key);
        }
    }

    fn insert_new_pending_info(&mut self) {
        if let Some((key, info)) = &self.instructions.insert_pending {
            self.ledger.store.pending.put(self.txn, key, info);
        }
    }

    fn update_rep_weights(&mut self) {
        let old = &self.instructions.old_account_info;
        let new = &self.instructions.set_account_info;
        if !old.head.is_zero() {
            // Move the existing weight and apply the balance delta in one
            // step
            self.ledger.rep_weights_updater.move_add_sub(
                self.txn,
                old.representative,
                old.balance,
                new.representative,
                new.balance,
            );
        } else {
            // Account is being opened, its balance enters the committed
            // weights
            self.ledger
                .rep_weights_updater
                .add(self.txn, new.representative, new.balance);
        }
    }
}
