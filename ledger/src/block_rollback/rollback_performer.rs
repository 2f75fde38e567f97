use opal_nullable_kv::WriteTransaction;
use opal_types::{AccountInfo, BlockHash, SavedBlock};

use crate::{AnySet, BorrowingAnySet, Ledger, LedgerSet};

use super::{
    instructions_executor::RollbackInstructionsExecutor, planner_factory::RollbackPlannerFactory,
    rollback_planner::RollbackStep,
};

/// Rolls back a block and all of its successors and dependencies with an
/// explicit work stack. The cascade depth is bounded so that a deep
/// dependency tree cannot drive unbounded cost.
pub(crate) struct BlockRollbackPerformer<'a> {
    ledger: &'a Ledger,
    pub txn: &'a mut WriteTransaction,
    max_depth: usize,
    pub rolled_back: Vec<SavedBlock>,
}

impl<'a> BlockRollbackPerformer<'a> {
    pub(crate) fn new(
        ledger: &'a Ledger,
        txn: &'a mut WriteTransaction,
        max_depth: usize,
    ) -> Self {
        Self {
            ledger,
            txn,
            max_depth,
            rolled_back: Vec::new(),
        }
    }

    /// Rolls back the given block and all of its successor blocks and
    /// dependencies. The rolled back blocks are collected in LIFO order.
    pub(crate) fn roll_back(&mut self, block_hash: &BlockHash) -> Result<(), RollbackError> {
        // target block + current account head
        let mut targets: Vec<(SavedBlock, SavedBlock)> = Vec::new();

        let target_block = self.load_block(block_hash)?;
        let head_block = self.load_account_head(&target_block)?;
        targets.push((target_block, head_block));

        self.roll_back_impl(&mut targets)
    }

    fn roll_back_impl(
        &mut self,
        targets: &mut Vec<(SavedBlock, SavedBlock)>,
    ) -> Result<(), RollbackError> {
        while let Some((target_block, head_block)) = targets.last_mut() {
            if !self.any().block_exists(&target_block.hash()) {
                targets.pop();
                continue;
            }

            let head_block = head_block.clone();
            let target_hash = target_block.hash();
            let step = self.roll_back_head_block(&head_block)?;
            match step {
                RollbackStep::RollBackBlock(instructions) => {
                    RollbackInstructionsExecutor::new(self.ledger, self.txn, &instructions)
                        .execute();
                    self.rolled_back.push(head_block.clone());
                    if head_block.hash() != target_hash {
                        // The rolled back block wasn't the target, so
                        // there are more blocks to roll back for this
                        // account. Load the new head block, which will be
                        // rolled back next.
                        let (target_block, head_slot) =
                            targets.last_mut().expect("targets can't be empty here");
                        *head_slot = self.reload_account_head(target_block)?;
                    }
                }
                RollbackStep::RequestDependencyRollback(dependency_hash) => {
                    if targets.len() >= self.max_depth {
                        return Err(RollbackError::MaxDepthExceeded);
                    }
                    let dep_block = self.load_block(&dependency_hash)?;
                    let dep_head = self.load_account_head(&dep_block)?;
                    targets.push((dep_block, dep_head));
                }
            }
        }
        Ok(())
    }

    fn load_account_head(&self, block: &SavedBlock) -> Result<SavedBlock, RollbackError> {
        let account_info = self.get_account_info(block)?;
        self.load_block(&account_info.head)
    }

    fn reload_account_head(&self, block: &SavedBlock) -> Result<SavedBlock, RollbackError> {
        self.load_account_head(block)
    }

    fn get_account_info(&self, block: &SavedBlock) -> Result<AccountInfo, RollbackError> {
        self.any()
            .get_account(&block.account())
            .ok_or(RollbackError::BlockNotFound)
    }

    fn load_block(&self, block_hash: &BlockHash) -> Result<SavedBlock, RollbackError> {
        self.any()
            .get_block(block_hash)
            .ok_or(RollbackError::BlockNotFound)
    }

    fn roll_back_head_block(
        &mut self,
        head_block: &SavedBlock,
    ) -> Result<RollbackStep, RollbackError> {
        let any = self.any();
        let planner = RollbackPlannerFactory::new(&any, head_block).create_planner()?;
        planner.roll_back_head_block()
    }

    fn any(&self) -> BorrowingAnySet<'_> {
        BorrowingAnySet {
            constants: &self.ledger.constants,
            store: &self.ledger.store,
            tx: self.txn,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RollbackError {
    /// The block to roll back wasn't found
    BlockNotFound,

    /// A confirmed block must not be rolled back!
    BlockConfirmed,

    PreviousBlockMissing,
    RepresentativeBlockMissing,
    ReceivedBlockMissing,

    /// The cascade through receiving accounts got deeper than the
    /// configured bound
    MaxDepthExceeded,

    /// Some other component rejected the rollback
    Rejected,
}

impl std::fmt::Display for RollbackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RollbackError::BlockNotFound => f.write_str("Block not found"),
            RollbackError::BlockConfirmed => f.write_str("Cannot roll back confirmed block"),
            RollbackError::PreviousBlockMissing => f.write_str("Previous block missing"),
            RollbackError::RepresentativeBlockMissing => {
                f.write_str("Representative block missing")
            }
            RollbackError::ReceivedBlockMissing => f.write_str("Received block missing"),
            RollbackError::MaxDepthExceeded => f.write_str("Rollback depth exceeded"),
            RollbackError::Rejected => f.write_str("Rollback rejected"),
        }
    }
}

impl std::error::Error for RollbackError {}
