use opal_types::{
    Account, AccountInfo, BlockHash, ConfirmationHeightInfo, Epoch, PendingInfo, PendingKey,
    PublicKey, SavedBlock, UnixTimestamp,
};

use super::rollback_performer::RollbackError;

/// Plans the rollback of one account head block. Either produces the
/// write instructions or requests that a dependent account is rolled back
/// first.
pub(crate) struct RollbackPlanner {
    pub head_block: SavedBlock,
    pub account: Account,
    pub current_account_info: AccountInfo,
    pub previous_representative: Option<PublicKey>,
    pub previous: Option<SavedBlock>,
    pub linked_account: Account,
    pub pending_receive: Option<PendingInfo>,
    pub latest_block_for_destination: Option<BlockHash>,
    pub confirmation_height: ConfirmationHeightInfo,
    pub now: UnixTimestamp,
}

pub(crate) enum RollbackStep {
    RollBackBlock(RollbackInstructions),
    RequestDependencyRollback(BlockHash),
}

/// Everything that must be written to undo one block
#[derive(Debug, PartialEq)]
pub(crate) struct RollbackInstructions {
    pub block_hash: BlockHash,
    pub account: Account,
    pub old_account_info: AccountInfo,
    /// A zero head means the account entry is deleted
    pub new_account_info: AccountInfo,
    pub remove_pending: Option<PendingKey>,
    pub add_pending: Option<(PendingKey, PendingInfo)>,
    pub clear_successor: Option<BlockHash>,
    pub is_send: bool,
    pub is_receive: bool,
    pub is_open: bool,
}

impl RollbackPlanner {
    pub(crate) fn roll_back_head_block(&self) -> Result<RollbackStep, RollbackError> {
        self.ensure_not_confirmed()?;

        if self.head_block.is_send() {
            // A send can only be rolled back after the receiving side has
            // returned the funds to the pending table
            if self.pending_receive.is_none() {
                let destination_head = self
                    .latest_block_for_destination
                    .ok_or(RollbackError::ReceivedBlockMissing)?;
                return Ok(RollbackStep::RequestDependencyRollback(destination_head));
            }
        }

        Ok(RollbackStep::RollBackBlock(self.create_instructions()?))
    }

    fn ensure_not_confirmed(&self) -> Result<(), RollbackError> {
        if self.head_block.height() <= self.confirmation_height.height {
            return Err(RollbackError::BlockConfirmed);
        }
        Ok(())
    }

    fn create_instructions(&self) -> Result<RollbackInstructions, RollbackError> {
        let is_open = self.head_block.previous().is_zero();

        Ok(RollbackInstructions {
            block_hash: self.head_block.hash(),
            account: self.account,
            old_account_info: self.current_account_info.clone(),
            new_account_info: self.previous_account_info()?,
            remove_pending: self.pending_to_remove(),
            add_pending: self.pending_to_restore(),
            clear_successor: self.previous.as_ref().map(|b| b.hash()),
            is_send: self.head_block.is_send(),
            is_receive: self.head_block.is_receive(),
            is_open,
        })
    }

    fn previous_account_info(&self) -> Result<AccountInfo, RollbackError> {
        if self.head_block.previous().is_zero() {
            // Rolling back the open block deletes the account entry
            return Ok(AccountInfo::default());
        }

        let previous = self
            .previous
            .as_ref()
            .ok_or(RollbackError::PreviousBlockMissing)?;

        Ok(AccountInfo {
            head: previous.hash(),
            representative: self
                .previous_representative
                .ok_or(RollbackError::RepresentativeBlockMissing)?,
            open_block: self.current_account_info.open_block,
            balance: previous.balance(),
            modified: self.now,
            block_count: self.current_account_info.block_count - 1,
            epoch: self.previous_version(previous),
        })
    }

    fn previous_version(&self, previous: &SavedBlock) -> Epoch {
        match previous.block() {
            opal_types::Block::State(_) => previous.epoch(),
            _ => Epoch::Epoch0,
        }
    }

    fn pending_to_remove(&self) -> Option<PendingKey> {
        if self.head_block.is_send() {
            Some(PendingKey::new(
                self.head_block.destination().unwrap_or_default(),
                self.head_block.hash(),
            ))
        } else {
            None
        }
    }

    fn pending_to_restore(&self) -> Option<(PendingKey, PendingInfo)> {
        if !self.head_block.is_receive() {
            return None;
        }

        let source = self.head_block.source()?;
        let amount = self
            .head_block
            .balance()
            .wrapping_sub(self.previous.as_ref().map(|b| b.balance()).unwrap_or_default());

        // The source account can be unknown when the source block was
        // pruned. That does not affect correct ledger processing.
        Some((
            PendingKey::new(self.account, source),
            PendingInfo::new(self.linked_account, amount, self.head_block.source_epoch()),
        ))
    }
}
