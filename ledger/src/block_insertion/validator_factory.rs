use opal_types::{Account, Block, PendingKey, SavedBlock, UnixTimestamp};

use super::BlockValidator;
use crate::{AnySet, LedgerConstants};

/// Gathers all ledger context the validation rules need. After this, the
/// validator works without further store access.
pub(crate) struct BlockValidatorFactory<'a> {
    any: &'a dyn AnySet,
    constants: &'a LedgerConstants,
    block: &'a Block,
}

impl<'a> BlockValidatorFactory<'a> {
    pub(crate) fn new(
        any: &'a dyn AnySet,
        constants: &'a LedgerConstants,
        block: &'a Block,
    ) -> Self {
        Self {
            any,
            constants,
            block,
        }
    }

    pub(crate) fn create_validator(&self) -> BlockValidator<'a> {
        let previous_block = self.load_previous_block();
        let account = self.get_account(&previous_block).unwrap_or_default();
        let source_block = self.block.source_or_link();
        let source_block_exists =
            !source_block.is_zero() && self.any.block_exists_or_pruned(&source_block);

        let pending_receive_info = if source_block.is_zero() {
            None
        } else {
            self.any
                .get_pending(&PendingKey::new(account, source_block))
        };

        BlockValidator {
            block: self.block,
            epochs: &self.constants.epochs,
            work: &self.constants.work,
            account,
            block_exists: self.any.block_exists_or_pruned(&self.block.hash()),
            old_account_info: self.any.get_account(&account),
            pending_receive_info,
            any_pending_exists: self.any.receivable_exists(account),
            source_block_exists,
            previous_block,
            now: UnixTimestamp::now(),
        }
    }

    fn get_account(&self, previous: &Option<SavedBlock>) -> Option<Account> {
        match self.block.account_field() {
            Some(account) => Some(account),
            None => previous.as_ref().map(|p| p.account()),
        }
    }

    fn load_previous_block(&self) -> Option<SavedBlock> {
        if !self.block.previous().is_zero() {
            self.any.get_block(&self.block.previous())
        } else {
            None
        }
    }
}
