use opal_types::{
    Account, AccountInfo, BlockHash, ConfirmationHeightInfo, PendingKey, PublicKey, SavedBlock,
    UnixTimestamp,
};

use super::{rollback_performer::RollbackError, rollback_planner::RollbackPlanner};
use crate::{AnySet, ConfirmedSet, LedgerSet};

/// Gathers all ledger context the rollback planner needs
pub(crate) struct RollbackPlannerFactory<'a> {
    any: &'a dyn AnySet,
    head_block: &'a SavedBlock,
}

impl<'a> RollbackPlannerFactory<'a> {
    pub(crate) fn new(any: &'a dyn AnySet, head_block: &'a SavedBlock) -> Self {
        Self { any, head_block }
    }

    pub(crate) fn create_planner(&self) -> Result<RollbackPlanner, RollbackError> {
        let account = self.head_block.account();
        let planner = RollbackPlanner {
            head_block: self.head_block.clone(),
            account,
            current_account_info: self.load_account(&account),
            previous_representative: self.get_previous_representative()?,
            previous: self.load_previous_block()?,
            linked_account: self.load_linked_account(),
            pending_receive: self.load_pending_receive(),
            latest_block_for_destination: self.latest_block_for_destination(),
            confirmation_height: self.account_confirmation_height(),
            now: UnixTimestamp::now(),
        };
        Ok(planner)
    }

    fn latest_block_for_destination(&self) -> Option<BlockHash> {
        self.any
            .account_head(&self.head_block.destination().unwrap_or_default())
    }

    fn load_pending_receive(&self) -> Option<opal_types::PendingInfo> {
        let destination = self.head_block.destination()?;
        self.any
            .get_pending(&PendingKey::new(destination, self.head_block.hash()))
    }

    fn load_linked_account(&self) -> Account {
        let Some(source) = self.head_block.source() else {
            return Account::ZERO;
        };
        self.any.block_account(&source).unwrap_or_default()
    }

    fn load_previous_block(&self) -> Result<Option<SavedBlock>, RollbackError> {
        let previous = self.head_block.previous();
        if previous.is_zero() {
            Ok(None)
        } else {
            let previous = self.any.get_block(&previous);
            if previous.is_none() {
                Err(RollbackError::PreviousBlockMissing)
            } else {
                Ok(previous)
            }
        }
    }

    fn account_confirmation_height(&self) -> ConfirmationHeightInfo {
        self.any
            .confirmed()
            .get_conf_info(&self.head_block.account())
            .unwrap_or_default()
    }

    fn load_account(&self, account: &Account) -> AccountInfo {
        self.any.get_account(account).unwrap_or_default()
    }

    fn get_previous_representative(&self) -> Result<Option<PublicKey>, RollbackError> {
        let previous = self.head_block.previous();
        if previous.is_zero() {
            return Ok(None);
        }

        let rep_block_hash = self.any.representative_block_hash(&previous);
        if rep_block_hash.is_zero() {
            return Err(RollbackError::RepresentativeBlockMissing);
        }

        let rep_block = self
            .any
            .get_block(&rep_block_hash)
            .ok_or(RollbackError::RepresentativeBlockMissing)?;
        Ok(rep_block.representative_field())
    }
}
