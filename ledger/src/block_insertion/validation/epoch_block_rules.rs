use super::BlockValidator;
use crate::BlockError;
use opal_types::{Block, Epochs};

impl BlockValidator<'_> {
    /// A state block with an epoch link can be either an upgrade or a
    /// regular send to the epoch link account. The two cannot be told
    /// apart before the previous block is known.
    pub(crate) fn epoch_block_pre_checks(&self) -> Result<(), BlockError> {
        let Block::State(state) = self.block else {
            return Ok(());
        };
        if !self.epochs.is_epoch_link(&state.link()) {
            return Ok(());
        }

        if !state.previous().is_zero() && self.previous_block.is_none() {
            if state.verify_signature().is_err()
                && self.epochs.validate_epoch_signature(self.block).is_err()
            {
                return Err(BlockError::BadSignature);
            }
            return Err(BlockError::GapPrevious);
        }

        Ok(())
    }

    pub(crate) fn ensure_valid_epoch_block(&self) -> Result<(), BlockError> {
        if !self.is_epoch_block() {
            return Ok(());
        }

        self.ensure_epoch_block_does_not_change_representative()?;
        self.ensure_epoch_open_has_pending_entry()?;
        self.ensure_epoch_upgrade_is_sequential()
    }

    fn ensure_epoch_block_does_not_change_representative(&self) -> Result<(), BlockError> {
        let Block::State(state) = self.block else {
            return Ok(());
        };
        match &self.old_account_info {
            Some(info) => {
                if state.representative() != info.representative {
                    return Err(BlockError::RepresentativeMismatch);
                }
            }
            None => {
                // An epoch open cannot pick a representative
                if !state.representative().is_zero() {
                    return Err(BlockError::RepresentativeMismatch);
                }
            }
        }
        Ok(())
    }

    /// An unopened account may only be upgraded when it has something
    /// receivable, otherwise anybody could open arbitrary accounts
    fn ensure_epoch_open_has_pending_entry(&self) -> Result<(), BlockError> {
        if self.is_new_account() && !self.any_pending_exists {
            Err(BlockError::GapEpochOpenPending)
        } else {
            Ok(())
        }
    }

    fn ensure_epoch_upgrade_is_sequential(&self) -> Result<(), BlockError> {
        let target = self.block_epoch();
        let valid = match &self.old_account_info {
            Some(info) => Epochs::is_sequential(info.epoch, target),
            None => target.epoch_number() > 0,
        };
        if valid {
            Ok(())
        } else {
            Err(BlockError::BlockPosition)
        }
    }
}
