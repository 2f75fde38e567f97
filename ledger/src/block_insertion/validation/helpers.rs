use std::cmp::max;

use opal_types::{
    AccountInfo, Amount, Block, BlockDetails, BlockHash, BlockSideband, Epoch, PendingInfo,
    PendingKey, PublicKey,
};

use super::BlockValidator;

impl BlockValidator<'_> {
    pub(crate) fn account_exists(&self) -> bool {
        self.old_account_info.is_some()
    }

    pub(crate) fn is_new_account(&self) -> bool {
        self.old_account_info.is_none()
    }

    pub(crate) fn previous_balance(&self) -> Amount {
        self.previous_block
            .as_ref()
            .map(|b| b.balance())
            .unwrap_or_default()
    }

    fn balance_changed(&self) -> bool {
        match self.block.balance_field() {
            Some(balance) => balance != self.previous_balance(),
            None => false,
        }
    }

    /// A state block with an epoch link is an upgrade when it does not
    /// move any funds. Otherwise it is a regular send to the epoch link
    /// interpreted as a destination account.
    pub(crate) fn is_epoch_block(&self) -> bool {
        match self.block {
            Block::State(state) => {
                self.epochs.is_epoch_link(&state.link()) && !self.balance_changed()
            }
            _ => false,
        }
    }

    pub(crate) fn is_send(&self) -> bool {
        match self.block {
            Block::LegacySend(_) => true,
            Block::State(state) => match &self.old_account_info {
                Some(info) => state.balance() < info.balance,
                None => false,
            },
            _ => false,
        }
    }

    pub(crate) fn is_receive(&self) -> bool {
        match self.block {
            Block::LegacyReceive(_) | Block::LegacyOpen(_) => true,
            Block::State(state) => {
                !self.is_epoch_block() && !self.is_send() && !state.link().is_zero()
            }
            _ => false,
        }
    }

    /// Balance delta credited by this block when it is a receive
    pub(crate) fn amount_received(&self) -> Amount {
        match self.block {
            Block::LegacyReceive(_) | Block::LegacyOpen(_) => self
                .pending_receive_info
                .as_ref()
                .map(|p| p.amount)
                .unwrap_or_default(),
            Block::State(state) => {
                let previous = self.previous_balance();
                if state.balance() > previous {
                    state.balance() - previous
                } else {
                    Amount::ZERO
                }
            }
            _ => Amount::ZERO,
        }
    }

    /// Balance delta debited by this block when it is a send
    pub(crate) fn amount_sent(&self) -> Amount {
        match self.block.balance_field() {
            Some(balance) => {
                let previous = self
                    .old_account_info
                    .as_ref()
                    .map(|i| i.balance)
                    .unwrap_or_default();
                if balance < previous {
                    previous - balance
                } else {
                    Amount::ZERO
                }
            }
            None => Amount::ZERO,
        }
    }

    fn account_epoch(&self) -> Epoch {
        self.old_account_info
            .as_ref()
            .map(|i| i.epoch)
            .unwrap_or_default()
    }

    pub(crate) fn source_epoch(&self) -> Epoch {
        self.pending_receive_info
            .as_ref()
            .map(|p| p.epoch)
            .unwrap_or_default()
    }

    /// Epoch the account is in once this block is applied
    pub(crate) fn block_epoch(&self) -> Epoch {
        match self.block {
            Block::State(state) => {
                if self.is_epoch_block() {
                    self.epochs.epoch(&state.link()).unwrap_or_default()
                } else if self.is_receive() {
                    max(self.account_epoch(), self.source_epoch())
                } else {
                    self.account_epoch()
                }
            }
            _ => Epoch::Epoch0,
        }
    }

    pub(crate) fn block_details(&self) -> BlockDetails {
        BlockDetails::new(
            self.block_epoch(),
            self.is_send(),
            self.is_receive(),
            self.is_epoch_block(),
        )
    }

    fn new_balance(&self) -> Amount {
        match self.block {
            Block::LegacySend(send) => send.balance(),
            Block::State(state) => state.balance(),
            Block::LegacyReceive(_) | Block::LegacyOpen(_) => {
                self.previous_balance() + self.amount_received()
            }
            Block::LegacyChange(_) => self.previous_balance(),
        }
    }

    fn new_representative(&self) -> PublicKey {
        self.block.representative_field().unwrap_or_else(|| {
            self.old_account_info
                .as_ref()
                .map(|i| i.representative)
                .unwrap_or_default()
        })
    }

    fn open_block(&self) -> BlockHash {
        match &self.old_account_info {
            Some(info) if !info.open_block.is_zero() => info.open_block,
            _ => self.block.hash(),
        }
    }

    fn old_block_count(&self) -> u64 {
        self.old_account_info
            .as_ref()
            .map(|i| i.block_count)
            .unwrap_or_default()
    }

    pub(super) fn new_sideband(&self) -> BlockSideband {
        BlockSideband {
            successor: BlockHash::ZERO,
            account: self.account,
            balance: self.new_balance(),
            height: self.old_block_count() + 1,
            timestamp: self.now,
            details: self.block_details(),
            source_epoch: self.source_epoch(),
        }
    }

    pub(super) fn new_account_info(&self) -> AccountInfo {
        AccountInfo {
            head: self.block.hash(),
            representative: self.new_representative(),
            open_block: self.open_block(),
            balance: self.new_balance(),
            modified: self.now,
            block_count: self.old_block_count() + 1,
            epoch: self.block_epoch(),
        }
    }

    pub(super) fn delete_received_pending_info(&self) -> Option<PendingKey> {
        if self.is_receive() {
            Some(PendingKey::new(self.account, self.block.source_or_link()))
        } else {
            None
        }
    }

    pub(super) fn new_pending_info(&self) -> Option<(PendingKey, PendingInfo)> {
        match self.block {
            Block::LegacySend(send) => Some((
                PendingKey::new(send.destination(), self.block.hash()),
                PendingInfo::new(self.account, self.amount_sent(), Epoch::Epoch0),
            )),
            Block::State(state) if self.is_send() => Some((
                PendingKey::new(state.link().into(), self.block.hash()),
                // A pending entry remembers the epoch of the sending
                // account so that the send block can be pruned
                PendingInfo::new(self.account, self.amount_sent(), self.account_epoch()),
            )),
            _ => None,
        }
    }
}
