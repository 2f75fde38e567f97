use std::{ops::Deref, sync::Arc};

use super::{Block, BlockSideband, BlockType};
use crate::{
    Account, Amount, BlockHash, DependentBlocks, DeserializationError, Epoch, Epochs,
    TestBlockBuilder, UnixTimestamp,
};

/// A block that has been inserted into the ledger, together with its
/// sideband. Blocks are immutable once saved; shared read paths hold the
/// same reference-counted record without re-decoding it.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SavedBlock {
    block: Arc<Block>,
    pub sideband: BlockSideband,
}

impl SavedBlock {
    pub fn new(block: Block, sideband: BlockSideband) -> Self {
        Self {
            block: Arc::new(block),
            sideband,
        }
    }

    pub fn block(&self) -> &Block {
        &self.block
    }

    pub fn account(&self) -> Account {
        self.block
            .account_field()
            .unwrap_or(self.sideband.account)
    }

    pub fn balance(&self) -> Amount {
        self.block
            .balance_field()
            .unwrap_or(self.sideband.balance)
    }

    pub fn height(&self) -> u64 {
        self.sideband.height
    }

    pub fn timestamp(&self) -> UnixTimestamp {
        self.sideband.timestamp
    }

    pub fn successor(&self) -> Option<BlockHash> {
        if self.sideband.successor.is_zero() {
            None
        } else {
            Some(self.sideband.successor)
        }
    }

    pub fn epoch(&self) -> Epoch {
        self.sideband.details.epoch
    }

    pub fn source_epoch(&self) -> Epoch {
        self.sideband.source_epoch
    }

    pub fn is_send(&self) -> bool {
        match self.block.deref() {
            Block::LegacySend(_) => true,
            Block::State(_) => self.sideband.details.is_send,
            _ => false,
        }
    }

    pub fn is_receive(&self) -> bool {
        match self.block.deref() {
            Block::LegacyReceive(_) | Block::LegacyOpen(_) => true,
            Block::State(_) => self.sideband.details.is_receive,
            _ => false,
        }
    }

    pub fn is_epoch(&self) -> bool {
        match self.block.deref() {
            Block::State(_) => self.sideband.details.is_epoch,
            _ => false,
        }
    }

    pub fn is_change(&self) -> bool {
        match self.block.deref() {
            Block::LegacyChange(_) => true,
            Block::State(_) => !self.is_send() && !self.is_receive() && !self.is_epoch(),
            _ => false,
        }
    }

    /// The hash of the block this block receives from, if it is a receive
    pub fn source(&self) -> Option<BlockHash> {
        match self.block.deref() {
            Block::LegacyReceive(b) => Some(b.mandatory_source()),
            Block::LegacyOpen(b) => Some(b.mandatory_source()),
            Block::State(b) => {
                if self.sideband.details.is_receive {
                    Some(b.link().into())
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// The account this block sends to, if it is a send
    pub fn destination(&self) -> Option<Account> {
        match self.block.deref() {
            Block::LegacySend(b) => Some(b.destination()),
            Block::State(b) => {
                if self.sideband.details.is_send {
                    Some(b.link().into())
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Blocks whose confirmation is a precondition for confirming this one
    pub fn dependent_blocks(
        &self,
        epochs: &Epochs,
        genesis_account: &Account,
    ) -> DependentBlocks {
        match self.block.deref() {
            Block::LegacySend(_) | Block::LegacyChange(_) => {
                DependentBlocks::new(self.previous(), BlockHash::ZERO)
            }
            Block::LegacyReceive(b) => {
                DependentBlocks::new(b.previous(), b.mandatory_source())
            }
            Block::LegacyOpen(b) => {
                if &b.account() == genesis_account {
                    DependentBlocks::none()
                } else {
                    DependentBlocks::new(b.mandatory_source(), BlockHash::ZERO)
                }
            }
            Block::State(b) => {
                let linked_block = if self.is_send() || epochs.is_epoch_link(&b.link()) {
                    BlockHash::ZERO
                } else {
                    b.link().into()
                };
                DependentBlocks::new(self.previous(), linked_block)
            }
        }
    }

    pub fn serialize_with_sideband(&self) -> Vec<u8> {
        let block_type = self.block.block_type();
        let mut buffer = Vec::with_capacity(
            1 + Block::serialized_size(block_type) + BlockSideband::serialized_size(block_type),
        );
        self.block
            .serialize_with_block_type(&mut buffer)
            .expect("Should serialize block");
        self.sideband
            .serialize(block_type, &mut buffer)
            .expect("Should serialize sideband");
        buffer
    }

    /// Deserializes a block + sideband record. The input must be fully
    /// consumed, trailing bytes are a corruption.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, DeserializationError> {
        let mut reader = bytes;
        let block = Block::deserialize(&mut reader)?;
        let sideband = BlockSideband::deserialize(&mut reader, block.block_type())?;
        if !reader.is_empty() {
            return Err(DeserializationError::TooMuchData);
        }
        let mut result = Self::new(block, sideband);
        // Fields the block itself carries are omitted from the sideband
        // layout, restore them after reading
        if let Some(account) = result.block.account_field() {
            result.sideband.account = account;
        }
        if let Some(balance) = result.block.balance_field() {
            result.sideband.balance = balance;
        }
        Ok(result)
    }

    pub fn new_test_instance() -> Self {
        Self::new_test_instance_with_key(42)
    }

    pub fn new_test_instance_with_key(key: u64) -> Self {
        TestBlockBuilder::state()
            .key(&crate::PrivateKey::from(key))
            .build_saved()
    }

    pub fn new_test_open_block() -> Self {
        TestBlockBuilder::legacy_open().build_saved()
    }

    pub fn new_test_send_block() -> Self {
        TestBlockBuilder::state().is_send().build_saved()
    }

    pub fn new_test_change_block() -> Self {
        TestBlockBuilder::legacy_change().build_saved()
    }
}

impl Deref for SavedBlock {
    type Target = Block;

    fn deref(&self) -> &Self::Target {
        &self.block
    }
}

impl From<SavedBlock> for Block {
    fn from(value: SavedBlock) -> Self {
        value.block.deref().clone()
    }
}
