mod block_details;
mod block_priority;
mod block_sideband;
mod change_block;
mod open_block;
mod receive_block;
mod saved_block;
mod send_block;
mod state_block;
mod test_builder;

pub use block_details::BlockDetails;
pub use block_priority::{BlockPriority, block_priority};
pub use block_sideband::BlockSideband;
pub use change_block::{ChangeBlock, ChangeBlockArgs, JsonChangeBlock};
pub use open_block::{JsonOpenBlock, OpenBlock, OpenBlockArgs};
pub use receive_block::{JsonReceiveBlock, ReceiveBlock, ReceiveBlockArgs};
pub use saved_block::SavedBlock;
pub use send_block::{JsonSendBlock, SendBlock, SendBlockArgs};
pub use state_block::{EpochBlockArgs, JsonStateBlock, StateBlock, StateBlockArgs};
pub use test_builder::{
    TestBlockBuilder, TestLegacyChangeBlockBuilder, TestLegacyOpenBlockBuilder,
    TestLegacyReceiveBlockBuilder, TestLegacySendBlockBuilder, TestStateBlockBuilder,
};

use std::io::{Read, Write};
use std::ops::Deref;

use num_traits::FromPrimitive;

use crate::{
    Account, Amount, BlockHash, DeserializationError, Link, PublicKey, QualifiedRoot, Root,
    Signature, WorkNonce, read_u8,
};

#[repr(u8)]
#[derive(num_derive::FromPrimitive, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BlockType {
    Invalid = 0,
    NotABlock = 1,
    LegacySend = 2,
    LegacyReceive = 3,
    LegacyOpen = 4,
    LegacyChange = 5,
    State = 6,
}

impl BlockType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

pub trait BlockBase {
    fn block_type(&self) -> BlockType;
    fn hash(&self) -> BlockHash;
    fn signature(&self) -> &Signature;
    fn set_signature(&mut self, signature: Signature);
    fn work(&self) -> WorkNonce;
    fn set_work(&mut self, work: WorkNonce);
    fn previous(&self) -> BlockHash;
    fn root(&self) -> Root;
    fn account_field(&self) -> Option<Account>;
    fn balance_field(&self) -> Option<Amount>;
    fn source_field(&self) -> Option<BlockHash>;
    fn destination_field(&self) -> Option<Account>;
    fn representative_field(&self) -> Option<PublicKey>;
    fn link_field(&self) -> Option<Link>;
    fn valid_predecessor(&self, block_type: BlockType) -> bool;
    fn json_representation(&self) -> JsonBlock;
}

/// The closed set of block kinds making up an account chain
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Block {
    LegacySend(SendBlock),
    LegacyReceive(ReceiveBlock),
    LegacyOpen(OpenBlock),
    LegacyChange(ChangeBlock),
    State(StateBlock),
}

impl Deref for Block {
    type Target = dyn BlockBase;

    fn deref(&self) -> &Self::Target {
        match self {
            Block::LegacySend(b) => b,
            Block::LegacyReceive(b) => b,
            Block::LegacyOpen(b) => b,
            Block::LegacyChange(b) => b,
            Block::State(b) => b,
        }
    }
}

impl Block {
    pub fn block_type(&self) -> BlockType {
        self.deref().block_type()
    }

    /// True for the first block of an account chain
    pub fn is_open(&self) -> bool {
        match self {
            Block::LegacyOpen(_) => true,
            Block::State(state) => state.previous().is_zero(),
            _ => false,
        }
    }

    pub fn is_legacy(&self) -> bool {
        !matches!(self, Block::State(_))
    }

    /// Link interpreted as a block hash: the `source` of legacy blocks,
    /// the raw link of state blocks
    pub fn source_or_link(&self) -> BlockHash {
        self.source_field()
            .unwrap_or_else(|| self.link_field().unwrap_or_default().into())
    }

    /// Link interpreted as an account: the `destination` of legacy sends,
    /// the raw link of state blocks
    pub fn destination_or_link(&self) -> Account {
        self.destination_field()
            .unwrap_or_else(|| self.link_field().unwrap_or_default().into())
    }

    pub fn qualified_root(&self) -> QualifiedRoot {
        QualifiedRoot::new(self.root(), self.previous())
    }

    pub fn serialized_size(block_type: BlockType) -> usize {
        match block_type {
            BlockType::LegacySend => SendBlock::SERIALIZED_SIZE,
            BlockType::LegacyReceive => ReceiveBlock::SERIALIZED_SIZE,
            BlockType::LegacyOpen => OpenBlock::SERIALIZED_SIZE,
            BlockType::LegacyChange => ChangeBlock::SERIALIZED_SIZE,
            BlockType::State => StateBlock::SERIALIZED_SIZE,
            BlockType::Invalid | BlockType::NotABlock => 0,
        }
    }

    pub fn serialize_without_block_type<T>(&self, writer: &mut T) -> std::io::Result<()>
    where
        T: Write,
    {
        match self {
            Block::LegacySend(b) => b.serialize_without_block_type(writer),
            Block::LegacyReceive(b) => b.serialize_without_block_type(writer),
            Block::LegacyOpen(b) => b.serialize_without_block_type(writer),
            Block::LegacyChange(b) => b.serialize_without_block_type(writer),
            Block::State(b) => b.serialize_without_block_type(writer),
        }
    }

    pub fn serialize_with_block_type<T>(&self, writer: &mut T) -> std::io::Result<()>
    where
        T: Write,
    {
        writer.write_all(&[self.block_type().as_u8()])?;
        self.serialize_without_block_type(writer)
    }

    pub fn deserialize_block_type<T>(
        block_type: BlockType,
        reader: &mut T,
    ) -> Result<Self, DeserializationError>
    where
        T: Read,
    {
        let block = match block_type {
            BlockType::LegacySend => Block::LegacySend(SendBlock::deserialize(reader)?),
            BlockType::LegacyReceive => Block::LegacyReceive(ReceiveBlock::deserialize(reader)?),
            BlockType::LegacyOpen => Block::LegacyOpen(OpenBlock::deserialize(reader)?),
            BlockType::LegacyChange => Block::LegacyChange(ChangeBlock::deserialize(reader)?),
            BlockType::State => Block::State(StateBlock::deserialize(reader)?),
            BlockType::Invalid | BlockType::NotABlock => {
                return Err(DeserializationError::InvalidData);
            }
        };
        Ok(block)
    }

    pub fn deserialize<T>(reader: &mut T) -> Result<Self, DeserializationError>
    where
        T: Read,
    {
        let block_type =
            BlockType::from_u8(read_u8(reader)?).ok_or(DeserializationError::InvalidData)?;
        Self::deserialize_block_type(block_type, reader)
    }

    pub fn new_test_instance() -> Self {
        TestBlockBuilder::state().build()
    }
}

impl serde::Serialize for Block {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.json_representation().serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Block {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let json_block = JsonBlock::deserialize(deserializer)?;
        Ok(json_block.into())
    }
}

#[derive(PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JsonBlock {
    Send(JsonSendBlock),
    Receive(JsonReceiveBlock),
    Open(JsonOpenBlock),
    Change(JsonChangeBlock),
    State(JsonStateBlock),
}

impl From<JsonBlock> for Block {
    fn from(value: JsonBlock) -> Self {
        match value {
            JsonBlock::Send(b) => Block::LegacySend(b.into()),
            JsonBlock::Receive(b) => Block::LegacyReceive(b.into()),
            JsonBlock::Open(b) => Block::LegacyOpen(b.into()),
            JsonBlock::Change(b) => Block::LegacyChange(b.into()),
            JsonBlock::State(b) => Block::State(b.into()),
        }
    }
}

/// The blocks whose confirmation is a precondition for confirming a given
/// block: `previous` and the source/link. At most two, zeroes are skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DependentBlocks {
    dependents: [BlockHash; 2],
}

impl DependentBlocks {
    pub fn new(previous: BlockHash, link: BlockHash) -> Self {
        Self {
            dependents: [previous, link],
        }
    }

    pub fn none() -> Self {
        Self::new(BlockHash::ZERO, BlockHash::ZERO)
    }

    pub fn previous(&self) -> Option<BlockHash> {
        self.get_index(0)
    }

    pub fn link(&self) -> Option<BlockHash> {
        self.get_index(1)
    }

    fn get_index(&self, index: usize) -> Option<BlockHash> {
        if self.dependents[index].is_zero() {
            None
        } else {
            Some(self.dependents[index])
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockHash> + '_ {
        self.dependents.iter().filter(|h| !h.is_zero())
    }
}

/// Legacy blocks may only follow other legacy blocks
pub(crate) fn valid_legacy_predecessor(predecessor: BlockType) -> bool {
    matches!(
        predecessor,
        BlockType::LegacySend
            | BlockType::LegacyReceive
            | BlockType::LegacyOpen
            | BlockType::LegacyChange
    )
}
