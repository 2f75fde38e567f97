use super::{Block, BlockBase, BlockType, valid_legacy_predecessor};
use crate::{
    Account, Amount, Blake2HashBuilder, BlockHash, DeserializationError, JsonBlock, Link,
    PrivateKey, PublicKey, Root, Signature, WorkNonce, read_u64_be,
};
use std::io::Read;

#[derive(Clone, Debug)]
pub struct ReceiveBlock {
    hashables: ReceiveHashables,
    signature: Signature,
    hash: BlockHash,
    work: WorkNonce,
}

impl ReceiveBlock {
    pub const SERIALIZED_SIZE: usize =
        ReceiveHashables::SERIALIZED_SIZE + Signature::SERIALIZED_SIZE + 8;

    pub fn mandatory_source(&self) -> BlockHash {
        self.hashables.source
    }

    pub fn deserialize<T>(reader: &mut T) -> Result<Self, DeserializationError>
    where
        T: Read,
    {
        let hashables = ReceiveHashables {
            previous: BlockHash::deserialize(reader)?,
            source: BlockHash::deserialize(reader)?,
        };
        let signature = Signature::deserialize(reader)?;
        let work = read_u64_be(reader)?;
        let hash = hashables.hash();
        Ok(Self {
            work: work.into(),
            signature,
            hashables,
            hash,
        })
    }

    pub fn serialize_without_block_type<T>(&self, writer: &mut T) -> std::io::Result<()>
    where
        T: std::io::Write,
    {
        self.hashables.previous.serialize(writer)?;
        self.hashables.source.serialize(writer)?;
        self.signature.serialize(writer)?;
        writer.write_all(&self.work.to_be_bytes())
    }
}

impl PartialEq for ReceiveBlock {
    fn eq(&self, other: &Self) -> bool {
        self.work == other.work
            && self.signature == other.signature
            && self.hashables == other.hashables
    }
}

impl Eq for ReceiveBlock {}

impl BlockBase for ReceiveBlock {
    fn block_type(&self) -> BlockType {
        BlockType::LegacyReceive
    }

    fn hash(&self) -> BlockHash {
        self.hash
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn set_signature(&mut self, signature: Signature) {
        self.signature = signature;
    }

    fn work(&self) -> WorkNonce {
        self.work
    }

    fn set_work(&mut self, work: WorkNonce) {
        self.work = work;
    }

    fn previous(&self) -> BlockHash {
        self.hashables.previous
    }

    fn root(&self) -> Root {
        self.previous().into()
    }

    fn account_field(&self) -> Option<Account> {
        None
    }

    fn balance_field(&self) -> Option<Amount> {
        None
    }

    fn source_field(&self) -> Option<BlockHash> {
        Some(self.hashables.source)
    }

    fn destination_field(&self) -> Option<Account> {
        None
    }

    fn representative_field(&self) -> Option<PublicKey> {
        None
    }

    fn link_field(&self) -> Option<Link> {
        None
    }

    fn valid_predecessor(&self, block_type: BlockType) -> bool {
        valid_legacy_predecessor(block_type)
    }

    fn json_representation(&self) -> JsonBlock {
        JsonBlock::Receive(JsonReceiveBlock {
            previous: self.hashables.previous,
            source: self.hashables.source,
            signature: self.signature.clone(),
            work: self.work,
        })
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
struct ReceiveHashables {
    previous: BlockHash,
    source: BlockHash,
}

impl ReceiveHashables {
    const SERIALIZED_SIZE: usize = BlockHash::SERIALIZED_SIZE + BlockHash::SERIALIZED_SIZE;

    fn hash(&self) -> BlockHash {
        Blake2HashBuilder::new()
            .update(self.previous.as_bytes())
            .update(self.source.as_bytes())
            .build()
    }
}

pub struct ReceiveBlockArgs<'a> {
    pub key: &'a PrivateKey,
    pub previous: BlockHash,
    pub source: BlockHash,
    pub work: WorkNonce,
}

impl<'a> From<ReceiveBlockArgs<'a>> for ReceiveBlock {
    fn from(value: ReceiveBlockArgs<'a>) -> Self {
        let hashables = ReceiveHashables {
            previous: value.previous,
            source: value.source,
        };

        let hash = hashables.hash();
        let signature = value.key.sign(hash.as_bytes());

        Self {
            work: value.work,
            signature,
            hashables,
            hash,
        }
    }
}

impl<'a> From<ReceiveBlockArgs<'a>> for Block {
    fn from(value: ReceiveBlockArgs<'a>) -> Self {
        Block::LegacyReceive(value.into())
    }
}

#[derive(PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct JsonReceiveBlock {
    pub previous: BlockHash,
    pub source: BlockHash,
    pub signature: Signature,
    pub work: WorkNonce,
}

impl From<JsonReceiveBlock> for ReceiveBlock {
    fn from(value: JsonReceiveBlock) -> Self {
        let hashables = ReceiveHashables {
            previous: value.previous,
            source: value.source,
        };

        let hash = hashables.hash();

        Self {
            work: value.work,
            signature: value.signature,
            hashables,
            hash,
        }
    }
}
