use super::{Block, BlockBase, BlockType, valid_legacy_predecessor};
use crate::{
    Account, Amount, Blake2HashBuilder, BlockHash, DeserializationError, JsonBlock, Link,
    PrivateKey, PublicKey, Root, Signature, WorkNonce, read_u64_be,
};
use std::io::Read;

#[derive(Clone, Debug)]
pub struct SendBlock {
    hashables: SendHashables,
    signature: Signature,
    hash: BlockHash,
    work: WorkNonce,
}

impl SendBlock {
    pub const SERIALIZED_SIZE: usize =
        SendHashables::SERIALIZED_SIZE + Signature::SERIALIZED_SIZE + 8;

    pub fn destination(&self) -> Account {
        self.hashables.destination
    }

    pub fn balance(&self) -> Amount {
        self.hashables.balance
    }

    pub fn deserialize<T>(reader: &mut T) -> Result<Self, DeserializationError>
    where
        T: Read,
    {
        let hashables = SendHashables {
            previous: BlockHash::deserialize(reader)?,
            destination: Account::deserialize(reader)?,
            balance: Amount::deserialize(reader)?,
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
        self.hashables.destination.serialize(writer)?;
        self.hashables.balance.serialize(writer)?;
        self.signature.serialize(writer)?;
        writer.write_all(&self.work.to_be_bytes())
    }
}

impl PartialEq for SendBlock {
    fn eq(&self, other: &Self) -> bool {
        self.work == other.work
            && self.signature == other.signature
            && self.hashables == other.hashables
    }
}

impl Eq for SendBlock {}

impl BlockBase for SendBlock {
    fn block_type(&self) -> BlockType {
        BlockType::LegacySend
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
        Some(self.hashables.balance)
    }

    fn source_field(&self) -> Option<BlockHash> {
        None
    }

    fn destination_field(&self) -> Option<Account> {
        Some(self.hashables.destination)
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
        JsonBlock::Send(JsonSendBlock {
            previous: self.hashables.previous,
            destination: self.hashables.destination,
            balance: self.hashables.balance,
            signature: self.signature.clone(),
            work: self.work,
        })
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
struct SendHashables {
    previous: BlockHash,
    destination: Account,
    balance: Amount,
}

impl SendHashables {
    const SERIALIZED_SIZE: usize =
        BlockHash::SERIALIZED_SIZE + Account::SERIALIZED_SIZE + Amount::SERIALIZED_SIZE;

    fn hash(&self) -> BlockHash {
        Blake2HashBuilder::new()
            .update(self.previous.as_bytes())
            .update(self.destination.as_bytes())
            .update(self.balance.to_be_bytes())
            .build()
    }
}

pub struct SendBlockArgs<'a> {
    pub key: &'a PrivateKey,
    pub previous: BlockHash,
    pub destination: Account,
    pub balance: Amount,
    pub work: WorkNonce,
}

impl<'a> From<SendBlockArgs<'a>> for SendBlock {
    fn from(value: SendBlockArgs<'a>) -> Self {
        let hashables = SendHashables {
            previous: value.previous,
            destination: value.destination,
            balance: value.balance,
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

impl<'a> From<SendBlockArgs<'a>> for Block {
    fn from(value: SendBlockArgs<'a>) -> Self {
        Block::LegacySend(value.into())
    }
}

#[derive(PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct JsonSendBlock {
    pub previous: BlockHash,
    pub destination: Account,
    pub balance: Amount,
    pub signature: Signature,
    pub work: WorkNonce,
}

impl From<JsonSendBlock> for SendBlock {
    fn from(value: JsonSendBlock) -> Self {
        let hashables = SendHashables {
            previous: value.previous,
            destination: value.destination,
            balance: value.balance,
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
