use super::{Block, BlockBase, BlockType};
use crate::{
    Account, Amount, Blake2HashBuilder, BlockHash, DeserializationError, JsonBlock, Link,
    PrivateKey, PublicKey, Root, Signature, WorkNonce, read_u64_be,
};
use std::io::Read;

#[derive(Clone, Debug)]
pub struct OpenBlock {
    hashables: OpenHashables,
    signature: Signature,
    hash: BlockHash,
    work: WorkNonce,
}

impl OpenBlock {
    pub const SERIALIZED_SIZE: usize =
        OpenHashables::SERIALIZED_SIZE + Signature::SERIALIZED_SIZE + 8;

    pub fn mandatory_source(&self) -> BlockHash {
        self.hashables.source
    }

    pub fn mandatory_representative(&self) -> PublicKey {
        self.hashables.representative
    }

    pub fn account(&self) -> Account {
        self.hashables.account
    }

    pub fn deserialize<T>(reader: &mut T) -> Result<Self, DeserializationError>
    where
        T: Read,
    {
        let hashables = OpenHashables {
            source: BlockHash::deserialize(reader)?,
            representative: PublicKey::deserialize(reader)?,
            account: Account::deserialize(reader)?,
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
        self.hashables.source.serialize(writer)?;
        self.hashables.representative.serialize(writer)?;
        self.hashables.account.serialize(writer)?;
        self.signature.serialize(writer)?;
        writer.write_all(&self.work.to_be_bytes())
    }
}

impl PartialEq for OpenBlock {
    fn eq(&self, other: &Self) -> bool {
        self.work == other.work
            && self.signature == other.signature
            && self.hashables == other.hashables
    }
}

impl Eq for OpenBlock {}

impl BlockBase for OpenBlock {
    fn block_type(&self) -> BlockType {
        BlockType::LegacyOpen
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
        BlockHash::ZERO
    }

    fn root(&self) -> Root {
        self.hashables.account.into()
    }

    fn account_field(&self) -> Option<Account> {
        Some(self.hashables.account)
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
        Some(self.hashables.representative)
    }

    fn link_field(&self) -> Option<Link> {
        None
    }

    fn valid_predecessor(&self, _block_type: BlockType) -> bool {
        // An open block has no predecessor
        false
    }

    fn json_representation(&self) -> JsonBlock {
        JsonBlock::Open(JsonOpenBlock {
            source: self.hashables.source,
            representative: self.hashables.representative.into(),
            account: self.hashables.account,
            signature: self.signature.clone(),
            work: self.work,
        })
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
struct OpenHashables {
    source: BlockHash,
    representative: PublicKey,
    account: Account,
}

impl OpenHashables {
    const SERIALIZED_SIZE: usize =
        BlockHash::SERIALIZED_SIZE + PublicKey::SERIALIZED_SIZE + Account::SERIALIZED_SIZE;

    fn hash(&self) -> BlockHash {
        Blake2HashBuilder::new()
            .update(self.source.as_bytes())
            .update(self.representative.as_bytes())
            .update(self.account.as_bytes())
            .build()
    }
}

pub struct OpenBlockArgs<'a> {
    pub key: &'a PrivateKey,
    pub source: BlockHash,
    pub representative: PublicKey,
    pub work: WorkNonce,
}

impl<'a> From<OpenBlockArgs<'a>> for OpenBlock {
    fn from(value: OpenBlockArgs<'a>) -> Self {
        let hashables = OpenHashables {
            source: value.source,
            representative: value.representative,
            account: value.key.account(),
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

impl<'a> From<OpenBlockArgs<'a>> for Block {
    fn from(value: OpenBlockArgs<'a>) -> Self {
        Block::LegacyOpen(value.into())
    }
}

#[derive(PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct JsonOpenBlock {
    pub source: BlockHash,
    pub representative: Account,
    pub account: Account,
    pub signature: Signature,
    pub work: WorkNonce,
}

impl From<JsonOpenBlock> for OpenBlock {
    fn from(value: JsonOpenBlock) -> Self {
        let hashables = OpenHashables {
            source: value.source,
            representative: value.representative.into(),
            account: value.account,
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
