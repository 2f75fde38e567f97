use super::{Block, BlockBase, BlockType, valid_legacy_predecessor};
use crate::{
    Account, Amount, Blake2HashBuilder, BlockHash, DeserializationError, JsonBlock, Link,
    PrivateKey, PublicKey, Root, Signature, WorkNonce, read_u64_be,
};
use std::io::Read;

#[derive(Clone, Debug)]
pub struct ChangeBlock {
    hashables: ChangeHashables,
    signature: Signature,
    hash: BlockHash,
    work: WorkNonce,
}

impl ChangeBlock {
    pub const SERIALIZED_SIZE: usize =
        ChangeHashables::SERIALIZED_SIZE + Signature::SERIALIZED_SIZE + 8;

    pub fn mandatory_representative(&self) -> PublicKey {
        self.hashables.representative
    }

    pub fn deserialize<T>(reader: &mut T) -> Result<Self, DeserializationError>
    where
        T: Read,
    {
        let hashables = ChangeHashables {
            previous: BlockHash::deserialize(reader)?,
            representative: PublicKey::deserialize(reader)?,
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
        self.hashables.representative.serialize(writer)?;
        self.signature.serialize(writer)?;
        writer.write_all(&self.work.to_be_bytes())
    }
}

impl PartialEq for ChangeBlock {
    fn eq(&self, other: &Self) -> bool {
        self.work == other.work
            && self.signature == other.signature
            && self.hashables == other.hashables
    }
}

impl Eq for ChangeBlock {}

impl BlockBase for ChangeBlock {
    fn block_type(&self) -> BlockType {
        BlockType::LegacyChange
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
        None
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

    fn valid_predecessor(&self, block_type: BlockType) -> bool {
        valid_legacy_predecessor(block_type)
    }

    fn json_representation(&self) -> JsonBlock {
        JsonBlock::Change(JsonChangeBlock {
            previous: self.hashables.previous,
            representative: self.hashables.representative.into(),
            signature: self.signature.clone(),
            work: self.work,
        })
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
struct ChangeHashables {
    previous: BlockHash,
    representative: PublicKey,
}

impl ChangeHashables {
    const SERIALIZED_SIZE: usize = BlockHash::SERIALIZED_SIZE + PublicKey::SERIALIZED_SIZE;

    fn hash(&self) -> BlockHash {
        Blake2HashBuilder::new()
            .update(self.previous.as_bytes())
            .update(self.representative.as_bytes())
            .build()
    }
}

pub struct ChangeBlockArgs<'a> {
    pub key: &'a PrivateKey,
    pub previous: BlockHash,
    pub representative: PublicKey,
    pub work: WorkNonce,
}

impl<'a> From<ChangeBlockArgs<'a>> for ChangeBlock {
    fn from(value: ChangeBlockArgs<'a>) -> Self {
        let hashables = ChangeHashables {
            previous: value.previous,
            representative: value.representative,
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

impl<'a> From<ChangeBlockArgs<'a>> for Block {
    fn from(value: ChangeBlockArgs<'a>) -> Self {
        Block::LegacyChange(value.into())
    }
}

#[derive(PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct JsonChangeBlock {
    pub previous: BlockHash,
    pub representative: Account,
    pub signature: Signature,
    pub work: WorkNonce,
}

impl From<JsonChangeBlock> for ChangeBlock {
    fn from(value: JsonChangeBlock) -> Self {
        let hashables = ChangeHashables {
            previous: value.previous,
            representative: value.representative.into(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TestBlockBuilder;

    #[test]
    fn serialize() {
        let block = TestBlockBuilder::legacy_change().build();
        let mut buffer = Vec::new();
        block.serialize_without_block_type(&mut buffer).unwrap();
        assert_eq!(buffer.len(), ChangeBlock::SERIALIZED_SIZE);

        let block2 = ChangeBlock::deserialize(&mut buffer.as_slice()).unwrap();
        assert_eq!(block, Block::LegacyChange(block2));
    }
}
