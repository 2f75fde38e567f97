use super::{Block, BlockBase, BlockType};
use crate::{
    Account, Amount, Blake2HashBuilder, BlockHash, DeserializationError, JsonBlock, Link,
    PrivateKey, PublicKey, Root, Signature, SignatureError, WorkNonce, read_u64_be,
};
use std::io::Read;

#[derive(Clone, Debug)]
pub struct StateBlock {
    hashables: StateHashables,
    signature: Signature,
    hash: BlockHash,
    work: WorkNonce,
}

impl StateBlock {
    pub const SERIALIZED_SIZE: usize = Account::SERIALIZED_SIZE // Account
        + BlockHash::SERIALIZED_SIZE // Previous
        + PublicKey::SERIALIZED_SIZE // Representative
        + Amount::SERIALIZED_SIZE // Balance
        + Link::SERIALIZED_SIZE // Link
        + Signature::SERIALIZED_SIZE
        + 8 // Work
    ;

    pub fn verify_signature(&self) -> Result<(), SignatureError> {
        self.account()
            .as_key()
            .verify(self.hash().as_bytes(), self.signature())
    }

    pub fn account(&self) -> Account {
        self.hashables.account
    }

    pub fn link(&self) -> Link {
        self.hashables.link
    }

    pub fn balance(&self) -> Amount {
        self.hashables.balance
    }

    pub fn representative(&self) -> PublicKey {
        self.hashables.representative
    }

    pub fn deserialize<T>(reader: &mut T) -> Result<Self, DeserializationError>
    where
        T: Read,
    {
        let account = Account::deserialize(reader)?;
        let previous = BlockHash::deserialize(reader)?;
        let representative = PublicKey::deserialize(reader)?;
        let balance = Amount::deserialize(reader)?;
        let link = Link::deserialize(reader)?;
        let signature = Signature::deserialize(reader)?;
        let work = read_u64_be(reader)?;
        let hashables = StateHashables {
            account,
            previous,
            representative,
            balance,
            link,
        };
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
        self.hashables.account.serialize(writer)?;
        self.hashables.previous.serialize(writer)?;
        self.hashables.representative.serialize(writer)?;
        self.hashables.balance.serialize(writer)?;
        self.hashables.link.serialize(writer)?;
        self.signature.serialize(writer)?;
        writer.write_all(&self.work.to_be_bytes())
    }
}

impl PartialEq for StateBlock {
    fn eq(&self, other: &Self) -> bool {
        self.work == other.work
            && self.signature == other.signature
            && self.hashables == other.hashables
    }
}

impl Eq for StateBlock {}

impl BlockBase for StateBlock {
    fn block_type(&self) -> BlockType {
        BlockType::State
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
        if !self.previous().is_zero() {
            self.previous().into()
        } else {
            self.hashables.account.into()
        }
    }

    fn account_field(&self) -> Option<Account> {
        Some(self.hashables.account)
    }

    fn balance_field(&self) -> Option<Amount> {
        Some(self.hashables.balance)
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
        Some(self.hashables.link)
    }

    fn valid_predecessor(&self, _block_type: BlockType) -> bool {
        true
    }

    fn json_representation(&self) -> JsonBlock {
        JsonBlock::State(JsonStateBlock {
            account: self.hashables.account,
            previous: self.hashables.previous,
            representative: self.hashables.representative.into(),
            balance: self.hashables.balance,
            link: self.hashables.link,
            link_as_account: Some(self.hashables.link.into()),
            signature: self.signature.clone(),
            work: self.work,
        })
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
struct StateHashables {
    // Account# / public key that operates this account
    account: Account,

    // Previous transaction in this chain
    previous: BlockHash,

    // Representative of this account
    representative: PublicKey,

    // Current balance of this account
    // Allows lookup of account balance simply by looking at the head block
    balance: Amount,

    // Link field contains source block_hash if receiving, destination account if sending
    link: Link,
}

impl StateHashables {
    fn hash(&self) -> BlockHash {
        let mut preamble = [0u8; 32];
        preamble[31] = BlockType::State.as_u8();
        Blake2HashBuilder::new()
            .update(preamble)
            .update(self.account.as_bytes())
            .update(self.previous.as_bytes())
            .update(self.representative.as_bytes())
            .update(self.balance.to_be_bytes())
            .update(self.link.as_bytes())
            .build()
    }
}

#[derive(Clone)]
pub struct StateBlockArgs<'a> {
    pub key: &'a PrivateKey,
    pub previous: BlockHash,
    pub representative: PublicKey,
    pub balance: Amount,
    pub link: Link,
    pub work: WorkNonce,
}

impl<'a> From<StateBlockArgs<'a>> for Block {
    fn from(value: StateBlockArgs<'a>) -> Self {
        let hashables = StateHashables {
            account: value.key.account(),
            previous: value.previous,
            representative: value.representative,
            balance: value.balance,
            link: value.link,
        };

        let hash = hashables.hash();
        let signature = value.key.sign(hash.as_bytes());

        Block::State(StateBlock {
            hashables,
            signature,
            hash,
            work: value.work,
        })
    }
}

/// An epoch upgrade is a state block signed by the epoch signer instead of
/// the account owner
pub struct EpochBlockArgs<'a> {
    pub epoch_signer: &'a PrivateKey,
    pub account: Account,
    pub previous: BlockHash,
    pub representative: PublicKey,
    pub balance: Amount,
    pub link: Link,
    pub work: WorkNonce,
}

impl<'a> From<EpochBlockArgs<'a>> for Block {
    fn from(value: EpochBlockArgs<'a>) -> Self {
        let hashables = StateHashables {
            account: value.account,
            previous: value.previous,
            representative: value.representative,
            balance: value.balance,
            link: value.link,
        };

        let hash = hashables.hash();
        let signature = value.epoch_signer.sign(hash.as_bytes());

        Block::State(StateBlock {
            hashables,
            signature,
            hash,
            work: value.work,
        })
    }
}

impl From<JsonStateBlock> for StateBlock {
    fn from(value: JsonStateBlock) -> Self {
        let hashables = StateHashables {
            account: value.account,
            previous: value.previous,
            representative: value.representative.into(),
            balance: value.balance,
            link: value.link,
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

#[derive(PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct JsonStateBlock {
    pub account: Account,
    pub previous: BlockHash,
    pub representative: Account,
    pub balance: Amount,
    pub link: Link,
    pub link_as_account: Option<Account>,
    pub signature: Signature,
    pub work: WorkNonce,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TestBlockBuilder, TestStateBlockBuilder};

    #[test]
    fn send_link_interpretation() {
        let dest = Account::from(42);
        let block = TestBlockBuilder::state().link(dest).build();
        assert_eq!(block.link_field(), Some(dest.into()));
        assert_eq!(block.destination_field(), None);
        assert_eq!(block.destination_or_link(), dest);
    }

    #[test]
    fn serialization() {
        let block1 = TestBlockBuilder::state().work(5).build();
        let mut buffer = Vec::new();
        block1.serialize_without_block_type(&mut buffer).unwrap();
        assert_eq!(StateBlock::SERIALIZED_SIZE, buffer.len());
        assert_eq!(buffer[215], 0x5); // Ensure work is serialized big-endian

        let block2 = StateBlock::deserialize(&mut buffer.as_slice()).unwrap();
        assert_eq!(block1, Block::State(block2));
    }

    #[test]
    fn hashing() {
        let key = PrivateKey::from(42);
        let block = TestBlockBuilder::state().key(&key).build();
        let hash = block.hash();
        assert_eq!(hash, TestBlockBuilder::state().key(&key).build().hash());

        let assert_different_hash = |b: TestStateBlockBuilder| {
            assert_ne!(hash, b.build().hash());
        };

        assert_different_hash(
            TestBlockBuilder::state()
                .key(&key)
                .previous(BlockHash::from(1000)),
        );
        assert_different_hash(
            TestBlockBuilder::state()
                .key(&key)
                .representative(PublicKey::from(1000)),
        );
        assert_different_hash(
            TestBlockBuilder::state()
                .key(&key)
                .balance(Amount::from(1000u128)),
        );
        assert_different_hash(TestBlockBuilder::state().key(&key).link(Link::from(1000)));
    }

    #[test]
    fn hash_ignores_signature_and_work() {
        let key = PrivateKey::from(42);
        let a = TestBlockBuilder::state().key(&key).work(1).build();
        let b = TestBlockBuilder::state().key(&key).work(2).build();
        assert_eq!(a.hash(), b.hash());

        let mut c = TestBlockBuilder::state().key(&key).build();
        if let Block::State(state) = &mut c {
            state.set_signature(Signature::from_bytes([9; 64]));
        }
        assert_eq!(a.hash(), c.hash());
    }

    #[test]
    fn signature_verifies_under_account_key() {
        let key = PrivateKey::from(42);
        let block = TestBlockBuilder::state().key(&key).build();
        let Block::State(state) = block else {
            unreachable!()
        };
        assert!(state.verify_signature().is_ok());
    }
}
