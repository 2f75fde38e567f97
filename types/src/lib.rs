mod account;
mod account_info;
mod amount;
mod block_hash;
mod blocks;
mod confirmation_height_info;
mod epoch;
mod pending_info;
mod pending_key;
mod private_key;
mod public_key;
mod qualified_root;
mod raw_key;
mod signature;
mod timestamp;
mod u256_struct;
mod work;

use std::{
    fmt::{Debug, Display},
    io::Read,
};

pub use account::Account;
pub use account_info::AccountInfo;
pub use amount::Amount;
pub use block_hash::{Blake2Hash, Blake2HashBuilder, BlockHash};
pub use blocks::*;
pub use confirmation_height_info::ConfirmationHeightInfo;
pub use epoch::{Epoch, Epochs};
pub use pending_info::PendingInfo;
pub use pending_key::PendingKey;
pub use private_key::{DEV_GENESIS_KEY, PrivateKey};
pub use public_key::{PublicKey, SignatureError};
pub use qualified_root::QualifiedRoot;
pub use raw_key::RawKey;
use serde::de::{Unexpected, Visitor};
pub use signature::Signature;
use thiserror::Error;
pub use timestamp::UnixTimestamp;
pub use work::{Difficulty, WorkThresholds};

pub fn write_hex_bytes(bytes: &[u8], f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
    for &byte in bytes {
        write!(f, "{:02X}", byte)?;
    }
    Ok(())
}

pub fn to_hex_string(i: u64) -> String {
    format!("{:016X}", i)
}

u256_struct!(Link);
serialize_32_byte_string!(Link);
u256_struct!(Root);
serialize_32_byte_string!(Root);

impl From<Link> for Account {
    fn from(link: Link) -> Self {
        Account::from_bytes(*link.as_bytes())
    }
}

impl From<&Link> for Account {
    fn from(link: &Link) -> Self {
        Account::from_bytes(*link.as_bytes())
    }
}

impl From<Account> for Link {
    fn from(account: Account) -> Self {
        Link::from_bytes(*account.as_bytes())
    }
}

impl From<&Account> for Link {
    fn from(account: &Account) -> Self {
        Link::from_bytes(*account.as_bytes())
    }
}

impl From<&PrivateKey> for Link {
    fn from(key: &PrivateKey) -> Self {
        key.account().into()
    }
}

impl From<PublicKey> for Link {
    fn from(key: PublicKey) -> Self {
        Link::from_bytes(*key.as_bytes())
    }
}

impl From<BlockHash> for Link {
    fn from(hash: BlockHash) -> Self {
        Link::from_bytes(*hash.as_bytes())
    }
}

impl From<Link> for BlockHash {
    fn from(link: Link) -> Self {
        BlockHash::from_bytes(*link.as_bytes())
    }
}

impl From<Root> for BlockHash {
    fn from(root: Root) -> Self {
        BlockHash::from_bytes(*root.as_bytes())
    }
}

impl From<Root> for Account {
    fn from(root: Root) -> Self {
        Account::from_bytes(*root.as_bytes())
    }
}

impl From<Account> for Root {
    fn from(account: Account) -> Self {
        Root::from_bytes(*account.as_bytes())
    }
}

impl From<&Account> for Root {
    fn from(account: &Account) -> Self {
        Root::from_bytes(*account.as_bytes())
    }
}

impl From<PublicKey> for Root {
    fn from(key: PublicKey) -> Self {
        Root::from_bytes(*key.as_bytes())
    }
}

impl From<&PublicKey> for Root {
    fn from(key: &PublicKey) -> Self {
        Root::from_bytes(*key.as_bytes())
    }
}

impl From<BlockHash> for Root {
    fn from(hash: BlockHash) -> Self {
        Root::from_bytes(*hash.as_bytes())
    }
}

impl From<&BlockHash> for Root {
    fn from(hash: &BlockHash) -> Self {
        Root::from_bytes(*hash.as_bytes())
    }
}

#[derive(PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Default, Hash)]
pub struct WorkNonce(pub(crate) u64);

impl WorkNonce {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl Display for WorkNonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016X}", self.0)
    }
}

impl Debug for WorkNonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self, f)
    }
}

impl From<u64> for WorkNonce {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<WorkNonce> for u64 {
    fn from(value: WorkNonce) -> Self {
        value.0
    }
}

impl serde::Serialize for WorkNonce {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&to_hex_string(self.0))
    }
}

impl<'de> serde::Deserialize<'de> for WorkNonce {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(WorkNonceVisitor {})
    }
}

struct WorkNonceVisitor {}

impl Visitor<'_> for WorkNonceVisitor {
    type Value = WorkNonce;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a hex string containing 8 bytes")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        let mut bytes = [0; 8];
        hex::decode_to_slice(v, &mut bytes).map_err(|_| {
            serde::de::Error::invalid_value(Unexpected::Str(v), &"a hex string containing 8 bytes")
        })?;
        Ok(WorkNonce(u64::from_be_bytes(bytes)))
    }
}

#[derive(Error, Debug)]
pub enum DeserializationError {
    #[error("invalid data")]
    InvalidData,

    #[error("too much data")]
    TooMuchData,

    #[error("I/O error")]
    IoError(std::io::Error),
}

impl From<std::io::Error> for DeserializationError {
    fn from(value: std::io::Error) -> Self {
        Self::IoError(value)
    }
}

pub fn read_u64_be<T>(reader: &mut T) -> std::io::Result<u64>
where
    T: Read,
{
    let mut buffer = [0; 8];
    reader.read_exact(&mut buffer)?;
    Ok(u64::from_be_bytes(buffer))
}

pub fn read_u32_be<T>(reader: &mut T) -> std::io::Result<u32>
where
    T: Read,
{
    let mut buffer = [0; 4];
    reader.read_exact(&mut buffer)?;
    Ok(u32::from_be_bytes(buffer))
}

pub fn read_u8<T>(reader: &mut T) -> std::io::Result<u8>
where
    T: Read,
{
    let mut buffer = [0; 1];
    reader.read_exact(&mut buffer)?;
    Ok(buffer[0])
}
