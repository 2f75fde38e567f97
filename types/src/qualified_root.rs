use crate::{BlockHash, DeserializationError, Root};
use primitive_types::U512;
use serde::de::Unexpected;
use std::{
    hash::Hash,
    io::{Read, Write},
};

/// Election identity of a block: its root and its previous hash
#[derive(Default, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct QualifiedRoot {
    pub root: Root,
    pub previous: BlockHash,
}

impl QualifiedRoot {
    pub const ZERO: Self = QualifiedRoot::new(Root::ZERO, BlockHash::ZERO);
    pub const SERIALIZED_SIZE: usize = Root::SERIALIZED_SIZE + BlockHash::SERIALIZED_SIZE;

    pub const fn new(root: Root, previous: BlockHash) -> Self {
        Self { root, previous }
    }

    pub fn new_test_instance() -> Self {
        Self::new(Root::from(111), BlockHash::from(222))
    }

    pub fn to_bytes(&self) -> [u8; Self::SERIALIZED_SIZE] {
        let mut buffer = [0; Self::SERIALIZED_SIZE];
        self.serialize(&mut buffer.as_mut())
            .expect("Should serialize qualified root");
        buffer
    }

    pub fn serialize<T>(&self, writer: &mut T) -> std::io::Result<()>
    where
        T: Write,
    {
        writer.write_all(self.root.as_bytes())?;
        writer.write_all(self.previous.as_bytes())
    }

    pub fn deserialize<T>(reader: &mut T) -> Result<QualifiedRoot, DeserializationError>
    where
        T: Read,
    {
        let root = Root::deserialize(reader)?;
        let previous = BlockHash::deserialize(reader)?;
        Ok(QualifiedRoot { root, previous })
    }

    pub fn decode_hex(s: impl AsRef<str>) -> Option<Self> {
        let mut bytes = [0u8; 64];
        hex::decode_to_slice(s.as_ref(), &mut bytes).ok()?;

        let mut slice = bytes.as_slice();
        let root = Root::deserialize(&mut slice).ok()?;
        let previous = BlockHash::deserialize(&mut slice).ok()?;
        Some(Self { root, previous })
    }
}

impl From<U512> for QualifiedRoot {
    fn from(value: U512) -> Self {
        let bytes = value.to_big_endian();
        let root = Root::from_slice(&bytes[..32]).unwrap();
        let previous = BlockHash::from_slice(&bytes[32..]).unwrap();
        QualifiedRoot { root, previous }
    }
}

impl serde::Serialize for QualifiedRoot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!(
            "{}{}",
            self.root.encode_hex(),
            self.previous.encode_hex()
        ))
    }
}

impl<'de> serde::Deserialize<'de> for QualifiedRoot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(QualifiedRootVisitor {})
    }
}

struct QualifiedRootVisitor {}

impl serde::de::Visitor<'_> for QualifiedRootVisitor {
    type Value = QualifiedRoot;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a qualified root")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        QualifiedRoot::decode_hex(v)
            .ok_or_else(|| serde::de::Error::invalid_value(Unexpected::Str(v), &"a qualified root"))
    }
}
