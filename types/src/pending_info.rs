use num_traits::FromPrimitive;
use std::io::{Read, Write};

use crate::{Account, Amount, DeserializationError, Epoch, read_u8};

/// Information on an uncollected send.
/// This struct captures the data stored in a pending table entry.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct PendingInfo {
    /// The account sending the funds
    pub source: Account,
    /// Amount receivable in this transaction
    pub amount: Amount,
    /// Epoch of the sending block, stored here so that the send block can
    /// be pruned
    pub epoch: Epoch,
}

impl Default for PendingInfo {
    fn default() -> Self {
        Self {
            source: Default::default(),
            amount: Default::default(),
            epoch: Epoch::Epoch0,
        }
    }
}

impl PendingInfo {
    pub const SERIALIZED_SIZE: usize = Account::SERIALIZED_SIZE + Amount::SERIALIZED_SIZE + 1;

    pub fn new(source: Account, amount: Amount, epoch: Epoch) -> Self {
        Self {
            source,
            amount,
            epoch,
        }
    }

    pub fn new_test_instance() -> Self {
        Self::new(Account::from(3), Amount::raw(4), Epoch::Epoch2)
    }

    pub fn to_bytes(&self) -> [u8; Self::SERIALIZED_SIZE] {
        let mut bytes = [0_u8; Self::SERIALIZED_SIZE];
        self.serialize(&mut bytes.as_mut_slice())
            .expect("Should serialize pending info");
        bytes
    }

    pub fn serialize<T>(&self, writer: &mut T) -> std::io::Result<()>
    where
        T: Write,
    {
        self.source.serialize(writer)?;
        self.amount.serialize(writer)?;
        writer.write_all(&[self.epoch as u8])
    }

    pub fn deserialize<T>(reader: &mut T) -> Result<Self, DeserializationError>
    where
        T: Read,
    {
        let source = Account::deserialize(reader)?;
        let amount = Amount::deserialize(reader)?;
        let epoch = Epoch::from_u8(read_u8(reader)?).ok_or(DeserializationError::InvalidData)?;
        Ok(Self {
            source,
            amount,
            epoch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_roundtrip() {
        let info = PendingInfo::new_test_instance();
        let bytes = info.to_bytes();
        assert_eq!(bytes.len(), 49);
        let deserialized = PendingInfo::deserialize(&mut bytes.as_slice()).unwrap();
        assert_eq!(deserialized, info);
    }
}
