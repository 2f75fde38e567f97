use num_traits::FromPrimitive;
use static_assertions::const_assert;
use std::io::Read;

use crate::{DeserializationError, Epoch, read_u8};

/// Derived facts about a block, stored in its sideband
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BlockDetails {
    pub epoch: Epoch,
    pub is_send: bool,
    pub is_receive: bool,
    pub is_epoch: bool,
}

const_assert!(std::mem::size_of::<Epoch>() == 1);

impl BlockDetails {
    pub fn new(epoch: Epoch, is_send: bool, is_receive: bool, is_epoch: bool) -> Self {
        Self {
            epoch,
            is_send,
            is_receive,
            is_epoch,
        }
    }

    pub const fn serialized_size() -> usize {
        1
    }

    /// Epoch in the low five bits, flags in the high three
    pub fn packed(&self) -> u8 {
        let mut result = self.epoch as u8;
        if self.is_send {
            result |= 0b1000_0000;
        }
        if self.is_receive {
            result |= 0b0100_0000;
        }
        if self.is_epoch {
            result |= 0b0010_0000;
        }
        result
    }

    pub fn unpack(packed: u8) -> Result<Self, DeserializationError> {
        let epoch =
            Epoch::from_u8(packed & 0b0001_1111).ok_or(DeserializationError::InvalidData)?;
        Ok(Self {
            epoch,
            is_send: packed & 0b1000_0000 != 0,
            is_receive: packed & 0b0100_0000 != 0,
            is_epoch: packed & 0b0010_0000 != 0,
        })
    }

    pub fn deserialize<T>(reader: &mut T) -> Result<Self, DeserializationError>
    where
        T: Read,
    {
        Self::unpack(read_u8(reader)?)
    }
}

impl Default for BlockDetails {
    fn default() -> Self {
        Self::new(Epoch::Epoch0, false, false, false)
    }
}
