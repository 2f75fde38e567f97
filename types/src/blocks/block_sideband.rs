use num_traits::FromPrimitive;
use std::io::{Read, Write};

use super::{BlockDetails, BlockType};
use crate::{
    Account, Amount, BlockHash, DeserializationError, Epoch, UnixTimestamp, read_u8, read_u64_be,
};

/// Derived per-block metadata stored alongside the block.
/// Fields that can be recomputed from the block itself are omitted from
/// the serialized form depending on the block type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSideband {
    pub successor: BlockHash,
    pub account: Account,
    pub balance: Amount,
    pub height: u64,
    pub timestamp: UnixTimestamp,
    pub details: BlockDetails,
    pub source_epoch: Epoch,
}

impl BlockSideband {
    pub fn new_test_instance() -> Self {
        Self {
            successor: BlockHash::ZERO,
            account: Account::from(1),
            balance: Amount::raw(42),
            height: 42,
            timestamp: UnixTimestamp::new(1000),
            details: BlockDetails {
                epoch: Epoch::Epoch2,
                is_send: true,
                is_receive: false,
                is_epoch: false,
            },
            source_epoch: Epoch::Epoch2,
        }
    }

    pub fn serialized_size(block_type: BlockType) -> usize {
        let mut size = BlockHash::SERIALIZED_SIZE; // successor

        if block_type != BlockType::State && block_type != BlockType::LegacyOpen {
            size += Account::SERIALIZED_SIZE; // account
        }

        if block_type != BlockType::LegacyOpen {
            size += 8; // height
        }

        if block_type == BlockType::LegacyReceive
            || block_type == BlockType::LegacyChange
            || block_type == BlockType::LegacyOpen
        {
            size += Amount::SERIALIZED_SIZE; // balance
        }

        size += 8; // timestamp

        if block_type == BlockType::State {
            size += BlockDetails::serialized_size() + 1; // details + source epoch
        }

        size
    }

    pub fn serialize<T>(&self, block_type: BlockType, writer: &mut T) -> std::io::Result<()>
    where
        T: Write,
    {
        self.successor.serialize(writer)?;

        if block_type != BlockType::State && block_type != BlockType::LegacyOpen {
            self.account.serialize(writer)?;
        }

        if block_type != BlockType::LegacyOpen {
            writer.write_all(&self.height.to_be_bytes())?;
        }

        if block_type == BlockType::LegacyReceive
            || block_type == BlockType::LegacyChange
            || block_type == BlockType::LegacyOpen
        {
            self.balance.serialize(writer)?;
        }

        writer.write_all(&self.timestamp.to_be_bytes())?;

        if block_type == BlockType::State {
            writer.write_all(&[self.details.packed(), self.source_epoch as u8])?;
        }
        Ok(())
    }

    pub fn deserialize<T>(
        reader: &mut T,
        block_type: BlockType,
    ) -> Result<Self, DeserializationError>
    where
        T: Read,
    {
        let successor = BlockHash::deserialize(reader)?;

        let account = if block_type != BlockType::State && block_type != BlockType::LegacyOpen {
            Account::deserialize(reader)?
        } else {
            Account::ZERO
        };

        let height = if block_type != BlockType::LegacyOpen {
            read_u64_be(reader)?
        } else {
            1
        };

        let balance = if block_type == BlockType::LegacyReceive
            || block_type == BlockType::LegacyChange
            || block_type == BlockType::LegacyOpen
        {
            Amount::deserialize(reader)?
        } else {
            Amount::ZERO
        };

        let timestamp = read_u64_be(reader)?.into();

        let (details, source_epoch) = if block_type == BlockType::State {
            let details = BlockDetails::deserialize(reader)?;
            let source_epoch = Epoch::from_u8(read_u8(reader)?)
                .ok_or(DeserializationError::InvalidData)?;
            (details, source_epoch)
        } else {
            (BlockDetails::default(), Epoch::Epoch0)
        };

        Ok(Self {
            successor,
            account,
            balance,
            height,
            timestamp,
            details,
            source_epoch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_legacy_receive() {
        let sideband = BlockSideband {
            successor: BlockHash::from(7),
            account: Account::from(1),
            balance: Amount::raw(3),
            height: 4,
            timestamp: UnixTimestamp::new(5),
            details: BlockDetails::default(),
            source_epoch: Epoch::Epoch0,
        };
        let mut buffer = Vec::new();

        sideband
            .serialize(BlockType::LegacyReceive, &mut buffer)
            .unwrap();
        assert_eq!(
            buffer.len(),
            BlockSideband::serialized_size(BlockType::LegacyReceive)
        );

        let deserialized =
            BlockSideband::deserialize(&mut buffer.as_slice(), BlockType::LegacyReceive).unwrap();
        assert_eq!(deserialized, sideband);
    }

    #[test]
    fn serialize_state() {
        let sideband = BlockSideband::new_test_instance();
        let mut buffer = Vec::new();

        sideband.serialize(BlockType::State, &mut buffer).unwrap();
        assert_eq!(buffer.len(), BlockSideband::serialized_size(BlockType::State));

        let mut deserialized =
            BlockSideband::deserialize(&mut buffer.as_slice(), BlockType::State).unwrap();
        // account and balance are not serialized for state blocks, the
        // block itself carries them
        deserialized.account = sideband.account;
        deserialized.balance = sideband.balance;
        assert_eq!(deserialized, sideband);
    }

    #[test]
    fn serialized_size() {
        assert_eq!(
            BlockSideband::serialized_size(BlockType::LegacySend),
            80,
            "legacy send"
        );
        assert_eq!(
            BlockSideband::serialized_size(BlockType::LegacyReceive),
            96,
            "legacy receive"
        );
        assert_eq!(
            BlockSideband::serialized_size(BlockType::LegacyOpen),
            56,
            "legacy open"
        );
        assert_eq!(
            BlockSideband::serialized_size(BlockType::LegacyChange),
            96,
            "legacy change"
        );
        assert_eq!(BlockSideband::serialized_size(BlockType::State), 50, "state");
    }
}
