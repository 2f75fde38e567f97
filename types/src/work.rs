use blake2::{
    Blake2bVar,
    digest::{Update, VariableOutput},
};

use crate::{Block, BlockDetails, Epoch, Root, WorkNonce};

/// Computes the proof-of-work difficulty of a nonce against a root
pub struct Difficulty {}

impl Difficulty {
    pub fn get_difficulty(root: &Root, work: WorkNonce) -> u64 {
        let mut hasher = Blake2bVar::new(8).unwrap();
        hasher.update(&u64::from(work).to_le_bytes());
        hasher.update(root.as_bytes());
        let mut output = [0u8; 8];
        hasher.finalize_variable(&mut output).unwrap();
        u64::from_le_bytes(output)
    }
}

/// Minimum difficulty thresholds for work verification. Epoch 2 lowered
/// the bar for receive and epoch blocks and raised it for everything else.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct WorkThresholds {
    pub epoch_1: u64,
    pub epoch_2: u64,
    pub epoch_2_receive: u64,
}

impl WorkThresholds {
    pub const fn new(epoch_1: u64, epoch_2: u64, epoch_2_receive: u64) -> Self {
        Self {
            epoch_1,
            epoch_2,
            epoch_2_receive,
        }
    }

    pub fn publish_full() -> Self {
        Self::new(
            0xffffffc000000000,
            0xfffffff800000000, // 8x higher than epoch_1
            0xfffffe0000000000, // 8x lower than epoch_1
        )
    }

    pub fn publish_beta() -> Self {
        Self::new(
            0xfffff00000000000,
            0xfffff00000000000,
            0xffffe00000000000,
        )
    }

    pub fn publish_dev() -> Self {
        Self::new(
            0xfe00000000000000,
            0xffc0000000000000,
            0xf000000000000000,
        )
    }

    /// All-pass thresholds for unit tests
    pub fn disabled() -> Self {
        Self::new(0, 0, 0)
    }

    pub fn threshold(&self, details: &BlockDetails) -> u64 {
        match details.epoch {
            Epoch::Epoch2 => {
                if details.is_receive || details.is_epoch {
                    self.epoch_2_receive
                } else {
                    self.epoch_2
                }
            }
            Epoch::Epoch0 | Epoch::Epoch1 => self.epoch_1,
        }
    }

    pub fn threshold_base(&self) -> u64 {
        self.epoch_1.max(self.epoch_2)
    }

    pub fn difficulty(&self, block: &Block) -> u64 {
        Difficulty::get_difficulty(&block.root(), block.work())
    }

    pub fn is_valid_pow(&self, block: &Block, details: &BlockDetails) -> bool {
        self.difficulty(block) >= self.threshold(details)
    }
}
