use std::collections::BTreeMap;

use num_derive::FromPrimitive;

use crate::{Account, Block, Link, PublicKey, SignatureError};

/// Metadata-only chain upgrade era. Upgrades are strictly sequential for
/// opened accounts.
#[repr(u8)]
#[derive(
    FromPrimitive, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default,
)]
pub enum Epoch {
    #[default]
    Epoch0 = 0,
    Epoch1 = 1,
    Epoch2 = 2,
}

impl Epoch {
    pub const MAX: Epoch = Epoch::Epoch2;

    pub fn epoch_number(&self) -> u8 {
        *self as u8
    }
}

struct EpochInfo {
    signer: PublicKey,
    link: Link,
}

/// Registry of epoch upgrade links and the accounts allowed to sign
/// upgrade blocks for them
#[derive(Default)]
pub struct Epochs {
    epochs: BTreeMap<Epoch, EpochInfo>,
}

impl Epochs {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add(&mut self, epoch: Epoch, signer: PublicKey, link: Link) {
        self.epochs.insert(epoch, EpochInfo { signer, link });
    }

    pub fn is_epoch_link(&self, link: &Link) -> bool {
        self.epochs.values().any(|info| &info.link == link)
    }

    pub fn epoch(&self, link: &Link) -> Option<Epoch> {
        self.epochs
            .iter()
            .find(|(_, info)| &info.link == link)
            .map(|(epoch, _)| *epoch)
    }

    pub fn signer(&self, epoch: Epoch) -> Option<&PublicKey> {
        self.epochs.get(&epoch).map(|info| &info.signer)
    }

    pub fn link(&self, epoch: Epoch) -> Option<&Link> {
        self.epochs.get(&epoch).map(|info| &info.link)
    }

    /// The account that must have signed an upgrade block with the given
    /// epoch link
    pub fn epoch_signer(&self, link: &Link) -> Option<Account> {
        let epoch = self.epoch(link)?;
        self.signer(epoch).map(|signer| signer.into())
    }

    pub fn is_sequential(from: Epoch, to: Epoch) -> bool {
        (to as u8) == (from as u8) + 1
    }

    pub fn validate_epoch_signature(&self, block: &Block) -> Result<(), SignatureError> {
        let link = block.link_field().ok_or(SignatureError {})?;
        let signer = self.epoch_signer(&link).ok_or(SignatureError {})?;
        signer
            .as_key()
            .verify(block.hash().as_bytes(), block.signature())
    }
}
