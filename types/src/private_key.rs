use std::sync::LazyLock;

use ed25519_dalek::Signer;
use rand::Rng;

use crate::{Account, PublicKey, RawKey, Signature};

/// An Ed25519 signing key
#[derive(Clone)]
pub struct PrivateKey {
    raw_key: RawKey,
    signing_key: ed25519_dalek::SigningKey,
}

impl PrivateKey {
    pub fn new() -> Self {
        let bytes: [u8; 32] = rand::rng().random();
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        let secret = ed25519_dalek::SecretKey::from(bytes);
        Self {
            raw_key: RawKey::from_bytes(bytes),
            signing_key: ed25519_dalek::SigningKey::from(&secret),
        }
    }

    pub fn decode_hex(s: impl AsRef<str>) -> Option<Self> {
        RawKey::decode_hex(s).map(|raw| Self::from_bytes(*raw.as_bytes()))
    }

    pub fn raw_key(&self) -> RawKey {
        self.raw_key
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_bytes(self.signing_key.verifying_key().to_bytes())
    }

    pub fn account(&self) -> Account {
        self.public_key().into()
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature::from_bytes(self.signing_key.sign(message).to_bytes())
    }
}

impl Default for PrivateKey {
    fn default() -> Self {
        Self::new()
    }
}

impl From<u64> for PrivateKey {
    fn from(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Self::from_bytes(bytes)
    }
}

impl From<RawKey> for PrivateKey {
    fn from(value: RawKey) -> Self {
        Self::from_bytes(*value.as_bytes())
    }
}

impl From<&PrivateKey> for Account {
    fn from(key: &PrivateKey) -> Self {
        key.account()
    }
}

impl From<&PrivateKey> for PublicKey {
    fn from(key: &PrivateKey) -> Self {
        key.public_key()
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the secret
        write!(f, "PrivateKey({})", self.account().encode_account())
    }
}

/// The well known private key of the development network genesis account
pub static DEV_GENESIS_KEY: LazyLock<PrivateKey> = LazyLock::new(|| {
    PrivateKey::decode_hex("34F0A37AAD20F4A260F0A5B3CB3D7FB50673212263E58A380BC10474BB039CE4")
        .unwrap()
});

pub(crate) static TEST_KEY: LazyLock<PrivateKey> = LazyLock::new(|| PrivateKey::from(42));
