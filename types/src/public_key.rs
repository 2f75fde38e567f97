use ed25519_dalek::Verifier;
use thiserror::Error;

use crate::{Account, RawKey, Signature, serialize_32_byte_string, u256_struct};

u256_struct!(PublicKey);
serialize_32_byte_string!(PublicKey);

impl PublicKey {
    pub fn as_account(&self) -> Account {
        self.into()
    }

    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), SignatureError> {
        let public =
            ed25519_dalek::VerifyingKey::from_bytes(self.as_bytes()).map_err(|_| SignatureError {})?;
        let sig = ed25519_dalek::Signature::from_bytes(signature.as_bytes());
        public.verify(message, &sig).map_err(|_| SignatureError {})?;
        Ok(())
    }
}

impl From<RawKey> for PublicKey {
    fn from(value: RawKey) -> Self {
        let secret = ed25519_dalek::SecretKey::from(*value.as_bytes());
        let signing_key = ed25519_dalek::SigningKey::from(&secret);
        let public = ed25519_dalek::VerifyingKey::from(&signing_key);
        Self::from_bytes(public.to_bytes())
    }
}

impl From<Account> for PublicKey {
    fn from(account: Account) -> Self {
        Self::from_bytes(*account.as_bytes())
    }
}

impl From<&Account> for PublicKey {
    fn from(account: &Account) -> Self {
        Self::from_bytes(*account.as_bytes())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub struct SignatureError {}

impl std::fmt::Display for SignatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid signature")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_signature_error() {
        let key = PublicKey::from(123);
        let error = key
            .verify(b"test message", &Signature::from_bytes([1; 64]))
            .unwrap_err();
        assert_eq!(error.to_string(), "invalid signature");
    }
}
