use blake2::{
    Blake2bVar,
    digest::{Update, VariableOutput},
};
use primitive_types::U512;

use crate::{PublicKey, u256_struct};

u256_struct!(Account);

impl serde::Serialize for Account {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.encode_account())
    }
}

impl<'de> serde::Deserialize<'de> for Account {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct AccountVisitor;

        impl serde::de::Visitor<'_> for AccountVisitor {
            type Value = Account;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("an account string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Account::decode_account(v).ok_or_else(|| {
                    serde::de::Error::invalid_value(
                        serde::de::Unexpected::Str(v),
                        &"an account string",
                    )
                })
            }
        }

        deserializer.deserialize_str(AccountVisitor)
    }
}

const ACCOUNT_LOOKUP: &[u8; 32] = b"13456789abcdefghijkmnopqrstuwxyz";
const ACCOUNT_REVERSE: &[u8; 80] =
    b"~0~1234567~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~89:;<=>?@AB~CDEFGHIJK~LMNO~~~~~";

impl Account {
    pub fn as_key(&self) -> PublicKey {
        PublicKey::from_bytes(*self.as_bytes())
    }

    /// Encodes as `nano_` followed by 52 base32 digits of the key and
    /// 8 base32 digits of a BLAKE2b-40 checksum
    pub fn encode_account(&self) -> String {
        self.encode_account_with_prefix("nano_")
    }

    pub fn to_node_id(&self) -> String {
        self.encode_account_with_prefix("node_")
    }

    pub fn encode_account_with_prefix(&self, prefix: &str) -> String {
        let mut number = U512::from_big_endian(self.as_bytes());
        number = (number << 40) | U512::from(self.checksum());

        let mut digits = [0u8; 60];
        for i in 0..60 {
            let r = (number.low_u64() & 0x1f) as usize;
            number = number >> 5;
            digits[59 - i] = ACCOUNT_LOOKUP[r];
        }

        let mut result = String::with_capacity(prefix.len() + 60);
        result.push_str(prefix);
        result.push_str(std::str::from_utf8(&digits).unwrap());
        result
    }

    pub fn decode_account(source: impl AsRef<str>) -> Option<Self> {
        let source = source.as_ref();
        let (prefix_len, expected_len) = if source.starts_with("nano_") || source.starts_with("nano-")
        {
            (5, 65)
        } else if source.starts_with("node_") {
            (5, 65)
        } else if source.starts_with("xrb_") || source.starts_with("xrb-") {
            (4, 64)
        } else {
            return None;
        };

        if source.len() != expected_len {
            return None;
        }

        let digits = &source.as_bytes()[prefix_len..];
        if digits[0] != b'1' && digits[0] != b'3' {
            return None;
        }

        let mut number = U512::zero();
        for &character in digits {
            if !(0x30..0x80).contains(&character) {
                return None;
            }
            let byte = ACCOUNT_REVERSE[(character - 0x30) as usize];
            if byte == b'~' {
                return None;
            }
            number = (number << 5) + U512::from(byte - 0x30);
        }

        let bytes = (number >> 40).to_big_endian();
        let account = Account::from_slice(&bytes[32..])?;
        let check = number.low_u64() & 0xff_ffff_ffff;
        if check != account.checksum() {
            return None;
        }

        Some(account)
    }

    fn checksum(&self) -> u64 {
        let mut hasher = Blake2bVar::new(5).unwrap();
        hasher.update(self.as_bytes());
        let mut check = [0u8; 8];
        hasher
            .finalize_variable(&mut check[..5])
            .expect("checksum hashing failed");
        u64::from_le_bytes(check)
    }
}

impl From<PublicKey> for Account {
    fn from(key: PublicKey) -> Self {
        Account::from_bytes(*key.as_bytes())
    }
}

impl From<&PublicKey> for Account {
    fn from(key: &PublicKey) -> Self {
        Account::from_bytes(*key.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_burn_account() {
        assert_eq!(
            Account::ZERO.encode_account(),
            "nano_1111111111111111111111111111111111111111111111111111hifc8npp"
        );
    }

    #[test]
    fn decode_burn_account() {
        let decoded = Account::decode_account(
            "nano_1111111111111111111111111111111111111111111111111111hifc8npp",
        )
        .unwrap();
        assert_eq!(decoded, Account::ZERO);
    }

    #[test]
    fn encode_decode_roundtrip() {
        let account = Account::from(0x1234_5678_9abc_def0);
        let encoded = account.encode_account();
        assert_eq!(encoded.len(), 65);
        assert!(encoded.starts_with("nano_"));
        assert_eq!(Account::decode_account(&encoded), Some(account));
    }

    #[test]
    fn decode_accepts_dash_separator() {
        let encoded = Account::from(42).encode_account().replace("nano_", "nano-");
        assert_eq!(Account::decode_account(&encoded), Some(Account::from(42)));
    }

    #[test]
    fn decode_legacy_prefix() {
        let account = Account::from(7);
        let legacy = account.encode_account_with_prefix("xrb_");
        assert_eq!(legacy.len(), 64);
        assert_eq!(Account::decode_account(&legacy), Some(account));
    }

    #[test]
    fn node_id_roundtrip() {
        let account = Account::from(99);
        let node_id = account.to_node_id();
        assert!(node_id.starts_with("node_"));
        assert_eq!(Account::decode_account(&node_id), Some(account));
    }

    #[test]
    fn reject_corrupted_checksum() {
        let mut encoded = Account::from(42).encode_account();
        let last = encoded.pop().unwrap();
        let replacement = if last == '1' { '3' } else { '1' };
        encoded.push(replacement);
        assert_eq!(Account::decode_account(&encoded), None);
    }

    #[test]
    fn reject_invalid_characters() {
        assert_eq!(
            Account::decode_account(
                "nano_1111111111111111111111111111111111111111111111111111hifc8nl0"
            ),
            None
        );
        assert_eq!(Account::decode_account("nano_"), None);
        assert_eq!(Account::decode_account("bitcoin"), None);
    }
}
