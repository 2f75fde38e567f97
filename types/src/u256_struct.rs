/// Creates a 32-byte big-endian newtype with ordering, hex codec and
/// byte-exact serialization.
#[macro_export]
macro_rules! u256_struct {
    ($name:ident) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name([u8; 32]);

        #[allow(dead_code)]
        impl $name {
            pub const ZERO: Self = Self([0; 32]);
            pub const MAX: Self = Self([0xff; 32]);
            pub const SERIALIZED_SIZE: usize = 32;

            pub const fn from_bytes(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn from_slice(bytes: &[u8]) -> Option<Self> {
                match bytes.try_into() {
                    Ok(value) => Some(Self(value)),
                    Err(_) => None,
                }
            }

            pub const fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0; 32]
            }

            pub fn number(&self) -> primitive_types::U256 {
                primitive_types::U256::from_big_endian(&self.0)
            }

            /// Returns the next key in byte-lexicographic order or `None`
            /// when all bits are set
            pub fn inc(&self) -> Option<Self> {
                self.number()
                    .checked_add(primitive_types::U256::one())
                    .map(Self::from)
            }

            pub fn encode_hex(&self) -> String {
                use std::fmt::Write;
                let mut result = String::with_capacity(64);
                for byte in self.0 {
                    write!(&mut result, "{:02X}", byte).unwrap();
                }
                result
            }

            pub fn decode_hex(s: impl AsRef<str>) -> Option<Self> {
                let mut bytes = [0u8; 32];
                hex::decode_to_slice(s.as_ref(), &mut bytes).ok()?;
                Some(Self(bytes))
            }

            pub fn serialize<W>(&self, writer: &mut W) -> std::io::Result<()>
            where
                W: std::io::Write,
            {
                writer.write_all(&self.0)
            }

            pub fn deserialize<R>(reader: &mut R) -> Result<Self, $crate::DeserializationError>
            where
                R: std::io::Read,
            {
                let mut bytes = [0u8; 32];
                reader.read_exact(&mut bytes)?;
                Ok(Self(bytes))
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                let mut bytes = [0u8; 32];
                bytes[24..].copy_from_slice(&value.to_be_bytes());
                Self(bytes)
            }
        }

        impl From<primitive_types::U256> for $name {
            fn from(value: primitive_types::U256) -> Self {
                Self(value.to_big_endian())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                $crate::write_hex_bytes(&self.0, f)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(self, f)
            }
        }
    };
}

/// Serde support for 32-byte newtypes: serialized as upper-case hex strings
#[macro_export]
macro_rules! serialize_32_byte_string {
    ($name:ident) => {
        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.encode_hex())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                struct HexVisitor;

                impl serde::de::Visitor<'_> for HexVisitor {
                    type Value = $name;

                    fn expecting(
                        &self,
                        formatter: &mut std::fmt::Formatter,
                    ) -> std::fmt::Result {
                        formatter.write_str("a hex string containing 32 bytes")
                    }

                    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
                    where
                        E: serde::de::Error,
                    {
                        $name::decode_hex(v).ok_or_else(|| {
                            serde::de::Error::invalid_value(
                                serde::de::Unexpected::Str(v),
                                &"a hex string containing 32 bytes",
                            )
                        })
                    }
                }

                deserializer.deserialize_str(HexVisitor)
            }
        }
    };
}
