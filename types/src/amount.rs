use std::{
    fmt::{Debug, Display},
    io::{Read, Write},
    iter::Sum,
    ops::{Add, AddAssign, Sub, SubAssign},
};

use serde::de::{Unexpected, Visitor};

use crate::DeserializationError;

/// A balance or transfer amount in raw units (128 bit unsigned)
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(u128::MAX);
    pub const SERIALIZED_SIZE: usize = 16;

    /// 10^30 raw
    const NANO_RATIO: u128 = 1_000_000_000_000_000_000_000_000_000_000;

    pub const fn raw(value: u128) -> Self {
        Self(value)
    }

    pub const fn nano(value: u128) -> Self {
        Self(value * Self::NANO_RATIO)
    }

    pub const fn number(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn to_be_bytes(self) -> [u8; 16] {
        self.0.to_be_bytes()
    }

    pub fn from_be_bytes(bytes: [u8; 16]) -> Self {
        Self(u128::from_be_bytes(bytes))
    }

    pub fn checked_add(&self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(&self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn wrapping_add(&self, other: Amount) -> Amount {
        Self(self.0.wrapping_add(other.0))
    }

    pub fn wrapping_sub(&self, other: Amount) -> Amount {
        Self(self.0.wrapping_sub(other.0))
    }

    pub fn serialize<W>(&self, writer: &mut W) -> std::io::Result<()>
    where
        W: Write,
    {
        writer.write_all(&self.to_be_bytes())
    }

    pub fn deserialize<R>(reader: &mut R) -> Result<Self, DeserializationError>
    where
        R: Read,
    {
        let mut bytes = [0u8; 16];
        reader.read_exact(&mut bytes)?;
        Ok(Self::from_be_bytes(bytes))
    }

    pub fn encode_hex(&self) -> String {
        format!("{:032X}", self.0)
    }

    pub fn decode_hex(s: impl AsRef<str>) -> Option<Self> {
        u128::from_str_radix(s.as_ref(), 16).ok().map(Self)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |a, b| a + b)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

impl serde::Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(AmountVisitor {})
    }
}

struct AmountVisitor {}

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a decimal amount string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        let raw: u128 = v.parse().map_err(|_| {
            serde::de::Error::invalid_value(Unexpected::Str(v), &"a decimal amount string")
        })?;
        Ok(Amount::raw(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_order_is_big_endian() {
        let mut buffer = Vec::new();
        Amount::raw(1).serialize(&mut buffer).unwrap();
        assert_eq!(buffer[15], 1);
        assert_eq!(buffer[0], 0);
    }

    #[test]
    fn nano_ratio() {
        assert_eq!(
            Amount::nano(1),
            Amount::raw(1_000_000_000_000_000_000_000_000_000_000)
        );
    }

    #[test]
    fn wrapping_sub_for_weight_deltas() {
        let negative = Amount::ZERO.wrapping_sub(Amount::raw(10));
        assert_eq!(Amount::raw(5).wrapping_add(negative), Amount::ZERO.wrapping_sub(Amount::raw(5)));
    }

    #[test]
    fn serde_roundtrip() {
        let json = serde_json::to_string(&Amount::raw(420)).unwrap();
        assert_eq!(json, "\"420\"");
        let parsed: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Amount::raw(420));
    }
}
