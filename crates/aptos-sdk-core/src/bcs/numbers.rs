//! 256-bit integers as they travel over the wire.
//!
//! Both types store 32 little-endian bytes. `I256` is two's complement.
//! Decimal parsing and formatting go through `num-bigint`; arithmetic is
//! out of scope.

use num_bigint::{BigInt, BigUint};
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// An unsigned 256-bit integer.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(any(test, feature = "fuzzing"), derive(proptest_derive::Arbitrary))]
pub struct U256([u8; 32]);

impl U256 {
    /// Zero.
    pub const ZERO: Self = Self([0u8; 32]);
    /// The largest value, 2^256 - 1.
    pub const MAX: Self = Self([0xff; 32]);

    /// Creates a value from 32 little-endian bytes.
    pub const fn from_le_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the 32 little-endian bytes.
    pub const fn to_le_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Returns the value as a `u128` if it fits.
    pub fn to_u128(&self) -> Option<u128> {
        if self.0[16..].iter().any(|b| *b != 0) {
            return None;
        }
        let mut low = [0u8; 16];
        low.copy_from_slice(&self.0[..16]);
        Some(u128::from_le_bytes(low))
    }

    fn to_biguint(self) -> BigUint {
        BigUint::from_bytes_le(&self.0)
    }
}

impl From<u128> for U256 {
    fn from(value: u128) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(&value.to_le_bytes());
        Self(bytes)
    }
}

impl From<u64> for U256 {
    fn from(value: u64) -> Self {
        Self::from(u128::from(value))
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.iter().rev().cmp(other.0.iter().rev())
    }
}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for U256 {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = BigUint::from_str(s).map_err(|e| format!("invalid u256 '{s}': {e}"))?;
        let le = value.to_bytes_le();
        if le.len() > 32 {
            return Err(format!("u256 out of range: {s}"));
        }
        let mut bytes = [0u8; 32];
        bytes[..le.len()].copy_from_slice(&le);
        Ok(Self(bytes))
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_biguint())
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U256({self})")
    }
}

impl Serialize for U256 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for U256 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        U256::from_str(&string).map_err(D::Error::custom)
    }
}

/// A signed 256-bit integer in two's complement.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(any(test, feature = "fuzzing"), derive(proptest_derive::Arbitrary))]
pub struct I256([u8; 32]);

impl I256 {
    /// Zero.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates a value from 32 little-endian two's complement bytes.
    pub const fn from_le_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the 32 little-endian two's complement bytes.
    pub const fn to_le_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Returns true if the top bit is set.
    pub const fn is_negative(&self) -> bool {
        self.0[31] & 0x80 != 0
    }

    fn to_bigint(self) -> BigInt {
        BigInt::from_signed_bytes_le(&self.0)
    }
}

impl From<i128> for I256 {
    fn from(value: i128) -> Self {
        let fill = if value < 0 { 0xff } else { 0x00 };
        let mut bytes = [fill; 32];
        bytes[..16].copy_from_slice(&value.to_le_bytes());
        Self(bytes)
    }
}

impl From<i64> for I256 {
    fn from(value: i64) -> Self {
        Self::from(i128::from(value))
    }
}

impl Ord for I256 {
    fn cmp(&self, other: &Self) -> Ordering {
        // Flipping the sign bit maps two's complement onto unsigned order.
        let key = |v: &Self| {
            let mut b = v.0;
            b[31] ^= 0x80;
            U256(b)
        };
        key(self).cmp(&key(other))
    }
}

impl PartialOrd for I256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for I256 {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = BigInt::from_str(s).map_err(|e| format!("invalid i256 '{s}': {e}"))?;
        let le = value.to_signed_bytes_le();
        if le.len() > 32 {
            return Err(format!("i256 out of range: {s}"));
        }
        let fill = if value.sign() == num_bigint::Sign::Minus {
            0xff
        } else {
            0x00
        };
        let mut bytes = [fill; 32];
        bytes[..le.len()].copy_from_slice(&le);
        Ok(Self(bytes))
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_bigint())
    }
}

impl fmt::Debug for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I256({self})")
    }
}

impl Serialize for I256 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for I256 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        I256::from_str(&string).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u256_decimal_roundtrip() {
        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        let value = U256::from_str(max).unwrap();
        assert_eq!(value, U256::MAX);
        assert_eq!(value.to_string(), max);
        assert_eq!(U256::from_str("0").unwrap(), U256::ZERO);
    }

    #[test]
    fn test_u256_out_of_range() {
        let too_big =
            "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert!(U256::from_str(too_big).is_err());
        assert!(U256::from_str("-1").is_err());
        assert!(U256::from_str("abc").is_err());
    }

    #[test]
    fn test_u256_from_u128() {
        let value = U256::from(12345u128);
        assert_eq!(value.to_le_bytes()[0], 0x39);
        assert_eq!(value.to_le_bytes()[1], 0x30);
        assert_eq!(value.to_u128(), Some(12345));
        assert_eq!(U256::MAX.to_u128(), None);
    }

    #[test]
    fn test_u256_ordering() {
        assert!(U256::from(1u64) < U256::from(2u64));
        assert!(U256::from(u128::MAX) < U256::MAX);
    }

    #[test]
    fn test_i256_negative() {
        let minus_one = I256::from(-1i64);
        assert_eq!(minus_one.to_le_bytes(), [0xff; 32]);
        assert!(minus_one.is_negative());
        assert_eq!(minus_one.to_string(), "-1");
        assert_eq!(I256::from_str("-1").unwrap(), minus_one);
    }

    #[test]
    fn test_i256_ordering() {
        assert!(I256::from(-5i64) < I256::from(3i64));
        assert!(I256::from(-5i64) < I256::from(-1i64));
        assert!(I256::ZERO < I256::from(1i64));
    }

    #[test]
    fn test_i256_bounds() {
        let min = "-57896044618658097711785492504343953926634992332820282019728792003956564819968";
        let value = I256::from_str(min).unwrap();
        assert_eq!(value.to_le_bytes()[31], 0x80);
        assert_eq!(value.to_string(), min);
        let below =
            "-57896044618658097711785492504343953926634992332820282019728792003956564819969";
        assert!(I256::from_str(below).is_err());
    }

    #[test]
    fn test_json_as_string() {
        let value = U256::from(7u64);
        assert_eq!(serde_json::to_string(&value).unwrap(), "\"7\"");
        let parsed: I256 = serde_json::from_str("\"-42\"").unwrap();
        assert_eq!(parsed, I256::from(-42i64));
    }
}
