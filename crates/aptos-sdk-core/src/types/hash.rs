//! 32-byte digests.
//!
//! [`HashValue`] is what [`SignedTransaction::hash`] returns and what the
//! domain-separation prehashes are made of. It encodes in BCS as a fixed
//! 32-byte array with no length prefix.
//!
//! [`SignedTransaction::hash`]: crate::transaction::SignedTransaction::hash

use crate::bcs::{self, BcsResult, Decode, Encode};
use crate::crypto::hash::{sha3_256, sha3_256_of};
use crate::error::{AptosError, AptosResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The length of a hash value in bytes.
pub const HASH_LENGTH: usize = 32;

/// A SHA3-256 digest.
///
/// ```rust
/// use aptos_sdk_core::HashValue;
///
/// let empty = HashValue::sha3_256(b"");
/// assert_eq!(
///     empty.to_string(),
///     "0xa7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
/// );
/// assert_eq!(empty.to_string().parse::<HashValue>().unwrap(), empty);
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HashValue([u8; HASH_LENGTH]);

impl HashValue {
    /// All zeros.
    pub const ZERO: Self = Self([0u8; HASH_LENGTH]);

    /// Wraps raw digest bytes.
    pub const fn new(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Digests `data`.
    pub fn sha3_256<T: AsRef<[u8]>>(data: T) -> Self {
        Self(sha3_256(data.as_ref()))
    }

    /// Digests the concatenation of `items` without copying them together.
    pub fn sha3_256_of<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        Self(sha3_256_of(items))
    }

    /// Parses exactly 64 hex digits, optionally prefixed by `0x`.
    ///
    /// # Errors
    ///
    /// Returns [`AptosError::InvalidHex`] for non-hex input and
    /// [`AptosError::Internal`] for any other length.
    pub fn from_hex<T: AsRef<str>>(hex_str: T) -> AptosResult<Self> {
        let digits = hex_str.as_ref();
        let digits = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
            .unwrap_or(digits);
        if digits.len() != HASH_LENGTH * 2 {
            return Err(AptosError::Internal(format!(
                "hash must be {} hex digits, got {}",
                HASH_LENGTH * 2,
                digits.len()
            )));
        }
        let mut bytes = [0u8; HASH_LENGTH];
        hex::decode_to_slice(digits, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Copies a 32-byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`AptosError::Internal`] if `bytes` is not 32 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        <[u8; HASH_LENGTH]>::try_from(bytes)
            .map(Self)
            .map_err(|_| {
                AptosError::Internal(format!(
                    "hash must be {HASH_LENGTH} bytes, got {}",
                    bytes.len()
                ))
            })
    }

    /// Borrows the digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Copies out the digest bytes.
    pub fn to_bytes(&self) -> [u8; HASH_LENGTH] {
        self.0
    }

    /// Lowercase hex with a `0x` prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Whether every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; HASH_LENGTH]
    }
}

impl Encode for HashValue {
    fn encode(&self, ser: &mut bcs::Serializer) {
        ser.write_fixed_bytes(&self.0);
    }
}

impl Decode for HashValue {
    fn decode(de: &mut bcs::Deserializer<'_>) -> BcsResult<Self> {
        let bytes = de.read_fixed_bytes::<HASH_LENGTH>();
        de.check()?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashValue({self})")
    }
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        fmt::LowerHex::fmt(self, f)
    }
}

impl fmt::LowerHex for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for HashValue {
    type Err = AptosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for HashValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for HashValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
            Self::from_hex(s).map_err(serde::de::Error::custom)
        } else {
            <[u8; HASH_LENGTH]>::deserialize(deserializer).map(Self)
        }
    }
}

impl From<[u8; HASH_LENGTH]> for HashValue {
    fn from(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl From<HashValue> for [u8; HASH_LENGTH] {
    fn from(hash: HashValue) -> Self {
        hash.0
    }
}

impl AsRef<[u8]> for HashValue {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
