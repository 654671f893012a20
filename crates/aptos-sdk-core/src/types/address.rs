//! Account address type.
//!
//! Aptos account addresses are 32-byte values. They are rendered following
//! AIP-40: "special" addresses (`0x0` through `0xf`) use the short form and
//! every other address is written out in full as 64 hexadecimal characters.

use crate::bcs::{BcsResult, Decode, Deserializer, Encode, Serializer};
use crate::crypto::hash::sha3_256_of;
use crate::crypto::{DERIVE_OBJECT_SCHEME, NAMED_OBJECT_SCHEME, RESOURCE_ACCOUNT_SCHEME};
use crate::error::{AptosError, AptosResult};
use serde::{Deserialize, Deserializer as SerdeDeserializer, Serialize, Serializer as SerdeSerializer};
use std::fmt;
use std::str::FromStr;

/// The length of an account address in bytes.
pub const ADDRESS_LENGTH: usize = 32;

/// A 32-byte Aptos account address.
///
/// # Display Format
///
/// `Display` follows AIP-40: special addresses print as `0x` and a single hex
/// digit, all others print as the full `0x`-prefixed 64-character form.
///
/// # Example
///
/// ```rust
/// use aptos_sdk_core::AccountAddress;
///
/// let addr = AccountAddress::from_hex("0x1").unwrap();
/// assert_eq!(addr.to_string(), "0x1");
///
/// let addr = AccountAddress::from_hex("0x10").unwrap();
/// assert_eq!(
///     addr.to_string(),
///     "0x0000000000000000000000000000000000000000000000000000000000000010"
/// );
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(any(test, feature = "fuzzing"), derive(proptest_derive::Arbitrary))]
pub struct AccountAddress([u8; ADDRESS_LENGTH]);

impl AccountAddress {
    /// The "zero" address (all zeros).
    pub const ZERO: Self = Self([0u8; ADDRESS_LENGTH]);

    /// The core framework address (0x1).
    pub const ONE: Self = Self::from_u8(1);

    /// The token framework address (0x3).
    pub const THREE: Self = Self::from_u8(3);

    /// The fungible asset framework address (0x4).
    pub const FOUR: Self = Self::from_u8(4);

    /// Creates an address from a byte array.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    const fn from_u8(value: u8) -> Self {
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[ADDRESS_LENGTH - 1] = value;
        Self(bytes)
    }

    /// Parses an address from a hex string, with or without a `0x` prefix.
    ///
    /// Short inputs are right-aligned into 32 bytes and an odd number of
    /// digits is padded with a leading `0`, so `"0x1"`, `"01"` and the full
    /// 64-digit form all parse to the same address.
    ///
    /// # Errors
    ///
    /// [`AptosError::AddressTooShort`] for empty input (including a bare `0x`),
    /// [`AptosError::AddressTooLong`] for more than 64 digits and
    /// [`AptosError::InvalidHex`] for non-hex characters.
    pub fn from_hex<T: AsRef<[u8]>>(hex_str: T) -> AptosResult<Self> {
        let hex_str = hex_str.as_ref();
        let digits = if hex_str.starts_with(b"0x") || hex_str.starts_with(b"0X") {
            &hex_str[2..]
        } else {
            hex_str
        };

        if digits.is_empty() {
            return Err(AptosError::AddressTooShort { length: 0 });
        }
        if digits.len() > ADDRESS_LENGTH * 2 {
            return Err(AptosError::AddressTooLong {
                length: digits.len(),
            });
        }

        let bytes = if digits.len() % 2 == 1 {
            let mut padded = Vec::with_capacity(digits.len() + 1);
            padded.push(b'0');
            padded.extend_from_slice(digits);
            hex::decode(padded)?
        } else {
            hex::decode(digits)?
        };

        let mut address = [0u8; ADDRESS_LENGTH];
        address[ADDRESS_LENGTH - bytes.len()..].copy_from_slice(&bytes);
        Ok(Self(address))
    }

    /// Creates an address from exactly 32 bytes.
    pub fn from_bytes<T: AsRef<[u8]>>(bytes: T) -> AptosResult<Self> {
        let bytes = bytes.as_ref();
        match bytes.len() {
            ADDRESS_LENGTH => {
                let mut address = [0u8; ADDRESS_LENGTH];
                address.copy_from_slice(bytes);
                Ok(Self(address))
            }
            len if len < ADDRESS_LENGTH => Err(AptosError::AddressTooShort { length: len }),
            len => Err(AptosError::AddressTooLong { length: len }),
        }
    }

    /// Returns the address as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the address as a byte array.
    pub fn to_bytes(&self) -> [u8; ADDRESS_LENGTH] {
        self.0
    }

    /// Returns the full 64-character hex form with `0x` prefix.
    pub fn to_long_string(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Returns the AIP-40 form, identical to `Display`.
    pub fn to_standard_string(&self) -> String {
        if self.is_special() {
            format!("0x{:x}", self.0[ADDRESS_LENGTH - 1])
        } else {
            self.to_long_string()
        }
    }

    /// Returns a hex string with all leading zeros trimmed.
    ///
    /// Unlike the AIP-40 form this trims every address, e.g. `0x10` stays `0x10`.
    pub fn to_short_string(&self) -> String {
        let hex = hex::encode(self.0);
        let trimmed = hex.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{trimmed}")
        }
    }

    /// Returns true if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self == &Self::ZERO
    }

    /// Returns true if the first 31 bytes are zero and the last is below 0x10.
    pub fn is_special(&self) -> bool {
        self.0[..ADDRESS_LENGTH - 1].iter().all(|&b| b == 0) && self.0[ADDRESS_LENGTH - 1] < 0x10
    }

    fn derive(&self, seed: &[u8], scheme: u8) -> Self {
        Self(sha3_256_of([self.as_bytes(), seed, &[scheme][..]]))
    }

    /// Address of a named object created by `self` with `seed`.
    pub fn named_object_address(&self, seed: &[u8]) -> Self {
        self.derive(seed, NAMED_OBJECT_SCHEME)
    }

    /// Address of an object derived from the object at `object`, owned by `self`.
    pub fn object_address_from_object(&self, object: &AccountAddress) -> Self {
        self.derive(object.as_bytes(), DERIVE_OBJECT_SCHEME)
    }

    /// Address of a resource account created by `self` with `seed`.
    pub fn resource_account(&self, seed: &[u8]) -> Self {
        self.derive(seed, RESOURCE_ACCOUNT_SCHEME)
    }
}

impl Default for AccountAddress {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({})", self.to_standard_string())
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_standard_string())
    }
}

impl fmt::LowerHex for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for AccountAddress {
    type Err = AptosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Encode for AccountAddress {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_fixed_bytes(&self.0);
    }
}

impl Decode for AccountAddress {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let bytes = de.read_fixed_bytes::<ADDRESS_LENGTH>();
        de.check()?;
        Ok(Self(bytes))
    }
}

impl Serialize for AccountAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: SerdeSerializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_standard_string())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: SerdeDeserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_hex(&s).map_err(serde::de::Error::custom)
        } else {
            let bytes = <[u8; ADDRESS_LENGTH]>::deserialize(deserializer)?;
            Ok(Self(bytes))
        }
    }
}

impl From<[u8; ADDRESS_LENGTH]> for AccountAddress {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl From<AccountAddress> for [u8; ADDRESS_LENGTH] {
    fn from(addr: AccountAddress) -> Self {
        addr.0
    }
}

impl AsRef<[u8]> for AccountAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
