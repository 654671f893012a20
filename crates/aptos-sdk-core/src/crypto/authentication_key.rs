//! Authentication keys.

use crate::bcs::{BcsResult, Decode, Deserializer, Encode, Serializer};
use crate::crypto::hash::sha3_256_of;
use crate::crypto::traits::decode_hex;
use crate::error::{AptosError, AptosResult};
use crate::types::AccountAddress;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of an authentication key in bytes.
pub const AUTHENTICATION_KEY_LENGTH: usize = 32;

/// An authentication key used to verify account ownership.
///
/// Computed as `SHA3-256(public_key_bytes || scheme)`. A fresh account's
/// address equals its authentication key; rotating keys changes the
/// authentication key but not the address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AuthenticationKey([u8; AUTHENTICATION_KEY_LENGTH]);

impl AuthenticationKey {
    /// Creates an authentication key from bytes.
    pub const fn new(bytes: [u8; AUTHENTICATION_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Derives the authentication key for serialized public key bytes under
    /// the given scheme byte.
    ///
    /// For single-key and multi-key schemes the bytes must already be the
    /// BCS encoding of the tagged key, so the key type is committed to.
    pub fn from_public_key_and_scheme(public_key: &[u8], scheme: u8) -> Self {
        Self(sha3_256_of([public_key, &[scheme][..]]))
    }

    /// Creates an authentication key from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`AptosError::InvalidKeyLength`] if the slice is not 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        let key: [u8; AUTHENTICATION_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            AptosError::key_length("authentication", bytes.len(), AUTHENTICATION_KEY_LENGTH)
        })?;
        Ok(Self(key))
    }

    /// Creates an authentication key from a hex string.
    ///
    /// # Errors
    ///
    /// Returns an error if the hex is invalid or does not decode to 32 bytes.
    pub fn from_hex(hex_str: &str) -> AptosResult<Self> {
        Self::from_bytes(&decode_hex(hex_str)?)
    }

    /// Returns the authentication key as bytes.
    pub fn as_bytes(&self) -> &[u8; AUTHENTICATION_KEY_LENGTH] {
        &self.0
    }

    /// Returns the authentication key as a byte array.
    pub fn to_bytes(&self) -> [u8; AUTHENTICATION_KEY_LENGTH] {
        self.0
    }

    /// Returns the authentication key as a hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Returns the address of an account created with this key.
    pub fn to_address(&self) -> AccountAddress {
        AccountAddress::new(self.0)
    }
}

impl fmt::Debug for AuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthenticationKey({})", self.to_hex())
    }
}

impl fmt::Display for AuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; AUTHENTICATION_KEY_LENGTH]> for AuthenticationKey {
    fn from(bytes: [u8; AUTHENTICATION_KEY_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl From<AuthenticationKey> for AccountAddress {
    fn from(key: AuthenticationKey) -> Self {
        key.to_address()
    }
}

impl Encode for AuthenticationKey {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_fixed_bytes(&self.0);
    }
}

impl Decode for AuthenticationKey {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let bytes = de.read_fixed_bytes::<AUTHENTICATION_KEY_LENGTH>();
        de.check()?;
        Ok(Self(bytes))
    }
}

impl Serialize for AuthenticationKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for AuthenticationKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_hex(&s).map_err(serde::de::Error::custom)
        } else {
            let bytes = <[u8; AUTHENTICATION_KEY_LENGTH]>::deserialize(deserializer)?;
            Ok(Self(bytes))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcs;
    use crate::crypto::sha3_256;

    #[test]
    fn test_derivation_appends_scheme() {
        let key = AuthenticationKey::from_public_key_and_scheme(&[7u8; 32], 2);
        let mut preimage = vec![7u8; 32];
        preimage.push(2);
        assert_eq!(key.to_bytes(), sha3_256(&preimage));
        assert_ne!(key, AuthenticationKey::from_public_key_and_scheme(&[7u8; 32], 0));
    }

    #[test]
    fn test_hex_roundtrip() {
        let key = AuthenticationKey::new([0xab; 32]);
        let hex = key.to_hex();
        assert_eq!(hex.len(), 66);
        assert_eq!(AuthenticationKey::from_hex(&hex).unwrap(), key);
        assert_eq!(AuthenticationKey::from_hex(&hex[2..]).unwrap(), key);
    }

    #[test]
    fn test_from_bytes_invalid_length() {
        assert!(matches!(
            AuthenticationKey::from_bytes(&[5u8; 16]),
            Err(AptosError::InvalidKeyLength { actual: 16, .. })
        ));
    }

    #[test]
    fn test_to_address() {
        let key = AuthenticationKey::new([42u8; 32]);
        assert_eq!(key.to_address().as_bytes(), &[42u8; 32]);
        let address: AccountAddress = key.into();
        assert_eq!(address, key.to_address());
    }

    #[test]
    fn test_bcs_fixed_width() {
        let key = AuthenticationKey::new([9u8; 32]);
        let bytes = bcs::to_bytes(&key).unwrap();
        assert_eq!(bytes, vec![9u8; 32]);
        assert_eq!(bcs::from_bytes::<AuthenticationKey>(&bytes).unwrap(), key);
    }

    #[test]
    fn test_json_is_hex() {
        let key = AuthenticationKey::new([0xff; 32]);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "ff".repeat(32)));
        let parsed: AuthenticationKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);
    }
}
