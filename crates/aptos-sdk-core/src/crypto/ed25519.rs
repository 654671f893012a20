//! Ed25519 signature scheme implementation.
//!
//! Ed25519 is the default and most commonly used signature scheme on Aptos.
//! Messages are signed as-is; there is no prehashing.

use crate::bcs::{BcsError, BcsResult, Decode, Deserializer, Encode, Serializer};
use crate::crypto::traits::{decode_hex, strip_aip80_prefix, PublicKey, Signature, Signer, Verifier};
use crate::crypto::{AuthenticationKey, ED25519_SCHEME};
use crate::error::{AptosError, AptosResult};
use crate::types::AccountAddress;
use ed25519_dalek::Signer as DalekSigner;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

/// Ed25519 private key length in bytes.
pub const ED25519_PRIVATE_KEY_LENGTH: usize = 32;
/// Ed25519 public key length in bytes.
pub const ED25519_PUBLIC_KEY_LENGTH: usize = 32;
/// Ed25519 signature length in bytes.
pub const ED25519_SIGNATURE_LENGTH: usize = 64;

const PRIVATE_KEY_AIP80_PREFIX: &str = "ed25519-priv-";
const PUBLIC_KEY_AIP80_PREFIX: &str = "ed25519-pub-";

/// An Ed25519 private key.
///
/// The private key is zeroized when dropped to prevent sensitive
/// data from remaining in memory. It cannot be serialized and its
/// `Debug` output is redacted.
///
/// # Example
///
/// ```rust
/// use aptos_sdk_core::crypto::Ed25519PrivateKey;
///
/// // Generate a random key
/// let private_key = Ed25519PrivateKey::generate();
///
/// // Sign a message
/// let signature = private_key.sign(b"hello");
///
/// // Verify with the public key
/// assert!(private_key.public_key().verify(b"hello", &signature));
/// ```
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct Ed25519PrivateKey {
    #[zeroize(skip)]
    #[allow(unused)] // Field is used; lint false positive from Zeroize derive
    inner: ed25519_dalek::SigningKey,
}

impl Ed25519PrivateKey {
    /// Generates a new random Ed25519 private key.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        let signing_key = ed25519_dalek::SigningKey::generate(&mut csprng);
        Self { inner: signing_key }
    }

    /// Creates a private key from its 32-byte seed.
    ///
    /// # Errors
    ///
    /// Returns [`AptosError::InvalidKeyLength`] if the slice is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        let key_bytes: [u8; ED25519_PRIVATE_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            AptosError::key_length("Ed25519", bytes.len(), ED25519_PRIVATE_KEY_LENGTH)
        })?;
        let signing_key = ed25519_dalek::SigningKey::from_bytes(&key_bytes);
        Ok(Self { inner: signing_key })
    }

    /// Creates a private key from a hex string.
    ///
    /// Accepts a bare or `0x`-prefixed hex string, or the AIP-80 form
    /// `ed25519-priv-0x...`.
    ///
    /// # Errors
    ///
    /// Returns [`AptosError::InvalidHex`] if the hex string is invalid, or
    /// [`AptosError::InvalidKeyLength`] if it does not decode to 32 bytes.
    pub fn from_hex(hex_str: &str) -> AptosResult<Self> {
        let bytes = decode_hex(strip_aip80_prefix(hex_str, PRIVATE_KEY_AIP80_PREFIX))?;
        Self::from_bytes(&bytes)
    }

    /// Creates a private key from AIP-80 format string.
    ///
    /// AIP-80 format: `ed25519-priv-0x{hex_bytes}`
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix is missing or the key bytes are invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use aptos_sdk_core::crypto::Ed25519PrivateKey;
    ///
    /// let key = Ed25519PrivateKey::from_aip80(
    ///     "ed25519-priv-0x0000000000000000000000000000000000000000000000000000000000000001"
    /// ).unwrap();
    /// ```
    pub fn from_aip80(s: &str) -> AptosResult<Self> {
        match s.strip_prefix(PRIVATE_KEY_AIP80_PREFIX) {
            Some(hex_part) => Self::from_hex(hex_part),
            None => Err(AptosError::InvalidPrivateKey(format!(
                "invalid AIP-80 format: expected prefix '{PRIVATE_KEY_AIP80_PREFIX}'"
            ))),
        }
    }

    /// Returns the private key seed.
    ///
    /// **Warning**: Handle the returned bytes carefully to avoid leaking
    /// sensitive key material.
    pub fn to_bytes(&self) -> [u8; ED25519_PRIVATE_KEY_LENGTH] {
        self.inner.to_bytes()
    }

    /// Returns the private key as a hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.inner.to_bytes()))
    }

    /// Returns the private key in AIP-80 format.
    pub fn to_aip80(&self) -> String {
        format!("{PRIVATE_KEY_AIP80_PREFIX}{}", self.to_hex())
    }

    /// Returns the corresponding public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey {
            inner: self.inner.verifying_key(),
        }
    }

    /// Signs a message and returns the signature.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        let signature = self.inner.sign(message);
        Ed25519Signature { inner: signature }
    }
}

impl Signer for Ed25519PrivateKey {
    type Signature = Ed25519Signature;

    fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519PrivateKey::sign(self, message)
    }

    fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PrivateKey::public_key(self)
    }
}

impl fmt::Debug for Ed25519PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PrivateKey(<PrivateKey:REDACTED>)")
    }
}

/// An Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519PublicKey {
    inner: ed25519_dalek::VerifyingKey,
}

impl Ed25519PublicKey {
    /// Creates a public key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AptosError::InvalidKeyLength`] if the slice is not 32 bytes, or
    /// [`AptosError::InvalidCurvePoint`] if it does not decompress to a curve point.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        let key_bytes: [u8; ED25519_PUBLIC_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            AptosError::key_length("Ed25519", bytes.len(), ED25519_PUBLIC_KEY_LENGTH)
        })?;
        let verifying_key = ed25519_dalek::VerifyingKey::from_bytes(&key_bytes)
            .map_err(|_| AptosError::InvalidCurvePoint("Ed25519"))?;
        Ok(Self {
            inner: verifying_key,
        })
    }

    /// Creates a public key from a hex string, `0x`-prefixed or AIP-80.
    ///
    /// # Errors
    ///
    /// Returns an error if the hex is invalid or the bytes are not a valid key.
    pub fn from_hex(hex_str: &str) -> AptosResult<Self> {
        let bytes = decode_hex(strip_aip80_prefix(hex_str, PUBLIC_KEY_AIP80_PREFIX))?;
        Self::from_bytes(&bytes)
    }

    /// Creates a public key from AIP-80 format string (`ed25519-pub-0x...`).
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix is missing or the key bytes are invalid.
    pub fn from_aip80(s: &str) -> AptosResult<Self> {
        match s.strip_prefix(PUBLIC_KEY_AIP80_PREFIX) {
            Some(hex_part) => Self::from_hex(hex_part),
            None => Err(AptosError::InvalidPublicKey(format!(
                "invalid AIP-80 format: expected prefix '{PUBLIC_KEY_AIP80_PREFIX}'"
            ))),
        }
    }

    /// Returns the public key as bytes.
    pub fn to_bytes(&self) -> [u8; ED25519_PUBLIC_KEY_LENGTH] {
        self.inner.to_bytes()
    }

    /// Returns the public key as a hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.inner.to_bytes()))
    }

    /// Returns the public key in AIP-80 format.
    pub fn to_aip80(&self) -> String {
        format!("{PUBLIC_KEY_AIP80_PREFIX}{}", self.to_hex())
    }

    /// Returns true if `signature` is a valid signature of `message`.
    ///
    /// Uses strict verification: non-canonical signatures and small-order
    /// keys are rejected.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> bool {
        self.inner.verify_strict(message, &signature.inner).is_ok()
    }

    /// Derives the authentication key under the Ed25519 scheme (byte 0).
    pub fn authentication_key(&self) -> AuthenticationKey {
        AuthenticationKey::from_public_key_and_scheme(&self.to_bytes(), ED25519_SCHEME)
    }

    /// Derives the account address for this public key.
    pub fn to_address(&self) -> AccountAddress {
        self.authentication_key().to_address()
    }
}

impl PublicKey for Ed25519PublicKey {
    const LENGTH: usize = ED25519_PUBLIC_KEY_LENGTH;

    fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        Ed25519PublicKey::from_bytes(bytes)
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.inner.to_bytes().to_vec()
    }
}

impl Verifier for Ed25519PublicKey {
    type Signature = Ed25519Signature;

    fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> bool {
        Ed25519PublicKey::verify(self, message, signature)
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Encode for Ed25519PublicKey {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_bytes(&self.inner.to_bytes());
    }
}

impl Decode for Ed25519PublicKey {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let bytes = de.read_bounded_bytes(
            "Ed25519PublicKey",
            ED25519_PUBLIC_KEY_LENGTH,
            ED25519_PUBLIC_KEY_LENGTH,
        );
        de.check()?;
        Self::from_bytes(&bytes).map_err(BcsError::custom)
    }
}

impl Serialize for Ed25519PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_bytes(&self.inner.to_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for Ed25519PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_hex(&s).map_err(serde::de::Error::custom)
        } else {
            let bytes = Vec::<u8>::deserialize(deserializer)?;
            Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
        }
    }
}

/// An Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Signature {
    inner: ed25519_dalek::Signature,
}

impl Ed25519Signature {
    /// Creates a signature from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AptosError::InvalidKeyLength`] if the slice is not exactly 64 bytes.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        if bytes.len() != ED25519_SIGNATURE_LENGTH {
            return Err(AptosError::key_length(
                "Ed25519 signature",
                bytes.len(),
                ED25519_SIGNATURE_LENGTH,
            ));
        }
        let signature = ed25519_dalek::Signature::from_slice(bytes)
            .map_err(|e| AptosError::InvalidSignature(e.to_string()))?;
        Ok(Self { inner: signature })
    }

    /// Creates a signature from a hex string.
    ///
    /// # Errors
    ///
    /// Returns an error if the hex is invalid or not 64 bytes long.
    pub fn from_hex(hex_str: &str) -> AptosResult<Self> {
        Self::from_bytes(&decode_hex(hex_str)?)
    }

    /// Returns the signature as bytes.
    pub fn to_bytes(&self) -> [u8; ED25519_SIGNATURE_LENGTH] {
        self.inner.to_bytes()
    }

    /// Returns the signature as a hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.inner.to_bytes()))
    }
}

impl Signature for Ed25519Signature {
    type PublicKey = Ed25519PublicKey;
    const LENGTH: usize = ED25519_SIGNATURE_LENGTH;

    fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        Ed25519Signature::from_bytes(bytes)
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.inner.to_bytes().to_vec()
    }
}

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Signature({})", self.to_hex())
    }
}

impl fmt::Display for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Encode for Ed25519Signature {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_bytes(&self.inner.to_bytes());
    }
}

impl Decode for Ed25519Signature {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let bytes = de.read_bounded_bytes(
            "Ed25519Signature",
            ED25519_SIGNATURE_LENGTH,
            ED25519_SIGNATURE_LENGTH,
        );
        de.check()?;
        Self::from_bytes(&bytes).map_err(BcsError::custom)
    }
}

impl Serialize for Ed25519Signature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_bytes(&self.inner.to_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for Ed25519Signature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_hex(&s).map_err(serde::de::Error::custom)
        } else {
            let bytes = Vec::<u8>::deserialize(deserializer)?;
            Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcs;

    const SEED: &str = "0xc5338cd251c22daa8c9c9cc94f498cc8a5c7e1d2e75287a5dda91096fe64efa5";
    const PUBLIC_KEY: &str = "0xde19e5d1880cac87d57484ce9ed2e84cf0f9599f12e7cc3a52e4e7657a763f2c";

    #[test]
    fn test_generate_and_sign() {
        let private_key = Ed25519PrivateKey::generate();
        let message = b"hello world";
        let signature = private_key.sign(message);

        let public_key = private_key.public_key();
        assert!(public_key.verify(message, &signature));
    }

    #[test]
    fn test_wrong_message_fails() {
        let private_key = Ed25519PrivateKey::generate();
        let signature = private_key.sign(b"hello world");
        assert!(!private_key.public_key().verify(b"hello world!", &signature));
    }

    #[test]
    fn test_known_public_key() {
        let private_key = Ed25519PrivateKey::from_hex(SEED).unwrap();
        assert_eq!(private_key.public_key().to_hex(), PUBLIC_KEY);
    }

    #[test]
    fn test_from_bytes_roundtrip() {
        let private_key = Ed25519PrivateKey::generate();
        let restored = Ed25519PrivateKey::from_bytes(&private_key.to_bytes()).unwrap();
        assert_eq!(private_key.to_bytes(), restored.to_bytes());
    }

    #[test]
    fn test_private_key_aip80() {
        let private_key = Ed25519PrivateKey::from_bytes(&[0x01; 32]).unwrap();
        let aip80 = private_key.to_aip80();
        assert_eq!(aip80, format!("ed25519-priv-0x{}", "01".repeat(32)));

        let restored = Ed25519PrivateKey::from_aip80(&aip80).unwrap();
        assert_eq!(private_key.to_bytes(), restored.to_bytes());
        // from_hex also accepts the AIP-80 form
        let restored = Ed25519PrivateKey::from_hex(&aip80).unwrap();
        assert_eq!(private_key.to_bytes(), restored.to_bytes());

        assert!(Ed25519PrivateKey::from_aip80("secp256k1-priv-0x01").is_err());
    }

    #[test]
    fn test_public_key_aip80_roundtrip() {
        let public_key = Ed25519PrivateKey::generate().public_key();
        let aip80 = public_key.to_aip80();
        assert!(aip80.starts_with("ed25519-pub-0x"));
        assert_eq!(Ed25519PublicKey::from_aip80(&aip80).unwrap(), public_key);
        assert!(Ed25519PublicKey::from_aip80("secp256k1-pub-0x01").is_err());
    }

    #[test]
    fn test_invalid_lengths() {
        assert!(matches!(
            Ed25519PrivateKey::from_bytes(&[0u8; 16]),
            Err(AptosError::InvalidKeyLength {
                actual: 16,
                expected: 32,
                ..
            })
        ));
        assert!(Ed25519PublicKey::from_bytes(&[0u8; 16]).is_err());
        assert!(matches!(
            Ed25519Signature::from_bytes(&[0u8; 32]),
            Err(AptosError::InvalidKeyLength { expected: 64, .. })
        ));
    }

    #[test]
    fn test_bcs_is_length_prefixed() {
        let private_key = Ed25519PrivateKey::from_hex(SEED).unwrap();
        let public_key = private_key.public_key();
        let bytes = bcs::to_bytes(&public_key).unwrap();
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], 32);
        assert_eq!(bcs::from_bytes::<Ed25519PublicKey>(&bytes).unwrap(), public_key);

        let signature = private_key.sign(b"test");
        let bytes = bcs::to_bytes(&signature).unwrap();
        assert_eq!(bytes.len(), 65);
        assert_eq!(bytes[0], 64);
        assert_eq!(bcs::from_bytes::<Ed25519Signature>(&bytes).unwrap(), signature);
    }

    #[test]
    fn test_bcs_rejects_wrong_length() {
        let mut bytes = vec![31u8];
        bytes.extend_from_slice(&[0u8; 31]);
        assert!(matches!(
            bcs::from_bytes::<Ed25519PublicKey>(&bytes),
            Err(BcsError::LengthOutOfBounds { actual: 31, .. })
        ));
    }

    #[test]
    fn test_private_key_debug() {
        let private_key = Ed25519PrivateKey::generate();
        let debug = format!("{private_key:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(&private_key.to_hex()[2..]));
    }

    #[test]
    fn test_signature_json_serialization() {
        let private_key = Ed25519PrivateKey::generate();
        let signature = private_key.sign(b"test");

        let json = serde_json::to_string(&signature).unwrap();
        assert!(json.starts_with("\"0x"));
        let restored: Ed25519Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(signature, restored);

        let public_key = private_key.public_key();
        let json = serde_json::to_string(&public_key).unwrap();
        let restored: Ed25519PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(public_key, restored);
    }

    #[test]
    fn test_address_derivation() {
        let public_key = Ed25519PrivateKey::generate().public_key();
        let address = public_key.to_address();
        assert!(!address.is_zero());
        assert_eq!(address, public_key.to_address());
        assert_eq!(
            address.as_bytes(),
            public_key.authentication_key().as_bytes()
        );
    }
}
