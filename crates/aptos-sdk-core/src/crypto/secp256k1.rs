//! Secp256k1 ECDSA signature scheme implementation.
//!
//! Secp256k1 is the same elliptic curve used by Bitcoin and Ethereum.
//! Aptos signs the SHA3-256 digest of the message and only accepts
//! signatures whose `s` lies in the lower half of the curve order.

use crate::bcs::{BcsError, BcsResult, Decode, Deserializer, Encode, Serializer};
use crate::crypto::single_key::AnyPublicKey;
use crate::crypto::traits::{decode_hex, strip_aip80_prefix, PublicKey, Signature, Signer, Verifier};
use crate::error::{AptosError, AptosResult};
use crate::types::AccountAddress;
use k256::ecdsa::signature::{DigestSigner, DigestVerifier};
use k256::ecdsa::{Signature as K256Signature, SigningKey, VerifyingKey};
#[allow(unused_imports)]
use k256::elliptic_curve::sec1::ToEncodedPoint;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::fmt;
use zeroize::Zeroize;

/// Secp256k1 private key length in bytes.
pub const SECP256K1_PRIVATE_KEY_LENGTH: usize = 32;
/// Secp256k1 compressed public key length in bytes.
pub const SECP256K1_PUBLIC_KEY_COMPRESSED_LENGTH: usize = 33;
/// Secp256k1 uncompressed public key length in bytes, the on-chain form.
pub const SECP256K1_PUBLIC_KEY_LENGTH: usize = 65;
/// Secp256k1 signature length in bytes (r || s).
pub const SECP256K1_SIGNATURE_LENGTH: usize = 64;

const PRIVATE_KEY_AIP80_PREFIX: &str = "secp256k1-priv-";
const PUBLIC_KEY_AIP80_PREFIX: &str = "secp256k1-pub-";

/// A Secp256k1 ECDSA private key.
///
/// The private key is zeroized when dropped.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct Secp256k1PrivateKey {
    #[zeroize(skip)]
    #[allow(unused)] // Field is used; lint false positive from Zeroize derive
    inner: SigningKey,
}

impl Secp256k1PrivateKey {
    /// Generates a new random Secp256k1 private key.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::rngs::OsRng);
        Self { inner: signing_key }
    }

    /// Creates a private key from a 32-byte scalar.
    ///
    /// # Errors
    ///
    /// Returns [`AptosError::InvalidKeyLength`] for a slice that is not 32 bytes and
    /// [`AptosError::KeyOutOfRange`] for a zero scalar or one not below the curve order.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        if bytes.len() != SECP256K1_PRIVATE_KEY_LENGTH {
            return Err(AptosError::key_length(
                "Secp256k1",
                bytes.len(),
                SECP256K1_PRIVATE_KEY_LENGTH,
            ));
        }
        let signing_key =
            SigningKey::from_slice(bytes).map_err(|_| AptosError::KeyOutOfRange("Secp256k1"))?;
        Ok(Self { inner: signing_key })
    }

    /// Creates a private key from a hex string, `0x`-prefixed or AIP-80.
    ///
    /// # Errors
    ///
    /// Returns an error if the hex is invalid or the scalar is rejected.
    pub fn from_hex(hex_str: &str) -> AptosResult<Self> {
        let bytes = decode_hex(strip_aip80_prefix(hex_str, PRIVATE_KEY_AIP80_PREFIX))?;
        Self::from_bytes(&bytes)
    }

    /// Creates a private key from AIP-80 format string (`secp256k1-priv-0x...`).
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix is missing or the key bytes are invalid.
    pub fn from_aip80(s: &str) -> AptosResult<Self> {
        match s.strip_prefix(PRIVATE_KEY_AIP80_PREFIX) {
            Some(hex_part) => Self::from_hex(hex_part),
            None => Err(AptosError::InvalidPrivateKey(format!(
                "invalid AIP-80 format: expected prefix '{PRIVATE_KEY_AIP80_PREFIX}'"
            ))),
        }
    }

    /// Returns the private key as bytes.
    pub fn to_bytes(&self) -> [u8; SECP256K1_PRIVATE_KEY_LENGTH] {
        self.inner.to_bytes().into()
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
    pub fn public_key(&self) -> Secp256k1PublicKey {
        Secp256k1PublicKey {
            inner: *self.inner.verifying_key(),
        }
    }

    /// Signs the SHA3-256 digest of `message`.
    ///
    /// Nonces follow RFC 6979, so signing is deterministic, and the result
    /// is always in low-s form.
    pub fn sign(&self, message: &[u8]) -> Secp256k1Signature {
        let signature: K256Signature = self.inner.sign_digest(Sha3_256::new_with_prefix(message));
        Secp256k1Signature {
            inner: signature.normalize_s().unwrap_or(signature),
        }
    }
}

impl Signer for Secp256k1PrivateKey {
    type Signature = Secp256k1Signature;

    fn sign(&self, message: &[u8]) -> Secp256k1Signature {
        Secp256k1PrivateKey::sign(self, message)
    }

    fn public_key(&self) -> Secp256k1PublicKey {
        Secp256k1PrivateKey::public_key(self)
    }
}

impl fmt::Debug for Secp256k1PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1PrivateKey(<PrivateKey:REDACTED>)")
    }
}

/// A Secp256k1 ECDSA public key.
///
/// Always serialized as the 65-byte uncompressed SEC1 point.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Secp256k1PublicKey {
    inner: VerifyingKey,
}

impl Secp256k1PublicKey {
    /// Creates a public key from SEC1 bytes.
    ///
    /// Both the 65-byte uncompressed and 33-byte compressed forms are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`AptosError::InvalidKeyLength`] for any other length and
    /// [`AptosError::InvalidCurvePoint`] if the bytes are not a point on the curve.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        if bytes.len() != SECP256K1_PUBLIC_KEY_LENGTH
            && bytes.len() != SECP256K1_PUBLIC_KEY_COMPRESSED_LENGTH
        {
            return Err(AptosError::key_length(
                "Secp256k1",
                bytes.len(),
                SECP256K1_PUBLIC_KEY_LENGTH,
            ));
        }
        let verifying_key = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|_| AptosError::InvalidCurvePoint("Secp256k1"))?;
        Ok(Self {
            inner: verifying_key,
        })
    }

    /// Creates a public key from a hex string, `0x`-prefixed or AIP-80.
    ///
    /// # Errors
    ///
    /// Returns an error if the hex is invalid or the point is rejected.
    pub fn from_hex(hex_str: &str) -> AptosResult<Self> {
        let bytes = decode_hex(strip_aip80_prefix(hex_str, PUBLIC_KEY_AIP80_PREFIX))?;
        Self::from_bytes(&bytes)
    }

    /// Returns the public key as uncompressed bytes (65 bytes).
    pub fn to_bytes(&self) -> Vec<u8> {
        self.inner.to_encoded_point(false).as_bytes().to_vec()
    }

    /// Returns the public key as compressed bytes (33 bytes).
    pub fn to_compressed_bytes(&self) -> Vec<u8> {
        self.inner.to_encoded_point(true).as_bytes().to_vec()
    }

    /// Returns the public key as a hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    /// Returns the public key in AIP-80 format.
    pub fn to_aip80(&self) -> String {
        format!("{PUBLIC_KEY_AIP80_PREFIX}{}", self.to_hex())
    }

    /// Returns true if `signature` is a valid low-s signature over the
    /// SHA3-256 digest of `message`.
    pub fn verify(&self, message: &[u8], signature: &Secp256k1Signature) -> bool {
        if signature.inner.normalize_s().is_some() {
            return false;
        }
        self.inner
            .verify_digest(Sha3_256::new_with_prefix(message), &signature.inner)
            .is_ok()
    }

    /// Derives the account address under the single-key scheme.
    pub fn to_address(&self) -> AccountAddress {
        AnyPublicKey::Secp256k1(*self).authentication_key().to_address()
    }
}

impl PublicKey for Secp256k1PublicKey {
    const LENGTH: usize = SECP256K1_PUBLIC_KEY_LENGTH;

    fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        Secp256k1PublicKey::from_bytes(bytes)
    }

    fn to_bytes(&self) -> Vec<u8> {
        Secp256k1PublicKey::to_bytes(self)
    }
}

impl Verifier for Secp256k1PublicKey {
    type Signature = Secp256k1Signature;

    fn verify(&self, message: &[u8], signature: &Secp256k1Signature) -> bool {
        Secp256k1PublicKey::verify(self, message, signature)
    }
}

impl fmt::Debug for Secp256k1PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for Secp256k1PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Encode for Secp256k1PublicKey {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_bytes(&self.to_bytes());
    }
}

impl Decode for Secp256k1PublicKey {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let bytes = de.read_bounded_bytes(
            "Secp256k1PublicKey",
            SECP256K1_PUBLIC_KEY_LENGTH,
            SECP256K1_PUBLIC_KEY_LENGTH,
        );
        de.check()?;
        Self::from_bytes(&bytes).map_err(BcsError::custom)
    }
}

impl Serialize for Secp256k1PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_bytes(&self.to_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for Secp256k1PublicKey {
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

/// A Secp256k1 ECDSA signature in low-s form.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Secp256k1Signature {
    inner: K256Signature,
}

impl Secp256k1Signature {
    /// Creates a signature from raw bytes (64 bytes, r || s).
    ///
    /// # Errors
    ///
    /// Returns [`AptosError::InvalidKeyLength`] for a wrong length,
    /// [`AptosError::InvalidSignature`] if `r` or `s` is zero or out of range and
    /// [`AptosError::SignatureNotLowS`] if `s` is in the upper half of the order.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        if bytes.len() != SECP256K1_SIGNATURE_LENGTH {
            return Err(AptosError::key_length(
                "Secp256k1 signature",
                bytes.len(),
                SECP256K1_SIGNATURE_LENGTH,
            ));
        }
        let signature = K256Signature::from_slice(bytes)
            .map_err(|e| AptosError::InvalidSignature(e.to_string()))?;
        if signature.normalize_s().is_some() {
            return Err(AptosError::SignatureNotLowS);
        }
        Ok(Self { inner: signature })
    }

    /// Creates a signature from a hex string.
    ///
    /// # Errors
    ///
    /// Returns an error if the hex is invalid or the signature is rejected.
    pub fn from_hex(hex_str: &str) -> AptosResult<Self> {
        Self::from_bytes(&decode_hex(hex_str)?)
    }

    /// Returns the signature as bytes (64 bytes, r || s).
    pub fn to_bytes(&self) -> [u8; SECP256K1_SIGNATURE_LENGTH] {
        self.inner.to_bytes().into()
    }

    /// Returns the signature as a hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}

impl Signature for Secp256k1Signature {
    type PublicKey = Secp256k1PublicKey;
    const LENGTH: usize = SECP256K1_SIGNATURE_LENGTH;

    fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        Secp256k1Signature::from_bytes(bytes)
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.inner.to_bytes().to_vec()
    }
}

impl fmt::Debug for Secp256k1Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1Signature({})", self.to_hex())
    }
}

impl fmt::Display for Secp256k1Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Encode for Secp256k1Signature {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_bytes(&self.to_bytes());
    }
}

impl Decode for Secp256k1Signature {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let bytes = de.read_bounded_bytes(
            "Secp256k1Signature",
            SECP256K1_SIGNATURE_LENGTH,
            SECP256K1_SIGNATURE_LENGTH,
        );
        de.check()?;
        Self::from_bytes(&bytes).map_err(BcsError::custom)
    }
}

impl Serialize for Secp256k1Signature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_bytes(&self.to_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for Secp256k1Signature {
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
