//! Secp256r1 (P-256) ECDSA signature scheme implementation.
//!
//! Secp256r1, also known as P-256 or prime256v1, is the curve behind
//! `WebAuthn` passkeys. Raw signatures cover the SHA3-256 digest of the
//! message; inside a WebAuthn assertion the authenticator signs with
//! SHA-256 instead (see [`Secp256r1PrivateKey::sign_sha256`]).

use crate::bcs::{BcsError, BcsResult, Decode, Deserializer, Encode, Serializer};
use crate::crypto::single_key::AnyPublicKey;
use crate::crypto::traits::{decode_hex, strip_aip80_prefix, PublicKey, Signature, Signer, Verifier};
use crate::error::{AptosError, AptosResult};
use crate::types::AccountAddress;
use p256::ecdsa::signature::{DigestSigner, DigestVerifier};
use p256::ecdsa::{Signature as P256Signature, SigningKey, VerifyingKey};
#[allow(unused_imports)]
use p256::elliptic_curve::sec1::ToEncodedPoint;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use sha3::{Digest, Sha3_256};
use std::fmt;
use zeroize::Zeroize;

/// Secp256r1 private key length in bytes.
pub const SECP256R1_PRIVATE_KEY_LENGTH: usize = 32;
/// Secp256r1 compressed public key length in bytes.
pub const SECP256R1_PUBLIC_KEY_COMPRESSED_LENGTH: usize = 33;
/// Secp256r1 uncompressed public key length in bytes, the on-chain form.
pub const SECP256R1_PUBLIC_KEY_LENGTH: usize = 65;
/// Secp256r1 signature length in bytes (r || s).
pub const SECP256R1_SIGNATURE_LENGTH: usize = 64;

const PRIVATE_KEY_AIP80_PREFIX: &str = "secp256r1-priv-";
const PUBLIC_KEY_AIP80_PREFIX: &str = "secp256r1-pub-";

/// A Secp256r1 ECDSA private key.
///
/// The private key is zeroized when dropped.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct Secp256r1PrivateKey {
    #[zeroize(skip)]
    #[allow(unused)] // Field is used; lint false positive from Zeroize derive
    inner: SigningKey,
}

impl Secp256r1PrivateKey {
    /// Generates a new random Secp256r1 private key.
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
        if bytes.len() != SECP256R1_PRIVATE_KEY_LENGTH {
            return Err(AptosError::key_length(
                "Secp256r1",
                bytes.len(),
                SECP256R1_PRIVATE_KEY_LENGTH,
            ));
        }
        let signing_key =
            SigningKey::from_slice(bytes).map_err(|_| AptosError::KeyOutOfRange("Secp256r1"))?;
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

    /// Creates a private key from AIP-80 format string (`secp256r1-priv-0x...`).
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
    pub fn to_bytes(&self) -> [u8; SECP256R1_PRIVATE_KEY_LENGTH] {
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
    pub fn public_key(&self) -> Secp256r1PublicKey {
        Secp256r1PublicKey {
            inner: *self.inner.verifying_key(),
        }
    }

    /// Signs the SHA3-256 digest of `message`.
    ///
    /// Nonces follow RFC 6979, so signing is deterministic, and the result
    /// is always in low-s form.
    pub fn sign(&self, message: &[u8]) -> Secp256r1Signature {
        let signature: P256Signature = self.inner.sign_digest(Sha3_256::new_with_prefix(message));
        Secp256r1Signature {
            inner: signature.normalize_s().unwrap_or(signature),
        }
    }

    /// Signs `message` the way a WebAuthn authenticator does, hashing it
    /// with SHA-256. The result is in low-s form.
    pub fn sign_sha256(&self, message: &[u8]) -> Secp256r1Signature {
        let signature: P256Signature = self.inner.sign_digest(Sha256::new_with_prefix(message));
        Secp256r1Signature {
            inner: signature.normalize_s().unwrap_or(signature),
        }
    }
}

impl Signer for Secp256r1PrivateKey {
    type Signature = Secp256r1Signature;

    fn sign(&self, message: &[u8]) -> Secp256r1Signature {
        Secp256r1PrivateKey::sign(self, message)
    }

    fn public_key(&self) -> Secp256r1PublicKey {
        Secp256r1PrivateKey::public_key(self)
    }
}

impl fmt::Debug for Secp256r1PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256r1PrivateKey(<PrivateKey:REDACTED>)")
    }
}

/// A Secp256r1 ECDSA public key.
///
/// Always serialized as the 65-byte uncompressed SEC1 point.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Secp256r1PublicKey {
    inner: VerifyingKey,
}

impl Secp256r1PublicKey {
    /// Creates a public key from SEC1 bytes.
    ///
    /// Both the 65-byte uncompressed and 33-byte compressed forms are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`AptosError::InvalidKeyLength`] for any other length and
    /// [`AptosError::InvalidCurvePoint`] if the bytes are not a point on the curve.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        if bytes.len() != SECP256R1_PUBLIC_KEY_LENGTH
            && bytes.len() != SECP256R1_PUBLIC_KEY_COMPRESSED_LENGTH
        {
            return Err(AptosError::key_length(
                "Secp256r1",
                bytes.len(),
                SECP256R1_PUBLIC_KEY_LENGTH,
            ));
        }
        let verifying_key = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|_| AptosError::InvalidCurvePoint("Secp256r1"))?;
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
    pub fn verify(&self, message: &[u8], signature: &Secp256r1Signature) -> bool {
        if signature.inner.normalize_s().is_some() {
            return false;
        }
        self.inner
            .verify_digest(Sha3_256::new_with_prefix(message), &signature.inner)
            .is_ok()
    }

    /// Returns true if `signature` is a valid low-s signature over the
    /// SHA-256 digest of `message`.
    pub fn verify_sha256(&self, message: &[u8], signature: &Secp256r1Signature) -> bool {
        if signature.inner.normalize_s().is_some() {
            return false;
        }
        self.inner
            .verify_digest(Sha256::new_with_prefix(message), &signature.inner)
            .is_ok()
    }

    /// Derives the account address under the single-key scheme.
    pub fn to_address(&self) -> AccountAddress {
        AnyPublicKey::Secp256r1(*self).authentication_key().to_address()
    }
}

impl PublicKey for Secp256r1PublicKey {
    const LENGTH: usize = SECP256R1_PUBLIC_KEY_LENGTH;

    fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        Secp256r1PublicKey::from_bytes(bytes)
    }

    fn to_bytes(&self) -> Vec<u8> {
        Secp256r1PublicKey::to_bytes(self)
    }
}

impl Verifier for Secp256r1PublicKey {
    type Signature = Secp256r1Signature;

    fn verify(&self, message: &[u8], signature: &Secp256r1Signature) -> bool {
        Secp256r1PublicKey::verify(self, message, signature)
    }
}

impl fmt::Debug for Secp256r1PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256r1PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for Secp256r1PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Encode for Secp256r1PublicKey {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_bytes(&self.to_bytes());
    }
}

impl Decode for Secp256r1PublicKey {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let bytes = de.read_bounded_bytes(
            "Secp256r1PublicKey",
            SECP256R1_PUBLIC_KEY_LENGTH,
            SECP256R1_PUBLIC_KEY_LENGTH,
        );
        de.check()?;
        Self::from_bytes(&bytes).map_err(BcsError::custom)
    }
}

impl Serialize for Secp256r1PublicKey {
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

impl<'de> Deserialize<'de> for Secp256r1PublicKey {
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

/// A Secp256r1 ECDSA signature in low-s form.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Secp256r1Signature {
    inner: P256Signature,
}

impl Secp256r1Signature {
    /// Creates a signature from raw bytes (64 bytes, r || s).
    ///
    /// # Errors
    ///
    /// Returns [`AptosError::InvalidKeyLength`] for a wrong length,
    /// [`AptosError::InvalidSignature`] if `r` or `s` is zero or out of range and
    /// [`AptosError::SignatureNotLowS`] if `s` is in the upper half of the order.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        if bytes.len() != SECP256R1_SIGNATURE_LENGTH {
            return Err(AptosError::key_length(
                "Secp256r1 signature",
                bytes.len(),
                SECP256R1_SIGNATURE_LENGTH,
            ));
        }
        let signature = P256Signature::from_slice(bytes)
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
    pub fn to_bytes(&self) -> [u8; SECP256R1_SIGNATURE_LENGTH] {
        self.inner.to_bytes().into()
    }

    /// Returns the signature as a hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}

impl Signature for Secp256r1Signature {
    type PublicKey = Secp256r1PublicKey;
    const LENGTH: usize = SECP256R1_SIGNATURE_LENGTH;

    fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        Secp256r1Signature::from_bytes(bytes)
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.inner.to_bytes().to_vec()
    }
}

impl fmt::Debug for Secp256r1Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256r1Signature({})", self.to_hex())
    }
}

impl fmt::Display for Secp256r1Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Encode for Secp256r1Signature {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_bytes(&self.to_bytes());
    }
}

impl Decode for Secp256r1Signature {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let bytes = de.read_bounded_bytes(
            "Secp256r1Signature",
            SECP256R1_SIGNATURE_LENGTH,
            SECP256R1_SIGNATURE_LENGTH,
        );
        de.check()?;
        Self::from_bytes(&bytes).map_err(BcsError::custom)
    }
}

impl Serialize for Secp256r1Signature {
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

impl<'de> Deserialize<'de> for Secp256r1Signature {
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
