//! Multi-Ed25519 signature scheme implementation.
//!
//! Multi-Ed25519 enables M-of-N threshold signatures where M signatures
//! out of N Ed25519 public keys are required to authorize a transaction.

use crate::bcs::{BcsError, BcsResult, Decode, Deserializer, Encode, Serializer};
use crate::crypto::bitmap::{Bitmap, BITMAP_NUM_OF_BYTES};
use crate::crypto::ed25519::{
    Ed25519PublicKey, Ed25519Signature, ED25519_PUBLIC_KEY_LENGTH, ED25519_SIGNATURE_LENGTH,
};
use crate::crypto::traits::{decode_hex, PublicKey, Signature, Verifier};
use crate::crypto::{AuthenticationKey, MULTI_ED25519_SCHEME};
use crate::error::{AptosError, AptosResult};
use crate::types::AccountAddress;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of keys in a multi-Ed25519 account.
pub const MAX_NUM_OF_KEYS: usize = 32;

/// Minimum threshold (at least 1 signature required).
pub const MIN_THRESHOLD: u8 = 1;

const MIN_PUBLIC_KEY_BYTES: usize = ED25519_PUBLIC_KEY_LENGTH + 1;
const MAX_PUBLIC_KEY_BYTES: usize = MAX_NUM_OF_KEYS * ED25519_PUBLIC_KEY_LENGTH + 1;
const MIN_SIGNATURE_BYTES: usize = ED25519_SIGNATURE_LENGTH + BITMAP_NUM_OF_BYTES;
const MAX_SIGNATURE_BYTES: usize = MAX_NUM_OF_KEYS * ED25519_SIGNATURE_LENGTH + BITMAP_NUM_OF_BYTES;

/// A multi-Ed25519 public key.
///
/// This is a collection of Ed25519 public keys with a threshold value.
/// M-of-N signatures are required where M = threshold and N = number of keys.
///
/// # Example
///
/// ```rust
/// use aptos_sdk_core::crypto::{Ed25519PrivateKey, MultiEd25519PublicKey};
///
/// let keys: Vec<_> = (0..3).map(|_| Ed25519PrivateKey::generate().public_key()).collect();
/// let multi_pk = MultiEd25519PublicKey::new(keys, 2).unwrap(); // 2-of-3
/// assert_eq!(multi_pk.to_bytes().len(), 3 * 32 + 1);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct MultiEd25519PublicKey {
    public_keys: Vec<Ed25519PublicKey>,
    threshold: u8,
}

impl MultiEd25519PublicKey {
    /// Creates a new multi-Ed25519 public key.
    ///
    /// # Errors
    ///
    /// Returns [`AptosError::InvalidPublicKey`] if there are no keys or more
    /// than 32, and [`AptosError::ThresholdNotMet`] if the threshold is zero
    /// or exceeds the number of keys.
    pub fn new(public_keys: Vec<Ed25519PublicKey>, threshold: u8) -> AptosResult<Self> {
        if public_keys.is_empty() {
            return Err(AptosError::InvalidPublicKey(
                "multi-Ed25519 requires at least one public key".into(),
            ));
        }
        if public_keys.len() > MAX_NUM_OF_KEYS {
            return Err(AptosError::InvalidPublicKey(format!(
                "multi-Ed25519 supports at most {} keys, got {}",
                MAX_NUM_OF_KEYS,
                public_keys.len()
            )));
        }
        if threshold < MIN_THRESHOLD || threshold as usize > public_keys.len() {
            return Err(AptosError::ThresholdNotMet {
                threshold: threshold as usize,
                keys: public_keys.len(),
            });
        }
        Ok(Self {
            public_keys,
            threshold,
        })
    }

    /// Returns the number of public keys.
    pub fn num_keys(&self) -> usize {
        self.public_keys.len()
    }

    /// Returns the threshold (M in M-of-N).
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Returns the individual public keys.
    pub fn public_keys(&self) -> &[Ed25519PublicKey] {
        &self.public_keys
    }

    /// Serializes the public key to bytes.
    ///
    /// Format: public_key_1 || public_key_2 || ... || public_key_n || threshold
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.public_keys.len() * ED25519_PUBLIC_KEY_LENGTH + 1);
        for pk in &self.public_keys {
            bytes.extend_from_slice(&pk.to_bytes());
        }
        bytes.push(self.threshold);
        bytes
    }

    /// Creates a public key from its concatenated byte form.
    ///
    /// # Errors
    ///
    /// Returns an error if the length is not `N * 32 + 1`, any key is not a
    /// valid point, or the threshold is invalid.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        let Some((&threshold, key_bytes)) = bytes.split_last() else {
            return Err(AptosError::InvalidPublicKey("empty bytes".into()));
        };
        if key_bytes.len() % ED25519_PUBLIC_KEY_LENGTH != 0 {
            return Err(AptosError::InvalidPublicKey(format!(
                "key bytes length {} is not a multiple of {}",
                key_bytes.len(),
                ED25519_PUBLIC_KEY_LENGTH
            )));
        }
        let public_keys = key_bytes
            .chunks_exact(ED25519_PUBLIC_KEY_LENGTH)
            .map(Ed25519PublicKey::from_bytes)
            .collect::<AptosResult<Vec<_>>>()?;
        Self::new(public_keys, threshold)
    }

    /// Creates a public key from a hex string.
    ///
    /// # Errors
    ///
    /// Returns an error if the hex or the key bytes are invalid.
    pub fn from_hex(hex_str: &str) -> AptosResult<Self> {
        Self::from_bytes(&decode_hex(hex_str)?)
    }

    /// Derives the authentication key under the multi-Ed25519 scheme (byte 1).
    pub fn authentication_key(&self) -> AuthenticationKey {
        AuthenticationKey::from_public_key_and_scheme(&self.to_bytes(), MULTI_ED25519_SCHEME)
    }

    /// Derives the account address for this multi-Ed25519 public key.
    pub fn to_address(&self) -> AccountAddress {
        self.authentication_key().to_address()
    }

    /// Returns true if at least `threshold` of the signatures indicated by the
    /// bitmap verify under the matching keys.
    ///
    /// The i-th signature is paired with the key at the i-th set bit. A
    /// bitmap whose set-bit count differs from the number of signatures, or
    /// that points past the last key, is rejected.
    pub fn verify(&self, message: &[u8], signature: &MultiEd25519Signature) -> bool {
        let bits_set = signature.bitmap.count_ones() as usize;
        if bits_set != signature.signatures.len() {
            tracing::debug!(
                bits_set,
                signatures = signature.signatures.len(),
                "multi-ed25519 signature count does not match bitmap"
            );
            return false;
        }
        if let Some(last) = signature.bitmap.last_set_bit() {
            if last as usize >= self.public_keys.len() {
                tracing::debug!(
                    index = last,
                    keys = self.public_keys.len(),
                    "multi-ed25519 bitmap points past the key set"
                );
                return false;
            }
        }
        let valid = signature
            .bitmap
            .iter_ones()
            .zip(&signature.signatures)
            .filter(|(index, sig)| self.public_keys[*index as usize].verify(message, sig))
            .count();
        if valid < self.threshold as usize {
            tracing::debug!(
                valid,
                threshold = self.threshold,
                "multi-ed25519 threshold not met"
            );
            return false;
        }
        true
    }
}

impl PublicKey for MultiEd25519PublicKey {
    const LENGTH: usize = 0; // Variable length

    fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        MultiEd25519PublicKey::from_bytes(bytes)
    }

    fn to_bytes(&self) -> Vec<u8> {
        MultiEd25519PublicKey::to_bytes(self)
    }
}

impl Verifier for MultiEd25519PublicKey {
    type Signature = MultiEd25519Signature;

    fn verify(&self, message: &[u8], signature: &MultiEd25519Signature) -> bool {
        MultiEd25519PublicKey::verify(self, message, signature)
    }
}

impl fmt::Debug for MultiEd25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MultiEd25519PublicKey({}-of-{} keys)",
            self.threshold,
            self.public_keys.len()
        )
    }
}

impl fmt::Display for MultiEd25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

impl Encode for MultiEd25519PublicKey {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_bytes(&self.to_bytes());
    }
}

impl Decode for MultiEd25519PublicKey {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let bytes = de.read_bounded_bytes(
            "MultiEd25519PublicKey",
            MIN_PUBLIC_KEY_BYTES,
            MAX_PUBLIC_KEY_BYTES,
        );
        de.check()?;
        Self::from_bytes(&bytes).map_err(BcsError::custom)
    }
}

impl Serialize for MultiEd25519PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_bytes(&self.to_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for MultiEd25519PublicKey {
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

/// A multi-Ed25519 signature.
///
/// Individual Ed25519 signatures in ascending signer order, plus the
/// bitmap of which keys signed.
#[derive(Clone, PartialEq, Eq)]
pub struct MultiEd25519Signature {
    signatures: Vec<Ed25519Signature>,
    bitmap: Bitmap,
}

impl MultiEd25519Signature {
    /// Creates a multi-Ed25519 signature from `(signer_index, signature)`
    /// pairs in any order.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no signatures, an index is 32 or more,
    /// or an index repeats.
    pub fn new(mut signatures: Vec<(u8, Ed25519Signature)>) -> AptosResult<Self> {
        if signatures.is_empty() {
            return Err(AptosError::InvalidSignature(
                "multi-Ed25519 signature requires at least one signature".into(),
            ));
        }
        signatures.sort_by_key(|(index, _)| *index);

        let mut bitmap = Bitmap::new();
        for (index, _) in &signatures {
            if bitmap.is_set(*index) {
                return Err(AptosError::InvalidSignature(format!(
                    "duplicate signer index {index}"
                )));
            }
            bitmap.set(*index)?;
        }

        Ok(Self {
            signatures: signatures.into_iter().map(|(_, sig)| sig).collect(),
            bitmap,
        })
    }

    /// Creates a signature from ordered signatures and a bitmap.
    ///
    /// # Errors
    ///
    /// Returns [`AptosError::SignatureCountMismatch`] if the number of set
    /// bits differs from the number of signatures.
    pub fn from_parts(signatures: Vec<Ed25519Signature>, bitmap: Bitmap) -> AptosResult<Self> {
        let bits_set = bitmap.count_ones() as usize;
        if bits_set != signatures.len() {
            return Err(AptosError::SignatureCountMismatch {
                bits_set,
                signatures: signatures.len(),
            });
        }
        Ok(Self { signatures, bitmap })
    }

    /// Creates a signature from bytes.
    ///
    /// Format: signature_1 || signature_2 || ... || signature_m || bitmap (4 bytes)
    ///
    /// # Errors
    ///
    /// Returns an error if the signature bytes do not split into 64-byte
    /// signatures, one per bit set in the bitmap.
    pub fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        if bytes.len() < BITMAP_NUM_OF_BYTES {
            return Err(AptosError::InvalidSignature("bytes too short".into()));
        }
        let (sig_bytes, bitmap_bytes) = bytes.split_at(bytes.len() - BITMAP_NUM_OF_BYTES);
        let mut raw = [0u8; BITMAP_NUM_OF_BYTES];
        raw.copy_from_slice(bitmap_bytes);

        if sig_bytes.len() % ED25519_SIGNATURE_LENGTH != 0 {
            return Err(AptosError::InvalidSignature(format!(
                "signature bytes length {} is not a multiple of {}",
                sig_bytes.len(),
                ED25519_SIGNATURE_LENGTH
            )));
        }
        let signatures = sig_bytes
            .chunks_exact(ED25519_SIGNATURE_LENGTH)
            .map(Ed25519Signature::from_bytes)
            .collect::<AptosResult<Vec<_>>>()?;
        Self::from_parts(signatures, Bitmap::from_bytes(raw))
    }

    /// Creates a signature from a hex string.
    ///
    /// # Errors
    ///
    /// Returns an error if the hex or the signature bytes are invalid.
    pub fn from_hex(hex_str: &str) -> AptosResult<Self> {
        Self::from_bytes(&decode_hex(hex_str)?)
    }

    /// Serializes the signature to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(
            self.signatures.len() * ED25519_SIGNATURE_LENGTH + BITMAP_NUM_OF_BYTES,
        );
        for sig in &self.signatures {
            bytes.extend_from_slice(&sig.to_bytes());
        }
        bytes.extend_from_slice(self.bitmap.as_bytes());
        bytes
    }

    /// Returns the number of signatures.
    pub fn num_signatures(&self) -> usize {
        self.signatures.len()
    }

    /// Returns the signatures in signer order.
    pub fn signatures(&self) -> &[Ed25519Signature] {
        &self.signatures
    }

    /// Returns the signer bitmap.
    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Checks if a particular index signed.
    pub fn has_signature(&self, index: u8) -> bool {
        self.bitmap.is_set(index)
    }
}

impl Signature for MultiEd25519Signature {
    type PublicKey = MultiEd25519PublicKey;
    const LENGTH: usize = 0; // Variable length

    fn from_bytes(bytes: &[u8]) -> AptosResult<Self> {
        MultiEd25519Signature::from_bytes(bytes)
    }

    fn to_bytes(&self) -> Vec<u8> {
        MultiEd25519Signature::to_bytes(self)
    }
}

impl fmt::Debug for MultiEd25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MultiEd25519Signature({} signatures, {:?})",
            self.signatures.len(),
            self.bitmap
        )
    }
}

impl fmt::Display for MultiEd25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

impl Encode for MultiEd25519Signature {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_bytes(&self.to_bytes());
    }
}

impl Decode for MultiEd25519Signature {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let bytes = de.read_bounded_bytes(
            "MultiEd25519Signature",
            MIN_SIGNATURE_BYTES,
            MAX_SIGNATURE_BYTES,
        );
        de.check()?;
        Self::from_bytes(&bytes).map_err(BcsError::custom)
    }
}

impl Serialize for MultiEd25519Signature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_bytes(&self.to_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for MultiEd25519Signature {
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
    use crate::crypto::Ed25519PrivateKey;

    fn keys(n: usize) -> (Vec<Ed25519PrivateKey>, Vec<Ed25519PublicKey>) {
        let private_keys: Vec<_> = (0..n).map(|_| Ed25519PrivateKey::generate()).collect();
        let public_keys = private_keys.iter().map(|k| k.public_key()).collect();
        (private_keys, public_keys)
    }

    #[test]
    fn test_multi_ed25519_public_key_creation() {
        let (_, public_keys) = keys(3);

        let multi_pk = MultiEd25519PublicKey::new(public_keys.clone(), 2).unwrap();
        assert_eq!(multi_pk.num_keys(), 3);
        assert_eq!(multi_pk.threshold(), 2);

        assert!(matches!(
            MultiEd25519PublicKey::new(public_keys.clone(), 4),
            Err(AptosError::ThresholdNotMet {
                threshold: 4,
                keys: 3
            })
        ));
        assert!(MultiEd25519PublicKey::new(public_keys, 0).is_err());
        assert!(MultiEd25519PublicKey::new(vec![], 1).is_err());
    }

    #[test]
    fn test_too_many_keys() {
        let (_, public_keys) = keys(33);
        assert!(matches!(
            MultiEd25519PublicKey::new(public_keys, 2),
            Err(AptosError::InvalidPublicKey(_))
        ));
    }

    #[test]
    fn test_multi_ed25519_sign_verify() {
        let (private_keys, public_keys) = keys(3);
        let multi_pk = MultiEd25519PublicKey::new(public_keys, 2).unwrap();
        let message = b"test message";

        let multi_sig = MultiEd25519Signature::new(vec![
            (2, private_keys[2].sign(message)),
            (0, private_keys[0].sign(message)),
        ])
        .unwrap();

        assert_eq!(multi_sig.bitmap().as_bytes(), &[0xA0, 0, 0, 0]);
        assert!(multi_pk.verify(message, &multi_sig));
        assert!(!multi_pk.verify(b"wrong message", &multi_sig));
    }

    #[test]
    fn test_multi_ed25519_insufficient_signatures() {
        let (private_keys, public_keys) = keys(3);
        let multi_pk = MultiEd25519PublicKey::new(public_keys, 2).unwrap();
        let message = b"test message";

        let multi_sig =
            MultiEd25519Signature::new(vec![(0, private_keys[0].sign(message))]).unwrap();
        assert!(!multi_pk.verify(message, &multi_sig));
    }

    #[test]
    fn test_wrong_key_signature_does_not_count() {
        let (private_keys, public_keys) = keys(3);
        let multi_pk = MultiEd25519PublicKey::new(public_keys, 2).unwrap();
        let message = b"test message";

        // Key 1 signed but the signature is placed at index 2.
        let multi_sig = MultiEd25519Signature::new(vec![
            (0, private_keys[0].sign(message)),
            (2, private_keys[1].sign(message)),
        ])
        .unwrap();
        assert!(!multi_pk.verify(message, &multi_sig));
    }

    #[test]
    fn test_bitmap_past_key_set_rejected() {
        let (private_keys, public_keys) = keys(3);
        let multi_pk = MultiEd25519PublicKey::new(public_keys[..2].to_vec(), 1).unwrap();
        let message = b"msg";
        let multi_sig =
            MultiEd25519Signature::new(vec![(2, private_keys[2].sign(message))]).unwrap();
        assert!(!multi_pk.verify(message, &multi_sig));
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let (private_keys, _) = keys(1);
        let sig = private_keys[0].sign(b"m");
        assert!(MultiEd25519Signature::new(vec![(0, sig), (0, sig)]).is_err());
        assert!(MultiEd25519Signature::new(vec![(32, sig)]).is_err());
    }

    #[test]
    fn test_from_parts_count_mismatch() {
        let (private_keys, _) = keys(1);
        let sig = private_keys[0].sign(b"m");
        let bitmap = Bitmap::from_positions([0, 1]).unwrap();
        assert!(matches!(
            MultiEd25519Signature::from_parts(vec![sig], bitmap),
            Err(AptosError::SignatureCountMismatch {
                bits_set: 2,
                signatures: 1
            })
        ));
    }

    #[test]
    fn test_multi_ed25519_bytes_roundtrip() {
        let (private_keys, public_keys) = keys(3);
        let multi_pk = MultiEd25519PublicKey::new(public_keys, 2).unwrap();
        let restored = MultiEd25519PublicKey::from_bytes(&multi_pk.to_bytes()).unwrap();
        assert_eq!(restored, multi_pk);

        let multi_sig = MultiEd25519Signature::new(vec![
            (0, private_keys[0].sign(b"test")),
            (2, private_keys[2].sign(b"test")),
        ])
        .unwrap();
        let bytes = multi_sig.to_bytes();
        assert_eq!(bytes.len(), 2 * 64 + 4);
        assert_eq!(MultiEd25519Signature::from_bytes(&bytes).unwrap(), multi_sig);
    }

    #[test]
    fn test_signature_bytes_mismatch() {
        let (private_keys, _) = keys(1);
        let mut bytes = private_keys[0].sign(b"m").to_bytes().to_vec();
        bytes.extend_from_slice(&[0xC0, 0, 0, 0]);
        assert!(MultiEd25519Signature::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_bcs_layout() {
        let (private_keys, public_keys) = keys(2);
        let multi_pk = MultiEd25519PublicKey::new(public_keys, 1).unwrap();
        let encoded = bcs::to_bytes(&multi_pk).unwrap();
        assert_eq!(encoded[0], 65);
        assert_eq!(*encoded.last().unwrap(), 1);
        assert_eq!(
            bcs::from_bytes::<MultiEd25519PublicKey>(&encoded).unwrap(),
            multi_pk
        );

        let multi_sig =
            MultiEd25519Signature::new(vec![(1, private_keys[1].sign(b"m"))]).unwrap();
        let encoded = bcs::to_bytes(&multi_sig).unwrap();
        assert_eq!(encoded[0], 68);
        assert_eq!(&encoded[65..], &[0x40, 0, 0, 0]);
        assert_eq!(
            bcs::from_bytes::<MultiEd25519Signature>(&encoded).unwrap(),
            multi_sig
        );
    }

    #[test]
    fn test_address_derivation_is_stable() {
        let (_, public_keys) = keys(3);
        let multi_pk = MultiEd25519PublicKey::new(public_keys, 2).unwrap();
        let from_hex = MultiEd25519PublicKey::from_hex(&multi_pk.to_string()).unwrap();
        assert_eq!(multi_pk.to_address(), from_hex.to_address());
        assert_eq!(
            multi_pk.authentication_key(),
            AuthenticationKey::from_public_key_and_scheme(&multi_pk.to_bytes(), 1)
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let (_, public_keys) = keys(2);
        let multi_pk = MultiEd25519PublicKey::new(public_keys, 2).unwrap();
        let json = serde_json::to_string(&multi_pk).unwrap();
        let parsed: MultiEd25519PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, multi_pk);
    }
}
