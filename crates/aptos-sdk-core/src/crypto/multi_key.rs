//! Multi-key threshold accounts over mixed schemes.
//!
//! A [`MultiKey`] holds up to 32 [`AnyPublicKey`]s and a threshold. A
//! [`MultiKeySignature`] carries the signatures of the signing subset in key
//! order plus a [`Bitmap`] of which keys signed.

use crate::bcs::{BcsError, BcsResult, Decode, Deserializer, Encode, Serializer};
use crate::crypto::bitmap::{Bitmap, MAX_BITMAP_SIGNERS};
use crate::crypto::single_key::{AnyPublicKey, AnySignature};
use crate::crypto::{AuthenticationKey, MULTI_KEY_SCHEME};
use crate::error::{AptosError, AptosResult};
use crate::types::AccountAddress;
use std::fmt;

/// Maximum number of keys in a multi-key account.
pub const MAX_NUM_OF_KEYS: usize = MAX_BITMAP_SIGNERS;

/// Minimum threshold (at least 1 signature required).
pub const MIN_THRESHOLD: u8 = 1;

/// An M-of-N set of public keys of any scheme.
///
/// # Example
///
/// ```rust
/// use aptos_sdk_core::crypto::{AnyPublicKey, Ed25519PrivateKey, MultiKey, Secp256k1PrivateKey};
///
/// let keys = vec![
///     AnyPublicKey::from(Ed25519PrivateKey::generate().public_key()),
///     AnyPublicKey::from(Secp256k1PrivateKey::generate().public_key()),
/// ];
/// let multi_key = MultiKey::new(keys, 1).unwrap();
/// assert_eq!(multi_key.threshold(), 1);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct MultiKey {
    public_keys: Vec<AnyPublicKey>,
    signatures_required: u8,
}

impl MultiKey {
    /// Creates a multi-key set.
    ///
    /// # Errors
    ///
    /// Returns [`AptosError::InvalidPublicKey`] if there are no keys or more
    /// than 32, and [`AptosError::ThresholdNotMet`] if the threshold is zero
    /// or exceeds the number of keys.
    pub fn new(public_keys: Vec<AnyPublicKey>, signatures_required: u8) -> AptosResult<Self> {
        if public_keys.is_empty() {
            return Err(AptosError::InvalidPublicKey(
                "multi-key requires at least one public key".into(),
            ));
        }
        if public_keys.len() > MAX_NUM_OF_KEYS {
            return Err(AptosError::InvalidPublicKey(format!(
                "multi-key supports at most {} keys, got {}",
                MAX_NUM_OF_KEYS,
                public_keys.len()
            )));
        }
        if signatures_required < MIN_THRESHOLD || signatures_required as usize > public_keys.len()
        {
            return Err(AptosError::ThresholdNotMet {
                threshold: signatures_required as usize,
                keys: public_keys.len(),
            });
        }
        Ok(Self {
            public_keys,
            signatures_required,
        })
    }

    /// Returns the number of public keys.
    pub fn num_keys(&self) -> usize {
        self.public_keys.len()
    }

    /// Returns the threshold.
    pub fn threshold(&self) -> u8 {
        self.signatures_required
    }

    /// Returns the public keys.
    pub fn public_keys(&self) -> &[AnyPublicKey] {
        &self.public_keys
    }

    /// Returns the key at `index`.
    pub fn get(&self, index: usize) -> Option<&AnyPublicKey> {
        self.public_keys.get(index)
    }

    /// Returns the position of `public_key` in the set.
    pub fn index_of(&self, public_key: &AnyPublicKey) -> Option<u8> {
        self.public_keys
            .iter()
            .position(|pk| pk == public_key)
            .map(|i| i as u8)
    }

    /// Returns the BCS encoding: the key sequence followed by the threshold.
    pub fn to_bcs_bytes(&self) -> Vec<u8> {
        let mut ser = Serializer::new();
        ser.write(self);
        ser.as_bytes().to_vec()
    }

    /// Decodes a multi-key set from its BCS encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not exactly one valid multi-key set.
    pub fn from_bcs_bytes(bytes: &[u8]) -> AptosResult<Self> {
        Ok(crate::bcs::from_bytes(bytes)?)
    }

    /// Derives the authentication key under the multi-key scheme (byte 3).
    pub fn authentication_key(&self) -> AuthenticationKey {
        AuthenticationKey::from_public_key_and_scheme(&self.to_bcs_bytes(), MULTI_KEY_SCHEME)
    }

    /// Derives the account address.
    pub fn to_address(&self) -> AccountAddress {
        self.authentication_key().to_address()
    }

    /// Returns true if at least `threshold` of the signatures indicated by the
    /// bitmap verify under the matching keys.
    ///
    /// The i-th signature is paired with the key at the i-th set bit. A
    /// bitmap whose set-bit count differs from the number of signatures, or
    /// that points past the last key, is rejected.
    pub fn verify(&self, message: &[u8], signature: &MultiKeySignature) -> bool {
        let bits_set = signature.bitmap.count_ones() as usize;
        if bits_set != signature.signatures.len() {
            tracing::debug!(
                bits_set,
                signatures = signature.signatures.len(),
                "multi-key signature count does not match bitmap"
            );
            return false;
        }
        if let Some(last) = signature.bitmap.last_set_bit() {
            if last as usize >= self.public_keys.len() {
                tracing::debug!(
                    index = last,
                    keys = self.public_keys.len(),
                    "multi-key bitmap points past the key set"
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
        if valid < self.signatures_required as usize {
            tracing::debug!(
                valid,
                threshold = self.signatures_required,
                "multi-key threshold not met"
            );
            return false;
        }
        true
    }
}

impl fmt::Debug for MultiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MultiKey({}-of-{} keys)",
            self.signatures_required,
            self.public_keys.len()
        )
    }
}

impl fmt::Display for MultiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bcs_bytes()))
    }
}

impl Encode for MultiKey {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_sequence(&self.public_keys);
        ser.write_u8(self.signatures_required);
    }
}

impl Decode for MultiKey {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let public_keys = de.read_bounded_sequence("MultiKey keys", 1, MAX_NUM_OF_KEYS)?;
        let signatures_required = de.read_u8();
        de.check()?;
        Self::new(public_keys, signatures_required).map_err(BcsError::custom)
    }
}

/// Signatures of a subset of a [`MultiKey`], in key order.
#[derive(Clone, PartialEq, Eq)]
pub struct MultiKeySignature {
    signatures: Vec<AnySignature>,
    bitmap: Bitmap,
}

impl MultiKeySignature {
    /// Creates a signature from `(key_index, signature)` pairs in any order.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no signatures, an index is 32 or more,
    /// or an index repeats.
    pub fn new(mut signatures: Vec<(u8, AnySignature)>) -> AptosResult<Self> {
        if signatures.is_empty() {
            return Err(AptosError::InvalidSignature(
                "multi-key signature requires at least one signature".into(),
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
    pub fn from_parts(signatures: Vec<AnySignature>, bitmap: Bitmap) -> AptosResult<Self> {
        let bits_set = bitmap.count_ones() as usize;
        if bits_set != signatures.len() {
            return Err(AptosError::SignatureCountMismatch {
                bits_set,
                signatures: signatures.len(),
            });
        }
        Ok(Self { signatures, bitmap })
    }

    /// Returns the number of signatures.
    pub fn num_signatures(&self) -> usize {
        self.signatures.len()
    }

    /// Returns the signatures in key order.
    pub fn signatures(&self) -> &[AnySignature] {
        &self.signatures
    }

    /// Returns the signer bitmap.
    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Checks if the key at `index` signed.
    pub fn has_signature(&self, index: u8) -> bool {
        self.bitmap.is_set(index)
    }
}

impl fmt::Debug for MultiKeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MultiKeySignature({} signatures, {:?})",
            self.signatures.len(),
            self.bitmap
        )
    }
}

impl Encode for MultiKeySignature {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_sequence(&self.signatures);
        ser.write(&self.bitmap);
    }
}

// Decoding does not require the signature count to match the bitmap;
// `MultiKey::verify` rejects such values.
impl Decode for MultiKeySignature {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let signatures = de.read_bounded_sequence("MultiKey signatures", 0, MAX_NUM_OF_KEYS)?;
        let bitmap = de.read()?;
        Ok(Self { signatures, bitmap })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcs;
    use crate::crypto::{Ed25519PrivateKey, Secp256k1PrivateKey};

    struct Fixture {
        a: Ed25519PrivateKey,
        b: Ed25519PrivateKey,
        c: Secp256k1PrivateKey,
        multi_key: MultiKey,
    }

    fn fixture() -> Fixture {
        let a = Ed25519PrivateKey::generate();
        let b = Ed25519PrivateKey::generate();
        let c = Secp256k1PrivateKey::generate();
        let multi_key = MultiKey::new(
            vec![
                a.public_key().into(),
                b.public_key().into(),
                c.public_key().into(),
            ],
            2,
        )
        .unwrap();
        Fixture { a, b, c, multi_key }
    }

    #[test]
    fn test_two_of_three() {
        let f = fixture();
        let msg = b"test";
        let sig = MultiKeySignature::new(vec![
            (0, f.a.sign(msg).into()),
            (2, f.c.sign(msg).into()),
        ])
        .unwrap();
        assert_eq!(sig.bitmap().as_bytes(), &[0xA0, 0, 0, 0]);
        assert!(f.multi_key.verify(msg, &sig));
        assert!(!f.multi_key.verify(b"other", &sig));
    }

    #[test]
    fn test_below_threshold() {
        let f = fixture();
        let sig = MultiKeySignature::new(vec![(1, f.b.sign(b"test").into())]).unwrap();
        assert!(!f.multi_key.verify(b"test", &sig));
    }

    #[test]
    fn test_count_mismatch_rejected() {
        let f = fixture();
        let sig = MultiKeySignature {
            signatures: vec![f.c.sign(b"test").into()],
            bitmap: Bitmap::from_positions([0, 2]).unwrap(),
        };
        assert!(!f.multi_key.verify(b"test", &sig));
        assert!(matches!(
            MultiKeySignature::from_parts(sig.signatures.clone(), sig.bitmap),
            Err(AptosError::SignatureCountMismatch { .. })
        ));
    }

    #[test]
    fn test_signature_in_wrong_slot_does_not_count() {
        let f = fixture();
        let sig = MultiKeySignature::new(vec![
            (0, f.a.sign(b"test").into()),
            (1, f.c.sign(b"test").into()),
        ])
        .unwrap();
        assert!(!f.multi_key.verify(b"test", &sig));
    }

    #[test]
    fn test_constructor_errors() {
        let pk: AnyPublicKey = Ed25519PrivateKey::generate().public_key().into();
        assert!(MultiKey::new(vec![], 1).is_err());
        assert!(matches!(
            MultiKey::new(vec![pk.clone()], 2),
            Err(AptosError::ThresholdNotMet {
                threshold: 2,
                keys: 1
            })
        ));
        assert!(MultiKey::new(vec![pk.clone(); 33], 1).is_err());
        assert!(MultiKey::new(vec![pk; 32], 32).is_ok());
    }

    #[test]
    fn test_bcs_layout() {
        let f = fixture();
        let bytes = f.multi_key.to_bcs_bytes();
        // count, two Ed25519 keys (34 bytes each), one Secp256k1 key (67), threshold
        assert_eq!(bytes.len(), 1 + 34 + 34 + 67 + 1);
        assert_eq!(bytes[0], 3);
        assert_eq!(*bytes.last().unwrap(), 2);
        assert_eq!(MultiKey::from_bcs_bytes(&bytes).unwrap(), f.multi_key);
    }

    #[test]
    fn test_signature_bcs_roundtrip() {
        let f = fixture();
        let sig = MultiKeySignature::new(vec![
            (0, f.a.sign(b"m").into()),
            (1, f.b.sign(b"m").into()),
        ])
        .unwrap();
        let bytes = bcs::to_bytes(&sig).unwrap();
        assert_eq!(&bytes[bytes.len() - 5..], &[4, 0xC0, 0, 0, 0]);
        assert_eq!(bcs::from_bytes::<MultiKeySignature>(&bytes).unwrap(), sig);
    }

    #[test]
    fn test_decode_invalid_threshold() {
        let pk: AnyPublicKey = Ed25519PrivateKey::generate().public_key().into();
        let mut ser = Serializer::new();
        ser.write_sequence(&[pk]);
        ser.write_u8(0);
        assert!(matches!(
            bcs::from_bytes::<MultiKey>(ser.as_bytes()),
            Err(BcsError::Custom(_))
        ));
    }

    #[test]
    fn test_authentication_key_scheme() {
        let f = fixture();
        assert_eq!(
            f.multi_key.authentication_key(),
            AuthenticationKey::from_public_key_and_scheme(&f.multi_key.to_bcs_bytes(), 3)
        );
        assert_eq!(f.multi_key.index_of(&f.c.public_key().into()), Some(2));
    }
}
