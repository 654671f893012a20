//! Scheme-tagged keys and signatures.
//!
//! [`AnyPublicKey`] and [`AnySignature`] wrap a key or signature of any
//! supported scheme behind a variant tag. They are what single-key
//! authenticators and multi-key sets store, and the BCS of an
//! [`AnyPublicKey`] is what the single-key authentication key hashes.

use crate::bcs::{BcsError, BcsResult, Decode, Deserializer, Encode, Serializer};
use crate::crypto::ed25519::{Ed25519PublicKey, Ed25519Signature};
use crate::crypto::keyless::{KeylessPublicKey, KeylessSignature};
use crate::crypto::secp256k1::{Secp256k1PublicKey, Secp256k1Signature};
use crate::crypto::secp256r1::Secp256r1PublicKey;
use crate::crypto::traits::decode_hex;
use crate::crypto::webauthn::PartialAuthenticatorAssertionResponse;
use crate::crypto::{AuthenticationKey, SINGLE_KEY_SCHEME};
use crate::error::AptosResult;
use crate::types::AccountAddress;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A public key of any scheme that single-key and multi-key accounts accept.
///
/// | Tag | Scheme |
/// |-----|--------|
/// | 0 | Ed25519 |
/// | 1 | Secp256k1 |
/// | 2 | Secp256r1 |
/// | 3 | Keyless |
#[derive(Clone, PartialEq, Eq)]
pub enum AnyPublicKey {
    /// Ed25519 key.
    Ed25519(Ed25519PublicKey),
    /// Secp256k1 key.
    Secp256k1(Secp256k1PublicKey),
    /// Secp256r1 key, signing through WebAuthn.
    Secp256r1(Secp256r1PublicKey),
    /// Keyless key.
    Keyless(KeylessPublicKey),
}

impl AnyPublicKey {
    /// Returns the variant tag written on the wire.
    pub fn variant_index(&self) -> u32 {
        match self {
            AnyPublicKey::Ed25519(_) => 0,
            AnyPublicKey::Secp256k1(_) => 1,
            AnyPublicKey::Secp256r1(_) => 2,
            AnyPublicKey::Keyless(_) => 3,
        }
    }

    /// Returns the scheme name, for logs and errors.
    pub fn scheme_name(&self) -> &'static str {
        match self {
            AnyPublicKey::Ed25519(_) => "Ed25519",
            AnyPublicKey::Secp256k1(_) => "Secp256k1",
            AnyPublicKey::Secp256r1(_) => "Secp256r1",
            AnyPublicKey::Keyless(_) => "Keyless",
        }
    }

    /// Returns the BCS encoding: variant tag followed by the inner key.
    pub fn to_bcs_bytes(&self) -> Vec<u8> {
        let mut ser = Serializer::new();
        ser.write(self);
        ser.as_bytes().to_vec()
    }

    /// Decodes a key from its BCS encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not exactly one encoded key.
    pub fn from_bcs_bytes(bytes: &[u8]) -> AptosResult<Self> {
        Ok(crate::bcs::from_bytes(bytes)?)
    }

    /// Derives the authentication key under the single-key scheme (byte 2).
    ///
    /// The hashed bytes are the tagged BCS encoding, so the same curve point
    /// yields a different key here than under the legacy Ed25519 scheme.
    pub fn authentication_key(&self) -> AuthenticationKey {
        AuthenticationKey::from_public_key_and_scheme(&self.to_bcs_bytes(), SINGLE_KEY_SCHEME)
    }

    /// Derives the account address under the single-key scheme.
    pub fn to_address(&self) -> AccountAddress {
        self.authentication_key().to_address()
    }

    /// Returns true if `signature` is a valid signature of `message` under
    /// this key.
    ///
    /// Schemes must pair up: Ed25519 with Ed25519, Secp256k1 with Secp256k1
    /// and Secp256r1 with a WebAuthn assertion. Keyless signatures cannot be
    /// checked locally and never verify.
    pub fn verify(&self, message: &[u8], signature: &AnySignature) -> bool {
        match (self, signature) {
            (AnyPublicKey::Ed25519(pk), AnySignature::Ed25519(sig)) => pk.verify(message, sig),
            (AnyPublicKey::Secp256k1(pk), AnySignature::Secp256k1(sig)) => {
                pk.verify(message, sig)
            }
            (AnyPublicKey::Secp256r1(pk), AnySignature::WebAuthn(assertion)) => {
                assertion.verify(message, pk)
            }
            (AnyPublicKey::Keyless(_), AnySignature::Keyless(_)) => {
                tracing::debug!("keyless signatures are not verified locally");
                false
            }
            (pk, sig) => {
                tracing::debug!(
                    key_scheme = pk.scheme_name(),
                    signature_variant = sig.variant_index(),
                    "signature scheme does not match key"
                );
                false
            }
        }
    }
}

impl fmt::Debug for AnyPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyPublicKey::Ed25519(pk) => write!(f, "AnyPublicKey::{pk:?}"),
            AnyPublicKey::Secp256k1(pk) => write!(f, "AnyPublicKey::{pk:?}"),
            AnyPublicKey::Secp256r1(pk) => write!(f, "AnyPublicKey::{pk:?}"),
            AnyPublicKey::Keyless(pk) => write!(f, "AnyPublicKey::Keyless({})", pk.iss_val),
        }
    }
}

impl fmt::Display for AnyPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bcs_bytes()))
    }
}

impl From<Ed25519PublicKey> for AnyPublicKey {
    fn from(pk: Ed25519PublicKey) -> Self {
        AnyPublicKey::Ed25519(pk)
    }
}

impl From<Secp256k1PublicKey> for AnyPublicKey {
    fn from(pk: Secp256k1PublicKey) -> Self {
        AnyPublicKey::Secp256k1(pk)
    }
}

impl From<Secp256r1PublicKey> for AnyPublicKey {
    fn from(pk: Secp256r1PublicKey) -> Self {
        AnyPublicKey::Secp256r1(pk)
    }
}

impl From<KeylessPublicKey> for AnyPublicKey {
    fn from(pk: KeylessPublicKey) -> Self {
        AnyPublicKey::Keyless(pk)
    }
}

impl Encode for AnyPublicKey {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_variant_index(self.variant_index());
        match self {
            AnyPublicKey::Ed25519(pk) => ser.write(pk),
            AnyPublicKey::Secp256k1(pk) => ser.write(pk),
            AnyPublicKey::Secp256r1(pk) => ser.write(pk),
            AnyPublicKey::Keyless(pk) => ser.write(pk),
        }
    }
}

impl Decode for AnyPublicKey {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        match de.read_variant_index() {
            0 => Ok(AnyPublicKey::Ed25519(de.read()?)),
            1 => Ok(AnyPublicKey::Secp256k1(de.read()?)),
            2 => Ok(AnyPublicKey::Secp256r1(de.read()?)),
            3 => Ok(AnyPublicKey::Keyless(de.read()?)),
            tag => {
                de.check()?;
                Err(BcsError::InvalidVariant {
                    kind: "AnyPublicKey",
                    tag,
                })
            }
        }
    }
}

impl Serialize for AnyPublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_bytes(&self.to_bcs_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for AnyPublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes = if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            decode_hex(&s).map_err(serde::de::Error::custom)?
        } else {
            Vec::<u8>::deserialize(deserializer)?
        };
        Self::from_bcs_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

/// A signature of any scheme that single-key and multi-key accounts accept.
///
/// | Tag | Scheme |
/// |-----|--------|
/// | 0 | Ed25519 |
/// | 1 | Secp256k1 |
/// | 2 | WebAuthn (Secp256r1 passkey) |
/// | 3 | Keyless |
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnySignature {
    /// Ed25519 signature.
    Ed25519(Ed25519Signature),
    /// Secp256k1 signature over the SHA3-256 digest.
    Secp256k1(Secp256k1Signature),
    /// Passkey assertion over a Secp256r1 key.
    WebAuthn(PartialAuthenticatorAssertionResponse),
    /// Keyless signature.
    Keyless(KeylessSignature),
}

impl AnySignature {
    /// Returns the variant tag written on the wire.
    pub fn variant_index(&self) -> u32 {
        match self {
            AnySignature::Ed25519(_) => 0,
            AnySignature::Secp256k1(_) => 1,
            AnySignature::WebAuthn(_) => 2,
            AnySignature::Keyless(_) => 3,
        }
    }

    /// Returns the BCS encoding: variant tag followed by the inner signature.
    pub fn to_bcs_bytes(&self) -> Vec<u8> {
        let mut ser = Serializer::new();
        ser.write(self);
        ser.as_bytes().to_vec()
    }
}

impl From<Ed25519Signature> for AnySignature {
    fn from(sig: Ed25519Signature) -> Self {
        AnySignature::Ed25519(sig)
    }
}

impl From<Secp256k1Signature> for AnySignature {
    fn from(sig: Secp256k1Signature) -> Self {
        AnySignature::Secp256k1(sig)
    }
}

impl From<PartialAuthenticatorAssertionResponse> for AnySignature {
    fn from(assertion: PartialAuthenticatorAssertionResponse) -> Self {
        AnySignature::WebAuthn(assertion)
    }
}

impl From<KeylessSignature> for AnySignature {
    fn from(sig: KeylessSignature) -> Self {
        AnySignature::Keyless(sig)
    }
}

impl Encode for AnySignature {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_variant_index(self.variant_index());
        match self {
            AnySignature::Ed25519(sig) => ser.write(sig),
            AnySignature::Secp256k1(sig) => ser.write(sig),
            AnySignature::WebAuthn(assertion) => ser.write(assertion),
            AnySignature::Keyless(sig) => ser.write(sig),
        }
    }
}

impl Decode for AnySignature {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        match de.read_variant_index() {
            0 => Ok(AnySignature::Ed25519(de.read()?)),
            1 => Ok(AnySignature::Secp256k1(de.read()?)),
            2 => Ok(AnySignature::WebAuthn(de.read()?)),
            3 => Ok(AnySignature::Keyless(de.read()?)),
            tag => {
                de.check()?;
                Err(BcsError::InvalidVariant {
                    kind: "AnySignature",
                    tag,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcs;
    use crate::crypto::webauthn::authenticator_data_for;
    use crate::crypto::{Ed25519PrivateKey, Secp256k1PrivateKey, Secp256r1PrivateKey};

    #[test]
    fn test_variant_tags() {
        let ed = AnyPublicKey::from(Ed25519PrivateKey::generate().public_key());
        let k1 = AnyPublicKey::from(Secp256k1PrivateKey::generate().public_key());
        let r1 = AnyPublicKey::from(Secp256r1PrivateKey::generate().public_key());
        assert_eq!(ed.to_bcs_bytes()[..2], [0, 32]);
        assert_eq!(k1.to_bcs_bytes()[..2], [1, 65]);
        assert_eq!(r1.to_bcs_bytes()[..2], [2, 65]);
        assert_eq!(ed.to_bcs_bytes().len(), 34);
        assert_eq!(k1.to_bcs_bytes().len(), 67);
    }

    #[test]
    fn test_single_key_auth_key_differs_from_legacy() {
        let pk = Ed25519PrivateKey::generate().public_key();
        let any = AnyPublicKey::from(pk);
        assert_ne!(any.authentication_key(), pk.authentication_key());
        assert_eq!(
            any.authentication_key(),
            AuthenticationKey::from_public_key_and_scheme(&any.to_bcs_bytes(), 2)
        );
    }

    #[test]
    fn test_verify_matching_schemes() {
        let ed = Ed25519PrivateKey::generate();
        let k1 = Secp256k1PrivateKey::generate();
        let msg = b"any signature";

        let ed_pk = AnyPublicKey::from(ed.public_key());
        let k1_pk = AnyPublicKey::from(k1.public_key());
        let ed_sig = AnySignature::from(ed.sign(msg));
        let k1_sig = AnySignature::from(k1.sign(msg));

        assert!(ed_pk.verify(msg, &ed_sig));
        assert!(k1_pk.verify(msg, &k1_sig));
        assert!(!ed_pk.verify(msg, &k1_sig));
        assert!(!k1_pk.verify(msg, &ed_sig));
        assert!(!ed_pk.verify(b"other", &ed_sig));
    }

    #[test]
    fn test_verify_webauthn() {
        let r1 = Secp256r1PrivateKey::generate();
        let msg = b"passkey";
        let assertion = PartialAuthenticatorAssertionResponse::sign(
            &r1,
            msg,
            authenticator_data_for("aptos.dev"),
            "https://aptos.dev",
        )
        .unwrap();
        let pk = AnyPublicKey::from(r1.public_key());
        let sig = AnySignature::from(assertion);
        assert!(pk.verify(msg, &sig));
        assert!(!pk.verify(b"other", &sig));
    }

    #[test]
    fn test_decode_roundtrip() {
        let k1 = Secp256k1PrivateKey::generate();
        let pk = AnyPublicKey::from(k1.public_key());
        let sig = AnySignature::from(k1.sign(b"m"));
        assert_eq!(AnyPublicKey::from_bcs_bytes(&pk.to_bcs_bytes()).unwrap(), pk);
        assert_eq!(
            bcs::from_bytes::<AnySignature>(&sig.to_bcs_bytes()).unwrap(),
            sig
        );
    }

    #[test]
    fn test_unknown_variant() {
        assert_eq!(
            bcs::from_bytes::<AnyPublicKey>(&[4]),
            Err(BcsError::InvalidVariant {
                kind: "AnyPublicKey",
                tag: 4
            })
        );
        assert_eq!(
            bcs::from_bytes::<AnySignature>(&[9]),
            Err(BcsError::InvalidVariant {
                kind: "AnySignature",
                tag: 9
            })
        );
    }

    #[test]
    fn test_keyless_never_verifies() {
        let pk = AnyPublicKey::Keyless(KeylessPublicKey {
            iss_val: "https://accounts.google.com".to_string(),
            idc: vec![0; 32],
        });
        let decoded = AnyPublicKey::from_bcs_bytes(&pk.to_bcs_bytes()).unwrap();
        assert_eq!(decoded, pk);
        let sig = AnySignature::from(Ed25519PrivateKey::generate().sign(b"m"));
        assert!(!pk.verify(b"m", &sig));
    }

    #[test]
    fn test_json_roundtrip() {
        let pk = AnyPublicKey::from(Ed25519PrivateKey::generate().public_key());
        let json = serde_json::to_string(&pk).unwrap();
        assert!(json.starts_with("\"0x0020"));
        let parsed: AnyPublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, pk);
    }
}
