//! WebAuthn (passkey) assertions over Secp256r1.
//!
//! A passkey never signs the Aptos signing message directly. The browser
//! builds a `clientDataJSON` document whose `challenge` field carries the
//! base64url-encoded SHA3-256 of the signing message, and the authenticator
//! signs `authenticator_data || SHA-256(clientDataJSON)` with SHA-256 as the
//! ECDSA digest. Verification checks both bindings.

use crate::bcs::{BcsError, BcsResult, Decode, Deserializer, Encode, Serializer};
use crate::crypto::hash::{sha2_256, sha3_256};
use crate::crypto::secp256r1::{Secp256r1PrivateKey, Secp256r1PublicKey, Secp256r1Signature};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Largest accepted `clientDataJSON` in bytes.
pub const MAX_CLIENT_DATA_JSON_LENGTH: usize = 8192;
/// Smallest valid authenticator data: RP id hash, flags and sign counter.
pub const MIN_AUTHENTICATOR_DATA_LENGTH: usize = 37;
/// Largest accepted authenticator data in bytes.
pub const MAX_AUTHENTICATOR_DATA_LENGTH: usize = 1024;

const CHALLENGE_LENGTH: usize = 32;
const WEBAUTHN_GET: &str = "webauthn.get";
// User present and user verified.
const AUTHENTICATOR_FLAGS: u8 = 0x05;

/// Errors building or checking a WebAuthn assertion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WebAuthnError {
    /// Decoded challenge is not 32 bytes
    #[error("challenge is {actual} bytes, expected {expected}")]
    ChallengeLengthMismatch {
        /// Decoded length
        actual: usize,
        /// Required length
        expected: usize,
    },

    /// Challenge is not valid base64url
    #[error("challenge is not valid base64url")]
    ChallengeDecodeFailed,

    /// Authenticator data outside the accepted size range
    #[error("authenticator data is {actual} bytes, expected {min} to {max}")]
    AuthenticatorDataSizeOutOfBounds {
        /// Supplied length
        actual: usize,
        /// Minimum length
        min: usize,
        /// Maximum length
        max: usize,
    },

    /// `clientDataJSON` larger than the accepted maximum
    #[error("clientDataJSON is {actual} bytes, max {max}")]
    ClientDataOversize {
        /// Supplied length
        actual: usize,
        /// Maximum length
        max: usize,
    },

    /// `clientDataJSON` could not be parsed
    #[error("clientDataJSON is malformed: {0}")]
    ClientDataMalformed(String),

    /// Challenge does not commit to the signing message
    #[error("challenge does not match the signing message")]
    ChallengeMismatch,

    /// ECDSA signature does not verify
    #[error("assertion signature is invalid")]
    SignatureInvalid,
}

/// The parsed `clientDataJSON` of an assertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectedClientData {
    /// Ceremony type, `webauthn.get` for assertions.
    #[serde(rename = "type")]
    pub ty: String,
    /// Base64url challenge.
    pub challenge: String,
    /// Origin of the relying party.
    pub origin: String,
    /// Set by browsers for cross-origin iframes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_origin: Option<bool>,
}

/// The signature inside an assertion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssertionSignature {
    /// ECDSA over P-256.
    Secp256r1Ecdsa {
        /// Low-s signature.
        signature: Secp256r1Signature,
    },
}

impl Encode for AssertionSignature {
    fn encode(&self, ser: &mut Serializer) {
        match self {
            AssertionSignature::Secp256r1Ecdsa { signature } => {
                ser.write_variant_index(0);
                ser.write(signature);
            }
        }
    }
}

impl Decode for AssertionSignature {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        match de.read_variant_index() {
            0 => Ok(AssertionSignature::Secp256r1Ecdsa {
                signature: de.read()?,
            }),
            tag => {
                de.check()?;
                Err(BcsError::InvalidVariant {
                    kind: "AssertionSignature",
                    tag,
                })
            }
        }
    }
}

/// The parts of a WebAuthn assertion response Aptos needs to verify it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialAuthenticatorAssertionResponse {
    signature: AssertionSignature,
    authenticator_data: Vec<u8>,
    client_data_json: Vec<u8>,
}

impl PartialAuthenticatorAssertionResponse {
    /// Creates an assertion, checking the size limits.
    ///
    /// # Errors
    ///
    /// [`WebAuthnError::AuthenticatorDataSizeOutOfBounds`] or
    /// [`WebAuthnError::ClientDataOversize`].
    pub fn new(
        signature: AssertionSignature,
        authenticator_data: Vec<u8>,
        client_data_json: Vec<u8>,
    ) -> Result<Self, WebAuthnError> {
        if !(MIN_AUTHENTICATOR_DATA_LENGTH..=MAX_AUTHENTICATOR_DATA_LENGTH)
            .contains(&authenticator_data.len())
        {
            return Err(WebAuthnError::AuthenticatorDataSizeOutOfBounds {
                actual: authenticator_data.len(),
                min: MIN_AUTHENTICATOR_DATA_LENGTH,
                max: MAX_AUTHENTICATOR_DATA_LENGTH,
            });
        }
        if client_data_json.len() > MAX_CLIENT_DATA_JSON_LENGTH {
            return Err(WebAuthnError::ClientDataOversize {
                actual: client_data_json.len(),
                max: MAX_CLIENT_DATA_JSON_LENGTH,
            });
        }
        Ok(Self {
            signature,
            authenticator_data,
            client_data_json,
        })
    }

    /// Produces an assertion locally, acting as the authenticator.
    ///
    /// `message` is the signing message; its SHA3-256 becomes the challenge.
    ///
    /// # Errors
    ///
    /// Returns an error if the authenticator data is out of bounds or the
    /// client data cannot be serialized.
    pub fn sign(
        private_key: &Secp256r1PrivateKey,
        message: &[u8],
        authenticator_data: Vec<u8>,
        origin: &str,
    ) -> Result<Self, WebAuthnError> {
        let client_data = CollectedClientData {
            ty: WEBAUTHN_GET.to_string(),
            challenge: URL_SAFE_NO_PAD.encode(sha3_256(message)),
            origin: origin.to_string(),
            cross_origin: None,
        };
        let client_data_json = serde_json::to_vec(&client_data)
            .map_err(|e| WebAuthnError::ClientDataMalformed(e.to_string()))?;
        let signature = private_key.sign_sha256(&verification_data(
            &authenticator_data,
            &client_data_json,
        ));
        Self::new(
            AssertionSignature::Secp256r1Ecdsa { signature },
            authenticator_data,
            client_data_json,
        )
    }

    /// Returns the assertion signature.
    pub fn signature(&self) -> &AssertionSignature {
        &self.signature
    }

    /// Returns the raw authenticator data.
    pub fn authenticator_data(&self) -> &[u8] {
        &self.authenticator_data
    }

    /// Returns the raw `clientDataJSON` bytes.
    pub fn client_data_json(&self) -> &[u8] {
        &self.client_data_json
    }

    /// Parses the `clientDataJSON`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is oversized or not valid JSON.
    pub fn collected_client_data(&self) -> Result<CollectedClientData, WebAuthnError> {
        if self.client_data_json.len() > MAX_CLIENT_DATA_JSON_LENGTH {
            return Err(WebAuthnError::ClientDataOversize {
                actual: self.client_data_json.len(),
                max: MAX_CLIENT_DATA_JSON_LENGTH,
            });
        }
        serde_json::from_slice(&self.client_data_json)
            .map_err(|e| WebAuthnError::ClientDataMalformed(e.to_string()))
    }

    /// Decodes the challenge from the `clientDataJSON`.
    ///
    /// # Errors
    ///
    /// Returns an error if the client data is malformed or the challenge is
    /// not 32 bytes of base64url.
    pub fn challenge(&self) -> Result<Vec<u8>, WebAuthnError> {
        let client_data = self.collected_client_data()?;
        let challenge = URL_SAFE_NO_PAD
            .decode(client_data.challenge.trim_end_matches('='))
            .map_err(|_| WebAuthnError::ChallengeDecodeFailed)?;
        if challenge.len() != CHALLENGE_LENGTH {
            return Err(WebAuthnError::ChallengeLengthMismatch {
                actual: challenge.len(),
                expected: CHALLENGE_LENGTH,
            });
        }
        Ok(challenge)
    }

    /// Checks the assertion against `message` and `public_key`, reporting
    /// which step failed.
    ///
    /// # Errors
    ///
    /// Returns the first failing check.
    pub fn check(
        &self,
        message: &[u8],
        public_key: &Secp256r1PublicKey,
    ) -> Result<(), WebAuthnError> {
        if !(MIN_AUTHENTICATOR_DATA_LENGTH..=MAX_AUTHENTICATOR_DATA_LENGTH)
            .contains(&self.authenticator_data.len())
        {
            return Err(WebAuthnError::AuthenticatorDataSizeOutOfBounds {
                actual: self.authenticator_data.len(),
                min: MIN_AUTHENTICATOR_DATA_LENGTH,
                max: MAX_AUTHENTICATOR_DATA_LENGTH,
            });
        }
        let challenge = self.challenge()?;
        let expected = sha3_256(message);
        if !bool::from(challenge.as_slice().ct_eq(expected.as_slice())) {
            return Err(WebAuthnError::ChallengeMismatch);
        }
        let AssertionSignature::Secp256r1Ecdsa { signature } = &self.signature;
        let data = verification_data(&self.authenticator_data, &self.client_data_json);
        if public_key.verify_sha256(&data, signature) {
            Ok(())
        } else {
            Err(WebAuthnError::SignatureInvalid)
        }
    }

    /// Returns true if the assertion is a valid passkey signature of `message`.
    pub fn verify(&self, message: &[u8], public_key: &Secp256r1PublicKey) -> bool {
        match self.check(message, public_key) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(error = %err, "webauthn assertion rejected");
                false
            }
        }
    }
}

/// Builds minimal authenticator data for `rp_id`: its SHA-256, the
/// user-present and user-verified flags and a zero sign counter.
pub fn authenticator_data_for(rp_id: &str) -> Vec<u8> {
    let mut data = Vec::with_capacity(MIN_AUTHENTICATOR_DATA_LENGTH);
    data.extend_from_slice(&sha2_256(rp_id.as_bytes()));
    data.push(AUTHENTICATOR_FLAGS);
    data.extend_from_slice(&0u32.to_be_bytes());
    data
}

fn verification_data(authenticator_data: &[u8], client_data_json: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(authenticator_data.len() + 32);
    data.extend_from_slice(authenticator_data);
    data.extend_from_slice(&sha2_256(client_data_json));
    data
}

impl Encode for PartialAuthenticatorAssertionResponse {
    fn encode(&self, ser: &mut Serializer) {
        ser.write(&self.signature);
        ser.write_bytes(&self.authenticator_data);
        ser.write_bytes(&self.client_data_json);
    }
}

impl Decode for PartialAuthenticatorAssertionResponse {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let signature = de.read()?;
        let authenticator_data = de.read_bounded_bytes(
            "authenticator data",
            MIN_AUTHENTICATOR_DATA_LENGTH,
            MAX_AUTHENTICATOR_DATA_LENGTH,
        );
        let client_data_json =
            de.read_bounded_bytes("clientDataJSON", 0, MAX_CLIENT_DATA_JSON_LENGTH);
        de.check()?;
        Ok(Self {
            signature,
            authenticator_data,
            client_data_json,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcs;

    const ORIGIN: &str = "https://wallet.example";

    fn signed(message: &[u8]) -> (Secp256r1PrivateKey, PartialAuthenticatorAssertionResponse) {
        let key = Secp256r1PrivateKey::generate();
        let assertion = PartialAuthenticatorAssertionResponse::sign(
            &key,
            message,
            authenticator_data_for("wallet.example"),
            ORIGIN,
        )
        .unwrap();
        (key, assertion)
    }

    #[test]
    fn test_sign_and_verify() {
        let (key, assertion) = signed(b"signing message");
        assert!(assertion.verify(b"signing message", &key.public_key()));
        assert!(!assertion.verify(b"other message", &key.public_key()));
        assert!(!assertion.verify(
            b"signing message",
            &Secp256r1PrivateKey::generate().public_key()
        ));
    }

    #[test]
    fn test_client_data_contents() {
        let (_, assertion) = signed(b"msg");
        let client_data = assertion.collected_client_data().unwrap();
        assert_eq!(client_data.ty, "webauthn.get");
        assert_eq!(client_data.origin, ORIGIN);
        assert_eq!(assertion.challenge().unwrap(), sha3_256(b"msg").to_vec());
    }

    #[test]
    fn test_check_reports_failures() {
        let (key, assertion) = signed(b"msg");
        assert_eq!(
            assertion.check(b"other", &key.public_key()),
            Err(WebAuthnError::ChallengeMismatch)
        );
        assert_eq!(
            assertion.check(b"msg", &Secp256r1PrivateKey::generate().public_key()),
            Err(WebAuthnError::SignatureInvalid)
        );
    }

    #[test]
    fn test_tampered_authenticator_data() {
        let (key, assertion) = signed(b"msg");
        let mut data = assertion.authenticator_data().to_vec();
        data[32] ^= 0x01;
        let tampered = PartialAuthenticatorAssertionResponse::new(
            assertion.signature().clone(),
            data,
            assertion.client_data_json().to_vec(),
        )
        .unwrap();
        assert!(!tampered.verify(b"msg", &key.public_key()));
    }

    #[test]
    fn test_size_limits() {
        let (_, assertion) = signed(b"msg");
        let signature = assertion.signature().clone();
        assert!(matches!(
            PartialAuthenticatorAssertionResponse::new(signature.clone(), vec![0; 36], vec![]),
            Err(WebAuthnError::AuthenticatorDataSizeOutOfBounds { actual: 36, .. })
        ));
        assert!(matches!(
            PartialAuthenticatorAssertionResponse::new(signature.clone(), vec![0; 1025], vec![]),
            Err(WebAuthnError::AuthenticatorDataSizeOutOfBounds { .. })
        ));
        assert!(matches!(
            PartialAuthenticatorAssertionResponse::new(signature, vec![0; 37], vec![b' '; 8193]),
            Err(WebAuthnError::ClientDataOversize { .. })
        ));
    }

    #[test]
    fn test_challenge_errors() {
        let (key, assertion) = signed(b"msg");
        let signature = assertion.signature().clone();
        let short = serde_json::to_vec(&CollectedClientData {
            ty: WEBAUTHN_GET.to_string(),
            challenge: URL_SAFE_NO_PAD.encode([1u8; 16]),
            origin: ORIGIN.to_string(),
            cross_origin: None,
        })
        .unwrap();
        let assertion = PartialAuthenticatorAssertionResponse::new(
            signature.clone(),
            authenticator_data_for("x"),
            short,
        )
        .unwrap();
        assert_eq!(
            assertion.check(b"msg", &key.public_key()),
            Err(WebAuthnError::ChallengeLengthMismatch {
                actual: 16,
                expected: 32
            })
        );

        let bad = br#"{"type":"webauthn.get","challenge":"***","origin":"o"}"#.to_vec();
        let assertion =
            PartialAuthenticatorAssertionResponse::new(signature.clone(), vec![0; 37], bad)
                .unwrap();
        assert_eq!(assertion.challenge(), Err(WebAuthnError::ChallengeDecodeFailed));

        let assertion = PartialAuthenticatorAssertionResponse::new(
            signature,
            vec![0; 37],
            b"not json".to_vec(),
        )
        .unwrap();
        assert!(matches!(
            assertion.challenge(),
            Err(WebAuthnError::ClientDataMalformed(_))
        ));
        assert!(!assertion.verify(b"msg", &key.public_key()));
    }

    #[test]
    fn test_bcs_roundtrip() {
        let (key, assertion) = signed(b"msg");
        let bytes = bcs::to_bytes(&assertion).unwrap();
        assert_eq!(bytes[0], 0);
        let decoded = bcs::from_bytes::<PartialAuthenticatorAssertionResponse>(&bytes).unwrap();
        assert_eq!(decoded, assertion);
        assert!(decoded.verify(b"msg", &key.public_key()));
    }

    #[test]
    fn test_bcs_unknown_signature_variant() {
        assert_eq!(
            bcs::from_bytes::<AssertionSignature>(&[1]),
            Err(BcsError::InvalidVariant {
                kind: "AssertionSignature",
                tag: 1
            })
        );
    }

    #[test]
    fn test_authenticator_data_for() {
        let data = authenticator_data_for("example.com");
        assert_eq!(data.len(), MIN_AUTHENTICATOR_DATA_LENGTH);
        assert_eq!(&data[..32], &sha2_256(b"example.com"));
        assert_eq!(data[32], 0x05);
    }
}
