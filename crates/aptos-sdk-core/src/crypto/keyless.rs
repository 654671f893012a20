//! Keyless (OpenID-based) public keys and signatures.
//!
//! These types carry the exact wire layout so that transactions and
//! authenticators containing them decode and re-encode byte for byte.
//! Verifying them needs on-chain JWK and Groth16 parameters, which this crate
//! does not have, so keyless signatures never verify locally.

use crate::bcs::{BcsError, BcsResult, Decode, Deserializer, Encode, Serializer};
use crate::crypto::ed25519::{Ed25519PublicKey, Ed25519Signature};
use crate::crypto::secp256r1::Secp256r1PublicKey;
use crate::crypto::webauthn::PartialAuthenticatorAssertionResponse;

/// Longest accepted `iss` claim.
pub const MAX_ISS_VAL_BYTES: usize = 120;
/// Length of the identity commitment.
pub const IDC_NUM_BYTES: usize = 32;
/// Length of a pepper.
pub const PEPPER_NUM_BYTES: usize = 31;

const MAX_JWT_HEADER_BYTES: usize = 2048;
const MAX_JWT_PAYLOAD_BYTES: usize = 8192;
const MAX_JWT_SIGNATURE_BYTES: usize = 1024;
const MAX_CLAIM_BYTES: usize = 1024;

/// Public key of a keyless account: the OIDC issuer plus a commitment to the
/// user identity and application.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeylessPublicKey {
    /// The `iss` claim of the provider.
    pub iss_val: String,
    /// Identity commitment.
    pub idc: Vec<u8>,
}

impl Encode for KeylessPublicKey {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_str(&self.iss_val);
        ser.write_bytes(&self.idc);
    }
}

impl Decode for KeylessPublicKey {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let iss_val = de.read_bounded_string("keyless iss", 0, MAX_ISS_VAL_BYTES);
        let idc = de.read_bounded_bytes("keyless idc", IDC_NUM_BYTES, IDC_NUM_BYTES);
        de.check()?;
        Ok(Self { iss_val, idc })
    }
}

/// Groth16 proof points in compressed form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Groth16Proof {
    /// G1 point.
    pub a: [u8; 32],
    /// G2 point.
    pub b: [u8; 64],
    /// G1 point.
    pub c: [u8; 32],
}

impl Encode for Groth16Proof {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_fixed_bytes(&self.a);
        ser.write_fixed_bytes(&self.b);
        ser.write_fixed_bytes(&self.c);
    }
}

impl Decode for Groth16Proof {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let a = de.read_fixed_bytes::<32>();
        let b = de.read_fixed_bytes::<64>();
        let c = de.read_fixed_bytes::<32>();
        de.check()?;
        Ok(Self { a, b, c })
    }
}

/// Zero-knowledge proof variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ZkProof {
    /// Groth16 over BN254.
    Groth16(Groth16Proof),
}

impl Encode for ZkProof {
    fn encode(&self, ser: &mut Serializer) {
        match self {
            ZkProof::Groth16(proof) => {
                ser.write_variant_index(0);
                ser.write(proof);
            }
        }
    }
}

impl Decode for ZkProof {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        match de.read_variant_index() {
            0 => Ok(ZkProof::Groth16(de.read()?)),
            tag => {
                de.check()?;
                Err(BcsError::InvalidVariant {
                    kind: "ZkProof",
                    tag,
                })
            }
        }
    }
}

/// Ephemeral key that signs on behalf of the keyless account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EphemeralPublicKey {
    /// Ed25519 ephemeral key.
    Ed25519 {
        /// The key.
        public_key: Ed25519PublicKey,
    },
    /// Secp256r1 ephemeral key, used with passkeys.
    Secp256r1Ecdsa {
        /// The key.
        public_key: Secp256r1PublicKey,
    },
}

impl Encode for EphemeralPublicKey {
    fn encode(&self, ser: &mut Serializer) {
        match self {
            EphemeralPublicKey::Ed25519 { public_key } => {
                ser.write_variant_index(0);
                ser.write(public_key);
            }
            EphemeralPublicKey::Secp256r1Ecdsa { public_key } => {
                ser.write_variant_index(1);
                ser.write(public_key);
            }
        }
    }
}

impl Decode for EphemeralPublicKey {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        match de.read_variant_index() {
            0 => Ok(EphemeralPublicKey::Ed25519 {
                public_key: de.read()?,
            }),
            1 => Ok(EphemeralPublicKey::Secp256r1Ecdsa {
                public_key: de.read()?,
            }),
            tag => {
                de.check()?;
                Err(BcsError::InvalidVariant {
                    kind: "EphemeralPublicKey",
                    tag,
                })
            }
        }
    }
}

/// Signature by the ephemeral key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EphemeralSignature {
    /// Ed25519 signature.
    Ed25519 {
        /// The signature.
        signature: Ed25519Signature,
    },
    /// Passkey assertion.
    WebAuthn {
        /// The assertion.
        signature: PartialAuthenticatorAssertionResponse,
    },
}

impl Encode for EphemeralSignature {
    fn encode(&self, ser: &mut Serializer) {
        match self {
            EphemeralSignature::Ed25519 { signature } => {
                ser.write_variant_index(0);
                ser.write(signature);
            }
            EphemeralSignature::WebAuthn { signature } => {
                ser.write_variant_index(1);
                ser.write(signature);
            }
        }
    }
}

impl Decode for EphemeralSignature {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        match de.read_variant_index() {
            0 => Ok(EphemeralSignature::Ed25519 {
                signature: de.read()?,
            }),
            1 => Ok(EphemeralSignature::WebAuthn {
                signature: de.read()?,
            }),
            tag => {
                de.check()?;
                Err(BcsError::InvalidVariant {
                    kind: "EphemeralSignature",
                    tag,
                })
            }
        }
    }
}

/// Zero-knowledge certificate binding the ephemeral key to the identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZeroKnowledgeSig {
    /// The proof.
    pub proof: ZkProof,
    /// How long past issuance the ephemeral key may be used.
    pub exp_horizon_secs: u64,
    /// Extra JWT field revealed by the proof.
    pub extra_field: Option<String>,
    /// Recovery override for the `aud` value.
    pub override_aud_val: Option<String>,
    /// Signature of the training-wheels prover.
    pub training_wheels_signature: Option<EphemeralSignature>,
}

impl Encode for ZeroKnowledgeSig {
    fn encode(&self, ser: &mut Serializer) {
        ser.write(&self.proof);
        ser.write_u64(self.exp_horizon_secs);
        ser.write_option(self.extra_field.as_ref());
        ser.write_option(self.override_aud_val.as_ref());
        ser.write_option(self.training_wheels_signature.as_ref());
    }
}

impl Decode for ZeroKnowledgeSig {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let proof = de.read()?;
        let exp_horizon_secs = de.read_u64();
        let extra_field = read_bounded_string_option(de, "keyless extra field")?;
        let override_aud_val = read_bounded_string_option(de, "keyless aud override")?;
        let training_wheels_signature = de.read_option()?;
        de.check()?;
        Ok(Self {
            proof,
            exp_horizon_secs,
            extra_field,
            override_aud_val,
            training_wheels_signature,
        })
    }
}

/// Certificate that reveals the JWT signature directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenIdSig {
    /// RSA signature over the JWT.
    pub jwt_sig: Vec<u8>,
    /// Decoded JWT payload.
    pub jwt_payload_json: String,
    /// Claim used as the user id, e.g. `sub`.
    pub uid_key: String,
    /// Blinder for the ephemeral key in the nonce.
    pub epk_blinder: Vec<u8>,
    /// Pepper used in the identity commitment.
    pub pepper: [u8; PEPPER_NUM_BYTES],
    /// Recovery override for the `aud` value.
    pub idc_aud_val: Option<String>,
}

impl Encode for OpenIdSig {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_bytes(&self.jwt_sig);
        ser.write_str(&self.jwt_payload_json);
        ser.write_str(&self.uid_key);
        ser.write_bytes(&self.epk_blinder);
        ser.write_fixed_bytes(&self.pepper);
        ser.write_option(self.idc_aud_val.as_ref());
    }
}

impl Decode for OpenIdSig {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let jwt_sig = de.read_bounded_bytes("keyless jwt signature", 0, MAX_JWT_SIGNATURE_BYTES);
        let jwt_payload_json =
            de.read_bounded_string("keyless jwt payload", 0, MAX_JWT_PAYLOAD_BYTES);
        let uid_key = de.read_bounded_string("keyless uid key", 0, MAX_CLAIM_BYTES);
        let epk_blinder = de.read_bounded_bytes("keyless epk blinder", 0, MAX_CLAIM_BYTES);
        let pepper = de.read_fixed_bytes::<PEPPER_NUM_BYTES>();
        let idc_aud_val = read_bounded_string_option(de, "keyless aud")?;
        de.check()?;
        Ok(Self {
            jwt_sig,
            jwt_payload_json,
            uid_key,
            epk_blinder,
            pepper,
            idc_aud_val,
        })
    }
}

/// How the ephemeral key is certified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EphemeralCertificate {
    /// Zero-knowledge proof.
    ZeroKnowledgeSig(ZeroKnowledgeSig),
    /// Plain OpenID signature.
    OpenIdSig(OpenIdSig),
}

impl Encode for EphemeralCertificate {
    fn encode(&self, ser: &mut Serializer) {
        match self {
            EphemeralCertificate::ZeroKnowledgeSig(sig) => {
                ser.write_variant_index(0);
                ser.write(sig);
            }
            EphemeralCertificate::OpenIdSig(sig) => {
                ser.write_variant_index(1);
                ser.write(sig);
            }
        }
    }
}

impl Decode for EphemeralCertificate {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        match de.read_variant_index() {
            0 => Ok(EphemeralCertificate::ZeroKnowledgeSig(de.read()?)),
            1 => Ok(EphemeralCertificate::OpenIdSig(de.read()?)),
            tag => {
                de.check()?;
                Err(BcsError::InvalidVariant {
                    kind: "EphemeralCertificate",
                    tag,
                })
            }
        }
    }
}

/// A keyless signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeylessSignature {
    /// Certificate for the ephemeral key.
    pub cert: EphemeralCertificate,
    /// Decoded JWT header.
    pub jwt_header_json: String,
    /// Expiry of the ephemeral key.
    pub exp_date_secs: u64,
    /// The ephemeral public key.
    pub ephemeral_pubkey: EphemeralPublicKey,
    /// Signature by the ephemeral key over the signing message.
    pub ephemeral_signature: EphemeralSignature,
}

impl Encode for KeylessSignature {
    fn encode(&self, ser: &mut Serializer) {
        ser.write(&self.cert);
        ser.write_str(&self.jwt_header_json);
        ser.write_u64(self.exp_date_secs);
        ser.write(&self.ephemeral_pubkey);
        ser.write(&self.ephemeral_signature);
    }
}

impl Decode for KeylessSignature {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let cert = de.read()?;
        let jwt_header_json = de.read_bounded_string("keyless jwt header", 0, MAX_JWT_HEADER_BYTES);
        let exp_date_secs = de.read_u64();
        let ephemeral_pubkey = de.read()?;
        let ephemeral_signature = de.read()?;
        de.check()?;
        Ok(Self {
            cert,
            jwt_header_json,
            exp_date_secs,
            ephemeral_pubkey,
            ephemeral_signature,
        })
    }
}

fn read_bounded_string_option(
    de: &mut Deserializer<'_>,
    kind: &'static str,
) -> BcsResult<Option<String>> {
    if de.read_option_tag() {
        let value = de.read_bounded_string(kind, 0, MAX_CLAIM_BYTES);
        de.check()?;
        Ok(Some(value))
    } else {
        de.check()?;
        Ok(None)
    }
}
