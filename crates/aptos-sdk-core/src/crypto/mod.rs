//! Cryptographic primitives for the Aptos SDK.
//!
//! This module provides the signature schemes Aptos accepts and the
//! authentication-key derivation that binds them to accounts:
//!
//! - Ed25519, the legacy default
//! - Secp256k1 and Secp256r1 ECDSA over the SHA3-256 digest
//! - WebAuthn passkey assertions over Secp256r1
//! - MultiEd25519 and MultiKey threshold sets
//! - Keyless key and signature layouts
//!
//! # Example
//!
//! ```rust
//! use aptos_sdk_core::crypto::Ed25519PrivateKey;
//!
//! let private_key = Ed25519PrivateKey::generate();
//! let message = b"hello world";
//! let signature = private_key.sign(message);
//!
//! let public_key = private_key.public_key();
//! assert!(public_key.verify(message, &signature));
//! ```

mod authentication_key;
pub mod bitmap;
mod ed25519;
pub mod hash;
pub mod keyless;
mod multi_ed25519;
mod multi_key;
mod secp256k1;
mod secp256r1;
mod single_key;
mod traits;
pub mod webauthn;

pub use authentication_key::{AuthenticationKey, AUTHENTICATION_KEY_LENGTH};
pub use bitmap::Bitmap;
pub use ed25519::{
    Ed25519PrivateKey, Ed25519PublicKey, Ed25519Signature, ED25519_PRIVATE_KEY_LENGTH,
    ED25519_PUBLIC_KEY_LENGTH, ED25519_SIGNATURE_LENGTH,
};
pub use hash::{
    raw_transaction_prehash, raw_transaction_with_data_prehash, sha2_256, sha3_256, sha3_256_of,
    transaction_prehash,
};
pub use keyless::{KeylessPublicKey, KeylessSignature};
pub use multi_ed25519::{
    MultiEd25519PublicKey, MultiEd25519Signature, MAX_NUM_OF_KEYS, MIN_THRESHOLD,
};
pub use multi_key::{
    MultiKey, MultiKeySignature, MAX_NUM_OF_KEYS as MULTI_KEY_MAX_NUM_OF_KEYS,
    MIN_THRESHOLD as MULTI_KEY_MIN_THRESHOLD,
};
pub use secp256k1::{
    Secp256k1PrivateKey, Secp256k1PublicKey, Secp256k1Signature,
    SECP256K1_PRIVATE_KEY_LENGTH, SECP256K1_PUBLIC_KEY_COMPRESSED_LENGTH,
    SECP256K1_PUBLIC_KEY_LENGTH, SECP256K1_SIGNATURE_LENGTH,
};
pub use secp256r1::{
    Secp256r1PrivateKey, Secp256r1PublicKey, Secp256r1Signature,
    SECP256R1_PRIVATE_KEY_LENGTH, SECP256R1_PUBLIC_KEY_COMPRESSED_LENGTH,
    SECP256R1_PUBLIC_KEY_LENGTH, SECP256R1_SIGNATURE_LENGTH,
};
pub use single_key::{AnyPublicKey, AnySignature};
pub use traits::{PublicKey, Signature, Signer, Verifier};
pub use webauthn::{PartialAuthenticatorAssertionResponse, WebAuthnError};

/// The authentication key scheme byte for legacy Ed25519 accounts.
pub const ED25519_SCHEME: u8 = 0;

/// The authentication key scheme byte for multi-Ed25519 accounts.
pub const MULTI_ED25519_SCHEME: u8 = 1;

/// The authentication key scheme byte for single-key accounts.
pub const SINGLE_KEY_SCHEME: u8 = 2;

/// The authentication key scheme byte for multi-key accounts.
pub const MULTI_KEY_SCHEME: u8 = 3;

/// Scheme byte for objects derived from another object.
pub const DERIVE_OBJECT_SCHEME: u8 = 252;

/// Scheme byte for named objects.
pub const NAMED_OBJECT_SCHEME: u8 = 254;

/// Scheme byte for resource accounts.
pub const RESOURCE_ACCOUNT_SCHEME: u8 = 255;
