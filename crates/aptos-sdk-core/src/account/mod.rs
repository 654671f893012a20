//! Account management for the Aptos SDK.
//!
//! This module provides account types that wrap cryptographic keys
//! and provide a unified interface for signing transactions.
//!
//! # Account Types
//!
//! - [`Ed25519Account`] - Legacy Ed25519 account (most common)
//! - [`SingleKeyAccount`] - Ed25519 or Secp256k1 key under the single-key scheme
//! - [`Secp256r1WebAuthnAccount`] - P-256 passkey signing through WebAuthn
//! - [`MultiEd25519Account`] - M-of-N multi-signature Ed25519 account
//! - [`MultiKeyAccount`] - M-of-N account with mixed key types
//!
//! # Example
//!
//! ```rust
//! use aptos_sdk_core::account::{Account, Ed25519Account};
//!
//! let account = Ed25519Account::generate();
//! let authenticator = account.sign(b"message").unwrap();
//! assert!(authenticator.verify(b"message"));
//! ```

mod account;
mod ed25519;
mod multi_ed25519;
mod multi_key;
mod secp256r1;
mod single_key;

pub use account::{Account, AnyAccount};
pub use ed25519::Ed25519Account;
pub use multi_ed25519::MultiEd25519Account;
pub use multi_key::MultiKeyAccount;
pub use secp256r1::Secp256r1WebAuthnAccount;
pub use single_key::{AnyPrivateKey, SingleKeyAccount};
