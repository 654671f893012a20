//! # Aptos SDK core
//!
//! The offline half of an Aptos client: everything needed to turn a
//! transaction intent into signed bytes ready for submission, and to check
//! such bytes again.
//!
//! - [`bcs`] - Binary Canonical Serialization with sticky-error encoder and decoder
//! - [`types`] - Addresses, chain ids, hashes and Move type tags
//! - [`crypto`] - Ed25519, Secp256k1 and Secp256r1 keys, multi-signature
//!   keys, WebAuthn assertions and authentication keys
//! - [`account`] - Signers that produce authenticators
//! - [`transaction`] - Payloads, raw and signed transactions and builders
//! - [`config`] - Network presets and transaction defaults
//!
//! ## Quick Start
//!
//! ```rust
//! use aptos_sdk_core::account::Ed25519Account;
//! use aptos_sdk_core::config::TransactionConfig;
//! use aptos_sdk_core::transaction::{EntryFunction, TransactionBuilder};
//! use aptos_sdk_core::AccountAddress;
//!
//! let account = Ed25519Account::generate();
//! let payload = EntryFunction::apt_transfer(AccountAddress::from_hex("0x123")?, 1_000)?;
//!
//! let signed = TransactionBuilder::from_config(&TransactionConfig::testnet())
//!     .sequence_number(0)
//!     .payload(payload.into())
//!     .build_and_sign(&account)?;
//!
//! let bytes = signed.to_bcs()?;
//! println!("{} bytes, hash {}", bytes.len(), signed.hash()?);
//! # Ok::<(), aptos_sdk_core::AptosError>(())
//! ```
//!
//! ## Logging
//!
//! Signing and assembly paths emit `tracing` events at `debug` and `trace`
//! level. The crate never installs a subscriber and never logs key material.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod account;
pub mod bcs;
pub mod config;
pub mod crypto;
pub mod error;
pub mod transaction;
pub mod types;

pub use config::{Network, TransactionConfig};
pub use error::{AptosError, AptosResult};

// Re-export commonly used types
pub use types::{AccountAddress, ChainId, HashValue};
