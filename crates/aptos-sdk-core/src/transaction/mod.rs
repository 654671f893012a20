//! Transaction building and signing.
//!
//! This module provides types and utilities for constructing and signing
//! transactions for the Aptos blockchain.
//!
//! # Overview
//!
//! The transaction module supports several transaction types:
//!
//! - **Simple transactions** - Single sender, self-paid gas
//! - **Multi-agent transactions** - Multiple signers required
//! - **Sponsored transactions** - Fee payer pays gas on sender's behalf
//!
//! # Example: Simple Transaction
//!
//! ```rust
//! use aptos_sdk_core::account::Ed25519Account;
//! use aptos_sdk_core::transaction::{EntryFunction, TransactionBuilder};
//! use aptos_sdk_core::types::{AccountAddress, ChainId};
//!
//! let sender = Ed25519Account::generate();
//! let payload = EntryFunction::apt_transfer(AccountAddress::THREE, 1000).unwrap();
//!
//! let signed_txn = TransactionBuilder::new()
//!     .sender(sender.address())
//!     .sequence_number(0)
//!     .payload(payload.into())
//!     .chain_id(ChainId::testnet())
//!     .build_and_sign(&sender)
//!     .unwrap();
//! assert!(signed_txn.verify());
//! ```

pub mod authenticator;
pub mod builder;
pub mod input;
pub mod payload;
pub mod sponsored;
pub mod types;

pub use authenticator::{AccountAuthenticator, TransactionAuthenticator};
pub use builder::{
    sign_fee_payer_transaction, sign_multi_agent_transaction, sign_transaction,
    TransactionBuilder,
};
pub use input::{
    functions, move_none, move_some, move_vec, types as move_types, InputEntryFunctionData,
    InputEntryFunctionDataBuilder, IntoMoveArg,
};
pub use payload::{
    EntryFunction, MultisigPayload, MultisigTransactionPayload, Script, ScriptArgument,
    TransactionPayload,
};
pub use sponsored::{sponsor_transaction, PartiallySigned, SponsoredTransactionBuilder};
pub use types::{
    FeePayerRawTransaction, MultiAgentRawTransaction, RawTransaction, RawTransactionWithData,
    SignedTransaction,
};
