//! Core Aptos types.
//!
//! This module contains the fundamental types used throughout the SDK,
//! including addresses, chain IDs, type tags, and hash values.

mod address;
mod chain_id;
mod hash;
mod move_types;

pub use crate::bcs::{I256, U256};
pub use address::{ADDRESS_LENGTH, AccountAddress};
pub use chain_id::ChainId;
pub use hash::{HASH_LENGTH, HashValue};
pub use move_types::{EntryFunctionId, Identifier, MoveModuleId, StructTag, TypeTag};
