//! Type-safe entry function payload builders.
//!
//! `InputEntryFunctionData` BCS-encodes each argument as it is added, so
//! callers pass Rust values instead of pre-serialized bytes. Parse and
//! encoding errors are collected and reported together by `build`.
//!
//! # Example
//!
//! ```rust
//! use aptos_sdk_core::transaction::InputEntryFunctionData;
//! use aptos_sdk_core::types::AccountAddress;
//!
//! let payload = InputEntryFunctionData::new("0x1::coin::transfer")
//!     .type_arg("0x1::aptos_coin::AptosCoin")
//!     .arg(AccountAddress::from_hex("0x123").unwrap())
//!     .arg(1_000_000u64)
//!     .build()
//!     .unwrap();
//! # let _ = payload;
//! ```

use crate::bcs::{self, Encode};
use crate::error::{AptosError, AptosResult};
use crate::transaction::payload::{EntryFunction, TransactionPayload};
use crate::types::{AccountAddress, EntryFunctionId, Identifier, MoveModuleId, TypeTag};

/// Entry point for building entry function payloads.
///
/// # Example
///
/// ```rust
/// use aptos_sdk_core::transaction::InputEntryFunctionData;
/// use aptos_sdk_core::types::AccountAddress;
///
/// let payload = InputEntryFunctionData::new("0x1::aptos_account::transfer")
///     .arg(AccountAddress::from_hex("0x123").unwrap())
///     .arg(1_000_000u64) // 0.01 APT in octas
///     .build()
///     .unwrap();
/// # let _ = payload;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct InputEntryFunctionData;

impl InputEntryFunctionData {
    /// Creates a builder for the function named by `function_id`
    /// (e.g. `0x1::coin::transfer`).
    #[allow(clippy::new_ret_no_self)]
    pub fn new(function_id: &str) -> InputEntryFunctionDataBuilder {
        InputEntryFunctionDataBuilder::new(function_id)
    }

    /// Creates a builder from module and function name.
    pub fn from_parts(module: MoveModuleId, function: &str) -> InputEntryFunctionDataBuilder {
        let mut builder = InputEntryFunctionDataBuilder::empty(Ok(module));
        match Identifier::new(function) {
            Ok(name) => builder.function = Some(name),
            Err(e) => builder
                .errors
                .push(format!("Invalid function name '{function}': {e}")),
        }
        builder
    }

    /// Builds an APT transfer payload.
    ///
    /// # Errors
    ///
    /// Returns an error if an argument fails to encode.
    pub fn transfer_apt(recipient: AccountAddress, amount: u64) -> AptosResult<TransactionPayload> {
        InputEntryFunctionData::new(functions::APT_TRANSFER)
            .arg(recipient)
            .arg(amount)
            .build()
    }

    /// Builds a coin transfer payload for any coin type.
    ///
    /// # Errors
    ///
    /// Returns an error if `coin_type` is not a valid type tag.
    pub fn transfer_coin(
        coin_type: &str,
        recipient: AccountAddress,
        amount: u64,
    ) -> AptosResult<TransactionPayload> {
        InputEntryFunctionData::new(functions::COIN_TRANSFER)
            .type_arg(coin_type)
            .arg(recipient)
            .arg(amount)
            .build()
    }

    /// Builds an account creation payload.
    ///
    /// # Errors
    ///
    /// Returns an error if an argument fails to encode.
    pub fn create_account(auth_key: AccountAddress) -> AptosResult<TransactionPayload> {
        InputEntryFunctionData::new(functions::CREATE_ACCOUNT)
            .arg(auth_key)
            .build()
    }

    /// Builds a payload to rotate an account's authentication key.
    ///
    /// # Errors
    ///
    /// Returns an error if an argument fails to encode.
    pub fn rotate_authentication_key(
        from_scheme: u8,
        from_public_key_bytes: Vec<u8>,
        to_scheme: u8,
        to_public_key_bytes: Vec<u8>,
        cap_rotate_key: Vec<u8>,
        cap_update_table: Vec<u8>,
    ) -> AptosResult<TransactionPayload> {
        InputEntryFunctionData::new(functions::ROTATE_AUTH_KEY)
            .arg(from_scheme)
            .arg(from_public_key_bytes)
            .arg(to_scheme)
            .arg(to_public_key_bytes)
            .arg(cap_rotate_key)
            .arg(cap_update_table)
            .build()
    }

    /// Builds a payload to register a coin store.
    ///
    /// # Errors
    ///
    /// Returns an error if `coin_type` is not a valid type tag.
    pub fn register_coin(coin_type: &str) -> AptosResult<TransactionPayload> {
        InputEntryFunctionData::new(functions::REGISTER_COIN)
            .type_arg(coin_type)
            .build()
    }

    /// Builds a payload to publish a package.
    ///
    /// # Errors
    ///
    /// Returns an error if an argument fails to encode.
    pub fn publish_package(
        metadata_serialized: Vec<u8>,
        code: Vec<Vec<u8>>,
    ) -> AptosResult<TransactionPayload> {
        InputEntryFunctionData::new(functions::PUBLISH_PACKAGE)
            .arg(metadata_serialized)
            .arg(code)
            .build()
    }
}

/// Builder for entry function payloads.
#[derive(Debug, Clone)]
pub struct InputEntryFunctionDataBuilder {
    module: Result<MoveModuleId, String>,
    function: Option<Identifier>,
    type_args: Vec<TypeTag>,
    args: Vec<Vec<u8>>,
    errors: Vec<String>,
}

impl InputEntryFunctionDataBuilder {
    fn empty(module: Result<MoveModuleId, String>) -> Self {
        Self {
            module,
            function: None,
            type_args: Vec::new(),
            args: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn new(function_id: &str) -> Self {
        match EntryFunctionId::from_str_strict(function_id) {
            Ok(EntryFunctionId { module, name }) => Self {
                function: Some(name),
                ..Self::empty(Ok(module))
            },
            Err(e) => Self::empty(Err(format!("Invalid function ID '{function_id}': {e}"))),
        }
    }

    /// Adds a type argument parsed from a string
    /// (e.g. `0x1::aptos_coin::AptosCoin`).
    #[must_use]
    pub fn type_arg(mut self, type_arg: &str) -> Self {
        match TypeTag::from_str_strict(type_arg) {
            Ok(tag) => self.type_args.push(tag),
            Err(e) => self
                .errors
                .push(format!("Invalid type argument '{type_arg}': {e}")),
        }
        self
    }

    /// Adds a type argument from a `TypeTag`.
    #[must_use]
    pub fn type_arg_typed(mut self, type_arg: TypeTag) -> Self {
        self.type_args.push(type_arg);
        self
    }

    /// Adds multiple type arguments.
    #[must_use]
    pub fn type_args<'a>(mut self, type_args: impl IntoIterator<Item = &'a str>) -> Self {
        for type_arg in type_args {
            self = self.type_arg(type_arg);
        }
        self
    }

    /// Adds multiple typed type arguments.
    #[must_use]
    pub fn type_args_typed(mut self, type_args: impl IntoIterator<Item = TypeTag>) -> Self {
        self.type_args.extend(type_args);
        self
    }

    /// Adds an argument, BCS-encoding it.
    ///
    /// Integers, `bool`, strings, addresses, [`U256`](crate::bcs::U256),
    /// vectors and options of these are all accepted.
    #[must_use]
    pub fn arg<T: Encode>(mut self, value: T) -> Self {
        match value.into_move_arg() {
            Ok(bytes) => self.args.push(bytes),
            Err(e) => self
                .errors
                .push(format!("Failed to serialize argument: {e}")),
        }
        self
    }

    /// Adds a raw BCS-encoded argument.
    #[must_use]
    pub fn arg_raw(mut self, bytes: Vec<u8>) -> Self {
        self.args.push(bytes);
        self
    }

    /// Adds multiple BCS-encodable arguments.
    #[must_use]
    pub fn args<T: Encode>(mut self, values: impl IntoIterator<Item = T>) -> Self {
        for value in values {
            self = self.arg(value);
        }
        self
    }

    /// Builds the transaction payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the function id, any type argument or any
    /// argument was invalid.
    pub fn build(self) -> AptosResult<TransactionPayload> {
        self.build_entry_function().map(TransactionPayload::EntryFunction)
    }

    /// Builds just the entry function (without wrapping in `TransactionPayload`).
    ///
    /// # Errors
    ///
    /// Returns an error if the function id, any type argument or any
    /// argument was invalid.
    pub fn build_entry_function(self) -> AptosResult<EntryFunction> {
        let module = self.module.map_err(AptosError::Transaction)?;

        if !self.errors.is_empty() {
            return Err(AptosError::Transaction(self.errors.join("; ")));
        }
        let function = self
            .function
            .ok_or_else(|| AptosError::transaction("function name is required"))?;

        Ok(EntryFunction::new(
            module,
            function,
            self.type_args,
            self.args,
        ))
    }
}

/// Types that can be converted to entry function arguments.
pub trait IntoMoveArg {
    /// Converts this value into BCS-encoded bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be encoded.
    fn into_move_arg(self) -> AptosResult<Vec<u8>>;
}

impl<T: Encode> IntoMoveArg for T {
    fn into_move_arg(self) -> AptosResult<Vec<u8>> {
        Ok(bcs::to_bytes(&self)?)
    }
}

/// Encodes a Move `vector<T>` argument.
///
/// # Errors
///
/// Returns an error if an element cannot be encoded.
pub fn move_vec<T: Encode>(items: &[T]) -> AptosResult<Vec<u8>> {
    Ok(bcs::to_bytes(items)?)
}

/// Encodes a Move `Option::some(value)` argument.
///
/// # Errors
///
/// Returns an error if the value cannot be encoded.
pub fn move_some<T: Encode>(value: T) -> AptosResult<Vec<u8>> {
    Ok(bcs::to_bytes(&Some(value))?)
}

/// Encodes a Move `Option::none()` argument.
pub fn move_none() -> Vec<u8> {
    vec![0x00]
}

/// Common function IDs for convenience.
pub mod functions {
    /// APT transfer function.
    pub const APT_TRANSFER: &str = "0x1::aptos_account::transfer";
    /// Coin transfer function.
    pub const COIN_TRANSFER: &str = "0x1::coin::transfer";
    /// Account creation function.
    pub const CREATE_ACCOUNT: &str = "0x1::aptos_account::create_account";
    /// Register a coin store.
    pub const REGISTER_COIN: &str = "0x1::managed_coin::register";
    /// Publish a package.
    pub const PUBLISH_PACKAGE: &str = "0x1::code::publish_package_txn";
    /// Rotate authentication key.
    pub const ROTATE_AUTH_KEY: &str = "0x1::account::rotate_authentication_key";
}

/// Common type tags for convenience.
pub mod types {
    /// APT coin type.
    pub const APT_COIN: &str = "0x1::aptos_coin::AptosCoin";
}
