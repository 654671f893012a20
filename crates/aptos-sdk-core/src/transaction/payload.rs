//! Transaction payloads.
//!
//! | Tag | Payload |
//! |-----|---------|
//! | 0 | [`EntryFunction`] |
//! | 1 | [`Script`] |
//! | 2 | [`MultisigPayload`] |

use crate::bcs::{self, BcsError, BcsResult, Decode, Deserializer, Encode, Serializer, U256};
use crate::error::AptosResult;
use crate::types::{AccountAddress, EntryFunctionId, Identifier, MoveModuleId, TypeTag};

/// Upper bound on type arguments accepted when decoding a payload.
pub const MAX_TYPE_ARGUMENTS: usize = 256;

/// Upper bound on arguments accepted when decoding a payload.
pub const MAX_ARGUMENTS: usize = 256;

/// Upper bound on the size of script bytecode or one encoded argument.
pub const MAX_ARGUMENT_BYTES: usize = 1 << 20;

/// The payload of a transaction, specifying what action to take.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionPayload {
    /// Call an entry function on a module.
    EntryFunction(EntryFunction),
    /// Execute a script with bytecode.
    Script(Script),
    /// Execute or approve a multisig account transaction.
    Multisig(MultisigPayload),
}

impl TransactionPayload {
    /// Returns the variant tag written on the wire.
    pub fn variant_index(&self) -> u32 {
        match self {
            Self::EntryFunction(_) => 0,
            Self::Script(_) => 1,
            Self::Multisig(_) => 2,
        }
    }
}

impl From<EntryFunction> for TransactionPayload {
    fn from(entry_function: EntryFunction) -> Self {
        Self::EntryFunction(entry_function)
    }
}

impl From<Script> for TransactionPayload {
    fn from(script: Script) -> Self {
        Self::Script(script)
    }
}

impl From<MultisigPayload> for TransactionPayload {
    fn from(multisig: MultisigPayload) -> Self {
        Self::Multisig(multisig)
    }
}

impl Encode for TransactionPayload {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_variant_index(self.variant_index());
        match self {
            Self::EntryFunction(entry_function) => ser.write(entry_function),
            Self::Script(script) => ser.write(script),
            Self::Multisig(multisig) => ser.write(multisig),
        }
    }
}

impl Decode for TransactionPayload {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        match de.read_variant_index() {
            0 => Ok(Self::EntryFunction(de.read()?)),
            1 => Ok(Self::Script(de.read()?)),
            2 => Ok(Self::Multisig(de.read()?)),
            tag => {
                de.check()?;
                Err(BcsError::InvalidVariant {
                    kind: "TransactionPayload",
                    tag,
                })
            }
        }
    }
}

/// An entry function call payload.
///
/// Entry functions are the most common type of transaction payload.
/// They call a function marked as `entry` in a Move module. Arguments are
/// carried already BCS-encoded, one byte vector per parameter.
///
/// # Example
///
/// ```rust
/// use aptos_sdk_core::bcs;
/// use aptos_sdk_core::transaction::EntryFunction;
/// use aptos_sdk_core::types::{AccountAddress, TypeTag};
///
/// let recipient = AccountAddress::from_hex("0x123").unwrap();
/// let entry_function = EntryFunction::from_function_id(
///     "0x1::coin::transfer",
///     vec![TypeTag::aptos_coin()],
///     vec![
///         bcs::to_bytes(&recipient).unwrap(),
///         bcs::to_bytes(&1000u64).unwrap(),
///     ],
/// )
/// .unwrap();
/// assert_eq!(entry_function.function.as_str(), "transfer");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryFunction {
    /// The module containing the function.
    pub module: MoveModuleId,
    /// The function name.
    pub function: Identifier,
    /// Type arguments for generic functions.
    pub type_args: Vec<TypeTag>,
    /// BCS-encoded arguments.
    pub args: Vec<Vec<u8>>,
}

impl EntryFunction {
    /// Creates a new entry function payload.
    pub fn new(
        module: MoveModuleId,
        function: Identifier,
        type_args: Vec<TypeTag>,
        args: Vec<Vec<u8>>,
    ) -> Self {
        Self {
            module,
            function,
            type_args,
            args,
        }
    }

    /// Creates an entry function from a function identifier string such as
    /// `0x1::coin::transfer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the function identifier cannot be parsed.
    pub fn from_function_id(
        function_id: &str,
        type_args: Vec<TypeTag>,
        args: Vec<Vec<u8>>,
    ) -> AptosResult<Self> {
        let EntryFunctionId { module, name } = EntryFunctionId::from_str_strict(function_id)?;
        Ok(Self::new(module, name, type_args, args))
    }

    /// Creates an APT transfer through `0x1::aptos_account::transfer`.
    ///
    /// `amount` is in octas (1 APT = 10^8 octas).
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments cannot be encoded.
    pub fn apt_transfer(recipient: AccountAddress, amount: u64) -> AptosResult<Self> {
        Self::from_function_id(
            "0x1::aptos_account::transfer",
            vec![],
            vec![bcs::to_bytes(&recipient)?, bcs::to_bytes(&amount)?],
        )
    }

    /// Creates a transfer of any coin type through `0x1::coin::transfer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments cannot be encoded.
    pub fn coin_transfer(
        coin_type: TypeTag,
        recipient: AccountAddress,
        amount: u64,
    ) -> AptosResult<Self> {
        Self::from_function_id(
            "0x1::coin::transfer",
            vec![coin_type],
            vec![bcs::to_bytes(&recipient)?, bcs::to_bytes(&amount)?],
        )
    }

    /// Returns the fully qualified function identifier.
    pub fn function_id(&self) -> EntryFunctionId {
        EntryFunctionId::new(self.module.clone(), self.function.clone())
    }
}

impl Encode for EntryFunction {
    fn encode(&self, ser: &mut Serializer) {
        ser.write(&self.module);
        ser.write(&self.function);
        ser.write_sequence(&self.type_args);
        ser.write_len(self.args.len());
        for arg in &self.args {
            ser.write_bytes(arg);
        }
    }
}

impl Decode for EntryFunction {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let module = de.read()?;
        let function = de.read()?;
        let type_args = de.read_bounded_sequence("type arguments", 0, MAX_TYPE_ARGUMENTS)?;
        let args = read_arguments(de)?;
        Ok(Self {
            module,
            function,
            type_args,
            args,
        })
    }
}

fn read_arguments(de: &mut Deserializer<'_>) -> BcsResult<Vec<Vec<u8>>> {
    let count = de.read_len();
    de.check()?;
    if count > MAX_ARGUMENTS {
        let err = BcsError::LengthOutOfBounds {
            kind: "arguments",
            actual: count,
            min: 0,
            max: MAX_ARGUMENTS,
        };
        de.set_error(err.clone());
        return Err(err);
    }
    let mut args = Vec::with_capacity(count.min(de.remaining()));
    for _ in 0..count {
        args.push(de.read_bounded_bytes("argument", 0, MAX_ARGUMENT_BYTES));
        de.check()?;
    }
    Ok(args)
}

/// A script payload with inline bytecode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Script {
    /// The Move bytecode to execute.
    pub code: Vec<u8>,
    /// Type arguments for the script.
    pub type_args: Vec<TypeTag>,
    /// Arguments to the script.
    pub args: Vec<ScriptArgument>,
}

impl Script {
    /// Creates a new script payload.
    pub fn new(code: Vec<u8>, type_args: Vec<TypeTag>, args: Vec<ScriptArgument>) -> Self {
        Self {
            code,
            type_args,
            args,
        }
    }
}

impl Encode for Script {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_bytes(&self.code);
        ser.write_sequence(&self.type_args);
        ser.write_sequence(&self.args);
    }
}

impl Decode for Script {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let code = de.read_bounded_bytes("script bytecode", 0, MAX_ARGUMENT_BYTES);
        de.check()?;
        let type_args = de.read_bounded_sequence("type arguments", 0, MAX_TYPE_ARGUMENTS)?;
        let args = de.read_bounded_sequence("script arguments", 0, MAX_ARGUMENTS)?;
        Ok(Self {
            code,
            type_args,
            args,
        })
    }
}

/// An argument to a script.
///
/// | Tag | Argument |
/// |-----|----------|
/// | 0 | `u8` |
/// | 1 | `u64` |
/// | 2 | `u128` |
/// | 3 | `address` |
/// | 4 | `vector<u8>` |
/// | 5 | `bool` |
/// | 6 | `u16` |
/// | 7 | `u32` |
/// | 8 | `u256` |
/// | 9 | pre-serialized bytes |
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptArgument {
    /// A u8 value.
    U8(u8),
    /// A u64 value.
    U64(u64),
    /// A u128 value.
    U128(u128),
    /// An address value.
    Address(AccountAddress),
    /// A vector of u8 (bytes).
    U8Vector(Vec<u8>),
    /// A boolean value.
    Bool(bool),
    /// A u16 value.
    U16(u16),
    /// A u32 value.
    U32(u32),
    /// A u256 value.
    U256(U256),
    /// Any other value, already BCS-encoded by the caller.
    Serialized(Vec<u8>),
}

impl ScriptArgument {
    /// Returns the variant tag written on the wire.
    pub fn variant_index(&self) -> u32 {
        match self {
            Self::U8(_) => 0,
            Self::U64(_) => 1,
            Self::U128(_) => 2,
            Self::Address(_) => 3,
            Self::U8Vector(_) => 4,
            Self::Bool(_) => 5,
            Self::U16(_) => 6,
            Self::U32(_) => 7,
            Self::U256(_) => 8,
            Self::Serialized(_) => 9,
        }
    }
}

impl Encode for ScriptArgument {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_variant_index(self.variant_index());
        match self {
            Self::U8(v) => ser.write_u8(*v),
            Self::U64(v) => ser.write_u64(*v),
            Self::U128(v) => ser.write_u128(*v),
            Self::Address(v) => ser.write(v),
            Self::U8Vector(v) | Self::Serialized(v) => ser.write_bytes(v),
            Self::Bool(v) => ser.write_bool(*v),
            Self::U16(v) => ser.write_u16(*v),
            Self::U32(v) => ser.write_u32(*v),
            Self::U256(v) => ser.write_u256(v),
        }
    }
}

impl Decode for ScriptArgument {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let arg = match de.read_variant_index() {
            0 => Self::U8(de.read_u8()),
            1 => Self::U64(de.read_u64()),
            2 => Self::U128(de.read_u128()),
            3 => Self::Address(de.read()?),
            4 => Self::U8Vector(de.read_bounded_bytes("argument", 0, MAX_ARGUMENT_BYTES)),
            5 => Self::Bool(de.read_bool()),
            6 => Self::U16(de.read_u16()),
            7 => Self::U32(de.read_u32()),
            8 => Self::U256(de.read_u256()),
            9 => Self::Serialized(de.read_bounded_bytes("argument", 0, MAX_ARGUMENT_BYTES)),
            tag => {
                de.check()?;
                return Err(BcsError::InvalidVariant {
                    kind: "ScriptArgument",
                    tag,
                });
            }
        };
        de.check()?;
        Ok(arg)
    }
}

/// A payload for an on-chain multisig account.
///
/// With an inner payload the transaction proposes and executes it in one
/// step; without one it executes the payload already stored on chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultisigPayload {
    /// The multisig account address.
    pub multisig_address: AccountAddress,
    /// The payload to execute, if not already stored on chain.
    pub transaction_payload: Option<MultisigTransactionPayload>,
}

impl MultisigPayload {
    /// Creates a multisig payload.
    pub fn new(
        multisig_address: AccountAddress,
        transaction_payload: Option<MultisigTransactionPayload>,
    ) -> Self {
        Self {
            multisig_address,
            transaction_payload,
        }
    }
}

impl Encode for MultisigPayload {
    fn encode(&self, ser: &mut Serializer) {
        ser.write(&self.multisig_address);
        ser.write_option(self.transaction_payload.as_ref());
    }
}

impl Decode for MultisigPayload {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        Ok(Self {
            multisig_address: de.read()?,
            transaction_payload: de.read_option()?,
        })
    }
}

/// The payload a multisig account executes. Only entry functions (tag 0)
/// are supported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MultisigTransactionPayload {
    /// An entry function call.
    EntryFunction(EntryFunction),
}

impl Encode for MultisigTransactionPayload {
    fn encode(&self, ser: &mut Serializer) {
        match self {
            Self::EntryFunction(entry_function) => {
                ser.write_variant_index(0);
                ser.write(entry_function);
            }
        }
    }
}

impl Decode for MultisigTransactionPayload {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        match de.read_variant_index() {
            0 => Ok(Self::EntryFunction(de.read()?)),
            tag => {
                de.check()?;
                Err(BcsError::InvalidVariant {
                    kind: "MultisigTransactionPayload",
                    tag,
                })
            }
        }
    }
}

impl From<EntryFunction> for MultisigTransactionPayload {
    fn from(entry_function: EntryFunction) -> Self {
        Self::EntryFunction(entry_function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apt_transfer() {
        let recipient = AccountAddress::from_hex("0x123").unwrap();
        let entry_fn = EntryFunction::apt_transfer(recipient, 1000).unwrap();

        assert_eq!(entry_fn.module.to_string(), "0x1::aptos_account");
        assert_eq!(entry_fn.function.as_str(), "transfer");
        assert!(entry_fn.type_args.is_empty());
        assert_eq!(entry_fn.args[0], recipient.to_bytes().to_vec());
        assert_eq!(entry_fn.args[1], 1000u64.to_le_bytes().to_vec());
    }

    #[test]
    fn test_coin_transfer() {
        let entry_fn =
            EntryFunction::coin_transfer(TypeTag::aptos_coin(), AccountAddress::THREE, 5).unwrap();
        assert_eq!(
            entry_fn.function_id().to_string(),
            "0x1::coin::transfer"
        );
        assert_eq!(entry_fn.type_args, vec![TypeTag::aptos_coin()]);
    }

    #[test]
    fn test_from_function_id() {
        let entry_fn = EntryFunction::from_function_id(
            "0x1::coin::transfer",
            vec![TypeTag::aptos_coin()],
            vec![],
        )
        .unwrap();
        assert_eq!(entry_fn.module.address, AccountAddress::ONE);
        assert_eq!(entry_fn.module.name.as_str(), "coin");
        assert!(EntryFunction::from_function_id("0x1::coin", vec![], vec![]).is_err());
    }

    #[test]
    fn test_entry_function_layout() {
        let entry_fn =
            EntryFunction::from_function_id("0x1::m::f", vec![], vec![vec![7, 8]]).unwrap();
        let payload = TransactionPayload::from(entry_fn.clone());
        let bytes = bcs::to_bytes(&payload).unwrap();

        let mut expected = vec![0];
        expected.extend_from_slice(&AccountAddress::ONE.to_bytes());
        expected.extend_from_slice(&[1, b'm', 1, b'f', 0, 1, 2, 7, 8]);
        assert_eq!(bytes, expected);
        assert_eq!(
            bcs::from_bytes::<TransactionPayload>(&bytes).unwrap(),
            payload
        );
    }

    #[test]
    fn test_script_roundtrip() {
        let script = Script::new(
            vec![0xa1, 0x1c, 0xeb, 0x0b],
            vec![TypeTag::U64],
            vec![
                ScriptArgument::U8(1),
                ScriptArgument::U64(2),
                ScriptArgument::U128(3),
                ScriptArgument::Address(AccountAddress::ONE),
                ScriptArgument::U8Vector(vec![1, 2, 3]),
                ScriptArgument::Bool(true),
                ScriptArgument::U16(4),
                ScriptArgument::U32(5),
                ScriptArgument::U256(U256::from(6u64)),
                ScriptArgument::Serialized(vec![9]),
            ],
        );
        let payload = TransactionPayload::from(script);
        let bytes = bcs::to_bytes(&payload).unwrap();
        assert_eq!(bytes[0], 1);
        assert_eq!(
            bcs::from_bytes::<TransactionPayload>(&bytes).unwrap(),
            payload
        );
    }

    #[test]
    fn test_script_argument_tags() {
        assert_eq!(
            bcs::to_bytes(&ScriptArgument::U16(0x0102)).unwrap(),
            vec![6, 0x02, 0x01]
        );
        assert_eq!(
            bcs::to_bytes(&ScriptArgument::Bool(true)).unwrap(),
            vec![5, 1]
        );
        assert_eq!(
            bcs::from_bytes::<ScriptArgument>(&[10]),
            Err(BcsError::InvalidVariant {
                kind: "ScriptArgument",
                tag: 10
            })
        );
    }

    #[test]
    fn test_multisig_payload() {
        let inner = EntryFunction::apt_transfer(AccountAddress::ONE, 1).unwrap();
        let payload = TransactionPayload::from(MultisigPayload::new(
            AccountAddress::THREE,
            Some(inner.into()),
        ));
        let bytes = bcs::to_bytes(&payload).unwrap();
        assert_eq!(bytes[0], 2);
        assert_eq!(bytes[33], 1);
        assert_eq!(bytes[34], 0);
        assert_eq!(
            bcs::from_bytes::<TransactionPayload>(&bytes).unwrap(),
            payload
        );

        let stored = MultisigPayload::new(AccountAddress::THREE, None);
        assert_eq!(bcs::to_bytes(&stored).unwrap().len(), 33);
    }

    #[test]
    fn test_unknown_payload_variant() {
        assert_eq!(
            bcs::from_bytes::<TransactionPayload>(&[3]),
            Err(BcsError::InvalidVariant {
                kind: "TransactionPayload",
                tag: 3
            })
        );
    }

    #[test]
    fn test_argument_count_bounded() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&AccountAddress::ONE.to_bytes());
        bytes.extend_from_slice(&[1, b'm', 1, b'f', 0]);
        // 0x80 0x80 0x04 = 65536 arguments
        bytes.extend_from_slice(&[0x80, 0x80, 0x04]);
        assert!(matches!(
            bcs::from_bytes::<EntryFunction>(&bytes),
            Err(BcsError::LengthOutOfBounds { kind: "arguments", .. })
        ));
    }
}
