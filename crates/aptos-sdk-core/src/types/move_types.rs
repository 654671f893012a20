//! Move type system representations.
//!
//! Identifiers, module ids, struct tags and type tags, with their BCS
//! encodings and a strict string parser.
//!
//! # Security
//!
//! All parsing functions enforce length and nesting limits to prevent
//! denial-of-service via excessive allocation or recursion.

use crate::bcs::{BcsError, BcsResult, Decode, Deserializer, Encode, Serializer};
use crate::error::{AptosError, AptosResult};
use crate::types::AccountAddress;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length for type tag strings.
const MAX_TYPE_TAG_LENGTH: usize = 1024;

/// Maximum length for identifier strings.
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Maximum depth for nested type arguments when parsing strings.
const MAX_TYPE_NESTING_DEPTH: usize = 8;

/// Maximum depth for nested type tags when decoding BCS.
const MAX_TYPE_DECODE_DEPTH: usize = 64;

/// An identifier in Move (module name, function name, etc.).
///
/// Identifiers must start with a letter or underscore and contain
/// only alphanumeric characters and underscores.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Creates a new identifier, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is empty, exceeds 128 characters, does not start
    /// with a letter or underscore, or contains characters that are not alphanumeric or underscore.
    pub fn new(s: impl Into<String>) -> AptosResult<Self> {
        let s = s.into();
        if s.len() > MAX_IDENTIFIER_LENGTH {
            return Err(AptosError::InvalidTypeTag(format!(
                "identifier too long: {} bytes (max {})",
                s.len(),
                MAX_IDENTIFIER_LENGTH
            )));
        }
        let Some(first) = s.chars().next() else {
            return Err(AptosError::InvalidTypeTag(
                "identifier cannot be empty".into(),
            ));
        };

        if !first.is_ascii_alphabetic() && first != '_' {
            return Err(AptosError::InvalidTypeTag(format!(
                "identifier must start with letter or underscore: {s}"
            )));
        }
        if !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(AptosError::InvalidTypeTag(format!(
                "identifier contains invalid characters: {s}"
            )));
        }
        Ok(Self(s))
    }

    pub(crate) fn from_static(s: &'static str) -> Self {
        Self(s.to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identifier {
    type Err = AptosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = AptosError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

impl Encode for Identifier {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_str(&self.0);
    }
}

impl Decode for Identifier {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let s = de.read_bounded_string("identifier", 1, MAX_IDENTIFIER_LENGTH);
        de.check()?;
        Identifier::new(s).map_err(BcsError::custom)
    }
}

/// A Move module identifier (`address::module_name`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MoveModuleId {
    /// The address where the module is published.
    pub address: AccountAddress,
    /// The name of the module.
    pub name: Identifier,
}

impl MoveModuleId {
    /// Creates a new module ID.
    pub fn new(address: AccountAddress, name: Identifier) -> Self {
        Self { address, name }
    }

    /// Parses a module ID from a string (e.g., "`0x1::coin`").
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not in the format `address::module_name`, the address
    /// is invalid, or the module name is not a valid identifier.
    pub fn from_str_strict(s: &str) -> AptosResult<Self> {
        let parts: Vec<&str> = s.split("::").collect();
        if parts.len() != 2 {
            return Err(AptosError::InvalidTypeTag(format!(
                "invalid module ID format: {s}"
            )));
        }
        let address = AccountAddress::from_str(parts[0])?;
        let name = Identifier::new(parts[1])?;
        Ok(Self { address, name })
    }
}

impl fmt::Display for MoveModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.address, self.name)
    }
}

impl FromStr for MoveModuleId {
    type Err = AptosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_strict(s)
    }
}

impl Encode for MoveModuleId {
    fn encode(&self, ser: &mut Serializer) {
        ser.write(&self.address);
        ser.write(&self.name);
    }
}

impl Decode for MoveModuleId {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        Ok(Self {
            address: de.read()?,
            name: de.read()?,
        })
    }
}

/// A struct tag identifies a specific struct type in Move.
///
/// Format: `address::module::StructName<TypeArg1, TypeArg2, ...>`
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StructTag {
    /// The address where the module is published.
    pub address: AccountAddress,
    /// The module name.
    pub module: Identifier,
    /// The struct name.
    pub name: Identifier,
    /// Type arguments (for generic structs).
    pub type_args: Vec<TypeTag>,
}

impl StructTag {
    /// Creates a new struct tag.
    pub fn new(
        address: AccountAddress,
        module: Identifier,
        name: Identifier,
        type_args: Vec<TypeTag>,
    ) -> Self {
        Self {
            address,
            module,
            name,
            type_args,
        }
    }

    /// The `AptosCoin` struct tag (`0x1::aptos_coin::AptosCoin`).
    pub fn aptos_coin() -> Self {
        Self {
            address: AccountAddress::ONE,
            module: Identifier::from_static("aptos_coin"),
            name: Identifier::from_static("AptosCoin"),
            type_args: vec![],
        }
    }

    fn decode_with_depth(de: &mut Deserializer<'_>, depth: usize) -> BcsResult<Self> {
        let address = de.read()?;
        let module = de.read()?;
        let name = de.read()?;
        let len = de.read_len();
        de.check()?;
        let mut type_args = Vec::with_capacity(len.min(de.remaining()));
        for _ in 0..len {
            type_args.push(TypeTag::decode_with_depth(de, depth + 1)?);
        }
        Ok(Self {
            address,
            module,
            name,
            type_args,
        })
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.name)?;
        if !self.type_args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.type_args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

impl Encode for StructTag {
    fn encode(&self, ser: &mut Serializer) {
        ser.write(&self.address);
        ser.write(&self.module);
        ser.write(&self.name);
        ser.write_sequence(&self.type_args);
    }
}

impl Decode for StructTag {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        Self::decode_with_depth(de, 0)
    }
}

/// A type tag represents a Move type.
///
/// Variant indices match Move core for BCS compatibility:
///
/// | Index | Type | Index | Type |
/// |-------|------|-------|------|
/// | 0 | `bool` | 9 | `u32` |
/// | 1 | `u8` | 10 | `u256` |
/// | 2 | `u64` | 11 | `i8` |
/// | 3 | `u128` | 12 | `i16` |
/// | 4 | `address` | 13 | `i32` |
/// | 5 | `signer` | 14 | `i64` |
/// | 6 | `vector<T>` | 15 | `i128` |
/// | 7 | struct | 16 | `i256` |
/// | 8 | `u16` | | |
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeTag {
    /// Boolean type
    Bool,
    /// 8-bit unsigned integer
    U8,
    /// 64-bit unsigned integer
    U64,
    /// 128-bit unsigned integer
    U128,
    /// Address type
    Address,
    /// Signer type
    Signer,
    /// Vector type with element type
    Vector(Box<TypeTag>),
    /// Struct type
    Struct(Box<StructTag>),
    /// 16-bit unsigned integer
    U16,
    /// 32-bit unsigned integer
    U32,
    /// 256-bit unsigned integer
    U256,
    /// 8-bit signed integer
    I8,
    /// 16-bit signed integer
    I16,
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
    /// 128-bit signed integer
    I128,
    /// 256-bit signed integer
    I256,
}

impl TypeTag {
    /// Creates a vector type tag with the given element type.
    pub fn vector(element: TypeTag) -> Self {
        Self::Vector(Box::new(element))
    }

    /// Creates a struct type tag.
    pub fn struct_tag(tag: StructTag) -> Self {
        Self::Struct(Box::new(tag))
    }

    /// Returns the `AptosCoin` type tag (`0x1::aptos_coin::AptosCoin`).
    pub fn aptos_coin() -> Self {
        Self::Struct(Box::new(StructTag::aptos_coin()))
    }

    /// The BCS variant index of this tag.
    pub fn variant_index(&self) -> u32 {
        match self {
            TypeTag::Bool => 0,
            TypeTag::U8 => 1,
            TypeTag::U64 => 2,
            TypeTag::U128 => 3,
            TypeTag::Address => 4,
            TypeTag::Signer => 5,
            TypeTag::Vector(_) => 6,
            TypeTag::Struct(_) => 7,
            TypeTag::U16 => 8,
            TypeTag::U32 => 9,
            TypeTag::U256 => 10,
            TypeTag::I8 => 11,
            TypeTag::I16 => 12,
            TypeTag::I32 => 13,
            TypeTag::I64 => 14,
            TypeTag::I128 => 15,
            TypeTag::I256 => 16,
        }
    }

    /// Parses a type tag from a string.
    ///
    /// Supports primitives (`bool`, `u8`..`u256`, `i8`..`i256`, `address`,
    /// `signer`), `vector<T>` and struct types with optional generic
    /// arguments such as `0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the string exceeds 1024 characters, nests deeper
    /// than 8 levels, or any component is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use aptos_sdk_core::types::TypeTag;
    ///
    /// let tag = TypeTag::from_str_strict("0x1::aptos_coin::AptosCoin").unwrap();
    /// assert_eq!(tag, TypeTag::aptos_coin());
    /// let tag = TypeTag::from_str_strict("vector<u8>").unwrap();
    /// assert_eq!(tag.to_string(), "vector<u8>");
    /// ```
    pub fn from_str_strict(s: &str) -> AptosResult<Self> {
        let s = s.trim();
        if s.len() > MAX_TYPE_TAG_LENGTH {
            return Err(AptosError::InvalidTypeTag(format!(
                "type tag too long: {} bytes (max {})",
                s.len(),
                MAX_TYPE_TAG_LENGTH
            )));
        }
        Self::parse_with_depth(s, 0)
    }

    fn parse_with_depth(s: &str, depth: usize) -> AptosResult<Self> {
        if depth > MAX_TYPE_NESTING_DEPTH {
            return Err(AptosError::InvalidTypeTag(format!(
                "type tag nesting too deep: {depth} levels (max {MAX_TYPE_NESTING_DEPTH})"
            )));
        }

        let primitive = match s {
            "bool" => Some(TypeTag::Bool),
            "u8" => Some(TypeTag::U8),
            "u16" => Some(TypeTag::U16),
            "u32" => Some(TypeTag::U32),
            "u64" => Some(TypeTag::U64),
            "u128" => Some(TypeTag::U128),
            "u256" => Some(TypeTag::U256),
            "i8" => Some(TypeTag::I8),
            "i16" => Some(TypeTag::I16),
            "i32" => Some(TypeTag::I32),
            "i64" => Some(TypeTag::I64),
            "i128" => Some(TypeTag::I128),
            "i256" => Some(TypeTag::I256),
            "address" => Some(TypeTag::Address),
            "signer" => Some(TypeTag::Signer),
            _ => None,
        };
        if let Some(tag) = primitive {
            return Ok(tag);
        }

        if let Some(inner) = s.strip_prefix("vector<").and_then(|r| r.strip_suffix('>')) {
            let inner_tag = Self::parse_with_depth(inner.trim(), depth + 1)?;
            return Ok(TypeTag::vector(inner_tag));
        }

        Self::parse_struct_with_depth(s, depth)
    }

    fn parse_struct_with_depth(s: &str, depth: usize) -> AptosResult<Self> {
        let (base, type_args_str) = match s.find('<') {
            Some(idx) => {
                if !s.ends_with('>') {
                    return Err(AptosError::InvalidTypeTag(format!(
                        "malformed generic type: {s}"
                    )));
                }
                (&s[..idx], Some(&s[idx + 1..s.len() - 1]))
            }
            None => (s, None),
        };

        let parts: Vec<&str> = base.split("::").collect();
        if parts.len() != 3 {
            return Err(AptosError::InvalidTypeTag(format!(
                "invalid struct type format (expected address::module::name): {s}"
            )));
        }

        let address = AccountAddress::from_str(parts[0].trim())?;
        let module = Identifier::new(parts[1].trim())?;
        let name = Identifier::new(parts[2].trim())?;
        let type_args = match type_args_str {
            Some(args) => Self::parse_type_args_with_depth(args, depth)?,
            None => vec![],
        };

        Ok(TypeTag::struct_tag(StructTag {
            address,
            module,
            name,
            type_args,
        }))
    }

    fn parse_type_args_with_depth(s: &str, depth: usize) -> AptosResult<Vec<TypeTag>> {
        if s.trim().is_empty() {
            return Err(AptosError::InvalidTypeTag(
                "empty type argument list".to_string(),
            ));
        }

        let mut result = Vec::new();
        let mut bracket_depth: i32 = 0;
        let mut start = 0;

        for (i, c) in s.char_indices() {
            match c {
                '<' => bracket_depth += 1,
                '>' => {
                    bracket_depth -= 1;
                    if bracket_depth < 0 {
                        return Err(AptosError::InvalidTypeTag(format!(
                            "unbalanced '>' in type arguments: {s}"
                        )));
                    }
                }
                ',' if bracket_depth == 0 => {
                    result.push(Self::parse_with_depth(s[start..i].trim(), depth + 1)?);
                    start = i + 1;
                }
                _ => {}
            }
        }
        if bracket_depth != 0 {
            return Err(AptosError::InvalidTypeTag(format!(
                "unbalanced '<' in type arguments: {s}"
            )));
        }
        result.push(Self::parse_with_depth(s[start..].trim(), depth + 1)?);
        Ok(result)
    }

    fn decode_with_depth(de: &mut Deserializer<'_>, depth: usize) -> BcsResult<Self> {
        if depth > MAX_TYPE_DECODE_DEPTH {
            return Err(BcsError::LengthOutOfBounds {
                kind: "type tag nesting",
                actual: depth,
                min: 0,
                max: MAX_TYPE_DECODE_DEPTH,
            });
        }
        let tag = match de.read_variant_index() {
            0 => TypeTag::Bool,
            1 => TypeTag::U8,
            2 => TypeTag::U64,
            3 => TypeTag::U128,
            4 => TypeTag::Address,
            5 => TypeTag::Signer,
            6 => TypeTag::vector(Self::decode_with_depth(de, depth + 1)?),
            7 => TypeTag::struct_tag(StructTag::decode_with_depth(de, depth + 1)?),
            8 => TypeTag::U16,
            9 => TypeTag::U32,
            10 => TypeTag::U256,
            11 => TypeTag::I8,
            12 => TypeTag::I16,
            13 => TypeTag::I32,
            14 => TypeTag::I64,
            15 => TypeTag::I128,
            16 => TypeTag::I256,
            tag => {
                de.check()?;
                return Err(BcsError::InvalidVariant {
                    kind: "TypeTag",
                    tag,
                });
            }
        };
        de.check()?;
        Ok(tag)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::U8 => write!(f, "u8"),
            TypeTag::U16 => write!(f, "u16"),
            TypeTag::U32 => write!(f, "u32"),
            TypeTag::U64 => write!(f, "u64"),
            TypeTag::U128 => write!(f, "u128"),
            TypeTag::U256 => write!(f, "u256"),
            TypeTag::I8 => write!(f, "i8"),
            TypeTag::I16 => write!(f, "i16"),
            TypeTag::I32 => write!(f, "i32"),
            TypeTag::I64 => write!(f, "i64"),
            TypeTag::I128 => write!(f, "i128"),
            TypeTag::I256 => write!(f, "i256"),
            TypeTag::Address => write!(f, "address"),
            TypeTag::Signer => write!(f, "signer"),
            TypeTag::Vector(inner) => write!(f, "vector<{inner}>"),
            TypeTag::Struct(tag) => write!(f, "{tag}"),
        }
    }
}

impl FromStr for TypeTag {
    type Err = AptosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_strict(s)
    }
}

impl Encode for TypeTag {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_variant_index(self.variant_index());
        match self {
            TypeTag::Vector(inner) => ser.write(inner.as_ref()),
            TypeTag::Struct(tag) => ser.write(tag.as_ref()),
            _ => {}
        }
    }
}

impl Decode for TypeTag {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        Self::decode_with_depth(de, 0)
    }
}

impl Serialize for TypeTag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TypeTag {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TypeTag::from_str_strict(&s).map_err(serde::de::Error::custom)
    }
}

/// An entry function identifier (`address::module::function`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntryFunctionId {
    /// The module containing the function.
    pub module: MoveModuleId,
    /// The function name.
    pub name: Identifier,
}

impl EntryFunctionId {
    /// Creates a new entry function ID.
    pub fn new(module: MoveModuleId, name: Identifier) -> Self {
        Self { module, name }
    }

    /// Parses an entry function ID from a string (e.g., "`0x1::coin::transfer`").
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not in the format `address::module::function`, the address
    /// is invalid, or the module or function name is not a valid identifier.
    pub fn from_str_strict(s: &str) -> AptosResult<Self> {
        let parts: Vec<&str> = s.split("::").collect();
        if parts.len() != 3 {
            return Err(AptosError::InvalidTypeTag(format!(
                "invalid entry function ID format: {s}"
            )));
        }
        let address = AccountAddress::from_str(parts[0])?;
        let module = Identifier::new(parts[1])?;
        let name = Identifier::new(parts[2])?;
        Ok(Self {
            module: MoveModuleId::new(address, module),
            name,
        })
    }
}

impl fmt::Display for EntryFunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module, self.name)
    }
}

impl FromStr for EntryFunctionId {
    type Err = AptosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_strict(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcs;

    #[test]
    fn test_identifier() {
        assert!(Identifier::new("hello").is_ok());
        assert!(Identifier::new("_private").is_ok());
        assert!(Identifier::new("CamelCase123").is_ok());
        assert!(Identifier::new("").is_err());
        assert!(Identifier::new("123start").is_err());
        assert!(Identifier::new("has-dash").is_err());
        assert!(Identifier::new("a".repeat(129)).is_err());
    }

    #[test]
    fn test_identifier_bcs() {
        let id = Identifier::new("coin").unwrap();
        let bytes = bcs::to_bytes(&id).unwrap();
        assert_eq!(bytes, vec![4, b'c', b'o', b'i', b'n']);
        assert_eq!(bcs::from_bytes::<Identifier>(&bytes).unwrap(), id);
        assert!(bcs::from_bytes::<Identifier>(&[2, b'1', b'a']).is_err());
    }

    #[test]
    fn test_module_id() {
        let module_id = MoveModuleId::from_str_strict("0x1::coin").unwrap();
        assert_eq!(module_id.address, AccountAddress::ONE);
        assert_eq!(module_id.name.as_str(), "coin");
        assert_eq!(module_id.to_string(), "0x1::coin");

        assert!(MoveModuleId::from_str_strict("invalid").is_err());
        assert!(MoveModuleId::from_str_strict("0x1").is_err());
        assert!(MoveModuleId::from_str_strict("0x1::").is_err());
    }

    #[test]
    fn test_struct_tag_display() {
        let tag = StructTag::aptos_coin();
        assert_eq!(tag.to_string(), "0x1::aptos_coin::AptosCoin");
    }

    #[test]
    fn test_parse_primitives() {
        for (s, tag) in [
            ("bool", TypeTag::Bool),
            ("u8", TypeTag::U8),
            ("u16", TypeTag::U16),
            ("u64", TypeTag::U64),
            ("u256", TypeTag::U256),
            ("i64", TypeTag::I64),
            ("address", TypeTag::Address),
            ("signer", TypeTag::Signer),
        ] {
            assert_eq!(TypeTag::from_str_strict(s).unwrap(), tag);
            assert_eq!(tag.to_string(), s);
        }
    }

    #[test]
    fn test_parse_generic_struct() {
        let tag =
            TypeTag::from_str_strict("0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>").unwrap();
        let TypeTag::Struct(inner) = &tag else {
            panic!("expected struct tag");
        };
        assert_eq!(inner.module.as_str(), "coin");
        assert_eq!(inner.type_args, vec![TypeTag::aptos_coin()]);
        assert_eq!(
            tag.to_string(),
            "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>"
        );
    }

    #[test]
    fn test_parse_multiple_type_args() {
        let tag = TypeTag::from_str_strict("0x1::pool::Pool<u64, vector<u8>, 0x1::a::B<bool>>")
            .unwrap();
        let TypeTag::Struct(inner) = tag else {
            panic!("expected struct tag");
        };
        assert_eq!(inner.type_args.len(), 3);
        assert_eq!(inner.type_args[1], TypeTag::vector(TypeTag::U8));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(TypeTag::from_str_strict("vector<u8").is_err());
        assert!(TypeTag::from_str_strict("0x1::coin").is_err());
        assert!(TypeTag::from_str_strict("0x1::coin::Coin<>").is_err());
        assert!(TypeTag::from_str_strict("0x1::coin::Coin<u8>>").is_err());
        assert!(TypeTag::from_str_strict("u512").is_err());
    }

    #[test]
    fn test_parse_limits() {
        let deep = format!("{}u8{}", "vector<".repeat(10), ">".repeat(10));
        assert!(TypeTag::from_str_strict(&deep).is_err());
        let ok = format!("{}u8{}", "vector<".repeat(8), ">".repeat(8));
        assert!(TypeTag::from_str_strict(&ok).is_ok());
        let long = format!("0x1::m::S{}", "a".repeat(1100));
        assert!(TypeTag::from_str_strict(&long).is_err());
    }

    #[test]
    fn test_type_tag_bcs_variants() {
        assert_eq!(bcs::to_bytes(&TypeTag::Bool).unwrap(), vec![0]);
        assert_eq!(bcs::to_bytes(&TypeTag::U64).unwrap(), vec![2]);
        assert_eq!(bcs::to_bytes(&TypeTag::U16).unwrap(), vec![8]);
        assert_eq!(bcs::to_bytes(&TypeTag::I256).unwrap(), vec![16]);
        assert_eq!(
            bcs::to_bytes(&TypeTag::vector(TypeTag::U8)).unwrap(),
            vec![6, 1]
        );
    }

    #[test]
    fn test_aptos_coin_bcs() {
        let bytes = bcs::to_bytes(&TypeTag::aptos_coin()).unwrap();
        assert_eq!(bytes[0], 7);
        assert_eq!(&bytes[1..33], AccountAddress::ONE.as_bytes());
        assert_eq!(bytes[33], 10);
        assert_eq!(&bytes[34..44], b"aptos_coin");
        assert_eq!(bytes[44], 9);
        assert_eq!(&bytes[45..54], b"AptosCoin");
        assert_eq!(bytes[54], 0);
        assert_eq!(bytes.len(), 55);
        assert_eq!(
            bcs::from_bytes::<TypeTag>(&bytes).unwrap(),
            TypeTag::aptos_coin()
        );
    }

    #[test]
    fn test_type_tag_unknown_variant() {
        assert_eq!(
            bcs::from_bytes::<TypeTag>(&[17]),
            Err(BcsError::InvalidVariant {
                kind: "TypeTag",
                tag: 17
            })
        );
    }

    #[test]
    fn test_type_tag_decode_depth_limit() {
        let mut bytes = vec![6u8; 100];
        bytes.push(1);
        assert!(matches!(
            bcs::from_bytes::<TypeTag>(&bytes),
            Err(BcsError::LengthOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_type_tag_json_as_string() {
        let json = serde_json::to_string(&TypeTag::vector(TypeTag::Address)).unwrap();
        assert_eq!(json, "\"vector<address>\"");
        let parsed: TypeTag = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, TypeTag::vector(TypeTag::Address));
    }

    #[test]
    fn test_entry_function_id() {
        let id = EntryFunctionId::from_str_strict("0x1::coin::transfer").unwrap();
        assert_eq!(id.module.address, AccountAddress::ONE);
        assert_eq!(id.name.as_str(), "transfer");
        assert_eq!(id.to_string(), "0x1::coin::transfer");
        assert!(EntryFunctionId::from_str_strict("0x1::coin").is_err());
    }
}
