//! Binary Canonical Serialization (BCS).
//!
//! BCS is the deterministic, non-self-describing binary format Aptos uses for
//! everything that is hashed or signed: transactions, authenticators, keys and
//! on-chain addresses. Two structurally equal values always produce the same
//! bytes.
//!
//! | Shape | Encoding |
//! |-------|----------|
//! | `bool` | `0x00` or `0x01` |
//! | `u8`..`u256`, `i8`..`i256` | fixed width, little-endian, two's complement for signed |
//! | length, variant index | ULEB128, at most `u32::MAX` |
//! | bytes, string | ULEB128 length then the bytes |
//! | `Vec<T>` | ULEB128 count then each element |
//! | `Option<T>` | `0` or `1` then the value |
//! | `BTreeMap<K, V>` | count then pairs sorted by the encoded key |
//! | `[u8; N]` | the raw bytes, no length |
//!
//! User types plug in by implementing [`Encode`] and [`Decode`]. There is no
//! type registry: encode and decode must agree on the schema.
//!
//! # Example
//!
//! ```rust
//! use aptos_sdk_core::bcs::{self, Decode, Deserializer, Encode, Serializer, BcsResult};
//!
//! #[derive(Debug, PartialEq)]
//! struct Coin {
//!     value: u64,
//!     frozen: bool,
//! }
//!
//! impl Encode for Coin {
//!     fn encode(&self, ser: &mut Serializer) {
//!         ser.write_u64(self.value);
//!         ser.write_bool(self.frozen);
//!     }
//! }
//!
//! impl Decode for Coin {
//!     fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
//!         let value = de.read_u64();
//!         let frozen = de.read_bool();
//!         de.check()?;
//!         Ok(Self { value, frozen })
//!     }
//! }
//!
//! let coin = Coin { value: 100, frozen: false };
//! let bytes = bcs::to_bytes(&coin).unwrap();
//! assert_eq!(bytes.len(), 9);
//! assert_eq!(bcs::from_bytes::<Coin>(&bytes).unwrap(), coin);
//! ```

mod deserializer;
mod error;
mod numbers;
mod serializer;

pub use deserializer::Deserializer;
pub use error::{BcsError, BcsResult};
pub use numbers::{I256, U256};
pub use serializer::{Serializer, MAX_ULEB128_VALUE};

use std::collections::BTreeMap;

/// Types that can write themselves into a [`Serializer`].
///
/// Fields are written in declaration order. Failures are recorded on the
/// serializer, never returned.
pub trait Encode {
    /// Appends the BCS form of `self`.
    fn encode(&self, ser: &mut Serializer);
}

/// Types that can read themselves from a [`Deserializer`].
pub trait Decode: Sized {
    /// Reads one value.
    ///
    /// Implementations read primitives (which are sticky and return zero
    /// values after an error) and nested values through
    /// [`Deserializer::read`], then call [`Deserializer::check`] before
    /// building the result.
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self>;
}

/// Serializes a value to BCS bytes.
pub fn to_bytes<T: Encode + ?Sized>(value: &T) -> BcsResult<Vec<u8>> {
    let mut ser = Serializer::new();
    ser.write(value);
    ser.into_bytes()
}

/// Deserializes a value, failing with [`BcsError::RemainingBytes`] if input is left over.
pub fn from_bytes<T: Decode>(bytes: &[u8]) -> BcsResult<T> {
    let mut de = Deserializer::new(bytes);
    let value = de.read()?;
    de.finish()?;
    Ok(value)
}

/// Returns the length of the BCS encoding of `value`.
pub fn serialized_size<T: Encode + ?Sized>(value: &T) -> BcsResult<usize> {
    to_bytes(value).map(|bytes| bytes.len())
}

macro_rules! impl_primitive {
    ($($ty:ty => $write:ident, $read:ident;)*) => {
        $(
            impl Encode for $ty {
                fn encode(&self, ser: &mut Serializer) {
                    ser.$write(*self);
                }
            }

            impl Decode for $ty {
                fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
                    let value = de.$read();
                    de.check()?;
                    Ok(value)
                }
            }
        )*
    };
}

impl_primitive! {
    bool => write_bool, read_bool;
    u8 => write_u8, read_u8;
    u16 => write_u16, read_u16;
    u32 => write_u32, read_u32;
    u64 => write_u64, read_u64;
    u128 => write_u128, read_u128;
    i8 => write_i8, read_i8;
    i16 => write_i16, read_i16;
    i32 => write_i32, read_i32;
    i64 => write_i64, read_i64;
    i128 => write_i128, read_i128;
}

impl Encode for U256 {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_u256(self);
    }
}

impl Decode for U256 {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let value = de.read_u256();
        de.check()?;
        Ok(value)
    }
}

impl Encode for I256 {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_i256(self);
    }
}

impl Decode for I256 {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let value = de.read_i256();
        de.check()?;
        Ok(value)
    }
}

impl Encode for str {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_str(self);
    }
}

impl Encode for String {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_str(self);
    }
}

impl Decode for String {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let value = de.read_string();
        de.check()?;
        Ok(value)
    }
}

impl<const N: usize> Encode for [u8; N] {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_fixed_bytes(self);
    }
}

impl<const N: usize> Decode for [u8; N] {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let value = de.read_fixed_bytes::<N>();
        de.check()?;
        Ok(value)
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_sequence(self);
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_sequence(self);
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        de.read_sequence()
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_option(self.as_ref());
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        de.read_option()
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, ser: &mut Serializer) {
        (**self).encode(ser);
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        T::decode(de).map(Box::new)
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, ser: &mut Serializer) {
        (**self).encode(ser);
    }
}

impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_map(self);
    }
}

impl<K: Decode + Ord, V: Decode> Decode for BTreeMap<K, V> {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        de.read_map()
    }
}

impl Encode for () {
    fn encode(&self, _ser: &mut Serializer) {}
}

impl Decode for () {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        de.check()
    }
}

impl<A: Encode, B: Encode> Encode for (A, B) {
    fn encode(&self, ser: &mut Serializer) {
        ser.write(&self.0);
        ser.write(&self.1);
    }
}

impl<A: Decode, B: Decode> Decode for (A, B) {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        Ok((de.read()?, de.read()?))
    }
}

impl<A: Encode, B: Encode, C: Encode> Encode for (A, B, C) {
    fn encode(&self, ser: &mut Serializer) {
        ser.write(&self.0);
        ser.write(&self.1);
        ser.write(&self.2);
    }
}

impl<A: Decode, B: Decode, C: Decode> Decode for (A, B, C) {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        Ok((de.read()?, de.read()?, de.read()?))
    }
}
