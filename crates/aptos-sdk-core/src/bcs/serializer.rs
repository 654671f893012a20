//! BCS encoder.

use super::error::{BcsError, BcsResult};
use super::numbers::{I256, U256};
use super::Encode;
use std::collections::BTreeMap;

/// Largest length or variant index that ULEB128 can carry in BCS.
pub const MAX_ULEB128_VALUE: u64 = u32::MAX as u64;

/// A BCS encoder with a sticky error.
///
/// Once any write fails, the error is kept and every later write is dropped.
/// The caller checks the outcome once, via [`Serializer::into_bytes`] or
/// [`Serializer::error`].
///
/// # Example
///
/// ```rust
/// use aptos_sdk_core::bcs::Serializer;
///
/// let mut ser = Serializer::new();
/// ser.write_u64(42);
/// ser.write_str("aptos");
/// let bytes = ser.into_bytes().unwrap();
/// assert_eq!(bytes[0], 42);
/// assert_eq!(bytes[8], 5);
/// ```
#[derive(Debug, Default)]
pub struct Serializer {
    output: Vec<u8>,
    error: Option<BcsError>,
}

impl Serializer {
    /// Creates an empty serializer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a serializer with preallocated output space.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            output: Vec::with_capacity(capacity),
            error: None,
        }
    }

    /// Returns the sticky error, if any write has failed.
    pub fn error(&self) -> Option<&BcsError> {
        self.error.as_ref()
    }

    /// Records an error. Only the first error is kept.
    pub fn set_error(&mut self, err: BcsError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Returns the bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.output
    }

    /// Clears the output and the sticky error so the serializer can be reused.
    pub fn reset(&mut self) {
        self.output.clear();
        self.error = None;
    }

    /// Consumes the serializer, returning the output or the first error.
    pub fn into_bytes(self) -> BcsResult<Vec<u8>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.output),
        }
    }

    #[inline]
    fn ok(&self) -> bool {
        self.error.is_none()
    }

    /// Writes a boolean as 0x00 or 0x01.
    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(u8::from(value));
    }

    /// Writes a single byte.
    pub fn write_u8(&mut self, value: u8) {
        if self.ok() {
            self.output.push(value);
        }
    }

    /// Writes a little-endian u16.
    pub fn write_u16(&mut self, value: u16) {
        self.write_fixed_bytes(&value.to_le_bytes());
    }

    /// Writes a little-endian u32.
    pub fn write_u32(&mut self, value: u32) {
        self.write_fixed_bytes(&value.to_le_bytes());
    }

    /// Writes a little-endian u64.
    pub fn write_u64(&mut self, value: u64) {
        self.write_fixed_bytes(&value.to_le_bytes());
    }

    /// Writes a little-endian u128.
    pub fn write_u128(&mut self, value: u128) {
        self.write_fixed_bytes(&value.to_le_bytes());
    }

    /// Writes a 32-byte little-endian u256.
    pub fn write_u256(&mut self, value: &U256) {
        self.write_fixed_bytes(&value.to_le_bytes());
    }

    /// Writes an i8 in two's complement.
    pub fn write_i8(&mut self, value: i8) {
        self.write_fixed_bytes(&value.to_le_bytes());
    }

    /// Writes a little-endian i16.
    pub fn write_i16(&mut self, value: i16) {
        self.write_fixed_bytes(&value.to_le_bytes());
    }

    /// Writes a little-endian i32.
    pub fn write_i32(&mut self, value: i32) {
        self.write_fixed_bytes(&value.to_le_bytes());
    }

    /// Writes a little-endian i64.
    pub fn write_i64(&mut self, value: i64) {
        self.write_fixed_bytes(&value.to_le_bytes());
    }

    /// Writes a little-endian i128.
    pub fn write_i128(&mut self, value: i128) {
        self.write_fixed_bytes(&value.to_le_bytes());
    }

    /// Writes a 32-byte little-endian i256.
    pub fn write_i256(&mut self, value: &I256) {
        self.write_fixed_bytes(&value.to_le_bytes());
    }

    /// Writes a ULEB128 value: 7 bits per byte, high bit set on every byte but the last.
    pub fn write_uleb128(&mut self, value: u32) {
        let mut value = value;
        while value >= 0x80 {
            self.write_u8((value as u8 & 0x7f) | 0x80);
            value >>= 7;
        }
        self.write_u8(value as u8);
    }

    /// Writes a collection length, failing if it does not fit in ULEB128.
    pub fn write_len(&mut self, len: usize) {
        match u32::try_from(len) {
            Ok(len) => self.write_uleb128(len),
            Err(_) => self.set_error(BcsError::LengthOutOfBounds {
                kind: "sequence",
                actual: len,
                min: 0,
                max: MAX_ULEB128_VALUE as usize,
            }),
        }
    }

    /// Writes an enum variant index.
    pub fn write_variant_index(&mut self, index: u32) {
        self.write_uleb128(index);
    }

    /// Writes raw bytes with no length prefix.
    pub fn write_fixed_bytes(&mut self, bytes: &[u8]) {
        if self.ok() {
            self.output.extend_from_slice(bytes);
        }
    }

    /// Writes a length-prefixed byte string.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.write_len(bytes.len());
        self.write_fixed_bytes(bytes);
    }

    /// Writes a length-prefixed UTF-8 string.
    pub fn write_str(&mut self, value: &str) {
        self.write_bytes(value.as_bytes());
    }

    /// Writes a value through its [`Encode`] implementation.
    pub fn write<T: Encode + ?Sized>(&mut self, value: &T) {
        if self.ok() {
            value.encode(self);
        }
    }

    /// Writes an option tag followed by the value when present.
    pub fn write_option<T: Encode>(&mut self, value: Option<&T>) {
        match value {
            None => self.write_uleb128(0),
            Some(value) => {
                self.write_uleb128(1);
                self.write(value);
            }
        }
    }

    /// Writes a length-prefixed sequence.
    pub fn write_sequence<T: Encode>(&mut self, values: &[T]) {
        self.write_len(values.len());
        for value in values {
            if !self.ok() {
                return;
            }
            self.write(value);
        }
    }

    /// Writes a map with entries ordered by the encoding of their keys.
    ///
    /// The in-memory order of the map is irrelevant: keys are serialized,
    /// sorted lexicographically on their bytes, and emitted in that order.
    pub fn write_map<K: Encode, V: Encode>(&mut self, map: &BTreeMap<K, V>) {
        let mut entries = Vec::with_capacity(map.len());
        for (key, value) in map {
            let mut key_ser = Serializer::new();
            key_ser.write(key);
            match key_ser.into_bytes() {
                Ok(key_bytes) => entries.push((key_bytes, value)),
                Err(err) => {
                    self.set_error(err);
                    return;
                }
            }
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        self.write_len(entries.len());
        for (key_bytes, value) in entries {
            self.write_fixed_bytes(&key_bytes);
            self.write(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uleb(value: u32) -> Vec<u8> {
        let mut ser = Serializer::new();
        ser.write_uleb128(value);
        ser.into_bytes().unwrap()
    }

    #[test]
    fn test_uleb128_boundaries() {
        assert_eq!(uleb(0x00), vec![0x00]);
        assert_eq!(uleb(0x7f), vec![0x7f]);
        assert_eq!(uleb(0x80), vec![0x80, 0x01]);
        assert_eq!(uleb(0x3fff), vec![0xff, 0x7f]);
        assert_eq!(uleb(0x4000), vec![0x80, 0x80, 0x01]);
        assert_eq!(uleb(u32::MAX), vec![0xff, 0xff, 0xff, 0xff, 0x0f]);
    }

    #[test]
    fn test_integers_little_endian() {
        let mut ser = Serializer::new();
        ser.write_u16(0x0102);
        ser.write_u32(0x0304_0506);
        ser.write_u64(1);
        let bytes = ser.into_bytes().unwrap();
        assert_eq!(&bytes[..2], &[0x02, 0x01]);
        assert_eq!(&bytes[2..6], &[0x06, 0x05, 0x04, 0x03]);
        assert_eq!(&bytes[6..], &[1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_signed_twos_complement() {
        let mut ser = Serializer::new();
        ser.write_i8(-1);
        ser.write_i16(-2);
        ser.write_i128(-1);
        let bytes = ser.into_bytes().unwrap();
        assert_eq!(bytes[0], 0xff);
        assert_eq!(&bytes[1..3], &[0xfe, 0xff]);
        assert!(bytes[3..].iter().all(|b| *b == 0xff));
        assert_eq!(bytes.len(), 1 + 2 + 16);
    }

    #[test]
    fn test_bytes_and_strings_prefixed() {
        let mut ser = Serializer::new();
        ser.write_bytes(&[0xaa, 0xbb]);
        ser.write_str("hi");
        ser.write_fixed_bytes(&[0xcc]);
        assert_eq!(
            ser.into_bytes().unwrap(),
            vec![2, 0xaa, 0xbb, 2, b'h', b'i', 0xcc]
        );
    }

    #[test]
    fn test_option_tags() {
        let mut ser = Serializer::new();
        ser.write_option::<u8>(None);
        ser.write_option(Some(&7u8));
        assert_eq!(ser.into_bytes().unwrap(), vec![0, 1, 7]);
    }

    #[test]
    fn test_map_sorted_by_encoded_key() {
        // u16 keys: Ord order is 1 < 256, but encoded 256 = [00 01] sorts before 1 = [01 00].
        let mut map = BTreeMap::new();
        map.insert(1u16, true);
        map.insert(256u16, false);
        let mut ser = Serializer::new();
        ser.write_map(&map);
        assert_eq!(
            ser.into_bytes().unwrap(),
            vec![2, 0x00, 0x01, 0x00, 0x01, 0x00, 0x01]
        );
    }

    #[test]
    fn test_sticky_error_drops_writes() {
        let mut ser = Serializer::new();
        ser.write_u8(1);
        ser.set_error(BcsError::custom("first"));
        ser.write_u8(2);
        ser.set_error(BcsError::custom("second"));
        assert_eq!(ser.as_bytes(), &[1]);
        assert_eq!(ser.error(), Some(&BcsError::custom("first")));
        assert!(ser.into_bytes().is_err());
    }

    #[test]
    fn test_reset() {
        let mut ser = Serializer::new();
        ser.write_u8(1);
        ser.set_error(BcsError::custom("boom"));
        ser.reset();
        ser.write_u8(9);
        assert_eq!(ser.into_bytes().unwrap(), vec![9]);
    }
}
