//! BCS decoder.

use super::error::{BcsError, BcsResult};
use super::numbers::{I256, U256};
use super::serializer::MAX_ULEB128_VALUE;
use super::Decode;
use std::collections::BTreeMap;

/// ULEB128 values never need a sixth byte, so a shift of 35 means garbage.
const MAX_ULEB128_SHIFT: u32 = 35;

/// A BCS decoder over a borrowed buffer, with a sticky error.
///
/// Primitive reads (`read_u64`, `read_bytes`, ...) never fail loudly: after
/// the first error they return zero values and leave the error in place.
/// Structured reads through [`Deserializer::read`] return a `Result` so
/// [`Decode`] implementations can use `?`.
#[derive(Debug)]
pub struct Deserializer<'a> {
    input: &'a [u8],
    pos: usize,
    error: Option<BcsError>,
}

impl<'a> Deserializer<'a> {
    /// Creates a decoder positioned at the start of `input`.
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            error: None,
        }
    }

    /// Current read offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    /// Returns the sticky error, if any read has failed.
    pub fn error(&self) -> Option<&BcsError> {
        self.error.as_ref()
    }

    /// Records an error. Only the first error is kept.
    pub fn set_error(&mut self, err: BcsError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Returns the sticky error as a `Result`.
    pub fn check(&self) -> BcsResult<()> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Checks the sticky error and that the whole input was consumed.
    pub fn finish(&self) -> BcsResult<()> {
        self.check()?;
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(BcsError::RemainingBytes { remaining }),
        }
    }

    #[inline]
    fn ok(&self) -> bool {
        self.error.is_none()
    }

    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        if !self.ok() {
            return None;
        }
        if n > self.remaining() {
            self.set_error(BcsError::NotEnoughBytes {
                offset: self.pos,
                needed: n,
                remaining: self.remaining(),
            });
            return None;
        }
        let slice = &self.input[self.pos..self.pos + n];
        self.pos += n;
        Some(slice)
    }

    fn take_array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        if let Some(slice) = self.take(N) {
            out.copy_from_slice(slice);
        }
        out
    }

    /// Reads a boolean; bytes other than 0 or 1 fail with `InvalidBool`.
    pub fn read_bool(&mut self) -> bool {
        let offset = self.pos;
        match self.read_u8() {
            0 => false,
            1 => true,
            value => {
                self.set_error(BcsError::InvalidBool { offset, value });
                false
            }
        }
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> u8 {
        self.take(1).map_or(0, |b| b[0])
    }

    /// Reads a little-endian u16.
    pub fn read_u16(&mut self) -> u16 {
        u16::from_le_bytes(self.take_array())
    }

    /// Reads a little-endian u32.
    pub fn read_u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take_array())
    }

    /// Reads a little-endian u64.
    pub fn read_u64(&mut self) -> u64 {
        u64::from_le_bytes(self.take_array())
    }

    /// Reads a little-endian u128.
    pub fn read_u128(&mut self) -> u128 {
        u128::from_le_bytes(self.take_array())
    }

    /// Reads a 32-byte little-endian u256.
    pub fn read_u256(&mut self) -> U256 {
        U256::from_le_bytes(self.take_array())
    }

    /// Reads an i8.
    pub fn read_i8(&mut self) -> i8 {
        i8::from_le_bytes(self.take_array())
    }

    /// Reads a little-endian i16.
    pub fn read_i16(&mut self) -> i16 {
        i16::from_le_bytes(self.take_array())
    }

    /// Reads a little-endian i32.
    pub fn read_i32(&mut self) -> i32 {
        i32::from_le_bytes(self.take_array())
    }

    /// Reads a little-endian i64.
    pub fn read_i64(&mut self) -> i64 {
        i64::from_le_bytes(self.take_array())
    }

    /// Reads a little-endian i128.
    pub fn read_i128(&mut self) -> i128 {
        i128::from_le_bytes(self.take_array())
    }

    /// Reads a 32-byte little-endian two's complement i256.
    pub fn read_i256(&mut self) -> I256 {
        I256::from_le_bytes(self.take_array())
    }

    /// Reads a ULEB128 value bounded to `u32`.
    pub fn read_uleb128(&mut self) -> u32 {
        let start = self.pos;
        let mut value: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            if !self.ok() {
                return 0;
            }
            if shift >= MAX_ULEB128_SHIFT {
                self.set_error(BcsError::InvalidUleb128 { offset: start });
                return 0;
            }
            let byte = self.read_u8();
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
        }
        if !self.ok() {
            return 0;
        }
        if value > MAX_ULEB128_VALUE {
            self.set_error(BcsError::Overflow { offset: start });
            return 0;
        }
        value as u32
    }

    /// Reads a collection length.
    pub fn read_len(&mut self) -> usize {
        self.read_uleb128() as usize
    }

    /// Reads an enum variant index.
    pub fn read_variant_index(&mut self) -> u32 {
        self.read_uleb128()
    }

    /// Reads an option tag; returns true when a value follows.
    pub fn read_option_tag(&mut self) -> bool {
        let offset = self.pos;
        match self.read_uleb128() {
            0 => false,
            1 => true,
            value => {
                self.set_error(BcsError::InvalidOptionLen { offset, value });
                false
            }
        }
    }

    /// Reads `len` raw bytes with no prefix.
    pub fn read_fixed_vec(&mut self, len: usize) -> Vec<u8> {
        self.take(len).map(<[u8]>::to_vec).unwrap_or_default()
    }

    /// Reads exactly `N` raw bytes.
    pub fn read_fixed_bytes<const N: usize>(&mut self) -> [u8; N] {
        self.take_array()
    }

    /// Reads a length-prefixed byte string.
    ///
    /// The declared length is checked against the remaining input before
    /// anything is allocated.
    pub fn read_bytes(&mut self) -> Vec<u8> {
        let len = self.read_len();
        self.read_fixed_vec(len)
    }

    /// Reads a length-prefixed byte string whose length must lie in `[min, max]`.
    pub fn read_bounded_bytes(&mut self, kind: &'static str, min: usize, max: usize) -> Vec<u8> {
        let len = self.read_len();
        if !self.ok() {
            return Vec::new();
        }
        if len < min || len > max {
            self.set_error(BcsError::LengthOutOfBounds {
                kind,
                actual: len,
                min,
                max,
            });
            return Vec::new();
        }
        self.read_fixed_vec(len)
    }

    /// Reads the raw bytes of a string without validating UTF-8.
    pub fn read_str_bytes(&mut self) -> Vec<u8> {
        self.read_bytes()
    }

    /// Reads a length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> String {
        let offset = self.pos;
        let bytes = self.read_bytes();
        self.utf8(bytes, offset)
    }

    /// Reads a UTF-8 string whose byte length must lie in `[min, max]`.
    pub fn read_bounded_string(&mut self, kind: &'static str, min: usize, max: usize) -> String {
        let offset = self.pos;
        let bytes = self.read_bounded_bytes(kind, min, max);
        self.utf8(bytes, offset)
    }

    fn utf8(&mut self, bytes: Vec<u8>, offset: usize) -> String {
        match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(_) => {
                self.set_error(BcsError::InvalidUtf8 { offset });
                String::new()
            }
        }
    }

    /// Reads a value through its [`Decode`] implementation.
    ///
    /// A failure inside the implementation is also recorded as the sticky error.
    pub fn read<T: Decode>(&mut self) -> BcsResult<T> {
        self.check()?;
        match T::decode(self) {
            Ok(value) => {
                self.check()?;
                Ok(value)
            }
            Err(err) => {
                self.set_error(err.clone());
                Err(err)
            }
        }
    }

    /// Reads an optional value.
    pub fn read_option<T: Decode>(&mut self) -> BcsResult<Option<T>> {
        if self.read_option_tag() {
            self.read().map(Some)
        } else {
            self.check().map(|()| None)
        }
    }

    /// Reads a length-prefixed sequence.
    pub fn read_sequence<T: Decode>(&mut self) -> BcsResult<Vec<T>> {
        let len = self.read_len();
        self.check()?;
        self.read_elements(len)
    }

    /// Reads a sequence whose element count must lie in `[min, max]`.
    pub fn read_bounded_sequence<T: Decode>(
        &mut self,
        kind: &'static str,
        min: usize,
        max: usize,
    ) -> BcsResult<Vec<T>> {
        let len = self.read_len();
        self.check()?;
        if len < min || len > max {
            let err = BcsError::LengthOutOfBounds {
                kind,
                actual: len,
                min,
                max,
            };
            self.set_error(err.clone());
            return Err(err);
        }
        self.read_elements(len)
    }

    fn read_elements<T: Decode>(&mut self, len: usize) -> BcsResult<Vec<T>> {
        // Every element takes at least one byte, so the remaining input caps the allocation.
        let mut out = Vec::with_capacity(len.min(self.remaining()));
        for _ in 0..len {
            out.push(self.read()?);
        }
        Ok(out)
    }

    /// Reads a map, rejecting keys that are not in strictly ascending encoded order.
    pub fn read_map<K: Decode + Ord, V: Decode>(&mut self) -> BcsResult<BTreeMap<K, V>> {
        let len = self.read_len();
        self.check()?;
        let mut map = BTreeMap::new();
        let mut previous_key: Option<&'a [u8]> = None;
        for _ in 0..len {
            let start = self.pos;
            let key: K = self.read()?;
            let key_bytes = &self.input[start..self.pos];
            if let Some(previous) = previous_key {
                if previous >= key_bytes {
                    let err = BcsError::NonCanonicalMap { offset: start };
                    self.set_error(err.clone());
                    return Err(err);
                }
            }
            previous_key = Some(key_bytes);
            let value: V = self.read()?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uleb128_decode() {
        let cases: &[(&[u8], u32)] = &[
            (&[0x00], 0),
            (&[0x7f], 0x7f),
            (&[0x80, 0x01], 0x80),
            (&[0xff, 0x7f], 0x3fff),
            (&[0xff, 0xff, 0xff, 0xff, 0x0f], u32::MAX),
        ];
        for (bytes, expected) in cases {
            let mut de = Deserializer::new(bytes);
            assert_eq!(de.read_uleb128(), *expected);
            assert!(de.finish().is_ok());
        }
    }

    #[test]
    fn test_uleb128_six_bytes_rejected() {
        let mut de = Deserializer::new(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]);
        assert_eq!(de.read_uleb128(), 0);
        assert_eq!(de.error(), Some(&BcsError::InvalidUleb128 { offset: 0 }));
    }

    #[test]
    fn test_uleb128_overflow() {
        let mut de = Deserializer::new(&[0xff, 0xff, 0xff, 0xff, 0x1f]);
        assert_eq!(de.read_uleb128(), 0);
        assert_eq!(de.error(), Some(&BcsError::Overflow { offset: 0 }));
    }

    #[test]
    fn test_uleb128_truncated() {
        let mut de = Deserializer::new(&[0x80]);
        de.read_uleb128();
        assert!(matches!(de.error(), Some(BcsError::NotEnoughBytes { .. })));
    }

    #[test]
    fn test_invalid_bool() {
        let mut de = Deserializer::new(&[0x02]);
        assert!(!de.read_bool());
        assert_eq!(
            de.error(),
            Some(&BcsError::InvalidBool {
                offset: 0,
                value: 2
            })
        );
    }

    #[test]
    fn test_invalid_option_tag() {
        let mut de = Deserializer::new(&[0x02, 0x05]);
        assert!(!de.read_option_tag());
        assert!(matches!(
            de.error(),
            Some(BcsError::InvalidOptionLen { value: 2, .. })
        ));
    }

    #[test]
    fn test_sticky_error_returns_zero_values() {
        let mut de = Deserializer::new(&[0x01, 0x02]);
        assert_eq!(de.read_u32(), 0);
        let err = de.error().cloned();
        assert!(matches!(err, Some(BcsError::NotEnoughBytes { needed: 4, .. })));

        // Bytes are still there but nothing more is read.
        assert_eq!(de.read_u8(), 0);
        assert!(!de.read_bool());
        assert!(de.read_bytes().is_empty());
        assert_eq!(de.position(), 0);
        assert_eq!(de.error().cloned(), err);
    }

    #[test]
    fn test_signed_reconstruction() {
        let mut de = Deserializer::new(&[0xff, 0xfe, 0xff, 0x00, 0x80]);
        assert_eq!(de.read_i8(), -1);
        assert_eq!(de.read_i16(), -2);
        assert_eq!(de.read_i16(), i16::MIN);
        assert!(de.finish().is_ok());
    }

    #[test]
    fn test_read_bytes_checks_length_before_allocating() {
        // Declares u32::MAX bytes with only one present.
        let mut de = Deserializer::new(&[0xff, 0xff, 0xff, 0xff, 0x0f, 0xaa]);
        assert!(de.read_bytes().is_empty());
        assert!(matches!(
            de.error(),
            Some(BcsError::NotEnoughBytes {
                needed: 4294967295,
                remaining: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_bounded_bytes() {
        let mut de = Deserializer::new(&[0x03, 1, 2, 3]);
        assert!(de.read_bounded_bytes("blob", 4, 8).is_empty());
        assert_eq!(
            de.error(),
            Some(&BcsError::LengthOutOfBounds {
                kind: "blob",
                actual: 3,
                min: 4,
                max: 8
            })
        );

        let mut de = Deserializer::new(&[0x03, 1, 2, 3]);
        assert_eq!(de.read_bounded_bytes("blob", 1, 3), vec![1, 2, 3]);
    }

    #[test]
    fn test_bounded_string() {
        let mut de = Deserializer::new(&[0x02, b'o', b'k']);
        assert_eq!(de.read_bounded_string("name", 0, 2), "ok");

        let mut de = Deserializer::new(&[0x02, b'o', b'k']);
        assert_eq!(de.read_bounded_string("name", 0, 1), "");
        assert!(de.error().is_some());
    }

    #[test]
    fn test_string_utf8() {
        let mut de = Deserializer::new(&[0x02, 0xc3, 0x28]);
        assert_eq!(de.read_string(), "");
        assert_eq!(de.error(), Some(&BcsError::InvalidUtf8 { offset: 0 }));

        let mut de = Deserializer::new(&[0x02, 0xc3, 0x28]);
        assert_eq!(de.read_str_bytes(), vec![0xc3, 0x28]);
        assert!(de.error().is_none());
    }

    #[test]
    fn test_finish_reports_remaining() {
        let mut de = Deserializer::new(&[0x01, 0x02]);
        de.read_u8();
        assert_eq!(de.finish(), Err(BcsError::RemainingBytes { remaining: 1 }));
    }

    #[test]
    fn test_read_map_rejects_unsorted_keys() {
        // Two u8 keys, 2 then 1.
        let mut de = Deserializer::new(&[0x02, 0x02, 0x00, 0x01, 0x01]);
        let result = de.read_map::<u8, bool>();
        assert_eq!(result, Err(BcsError::NonCanonicalMap { offset: 3 }));
    }

    #[test]
    fn test_read_map_rejects_duplicate_keys() {
        let mut de = Deserializer::new(&[0x02, 0x01, 0x00, 0x01, 0x01]);
        assert!(de.read_map::<u8, bool>().is_err());
    }
}
