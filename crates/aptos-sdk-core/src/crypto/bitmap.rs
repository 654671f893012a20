// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! The signer bitmap shared by MultiEd25519 and MultiKey signatures.

use crate::bcs::{BcsResult, Decode, Deserializer, Encode, Serializer};
use crate::error::{AptosError, AptosResult};
use std::fmt;

/// Bytes in a signer bitmap.
pub const BITMAP_NUM_OF_BYTES: usize = 4;
/// Highest number of signers a bitmap can index.
pub const MAX_BITMAP_SIGNERS: usize = BITMAP_NUM_OF_BYTES * BUCKET_SIZE;

const BUCKET_SIZE: usize = 8;

/// Fixed 4-byte bitmap recording which keys of a multi-key set signed.
///
/// * Position 0 is the most significant bit of the first byte, position 8
///   the most significant bit of the second byte, and so on. Bit `i` lives in
///   byte `i / 8` under mask `0x80 >> (i % 8)`.
/// * A position is set iff its masked byte is non-zero.
/// * Signatures accompanying a bitmap appear in ascending position order.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bitmap([u8; BITMAP_NUM_OF_BYTES]);

impl Bitmap {
    /// Creates an empty bitmap.
    pub const fn new() -> Self {
        Self([0; BITMAP_NUM_OF_BYTES])
    }

    /// Wraps raw bitmap bytes.
    pub const fn from_bytes(bytes: [u8; BITMAP_NUM_OF_BYTES]) -> Self {
        Self(bytes)
    }

    /// Sets the bit at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`AptosError::BitmapSizeMismatch`] if `pos` is 32 or more.
    pub fn set(&mut self, pos: u8) -> AptosResult<()> {
        if pos as usize >= MAX_BITMAP_SIGNERS {
            return Err(AptosError::BitmapSizeMismatch(format!(
                "position {pos} exceeds bitmap capacity of {MAX_BITMAP_SIGNERS}"
            )));
        }
        let (bucket, mask) = Self::locate(pos);
        self.0[bucket] |= mask;
        Ok(())
    }

    /// Checks if the bit at `pos` is set.
    #[inline]
    pub fn is_set(&self, pos: u8) -> bool {
        if pos as usize >= MAX_BITMAP_SIGNERS {
            return false;
        }
        let (bucket, mask) = Self::locate(pos);
        self.0[bucket] & mask != 0
    }

    /// Returns the number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.0.iter().map(|byte| byte.count_ones()).sum()
    }

    /// Returns the index of the last set bit.
    pub fn last_set_bit(&self) -> Option<u8> {
        (0..MAX_BITMAP_SIGNERS as u8).rev().find(|pos| self.is_set(*pos))
    }

    /// Iterates over set positions in ascending order.
    pub fn iter_ones(&self) -> impl Iterator<Item = u8> + '_ {
        (0..MAX_BITMAP_SIGNERS as u8).filter(move |pos| self.is_set(*pos))
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8; BITMAP_NUM_OF_BYTES] {
        &self.0
    }

    /// Builds a bitmap with the given positions set.
    ///
    /// # Errors
    ///
    /// Returns an error if any position is out of range.
    pub fn from_positions<I: IntoIterator<Item = u8>>(positions: I) -> AptosResult<Self> {
        let mut bitmap = Self::new();
        for pos in positions {
            bitmap.set(pos)?;
        }
        Ok(bitmap)
    }

    fn locate(pos: u8) -> (usize, u8) {
        let bucket = pos as usize / BUCKET_SIZE;
        let bucket_pos = pos as usize - bucket * BUCKET_SIZE;
        (bucket, 0b1000_0000 >> bucket_pos as u8)
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitmap(")?;
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "_")?;
            }
            write!(f, "{byte:08b}")?;
        }
        write!(f, ")")
    }
}

impl From<[u8; BITMAP_NUM_OF_BYTES]> for Bitmap {
    fn from(bytes: [u8; BITMAP_NUM_OF_BYTES]) -> Self {
        Self(bytes)
    }
}

impl From<Bitmap> for [u8; BITMAP_NUM_OF_BYTES] {
    fn from(bitmap: Bitmap) -> Self {
        bitmap.0
    }
}

// On the wire the bitmap is a length-prefixed byte vector of exactly 4 bytes.
impl Encode for Bitmap {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_bytes(&self.0);
    }
}

impl Decode for Bitmap {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let bytes = de.read_bounded_bytes("Bitmap", BITMAP_NUM_OF_BYTES, BITMAP_NUM_OF_BYTES);
        de.check()?;
        let mut raw = [0u8; BITMAP_NUM_OF_BYTES];
        raw.copy_from_slice(&bytes);
        Ok(Self(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcs::{self, BcsError};

    #[test]
    fn test_bit_order_is_msb_first() {
        let bitmap = Bitmap::from_positions([0, 2]).unwrap();
        assert_eq!(bitmap.as_bytes(), &[0xA0, 0x00, 0x00, 0x00]);

        let bitmap = Bitmap::from_positions([7, 8, 31]).unwrap();
        assert_eq!(bitmap.as_bytes(), &[0x01, 0x80, 0x00, 0x01]);
    }

    #[test]
    fn test_is_set_uses_non_zero_mask() {
        // Every bit other than the lowest would be missed by a `== 1` check.
        let bitmap = Bitmap::from_bytes([0b0100_0000, 0, 0, 0]);
        assert!(bitmap.is_set(1));
        assert!(!bitmap.is_set(0));
        assert!(!bitmap.is_set(7));
    }

    #[test]
    fn test_set_out_of_range() {
        let mut bitmap = Bitmap::new();
        assert!(matches!(
            bitmap.set(32),
            Err(AptosError::BitmapSizeMismatch(_))
        ));
        assert!(!bitmap.is_set(200));
    }

    #[test]
    fn test_count_and_iterate() {
        let bitmap = Bitmap::from_positions([3, 1, 30, 1]).unwrap();
        assert_eq!(bitmap.count_ones(), 3);
        assert_eq!(bitmap.iter_ones().collect::<Vec<_>>(), vec![1, 3, 30]);
        assert_eq!(bitmap.last_set_bit(), Some(30));
        assert_eq!(Bitmap::new().last_set_bit(), None);
    }

    #[test]
    fn test_bcs_layout() {
        let bitmap = Bitmap::from_positions([0, 2]).unwrap();
        let bytes = bcs::to_bytes(&bitmap).unwrap();
        assert_eq!(bytes, vec![4, 0xA0, 0, 0, 0]);
        assert_eq!(bcs::from_bytes::<Bitmap>(&bytes).unwrap(), bitmap);
    }

    #[test]
    fn test_bcs_wrong_length_rejected() {
        assert!(matches!(
            bcs::from_bytes::<Bitmap>(&[3, 0xA0, 0, 0]),
            Err(BcsError::LengthOutOfBounds { actual: 3, .. })
        ));
    }

    #[test]
    fn test_debug() {
        let bitmap = Bitmap::from_positions([0]).unwrap();
        assert_eq!(
            format!("{bitmap:?}"),
            "Bitmap(10000000_00000000_00000000_00000000)"
        );
    }
}
