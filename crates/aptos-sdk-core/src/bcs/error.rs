//! Codec errors.

use thiserror::Error;

/// A specialized Result type for BCS encoding and decoding.
pub type BcsResult<T> = Result<T, BcsError>;

/// Errors produced by the BCS [`Serializer`](super::Serializer) and
/// [`Deserializer`](super::Deserializer).
///
/// Every variant carries enough context (stream offset, declared vs. actual
/// length, variant tag) to diagnose the failure without re-parsing the input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BcsError {
    /// The input ended before the requested number of bytes could be read.
    #[error("not enough bytes at offset {offset}: needed {needed}, {remaining} remaining")]
    NotEnoughBytes {
        /// Offset of the failed read.
        offset: usize,
        /// Bytes the read required.
        needed: usize,
        /// Bytes left in the input.
        remaining: usize,
    },

    /// Input remained after a complete value was decoded.
    #[error("{remaining} trailing bytes after decoding")]
    RemainingBytes {
        /// Number of unread bytes.
        remaining: usize,
    },

    /// A boolean byte other than 0x00 or 0x01.
    #[error("invalid bool byte {value:#04x} at offset {offset}")]
    InvalidBool {
        /// Offset of the offending byte.
        offset: usize,
        /// The byte that was read.
        value: u8,
    },

    /// A ULEB128 value used more than five bytes.
    #[error("invalid ULEB128 encoding at offset {offset}")]
    InvalidUleb128 {
        /// Offset where the ULEB128 value started.
        offset: usize,
    },

    /// A ULEB128 value does not fit in 32 bits.
    #[error("ULEB128 value at offset {offset} overflows u32")]
    Overflow {
        /// Offset where the ULEB128 value started.
        offset: usize,
    },

    /// An option tag other than 0 or 1.
    #[error("invalid option tag {value} at offset {offset}")]
    InvalidOptionLen {
        /// Offset of the tag.
        offset: usize,
        /// The tag that was read.
        value: u32,
    },

    /// A variant index that the target enum does not define.
    #[error("invalid variant tag {tag} for {kind}")]
    InvalidVariant {
        /// Name of the enum being decoded.
        kind: &'static str,
        /// The tag that was read.
        tag: u32,
    },

    /// A length outside the bounds allowed for a field.
    #[error("{kind} length {actual} outside bounds [{min}, {max}]")]
    LengthOutOfBounds {
        /// What was being read or written.
        kind: &'static str,
        /// The declared length.
        actual: usize,
        /// Minimum accepted length.
        min: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// Map keys are not in strictly ascending order of their encoding.
    #[error("map keys not in canonical order at offset {offset}")]
    NonCanonicalMap {
        /// Offset of the out-of-order key.
        offset: usize,
    },

    /// String bytes are not valid UTF-8.
    #[error("invalid UTF-8 string at offset {offset}")]
    InvalidUtf8 {
        /// Offset of the string payload.
        offset: usize,
    },

    /// A user type rejected the decoded data.
    #[error("{0}")]
    Custom(String),
}

impl BcsError {
    /// Creates a custom error from any displayable value.
    pub fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}
