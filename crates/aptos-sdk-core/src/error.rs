//! Error types for the Aptos SDK core.
//!
//! This module provides a unified error type [`AptosError`] covering address
//! parsing, key handling, authenticator construction and transaction assembly.
//! Codec failures keep their precise [`BcsError`] and are wrapped unchanged.
//!
//! Verification never produces an error: `verify` functions return `bool`.

use crate::bcs::BcsError;
use crate::crypto::webauthn::WebAuthnError;
use thiserror::Error;

/// A specialized Result type for Aptos SDK operations.
pub type AptosResult<T> = Result<T, AptosError>;

/// The main error type for the Aptos SDK core.
#[derive(Error, Debug)]
pub enum AptosError {
    /// Error occurred during BCS serialization/deserialization
    #[error("BCS error: {0}")]
    Bcs(#[from] BcsError),

    /// Error occurred during hex encoding/decoding
    #[error("Invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Error occurred during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Address input had no hex digits, or too few bytes
    #[error("Address too short: {length} bytes")]
    AddressTooShort {
        /// Length that was supplied (hex digits when parsing, bytes otherwise)
        length: usize,
    },

    /// Address input longer than 64 hex digits or 32 bytes
    #[error("Address too long: {length} (max 64 hex characters / 32 bytes)")]
    AddressTooLong {
        /// Length that was supplied (hex digits when parsing, bytes otherwise)
        length: usize,
    },

    /// Invalid account address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Key or signature bytes have the wrong length for their scheme
    #[error("Invalid {scheme} key length: got {actual}, expected {expected}")]
    InvalidKeyLength {
        /// Scheme name
        scheme: &'static str,
        /// Length supplied
        actual: usize,
        /// Length the scheme requires
        expected: usize,
    },

    /// Private scalar is zero or not below the curve order
    #[error("Private key out of range for {0}")]
    KeyOutOfRange(&'static str),

    /// Public key bytes are not a point on the curve
    #[error("Public key is not a valid {0} curve point")]
    InvalidCurvePoint(&'static str),

    /// ECDSA signature with s in the upper half of the order
    #[error("Signature s value is not low")]
    SignatureNotLowS,

    /// Invalid public key
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Invalid private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Invalid signature
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Multi-signature bitmap does not match the key set
    #[error("Bitmap size mismatch: {0}")]
    BitmapSizeMismatch(String),

    /// Number of signatures differs from the number of bits set
    #[error("Signature count mismatch: bitmap has {bits_set} bits set, got {signatures} signatures")]
    SignatureCountMismatch {
        /// Bits set in the bitmap
        bits_set: usize,
        /// Signatures supplied
        signatures: usize,
    },

    /// Threshold is zero or exceeds the number of keys
    #[error("Threshold not met: threshold {threshold} with {keys} keys")]
    ThresholdNotMet {
        /// Requested threshold
        threshold: usize,
        /// Keys available
        keys: usize,
    },

    /// Insufficient signatures for multi-signature operation
    #[error("Insufficient signatures: need {required}, got {provided}")]
    InsufficientSignatures {
        /// Number of signatures required
        required: usize,
        /// Number of signatures provided
        provided: usize,
    },

    /// WebAuthn assertion could not be built or parsed
    #[error("WebAuthn error: {0}")]
    WebAuthn(#[from] WebAuthnError),

    /// Invalid type tag format
    #[error("Invalid type tag: {0}")]
    InvalidTypeTag(String),

    /// Transaction building error
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal SDK error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Maximum length for error messages to prevent excessive memory usage in logs.
const MAX_ERROR_MESSAGE_LENGTH: usize = 1000;

/// Patterns that might indicate sensitive information in error messages.
const SENSITIVE_PATTERNS: &[&str] = &["private_key", "secret", "seed", "priv-0x", "mnemonic"];

impl AptosError {
    /// Creates a new transaction error
    pub fn transaction<S: Into<String>>(msg: S) -> Self {
        Self::Transaction(msg.into())
    }

    /// Creates a key length error
    pub fn key_length(scheme: &'static str, actual: usize, expected: usize) -> Self {
        Self::InvalidKeyLength {
            scheme,
            actual,
            expected,
        }
    }

    /// Returns true if this error came from the codec
    pub fn is_codec(&self) -> bool {
        matches!(self, Self::Bcs(_))
    }

    /// Returns a sanitized version of the error message safe for logging.
    ///
    /// Control characters are removed, very long messages are truncated and
    /// messages that look like they carry key material are redacted.
    ///
    /// # Example
    ///
    /// ```rust
    /// use aptos_sdk_core::AptosError;
    ///
    /// let err = AptosError::transaction("sender is required");
    /// assert_eq!(err.sanitized_message(), "Transaction error: sender is required");
    /// ```
    pub fn sanitized_message(&self) -> String {
        Self::sanitize_string(&self.to_string())
    }

    fn sanitize_string(s: &str) -> String {
        let cleaned: String = s
            .chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
            .collect();

        let lower = cleaned.to_lowercase();
        for pattern in SENSITIVE_PATTERNS {
            if lower.contains(pattern) {
                return format!("[REDACTED: message contained sensitive pattern '{pattern}']");
            }
        }

        if cleaned.len() > MAX_ERROR_MESSAGE_LENGTH {
            let mut end = MAX_ERROR_MESSAGE_LENGTH;
            while !cleaned.is_char_boundary(end) {
                end -= 1;
            }
            format!(
                "{}... [truncated, total length: {}]",
                &cleaned[..end],
                cleaned.len()
            )
        } else {
            cleaned
        }
    }

    /// Returns the error message suitable for display to end users.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Bcs(_) => "Failed to process data",
            Self::InvalidHex(_) => "Invalid hex format",
            Self::Json(_) => "Failed to process JSON",
            Self::AddressTooShort { .. } | Self::AddressTooLong { .. } | Self::InvalidAddress(_) => {
                "Invalid account address"
            }
            Self::InvalidKeyLength { .. }
            | Self::KeyOutOfRange(_)
            | Self::InvalidCurvePoint(_)
            | Self::InvalidPublicKey(_) => "Invalid public key",
            Self::InvalidPrivateKey(_) => "Invalid private key",
            Self::SignatureNotLowS | Self::InvalidSignature(_) => "Invalid signature",
            Self::BitmapSizeMismatch(_)
            | Self::SignatureCountMismatch { .. }
            | Self::ThresholdNotMet { .. }
            | Self::InsufficientSignatures { .. } => "Invalid multi-signature",
            Self::WebAuthn(_) => "Invalid passkey assertion",
            Self::InvalidTypeTag(_) => "Invalid type format",
            Self::Transaction(_) => "Transaction error",
            Self::Config(_) => "Configuration error",
            Self::Internal(_) => "Internal error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AptosError::InvalidAddress("bad address".to_string());
        assert_eq!(err.to_string(), "Invalid address: bad address");
    }

    #[test]
    fn test_bcs_error_wrapped() {
        let err: AptosError = BcsError::RemainingBytes { remaining: 3 }.into();
        assert!(err.is_codec());
        assert!(err.to_string().contains("3 trailing bytes"));
    }

    #[test]
    fn test_key_length() {
        let err = AptosError::key_length("Ed25519", 31, 32);
        assert_eq!(
            err.to_string(),
            "Invalid Ed25519 key length: got 31, expected 32"
        );
    }

    #[test]
    fn test_address_errors() {
        let err = AptosError::AddressTooLong { length: 65 };
        assert!(err.to_string().contains("65"));
        assert_eq!(err.user_message(), "Invalid account address");
    }

    #[test]
    fn test_signature_count_mismatch() {
        let err = AptosError::SignatureCountMismatch {
            bits_set: 2,
            signatures: 1,
        };
        assert!(err.to_string().contains("2 bits set"));
        assert!(err.to_string().contains("1 signatures"));
    }

    #[test]
    fn test_insufficient_signatures() {
        let err = AptosError::InsufficientSignatures {
            required: 3,
            provided: 1,
        };
        assert!(err.to_string().contains('3'));
        assert!(err.to_string().contains('1'));
    }

    #[test]
    fn test_sanitized_message_truncates_long_messages() {
        let err = AptosError::Internal("x".repeat(2000));
        let sanitized = err.sanitized_message();
        assert!(sanitized.len() < 1200);
        assert!(sanitized.contains("truncated"));
    }

    #[test]
    fn test_sanitized_message_removes_control_chars() {
        let err = AptosError::transaction("bad\x00payload\x1f");
        let sanitized = err.sanitized_message();
        assert!(!sanitized.contains('\x00'));
        assert!(!sanitized.contains('\x1f'));
    }

    #[test]
    fn test_sanitized_message_redacts_sensitive_patterns() {
        let err = AptosError::InvalidPrivateKey("ed25519-priv-0xdeadbeef".to_string());
        let sanitized = err.sanitized_message();
        assert!(sanitized.contains("REDACTED"));
        assert!(!sanitized.contains("deadbeef"));
    }

    #[test]
    fn test_user_message() {
        assert_eq!(
            AptosError::SignatureNotLowS.user_message(),
            "Invalid signature"
        );
        assert_eq!(
            AptosError::Config("x".to_string()).user_message(),
            "Configuration error"
        );
    }
}
