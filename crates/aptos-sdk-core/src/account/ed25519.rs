//! Ed25519 account implementation.

use crate::account::account::Account;
use crate::crypto::{
    AuthenticationKey, Ed25519PrivateKey, Ed25519PublicKey, Ed25519Signature, ED25519_SCHEME,
};
use crate::error::AptosResult;
use crate::transaction::AccountAuthenticator;
use crate::types::AccountAddress;
use std::fmt;

/// A legacy Ed25519 account for signing transactions.
///
/// This is the most common account type on Aptos. Its authentication key
/// uses the Ed25519 scheme byte, and it signs with the legacy
/// [`AccountAuthenticator::Ed25519`] variant.
///
/// # Example
///
/// ```rust
/// use aptos_sdk_core::account::{Account, Ed25519Account};
///
/// let account = Ed25519Account::generate();
/// let authenticator = account.sign(b"message").unwrap();
/// assert!(authenticator.verify(b"message"));
/// ```
#[derive(Clone)]
pub struct Ed25519Account {
    private_key: Ed25519PrivateKey,
    public_key: Ed25519PublicKey,
    address: AccountAddress,
}

impl Ed25519Account {
    /// Generates a new random Ed25519 account.
    pub fn generate() -> Self {
        Self::from_private_key(Ed25519PrivateKey::generate())
    }

    /// Creates an account from a private key.
    pub fn from_private_key(private_key: Ed25519PrivateKey) -> Self {
        let public_key = private_key.public_key();
        let address = public_key.to_address();
        Self {
            private_key,
            public_key,
            address,
        }
    }

    /// Creates an account from private key bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a 32-byte seed.
    pub fn from_private_key_bytes(bytes: &[u8]) -> AptosResult<Self> {
        Ok(Self::from_private_key(Ed25519PrivateKey::from_bytes(bytes)?))
    }

    /// Creates an account from a private key hex or AIP-80 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid Ed25519 private key.
    pub fn from_private_key_hex(hex_str: &str) -> AptosResult<Self> {
        Ok(Self::from_private_key(Ed25519PrivateKey::from_hex(hex_str)?))
    }

    /// Returns the account address.
    pub fn address(&self) -> AccountAddress {
        self.address
    }

    /// Returns the public key.
    pub fn public_key(&self) -> &Ed25519PublicKey {
        &self.public_key
    }

    /// Returns a reference to the private key.
    ///
    /// **Warning**: Handle with care to avoid leaking sensitive key material.
    pub fn private_key(&self) -> &Ed25519PrivateKey {
        &self.private_key
    }

    /// Signs a message and returns the bare Ed25519 signature.
    pub fn sign_message(&self, message: &[u8]) -> Ed25519Signature {
        self.private_key.sign(message)
    }
}

impl Account for Ed25519Account {
    fn address(&self) -> AccountAddress {
        self.address
    }

    fn authentication_key(&self) -> AuthenticationKey {
        self.public_key.authentication_key()
    }

    fn sign(&self, message: &[u8]) -> AptosResult<AccountAuthenticator> {
        Ok(AccountAuthenticator::ed25519(
            self.public_key,
            self.private_key.sign(message),
        ))
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        self.public_key.to_bytes().to_vec()
    }

    fn signature_scheme(&self) -> u8 {
        ED25519_SCHEME
    }
}

impl fmt::Debug for Ed25519Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519Account")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "0xc5338cd251c22daa8c9c9cc94f498cc8a5c7e1d2e75287a5dda91096fe64efa5";

    #[test]
    fn test_generate() {
        let account = Ed25519Account::generate();
        assert!(!account.address().is_zero());
    }

    #[test]
    fn test_known_address() {
        let account = Ed25519Account::from_private_key_hex(SEED).unwrap();
        assert_eq!(
            account.authentication_key().to_hex(),
            "0x978c213990c4833df71548df7ce49d54c759d6b6d932de22b24d56060b7af2aa"
        );
        assert_eq!(
            account.address(),
            account.authentication_key().to_address()
        );
    }

    #[test]
    fn test_sign_produces_legacy_authenticator() {
        let account = Ed25519Account::generate();
        let authenticator = account.sign(b"test message").unwrap();
        match &authenticator {
            AccountAuthenticator::Ed25519 { public_key, .. } => {
                assert_eq!(public_key, account.public_key());
            }
            other => panic!("unexpected authenticator: {other:?}"),
        }
        assert!(authenticator.verify(b"test message"));
        assert!(!authenticator.verify(b"other message"));
    }

    #[test]
    fn test_sign_message() {
        let account = Ed25519Account::generate();
        let signature = account.sign_message(b"hello world");
        assert!(account.public_key().verify(b"hello world", &signature));
    }

    #[test]
    fn test_from_private_key_bytes() {
        let original = Ed25519Account::generate();
        let bytes = original.private_key().to_bytes();
        let restored = Ed25519Account::from_private_key_bytes(&bytes).unwrap();
        assert_eq!(original.address(), restored.address());
    }

    #[test]
    fn test_from_aip80_string() {
        let original = Ed25519Account::generate();
        let restored =
            Ed25519Account::from_private_key_hex(&original.private_key().to_aip80()).unwrap();
        assert_eq!(original.address(), restored.address());
    }

    #[test]
    fn test_public_key_bytes_and_scheme() {
        let account = Ed25519Account::generate();
        assert_eq!(account.public_key_bytes().len(), 32);
        assert_eq!(account.signature_scheme(), ED25519_SCHEME);
    }

    #[test]
    fn test_debug_output_hides_private_key() {
        let account = Ed25519Account::from_private_key_hex(SEED).unwrap();
        let debug = format!("{account:?}");
        assert!(debug.contains("Ed25519Account"));
        assert!(!debug.contains("c5338cd251c22daa"));
    }

    #[test]
    fn test_invalid_private_key() {
        assert!(Ed25519Account::from_private_key_bytes(&[0u8; 16]).is_err());
        assert!(Ed25519Account::from_private_key_hex("invalid").is_err());
    }
}
