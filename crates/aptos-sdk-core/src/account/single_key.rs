//! Single-key account implementation.
//!
//! A single-key account wraps one private key of any scheme that signs
//! directly (Ed25519 or Secp256k1) and authenticates under the single-key
//! scheme byte, hashing the scheme-tagged public key.

use crate::account::account::Account;
use crate::crypto::{
    AnyPublicKey, AnySignature, AuthenticationKey, Ed25519PrivateKey, Secp256k1PrivateKey,
    SINGLE_KEY_SCHEME,
};
use crate::error::AptosResult;
use crate::transaction::AccountAuthenticator;
use crate::types::AccountAddress;
use std::fmt;

/// A private key of a scheme that signs messages directly.
///
/// Secp256r1 keys sign through WebAuthn assertions instead; see
/// [`Secp256r1WebAuthnAccount`](super::Secp256r1WebAuthnAccount).
#[derive(Clone)]
pub enum AnyPrivateKey {
    /// Ed25519 private key.
    Ed25519(Ed25519PrivateKey),
    /// Secp256k1 private key.
    Secp256k1(Secp256k1PrivateKey),
}

impl AnyPrivateKey {
    /// Creates an Ed25519 private key.
    pub fn ed25519(key: Ed25519PrivateKey) -> Self {
        Self::Ed25519(key)
    }

    /// Creates a Secp256k1 private key.
    pub fn secp256k1(key: Secp256k1PrivateKey) -> Self {
        Self::Secp256k1(key)
    }

    /// Returns the scheme name, for logs and errors.
    pub fn scheme_name(&self) -> &'static str {
        match self {
            Self::Ed25519(_) => "Ed25519",
            Self::Secp256k1(_) => "Secp256k1",
        }
    }

    /// Gets the scheme-tagged public key.
    pub fn public_key(&self) -> AnyPublicKey {
        match self {
            Self::Ed25519(key) => AnyPublicKey::Ed25519(key.public_key()),
            Self::Secp256k1(key) => AnyPublicKey::Secp256k1(key.public_key()),
        }
    }

    /// Signs a message.
    pub fn sign(&self, message: &[u8]) -> AnySignature {
        match self {
            Self::Ed25519(key) => AnySignature::Ed25519(key.sign(message)),
            Self::Secp256k1(key) => AnySignature::Secp256k1(key.sign(message)),
        }
    }
}

impl From<Ed25519PrivateKey> for AnyPrivateKey {
    fn from(key: Ed25519PrivateKey) -> Self {
        Self::Ed25519(key)
    }
}

impl From<Secp256k1PrivateKey> for AnyPrivateKey {
    fn from(key: Secp256k1PrivateKey) -> Self {
        Self::Secp256k1(key)
    }
}

impl fmt::Debug for AnyPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnyPrivateKey({}, <PrivateKey:REDACTED>)", self.scheme_name())
    }
}

/// A single-key account.
///
/// # Example
///
/// ```rust
/// use aptos_sdk_core::account::{Account, SingleKeyAccount};
/// use aptos_sdk_core::crypto::{Secp256k1PrivateKey, SINGLE_KEY_SCHEME};
///
/// let account = SingleKeyAccount::from_secp256k1(Secp256k1PrivateKey::generate());
/// assert_eq!(account.signature_scheme(), SINGLE_KEY_SCHEME);
/// ```
#[derive(Clone)]
pub struct SingleKeyAccount {
    private_key: AnyPrivateKey,
    public_key: AnyPublicKey,
    address: AccountAddress,
}

impl SingleKeyAccount {
    /// Creates an account from a private key.
    pub fn new(private_key: impl Into<AnyPrivateKey>) -> Self {
        let private_key = private_key.into();
        let public_key = private_key.public_key();
        let address = public_key.to_address();
        Self {
            private_key,
            public_key,
            address,
        }
    }

    /// Generates a new random Ed25519 single-key account.
    ///
    /// The address differs from an [`Ed25519Account`](super::Ed25519Account)
    /// holding the same key, since the scheme byte and hashed bytes differ.
    pub fn generate_ed25519() -> Self {
        Self::new(Ed25519PrivateKey::generate())
    }

    /// Generates a new random Secp256k1 single-key account.
    pub fn generate_secp256k1() -> Self {
        Self::new(Secp256k1PrivateKey::generate())
    }

    /// Creates an account from an Ed25519 private key.
    pub fn from_ed25519(private_key: Ed25519PrivateKey) -> Self {
        Self::new(private_key)
    }

    /// Creates an account from a Secp256k1 private key.
    pub fn from_secp256k1(private_key: Secp256k1PrivateKey) -> Self {
        Self::new(private_key)
    }

    /// Creates a Secp256k1 account from a private key hex or AIP-80 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid Secp256k1 private key.
    pub fn from_secp256k1_hex(hex_str: &str) -> AptosResult<Self> {
        Ok(Self::new(Secp256k1PrivateKey::from_hex(hex_str)?))
    }

    /// Returns the account address.
    pub fn address(&self) -> AccountAddress {
        self.address
    }

    /// Returns the scheme-tagged public key.
    pub fn public_key(&self) -> &AnyPublicKey {
        &self.public_key
    }

    /// Returns a reference to the private key.
    ///
    /// **Warning**: Handle with care to avoid leaking sensitive key material.
    pub fn private_key(&self) -> &AnyPrivateKey {
        &self.private_key
    }

    /// Signs a message and returns the bare scheme-tagged signature.
    pub fn sign_message(&self, message: &[u8]) -> AnySignature {
        self.private_key.sign(message)
    }
}

impl Account for SingleKeyAccount {
    fn address(&self) -> AccountAddress {
        self.address
    }

    fn authentication_key(&self) -> AuthenticationKey {
        self.public_key.authentication_key()
    }

    fn sign(&self, message: &[u8]) -> AptosResult<AccountAuthenticator> {
        Ok(AccountAuthenticator::single_key(
            self.public_key.clone(),
            self.private_key.sign(message),
        ))
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        self.public_key.to_bcs_bytes()
    }

    fn signature_scheme(&self) -> u8 {
        SINGLE_KEY_SCHEME
    }
}

impl fmt::Debug for SingleKeyAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleKeyAccount")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Ed25519Account;

    const SECP256K1_KEY: &str =
        "0xd107155adf816a0a94c6db3c9489c13ad8a1eda7ada2e558ba3bfa47c020347e";

    #[test]
    fn test_secp256k1_known_authentication_key() {
        let account = SingleKeyAccount::from_secp256k1_hex(SECP256K1_KEY).unwrap();
        assert_eq!(
            account.authentication_key().to_hex(),
            "0x5792c985bc96f436270bd2a3c692210b09c7febb8889345ceefdbae4bacfe498"
        );
        assert_eq!(account.address(), account.authentication_key().to_address());
    }

    #[test]
    fn test_sign_produces_single_key_authenticator() {
        let account = SingleKeyAccount::generate_secp256k1();
        let authenticator = account.sign(b"message").unwrap();
        assert_eq!(authenticator.variant_index(), 2);
        assert!(authenticator.verify(b"message"));
        assert!(!authenticator.verify(b"tampered"));
    }

    #[test]
    fn test_ed25519_single_key_differs_from_legacy() {
        let key = Ed25519PrivateKey::generate();
        let legacy = Ed25519Account::from_private_key(key.clone());
        let single = SingleKeyAccount::from_ed25519(key);
        assert_ne!(legacy.address(), single.address());
        assert_eq!(single.public_key_bytes()[0], 0);
        assert_eq!(single.public_key_bytes()[1], 32);
        assert!(single.sign(b"m").unwrap().verify(b"m"));
    }

    #[test]
    fn test_sign_message() {
        let account = SingleKeyAccount::generate_ed25519();
        let signature = account.sign_message(b"hello");
        assert!(account.public_key().verify(b"hello", &signature));
    }

    #[test]
    fn test_debug_output_hides_private_key() {
        let account = SingleKeyAccount::from_secp256k1_hex(SECP256K1_KEY).unwrap();
        let debug = format!("{account:?}");
        assert!(debug.contains("SingleKeyAccount"));
        assert!(!debug.contains("d107155adf816a0a"));
        let key_debug = format!("{:?}", account.private_key());
        assert_eq!(key_debug, "AnyPrivateKey(Secp256k1, <PrivateKey:REDACTED>)");
    }

    #[test]
    fn test_invalid_private_key() {
        assert!(SingleKeyAccount::from_secp256k1_hex("0x1234").is_err());
    }
}
