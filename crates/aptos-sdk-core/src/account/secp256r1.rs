//! Secp256r1 (P-256) passkey account implementation.
//!
//! Secp256r1, also known as P-256 or prime256v1, is the curve WebAuthn
//! passkeys use. On Aptos such a key signs through a WebAuthn assertion:
//! the SHA3-256 of the signing message becomes the challenge, and the
//! ECDSA signature covers the authenticator data and the SHA-256 of the
//! client data JSON.

use crate::account::account::Account;
use crate::crypto::webauthn::authenticator_data_for;
use crate::crypto::{
    AnyPublicKey, AnySignature, AuthenticationKey, PartialAuthenticatorAssertionResponse,
    Secp256r1PrivateKey, Secp256r1PublicKey, SINGLE_KEY_SCHEME,
};
use crate::error::AptosResult;
use crate::transaction::AccountAuthenticator;
use crate::types::AccountAddress;
use std::fmt;

/// A Secp256r1 account that emulates a passkey authenticator.
///
/// The relying party id and origin end up in the authenticator data and the
/// client data JSON of every assertion the account produces.
///
/// # Example
///
/// ```rust
/// use aptos_sdk_core::account::{Account, Secp256r1WebAuthnAccount};
///
/// let account = Secp256r1WebAuthnAccount::generate("example.com", "https://example.com");
/// let authenticator = account.sign(b"message").unwrap();
/// assert!(authenticator.verify(b"message"));
/// ```
#[derive(Clone)]
pub struct Secp256r1WebAuthnAccount {
    private_key: Secp256r1PrivateKey,
    public_key: Secp256r1PublicKey,
    address: AccountAddress,
    rp_id: String,
    origin: String,
}

impl Secp256r1WebAuthnAccount {
    /// Generates a new random account for the given relying party.
    pub fn generate(rp_id: impl Into<String>, origin: impl Into<String>) -> Self {
        Self::from_private_key(Secp256r1PrivateKey::generate(), rp_id, origin)
    }

    /// Creates an account from a private key.
    pub fn from_private_key(
        private_key: Secp256r1PrivateKey,
        rp_id: impl Into<String>,
        origin: impl Into<String>,
    ) -> Self {
        let public_key = private_key.public_key();
        let address = public_key.to_address();
        Self {
            private_key,
            public_key,
            address,
            rp_id: rp_id.into(),
            origin: origin.into(),
        }
    }

    /// Creates an account from a private key hex or AIP-80 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid Secp256r1 private key.
    pub fn from_private_key_hex(
        hex_str: &str,
        rp_id: impl Into<String>,
        origin: impl Into<String>,
    ) -> AptosResult<Self> {
        Ok(Self::from_private_key(
            Secp256r1PrivateKey::from_hex(hex_str)?,
            rp_id,
            origin,
        ))
    }

    /// Returns the account address.
    pub fn address(&self) -> AccountAddress {
        self.address
    }

    /// Returns the public key.
    pub fn public_key(&self) -> &Secp256r1PublicKey {
        &self.public_key
    }

    /// Returns the relying party id.
    pub fn rp_id(&self) -> &str {
        &self.rp_id
    }

    /// Returns the origin written into the client data.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Produces a WebAuthn assertion over `message`.
    ///
    /// # Errors
    ///
    /// Returns an error if the assertion cannot be assembled.
    pub fn assert(&self, message: &[u8]) -> AptosResult<PartialAuthenticatorAssertionResponse> {
        let assertion = PartialAuthenticatorAssertionResponse::sign(
            &self.private_key,
            message,
            authenticator_data_for(&self.rp_id),
            &self.origin,
        )?;
        Ok(assertion)
    }
}

impl Account for Secp256r1WebAuthnAccount {
    fn address(&self) -> AccountAddress {
        self.address
    }

    fn authentication_key(&self) -> AuthenticationKey {
        AnyPublicKey::Secp256r1(self.public_key).authentication_key()
    }

    fn sign(&self, message: &[u8]) -> AptosResult<AccountAuthenticator> {
        let assertion = self.assert(message)?;
        tracing::trace!(address = %self.address, rp_id = %self.rp_id, "produced webauthn assertion");
        Ok(AccountAuthenticator::single_key(
            AnyPublicKey::Secp256r1(self.public_key),
            AnySignature::WebAuthn(assertion),
        ))
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        AnyPublicKey::Secp256r1(self.public_key).to_bcs_bytes()
    }

    fn signature_scheme(&self) -> u8 {
        SINGLE_KEY_SCHEME
    }
}

impl fmt::Debug for Secp256r1WebAuthnAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secp256r1WebAuthnAccount")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .field("rp_id", &self.rp_id)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Secp256r1WebAuthnAccount {
        Secp256r1WebAuthnAccount::generate("wallet.example", "https://wallet.example")
    }

    #[test]
    fn test_sign_and_verify() {
        let account = account();
        let authenticator = account.sign(b"signing message").unwrap();
        assert_eq!(authenticator.variant_index(), 2);
        assert!(authenticator.verify(b"signing message"));
        assert!(!authenticator.verify(b"another message"));
    }

    #[test]
    fn test_assertion_binds_origin() {
        let account = account();
        let assertion = account.assert(b"msg").unwrap();
        let client_data = assertion.collected_client_data().unwrap();
        assert_eq!(client_data.origin, "https://wallet.example");
        assert!(assertion.verify(b"msg", account.public_key()));
    }

    #[test]
    fn test_address_uses_single_key_scheme() {
        let account = account();
        assert_eq!(account.signature_scheme(), SINGLE_KEY_SCHEME);
        assert_eq!(account.address(), account.public_key().to_address());
        assert_eq!(account.authentication_key().to_address(), account.address());
        assert_eq!(account.public_key_bytes()[0], 2);
    }

    #[test]
    fn test_from_private_key_hex() {
        let key = Secp256r1PrivateKey::generate();
        let restored =
            Secp256r1WebAuthnAccount::from_private_key_hex(&key.to_hex(), "rp", "https://rp")
                .unwrap();
        assert_eq!(restored.public_key(), &key.public_key());
        assert_eq!(restored.rp_id(), "rp");
        assert_eq!(restored.origin(), "https://rp");
    }

    #[test]
    fn test_debug_output_hides_private_key() {
        let key = Secp256r1PrivateKey::generate();
        let hex = key.to_hex();
        let account = Secp256r1WebAuthnAccount::from_private_key(key, "rp", "https://rp");
        let debug = format!("{account:?}");
        assert!(debug.contains("Secp256r1WebAuthnAccount"));
        assert!(!debug.contains(hex.trim_start_matches("0x")));
    }
}
