//! Account trait and common types.

use crate::crypto::AuthenticationKey;
use crate::error::AptosResult;
use crate::transaction::AccountAuthenticator;
use crate::types::AccountAddress;

/// Trait for account types that can sign transactions.
///
/// This trait provides a common interface for the different account types
/// (Ed25519, single-key, WebAuthn, multi-Ed25519 and multi-key). Signing
/// produces a complete [`AccountAuthenticator`] rather than raw signature
/// bytes, so the caller never has to know which scheme an account uses.
pub trait Account: Send + Sync {
    /// Returns the account address.
    fn address(&self) -> AccountAddress;

    /// Returns the authentication key.
    fn authentication_key(&self) -> AuthenticationKey;

    /// Signs a signing message and returns the account authenticator.
    ///
    /// # Errors
    ///
    /// May return an error if signing fails (e.g., insufficient keys for
    /// multi-signature accounts, or a malformed WebAuthn assertion).
    fn sign(&self, message: &[u8]) -> AptosResult<AccountAuthenticator>;

    /// Returns the public key bytes used for authentication-key derivation.
    fn public_key_bytes(&self) -> Vec<u8>;

    /// Returns the scheme identifier for this account type.
    fn signature_scheme(&self) -> u8;
}

/// An enum that can hold any account type.
///
/// This is useful when you need to store different account types
/// in the same collection or pass them around generically.
#[derive(Debug)]
pub enum AnyAccount {
    /// A legacy Ed25519 account.
    Ed25519(super::Ed25519Account),
    /// A single-key account (Ed25519 or Secp256k1).
    SingleKey(super::SingleKeyAccount),
    /// A Secp256r1 passkey account signing through WebAuthn.
    Secp256r1WebAuthn(super::Secp256r1WebAuthnAccount),
    /// A multi-Ed25519 account.
    MultiEd25519(super::MultiEd25519Account),
    /// A multi-key account (mixed signature types).
    MultiKey(super::MultiKeyAccount),
}

impl AnyAccount {
    fn inner(&self) -> &dyn Account {
        match self {
            AnyAccount::Ed25519(account) => account,
            AnyAccount::SingleKey(account) => account,
            AnyAccount::Secp256r1WebAuthn(account) => account,
            AnyAccount::MultiEd25519(account) => account,
            AnyAccount::MultiKey(account) => account,
        }
    }
}

impl Account for AnyAccount {
    fn address(&self) -> AccountAddress {
        self.inner().address()
    }

    fn authentication_key(&self) -> AuthenticationKey {
        self.inner().authentication_key()
    }

    fn sign(&self, message: &[u8]) -> AptosResult<AccountAuthenticator> {
        self.inner().sign(message)
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        self.inner().public_key_bytes()
    }

    fn signature_scheme(&self) -> u8 {
        self.inner().signature_scheme()
    }
}

impl From<super::Ed25519Account> for AnyAccount {
    fn from(account: super::Ed25519Account) -> Self {
        AnyAccount::Ed25519(account)
    }
}

impl From<super::SingleKeyAccount> for AnyAccount {
    fn from(account: super::SingleKeyAccount) -> Self {
        AnyAccount::SingleKey(account)
    }
}

impl From<super::Secp256r1WebAuthnAccount> for AnyAccount {
    fn from(account: super::Secp256r1WebAuthnAccount) -> Self {
        AnyAccount::Secp256r1WebAuthn(account)
    }
}

impl From<super::MultiEd25519Account> for AnyAccount {
    fn from(account: super::MultiEd25519Account) -> Self {
        AnyAccount::MultiEd25519(account)
    }
}

impl From<super::MultiKeyAccount> for AnyAccount {
    fn from(account: super::MultiKeyAccount) -> Self {
        AnyAccount::MultiKey(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{Ed25519Account, SingleKeyAccount};
    use crate::crypto::{Secp256k1PrivateKey, ED25519_SCHEME, SINGLE_KEY_SCHEME};

    #[test]
    fn test_any_account_delegates() {
        let ed = Ed25519Account::generate();
        let address = ed.address();
        let any: AnyAccount = ed.into();
        assert_eq!(any.address(), address);
        assert_eq!(any.signature_scheme(), ED25519_SCHEME);
        assert!(any.sign(b"msg").unwrap().verify(b"msg"));

        let k1 = SingleKeyAccount::from_secp256k1(Secp256k1PrivateKey::generate());
        let any: AnyAccount = k1.into();
        assert_eq!(any.signature_scheme(), SINGLE_KEY_SCHEME);
        assert_eq!(any.authentication_key().to_address(), any.address());
        assert!(any.sign(b"msg").unwrap().verify(b"msg"));
    }

    #[test]
    fn test_accounts_in_one_collection() {
        let accounts: Vec<AnyAccount> = vec![
            Ed25519Account::generate().into(),
            SingleKeyAccount::generate_ed25519().into(),
        ];
        let addresses: Vec<_> = accounts.iter().map(Account::address).collect();
        assert_ne!(addresses[0], addresses[1]);
    }
}
