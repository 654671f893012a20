//! Multi-Ed25519 account implementation.
//!
//! A [`MultiEd25519Account`] holds the full M-of-N public key set and
//! whichever of the private keys the caller owns. It can sign alone once it
//! owns at least M keys; otherwise it contributes individual signatures that
//! are later combined with [`MultiEd25519Account::aggregate_signatures`].

use crate::account::account::Account;
use crate::crypto::{
    AuthenticationKey, Ed25519PrivateKey, Ed25519PublicKey, Ed25519Signature,
    MultiEd25519PublicKey, MultiEd25519Signature, MULTI_ED25519_SCHEME,
};
use crate::error::{AptosError, AptosResult};
use crate::transaction::AccountAuthenticator;
use crate::types::AccountAddress;
use std::fmt;

/// A multi-Ed25519 account supporting M-of-N threshold signatures.
///
/// # Example
///
/// ```rust
/// use aptos_sdk_core::account::{Account, MultiEd25519Account};
/// use aptos_sdk_core::crypto::Ed25519PrivateKey;
///
/// let keys: Vec<_> = (0..3).map(|_| Ed25519PrivateKey::generate()).collect();
/// let account = MultiEd25519Account::new(keys, 2).unwrap();
/// assert!(account.sign(b"hello").unwrap().verify(b"hello"));
/// ```
pub struct MultiEd25519Account {
    /// Owned private keys with their positions in the key set, ascending.
    private_keys: Vec<(u8, Ed25519PrivateKey)>,
    public_key: MultiEd25519PublicKey,
    address: AccountAddress,
}

impl MultiEd25519Account {
    /// Creates an account that owns every key of the set.
    ///
    /// # Errors
    ///
    /// Returns an error if the key set or threshold is invalid.
    pub fn new(private_keys: Vec<Ed25519PrivateKey>, threshold: u8) -> AptosResult<Self> {
        let public_keys = private_keys
            .iter()
            .map(Ed25519PrivateKey::public_key)
            .collect();
        let public_key = MultiEd25519PublicKey::new(public_keys, threshold)?;
        // Positions fit in u8: the key set was bounded by the constructor above.
        #[allow(clippy::cast_possible_truncation)]
        let private_keys = private_keys
            .into_iter()
            .enumerate()
            .map(|(i, key)| (i as u8, key))
            .collect();
        Ok(Self::assemble(private_keys, public_key))
    }

    /// Creates an account from the full public key set and the subset of
    /// private keys the caller owns, given with their positions.
    ///
    /// # Errors
    ///
    /// Returns an error if the key set is invalid, a position is out of
    /// range or repeated, or a private key does not match the public key at
    /// its position.
    pub fn from_keys(
        public_keys: Vec<Ed25519PublicKey>,
        mut private_keys: Vec<(u8, Ed25519PrivateKey)>,
        threshold: u8,
    ) -> AptosResult<Self> {
        let public_key = MultiEd25519PublicKey::new(public_keys, threshold)?;
        private_keys.sort_by_key(|(index, _)| *index);
        for (i, (index, key)) in private_keys.iter().enumerate() {
            if i > 0 && private_keys[i - 1].0 == *index {
                return Err(AptosError::InvalidPrivateKey(format!(
                    "duplicate private key at index {index}"
                )));
            }
            match public_key.public_keys().get(usize::from(*index)) {
                None => {
                    return Err(AptosError::InvalidPrivateKey(format!(
                        "private key index {index} out of bounds"
                    )))
                }
                Some(expected) if *expected != key.public_key() => {
                    return Err(AptosError::InvalidPrivateKey(format!(
                        "private key at index {index} does not match the public key"
                    )))
                }
                Some(_) => {}
            }
        }
        Ok(Self::assemble(private_keys, public_key))
    }

    /// Creates an account without any private keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the key set or threshold is invalid.
    pub fn view_only(public_keys: Vec<Ed25519PublicKey>, threshold: u8) -> AptosResult<Self> {
        Self::from_keys(public_keys, Vec::new(), threshold)
    }

    fn assemble(
        private_keys: Vec<(u8, Ed25519PrivateKey)>,
        public_key: MultiEd25519PublicKey,
    ) -> Self {
        let address = public_key.to_address();
        Self {
            private_keys,
            public_key,
            address,
        }
    }

    /// Returns the account address.
    pub fn address(&self) -> AccountAddress {
        self.address
    }

    /// Returns the multi-Ed25519 public key.
    pub fn public_key(&self) -> &MultiEd25519PublicKey {
        &self.public_key
    }

    /// Returns the number of keys in the set.
    pub fn num_keys(&self) -> usize {
        self.public_key.num_keys()
    }

    /// Returns the signature threshold.
    pub fn threshold(&self) -> u8 {
        self.public_key.threshold()
    }

    /// Returns the number of private keys owned.
    pub fn num_owned_keys(&self) -> usize {
        self.private_keys.len()
    }

    /// Returns true if enough keys are owned to meet the threshold alone.
    pub fn can_sign(&self) -> bool {
        self.private_keys.len() >= usize::from(self.threshold())
    }

    /// Returns the positions of the owned private keys.
    pub fn owned_key_indices(&self) -> Vec<u8> {
        self.private_keys.iter().map(|(index, _)| *index).collect()
    }

    /// Signs with the first `threshold` owned keys.
    ///
    /// # Errors
    ///
    /// Returns [`AptosError::InsufficientSignatures`] if fewer keys than
    /// the threshold are owned.
    pub fn sign_message(&self, message: &[u8]) -> AptosResult<MultiEd25519Signature> {
        let threshold = usize::from(self.threshold());
        if self.private_keys.len() < threshold {
            return Err(AptosError::InsufficientSignatures {
                required: threshold,
                provided: self.private_keys.len(),
            });
        }
        MultiEd25519Signature::new(
            self.private_keys[..threshold]
                .iter()
                .map(|(index, key)| (*index, key.sign(message)))
                .collect(),
        )
    }

    /// Signs with the owned keys at the given positions.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer positions than the threshold are given or a
    /// position is not owned.
    pub fn sign_with_indices(
        &self,
        message: &[u8],
        indices: &[u8],
    ) -> AptosResult<MultiEd25519Signature> {
        let threshold = usize::from(self.threshold());
        if indices.len() < threshold {
            return Err(AptosError::InsufficientSignatures {
                required: threshold,
                provided: indices.len(),
            });
        }
        let signatures = indices
            .iter()
            .map(|&index| self.create_signature_contribution(message, index))
            .collect::<AptosResult<Vec<_>>>()?;
        MultiEd25519Signature::new(signatures)
    }

    /// Signs with the owned key at `key_index`, for multi-party flows.
    ///
    /// # Errors
    ///
    /// Returns an error if the key at `key_index` is not owned.
    pub fn create_signature_contribution(
        &self,
        message: &[u8],
        key_index: u8,
    ) -> AptosResult<(u8, Ed25519Signature)> {
        self.private_keys
            .iter()
            .find(|(index, _)| *index == key_index)
            .map(|(index, key)| (*index, key.sign(message)))
            .ok_or_else(|| {
                AptosError::InvalidPrivateKey(format!("no private key at index {key_index}"))
            })
    }

    /// Combines contributions from several parties into one signature.
    ///
    /// # Errors
    ///
    /// Returns an error if positions are out of range or repeated.
    pub fn aggregate_signatures(
        signatures: Vec<(u8, Ed25519Signature)>,
    ) -> AptosResult<MultiEd25519Signature> {
        MultiEd25519Signature::new(signatures)
    }

    /// Returns true if `signature` is a valid threshold signature of `message`.
    pub fn verify(&self, message: &[u8], signature: &MultiEd25519Signature) -> bool {
        self.public_key.verify(message, signature)
    }
}

impl Account for MultiEd25519Account {
    fn address(&self) -> AccountAddress {
        self.address
    }

    fn authentication_key(&self) -> AuthenticationKey {
        self.public_key.authentication_key()
    }

    fn sign(&self, message: &[u8]) -> AptosResult<AccountAuthenticator> {
        let signature = self.sign_message(message)?;
        Ok(AccountAuthenticator::multi_ed25519(
            self.public_key.clone(),
            signature,
        ))
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        self.public_key.to_bytes()
    }

    fn signature_scheme(&self) -> u8 {
        MULTI_ED25519_SCHEME
    }
}

impl fmt::Debug for MultiEd25519Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiEd25519Account")
            .field("address", &self.address)
            .field(
                "keys",
                &format!(
                    "{}-of-{} (own {:?})",
                    self.threshold(),
                    self.num_keys(),
                    self.owned_key_indices()
                ),
            )
            .finish_non_exhaustive()
    }
}
