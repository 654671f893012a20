//! Transaction authenticators.
//!
//! Authenticators come in two levels. An [`AccountAuthenticator`] proves
//! that one account approved a signing message. A
//! [`TransactionAuthenticator`] wraps the sender's proof and, for
//! multi-agent and fee-payer transactions, those of the other parties.

use crate::bcs::{BcsError, BcsResult, Decode, Deserializer, Encode, Serializer};
use crate::crypto::{
    AnyPublicKey, AnySignature, AuthenticationKey, Ed25519PublicKey, Ed25519Signature, MultiKey,
    MultiKeySignature, MultiEd25519PublicKey, MultiEd25519Signature, ED25519_SCHEME,
    MULTI_ED25519_SCHEME, MULTI_KEY_SCHEME, SINGLE_KEY_SCHEME,
};
use crate::types::AccountAddress;

/// An authenticator for a single account (not the full transaction).
///
/// Variant indices match Aptos core:
/// - 0: Ed25519
/// - 1: `MultiEd25519`
/// - 2: `SingleKey`
/// - 3: `MultiKey`
/// - 4: `NoAccountAuthenticator`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccountAuthenticator {
    /// Legacy Ed25519 authentication (variant 0).
    Ed25519 {
        /// The public key.
        public_key: Ed25519PublicKey,
        /// The signature.
        signature: Ed25519Signature,
    },
    /// Multi-Ed25519 authentication (variant 1).
    MultiEd25519 {
        /// The multi-Ed25519 public key.
        public_key: MultiEd25519PublicKey,
        /// The multi-Ed25519 signature.
        signature: MultiEd25519Signature,
    },
    /// Single-key authentication for any scheme (variant 2).
    SingleKey {
        /// The scheme-tagged public key.
        public_key: AnyPublicKey,
        /// The scheme-tagged signature.
        signature: AnySignature,
    },
    /// Multi-key authentication with mixed schemes (variant 3).
    MultiKey {
        /// The key set.
        public_key: MultiKey,
        /// Signatures of the signing subset.
        signature: MultiKeySignature,
    },
    /// Placeholder used when simulating without signatures (variant 4).
    /// Never verifies.
    NoAccountAuthenticator,
}

impl AccountAuthenticator {
    /// Creates an Ed25519 account authenticator.
    pub fn ed25519(public_key: Ed25519PublicKey, signature: Ed25519Signature) -> Self {
        Self::Ed25519 {
            public_key,
            signature,
        }
    }

    /// Creates a multi-Ed25519 account authenticator.
    pub fn multi_ed25519(
        public_key: MultiEd25519PublicKey,
        signature: MultiEd25519Signature,
    ) -> Self {
        Self::MultiEd25519 {
            public_key,
            signature,
        }
    }

    /// Creates a single-key account authenticator.
    pub fn single_key(public_key: AnyPublicKey, signature: AnySignature) -> Self {
        Self::SingleKey {
            public_key,
            signature,
        }
    }

    /// Creates a multi-key account authenticator.
    pub fn multi_key(public_key: MultiKey, signature: MultiKeySignature) -> Self {
        Self::MultiKey {
            public_key,
            signature,
        }
    }

    /// Returns the variant tag written on the wire.
    pub fn variant_index(&self) -> u32 {
        match self {
            Self::Ed25519 { .. } => 0,
            Self::MultiEd25519 { .. } => 1,
            Self::SingleKey { .. } => 2,
            Self::MultiKey { .. } => 3,
            Self::NoAccountAuthenticator => 4,
        }
    }

    /// Returns the authentication-key scheme byte, if this variant has one.
    pub fn scheme(&self) -> Option<u8> {
        match self {
            Self::Ed25519 { .. } => Some(ED25519_SCHEME),
            Self::MultiEd25519 { .. } => Some(MULTI_ED25519_SCHEME),
            Self::SingleKey { .. } => Some(SINGLE_KEY_SCHEME),
            Self::MultiKey { .. } => Some(MULTI_KEY_SCHEME),
            Self::NoAccountAuthenticator => None,
        }
    }

    /// Returns the authentication key of the signing account.
    pub fn authentication_key(&self) -> Option<AuthenticationKey> {
        match self {
            Self::Ed25519 { public_key, .. } => Some(public_key.authentication_key()),
            Self::MultiEd25519 { public_key, .. } => Some(public_key.authentication_key()),
            Self::SingleKey { public_key, .. } => Some(public_key.authentication_key()),
            Self::MultiKey { public_key, .. } => Some(public_key.authentication_key()),
            Self::NoAccountAuthenticator => None,
        }
    }

    /// Returns true if the authenticator's signature is valid for `message`.
    pub fn verify(&self, message: &[u8]) -> bool {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => public_key.verify(message, signature),
            Self::MultiEd25519 {
                public_key,
                signature,
            } => public_key.verify(message, signature),
            Self::SingleKey {
                public_key,
                signature,
            } => public_key.verify(message, signature),
            Self::MultiKey {
                public_key,
                signature,
            } => public_key.verify(message, signature),
            Self::NoAccountAuthenticator => false,
        }
    }
}

impl Encode for AccountAuthenticator {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_variant_index(self.variant_index());
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => {
                ser.write(public_key);
                ser.write(signature);
            }
            Self::MultiEd25519 {
                public_key,
                signature,
            } => {
                ser.write(public_key);
                ser.write(signature);
            }
            Self::SingleKey {
                public_key,
                signature,
            } => {
                ser.write(public_key);
                ser.write(signature);
            }
            Self::MultiKey {
                public_key,
                signature,
            } => {
                ser.write(public_key);
                ser.write(signature);
            }
            Self::NoAccountAuthenticator => {}
        }
    }
}

impl Decode for AccountAuthenticator {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        match de.read_variant_index() {
            0 => Ok(Self::Ed25519 {
                public_key: de.read()?,
                signature: de.read()?,
            }),
            1 => Ok(Self::MultiEd25519 {
                public_key: de.read()?,
                signature: de.read()?,
            }),
            2 => Ok(Self::SingleKey {
                public_key: de.read()?,
                signature: de.read()?,
            }),
            3 => Ok(Self::MultiKey {
                public_key: de.read()?,
                signature: de.read()?,
            }),
            4 => {
                de.check()?;
                Ok(Self::NoAccountAuthenticator)
            }
            tag => {
                de.check()?;
                Err(BcsError::InvalidVariant {
                    kind: "AccountAuthenticator",
                    tag,
                })
            }
        }
    }
}

/// An authenticator for a whole transaction.
///
/// Variant indices match Aptos core:
/// - 0: Ed25519
/// - 1: `MultiEd25519`
/// - 2: `MultiAgent`
/// - 3: `FeePayer`
/// - 4: `SingleSender`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionAuthenticator {
    /// Legacy Ed25519 sender (variant 0).
    Ed25519 {
        /// The public key.
        public_key: Ed25519PublicKey,
        /// The signature.
        signature: Ed25519Signature,
    },
    /// Legacy multi-Ed25519 sender (variant 1).
    MultiEd25519 {
        /// The multi-Ed25519 public key.
        public_key: MultiEd25519PublicKey,
        /// The multi-Ed25519 signature.
        signature: MultiEd25519Signature,
    },
    /// Multi-agent transaction (variant 2).
    MultiAgent {
        /// The sender's authenticator.
        sender: AccountAuthenticator,
        /// Secondary signer addresses.
        secondary_signer_addresses: Vec<AccountAddress>,
        /// Secondary signers' authenticators, in address order.
        secondary_signers: Vec<AccountAuthenticator>,
    },
    /// Fee payer transaction (variant 3).
    FeePayer {
        /// The sender's authenticator.
        sender: AccountAuthenticator,
        /// Secondary signer addresses.
        secondary_signer_addresses: Vec<AccountAddress>,
        /// Secondary signers' authenticators, in address order.
        secondary_signers: Vec<AccountAuthenticator>,
        /// The fee payer's address.
        fee_payer_address: AccountAddress,
        /// The fee payer's authenticator.
        fee_payer_signer: AccountAuthenticator,
    },
    /// Single sender with any account authenticator (variant 4).
    SingleSender {
        /// The account authenticator.
        sender: AccountAuthenticator,
    },
}

impl TransactionAuthenticator {
    /// Creates an Ed25519 authenticator.
    pub fn ed25519(public_key: Ed25519PublicKey, signature: Ed25519Signature) -> Self {
        Self::Ed25519 {
            public_key,
            signature,
        }
    }

    /// Creates a multi-Ed25519 authenticator.
    pub fn multi_ed25519(
        public_key: MultiEd25519PublicKey,
        signature: MultiEd25519Signature,
    ) -> Self {
        Self::MultiEd25519 {
            public_key,
            signature,
        }
    }

    /// Creates a multi-agent authenticator.
    pub fn multi_agent(
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
    ) -> Self {
        Self::MultiAgent {
            sender,
            secondary_signer_addresses,
            secondary_signers,
        }
    }

    /// Creates a fee payer authenticator.
    pub fn fee_payer(
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
        fee_payer_address: AccountAddress,
        fee_payer_signer: AccountAuthenticator,
    ) -> Self {
        Self::FeePayer {
            sender,
            secondary_signer_addresses,
            secondary_signers,
            fee_payer_address,
            fee_payer_signer,
        }
    }

    /// Creates a single sender authenticator.
    pub fn single_sender(sender: AccountAuthenticator) -> Self {
        Self::SingleSender { sender }
    }

    /// Wraps the sender's authenticator for a plain (single-signer)
    /// transaction.
    ///
    /// Ed25519 and multi-Ed25519 keep their legacy variants; every other
    /// scheme becomes `SingleSender`.
    pub fn from_account_authenticator(sender: AccountAuthenticator) -> Self {
        match sender {
            AccountAuthenticator::Ed25519 {
                public_key,
                signature,
            } => Self::Ed25519 {
                public_key,
                signature,
            },
            AccountAuthenticator::MultiEd25519 {
                public_key,
                signature,
            } => Self::MultiEd25519 {
                public_key,
                signature,
            },
            sender => Self::SingleSender { sender },
        }
    }

    /// Returns the variant tag written on the wire.
    pub fn variant_index(&self) -> u32 {
        match self {
            Self::Ed25519 { .. } => 0,
            Self::MultiEd25519 { .. } => 1,
            Self::MultiAgent { .. } => 2,
            Self::FeePayer { .. } => 3,
            Self::SingleSender { .. } => 4,
        }
    }

    /// Returns the sender's account authenticator.
    pub fn sender(&self) -> AccountAuthenticator {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => AccountAuthenticator::ed25519(*public_key, *signature),
            Self::MultiEd25519 {
                public_key,
                signature,
            } => AccountAuthenticator::multi_ed25519(public_key.clone(), signature.clone()),
            Self::MultiAgent { sender, .. }
            | Self::FeePayer { sender, .. }
            | Self::SingleSender { sender } => sender.clone(),
        }
    }

    /// Returns the secondary signer addresses, empty for single-signer
    /// variants.
    pub fn secondary_signer_addresses(&self) -> &[AccountAddress] {
        match self {
            Self::MultiAgent {
                secondary_signer_addresses,
                ..
            }
            | Self::FeePayer {
                secondary_signer_addresses,
                ..
            } => secondary_signer_addresses,
            _ => &[],
        }
    }

    /// Returns the fee payer's address for fee payer transactions.
    pub fn fee_payer_address(&self) -> Option<AccountAddress> {
        match self {
            Self::FeePayer {
                fee_payer_address, ..
            } => Some(*fee_payer_address),
            _ => None,
        }
    }

    /// Returns true if every contained account authenticator verifies
    /// `message`.
    ///
    /// `message` must be the signing message matching the variant: the raw
    /// transaction's for single-signer variants, the raw-with-data one for
    /// multi-agent and fee payer.
    pub fn verify(&self, message: &[u8]) -> bool {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => public_key.verify(message, signature),
            Self::MultiEd25519 {
                public_key,
                signature,
            } => public_key.verify(message, signature),
            Self::MultiAgent {
                sender,
                secondary_signer_addresses,
                secondary_signers,
            } => {
                secondary_signer_addresses.len() == secondary_signers.len()
                    && sender.verify(message)
                    && secondary_signers.iter().all(|s| s.verify(message))
            }
            Self::FeePayer {
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_signer,
                ..
            } => {
                secondary_signer_addresses.len() == secondary_signers.len()
                    && sender.verify(message)
                    && secondary_signers.iter().all(|s| s.verify(message))
                    && fee_payer_signer.verify(message)
            }
            Self::SingleSender { sender } => sender.verify(message),
        }
    }
}

impl Encode for TransactionAuthenticator {
    fn encode(&self, ser: &mut Serializer) {
        ser.write_variant_index(self.variant_index());
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => {
                ser.write(public_key);
                ser.write(signature);
            }
            Self::MultiEd25519 {
                public_key,
                signature,
            } => {
                ser.write(public_key);
                ser.write(signature);
            }
            Self::MultiAgent {
                sender,
                secondary_signer_addresses,
                secondary_signers,
            } => {
                ser.write(sender);
                ser.write_sequence(secondary_signer_addresses);
                ser.write_sequence(secondary_signers);
            }
            Self::FeePayer {
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_address,
                fee_payer_signer,
            } => {
                ser.write(sender);
                ser.write_sequence(secondary_signer_addresses);
                ser.write_sequence(secondary_signers);
                ser.write(fee_payer_address);
                ser.write(fee_payer_signer);
            }
            Self::SingleSender { sender } => ser.write(sender),
        }
    }
}

impl Decode for TransactionAuthenticator {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        match de.read_variant_index() {
            0 => Ok(Self::Ed25519 {
                public_key: de.read()?,
                signature: de.read()?,
            }),
            1 => Ok(Self::MultiEd25519 {
                public_key: de.read()?,
                signature: de.read()?,
            }),
            2 => Ok(Self::MultiAgent {
                sender: de.read()?,
                secondary_signer_addresses: de.read_sequence()?,
                secondary_signers: de.read_sequence()?,
            }),
            3 => Ok(Self::FeePayer {
                sender: de.read()?,
                secondary_signer_addresses: de.read_sequence()?,
                secondary_signers: de.read_sequence()?,
                fee_payer_address: de.read()?,
                fee_payer_signer: de.read()?,
            }),
            4 => Ok(Self::SingleSender { sender: de.read()? }),
            tag => {
                de.check()?;
                Err(BcsError::InvalidVariant {
                    kind: "TransactionAuthenticator",
                    tag,
                })
            }
        }
    }
}
