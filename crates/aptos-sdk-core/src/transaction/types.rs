//! Transaction types.

use crate::bcs::{self, BcsError, BcsResult, Decode, Deserializer, Encode, Serializer};
use crate::crypto::{raw_transaction_prehash, raw_transaction_with_data_prehash, transaction_prehash};
use crate::error::AptosResult;
use crate::transaction::authenticator::{AccountAuthenticator, TransactionAuthenticator};
use crate::transaction::payload::TransactionPayload;
use crate::types::{AccountAddress, ChainId, HashValue};

/// Upper bound on secondary signers accepted when decoding.
pub const MAX_SECONDARY_SIGNERS: usize = 255;

/// Discriminant of a user transaction inside the `Transaction` enum whose
/// hash identifies a submitted transaction.
const USER_TRANSACTION_VARIANT: u8 = 0;

fn prefixed(prehash: &[u8; 32], body: Vec<u8>) -> Vec<u8> {
    let mut message = Vec::with_capacity(prehash.len() + body.len());
    message.extend_from_slice(prehash);
    message.extend_from_slice(&body);
    message
}

/// The raw transaction that a client signs.
///
/// A `RawTransaction` contains all the details of a transaction before
/// it is signed, including the sender, payload, gas parameters, and
/// expiration time. Fields are encoded in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawTransaction {
    /// Sender's address.
    pub sender: AccountAddress,
    /// Sequence number of this transaction.
    pub sequence_number: u64,
    /// The transaction payload (entry function, script, multisig).
    pub payload: TransactionPayload,
    /// Maximum gas units the sender is willing to pay.
    pub max_gas_amount: u64,
    /// Price per gas unit in octas.
    pub gas_unit_price: u64,
    /// Expiration time in seconds since Unix epoch.
    pub expiration_timestamp_secs: u64,
    /// Chain ID to prevent cross-chain replay.
    pub chain_id: ChainId,
}

impl RawTransaction {
    /// Creates a new raw transaction.
    pub fn new(
        sender: AccountAddress,
        sequence_number: u64,
        payload: TransactionPayload,
        max_gas_amount: u64,
        gas_unit_price: u64,
        expiration_timestamp_secs: u64,
        chain_id: ChainId,
    ) -> Self {
        Self {
            sender,
            sequence_number,
            payload,
            max_gas_amount,
            gas_unit_price,
            expiration_timestamp_secs,
            chain_id,
        }
    }

    /// Returns the message a single sender signs:
    /// `SHA3-256("APTOS::RawTransaction") || BCS(self)`.
    ///
    /// # Errors
    ///
    /// Returns an error if BCS serialization of the transaction fails.
    pub fn signing_message(&self) -> AptosResult<Vec<u8>> {
        Ok(prefixed(raw_transaction_prehash(), self.to_bcs()?))
    }

    /// Serializes this transaction to BCS bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if BCS serialization fails.
    pub fn to_bcs(&self) -> AptosResult<Vec<u8>> {
        Ok(bcs::to_bytes(self)?)
    }
}

impl Encode for RawTransaction {
    fn encode(&self, ser: &mut Serializer) {
        ser.write(&self.sender);
        ser.write_u64(self.sequence_number);
        ser.write(&self.payload);
        ser.write_u64(self.max_gas_amount);
        ser.write_u64(self.gas_unit_price);
        ser.write_u64(self.expiration_timestamp_secs);
        ser.write(&self.chain_id);
    }
}

impl Decode for RawTransaction {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        let sender = de.read()?;
        let sequence_number = de.read_u64();
        let payload = de.read()?;
        let max_gas_amount = de.read_u64();
        let gas_unit_price = de.read_u64();
        let expiration_timestamp_secs = de.read_u64();
        let chain_id = de.read()?;
        Ok(Self {
            sender,
            sequence_number,
            payload,
            max_gas_amount,
            gas_unit_price,
            expiration_timestamp_secs,
            chain_id,
        })
    }
}

/// A raw transaction together with the other parties that sign it.
///
/// This is only ever signed, never submitted: the signed form carries the
/// inner [`RawTransaction`] and moves the extra data into the authenticator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawTransactionWithData {
    /// Variant 0: sender plus secondary signers.
    MultiAgent {
        /// The raw transaction.
        raw_txn: RawTransaction,
        /// Secondary signer addresses.
        secondary_signer_addresses: Vec<AccountAddress>,
    },
    /// Variant 1: sender, secondary signers and a fee payer.
    MultiAgentWithFeePayer {
        /// The raw transaction.
        raw_txn: RawTransaction,
        /// Secondary signer addresses.
        secondary_signer_addresses: Vec<AccountAddress>,
        /// The fee payer's address, zero while unresolved.
        fee_payer_address: AccountAddress,
    },
}

impl RawTransactionWithData {
    /// Returns the inner raw transaction.
    pub fn raw_txn(&self) -> &RawTransaction {
        match self {
            Self::MultiAgent { raw_txn, .. } | Self::MultiAgentWithFeePayer { raw_txn, .. } => {
                raw_txn
            }
        }
    }

    /// Returns the secondary signer addresses.
    pub fn secondary_signer_addresses(&self) -> &[AccountAddress] {
        match self {
            Self::MultiAgent {
                secondary_signer_addresses,
                ..
            }
            | Self::MultiAgentWithFeePayer {
                secondary_signer_addresses,
                ..
            } => secondary_signer_addresses,
        }
    }

    /// Returns the message every party signs:
    /// `SHA3-256("APTOS::RawTransactionWithData") || BCS(self)`.
    ///
    /// # Errors
    ///
    /// Returns an error if BCS serialization fails.
    pub fn signing_message(&self) -> AptosResult<Vec<u8>> {
        Ok(prefixed(
            raw_transaction_with_data_prehash(),
            bcs::to_bytes(self)?,
        ))
    }
}

impl Encode for RawTransactionWithData {
    fn encode(&self, ser: &mut Serializer) {
        match self {
            Self::MultiAgent {
                raw_txn,
                secondary_signer_addresses,
            } => {
                ser.write_variant_index(0);
                ser.write(raw_txn);
                ser.write_sequence(secondary_signer_addresses);
            }
            Self::MultiAgentWithFeePayer {
                raw_txn,
                secondary_signer_addresses,
                fee_payer_address,
            } => {
                ser.write_variant_index(1);
                ser.write(raw_txn);
                ser.write_sequence(secondary_signer_addresses);
                ser.write(fee_payer_address);
            }
        }
    }
}

impl Decode for RawTransactionWithData {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        match de.read_variant_index() {
            0 => Ok(Self::MultiAgent {
                raw_txn: de.read()?,
                secondary_signer_addresses: de.read_bounded_sequence(
                    "secondary signers",
                    0,
                    MAX_SECONDARY_SIGNERS,
                )?,
            }),
            1 => Ok(Self::MultiAgentWithFeePayer {
                raw_txn: de.read()?,
                secondary_signer_addresses: de.read_bounded_sequence(
                    "secondary signers",
                    0,
                    MAX_SECONDARY_SIGNERS,
                )?,
                fee_payer_address: de.read()?,
            }),
            tag => {
                de.check()?;
                Err(BcsError::InvalidVariant {
                    kind: "RawTransactionWithData",
                    tag,
                })
            }
        }
    }
}

/// Multi-agent transaction with additional signers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiAgentRawTransaction {
    /// The raw transaction.
    pub raw_txn: RawTransaction,
    /// Secondary signer addresses.
    pub secondary_signer_addresses: Vec<AccountAddress>,
}

impl MultiAgentRawTransaction {
    /// Creates a new multi-agent transaction.
    pub fn new(raw_txn: RawTransaction, secondary_signer_addresses: Vec<AccountAddress>) -> Self {
        Self {
            raw_txn,
            secondary_signer_addresses,
        }
    }

    /// Generates the signing message for multi-agent transactions.
    ///
    /// # Errors
    ///
    /// Returns an error if BCS serialization fails.
    pub fn signing_message(&self) -> AptosResult<Vec<u8>> {
        RawTransactionWithData::from(self.clone()).signing_message()
    }
}

impl From<MultiAgentRawTransaction> for RawTransactionWithData {
    fn from(txn: MultiAgentRawTransaction) -> Self {
        Self::MultiAgent {
            raw_txn: txn.raw_txn,
            secondary_signer_addresses: txn.secondary_signer_addresses,
        }
    }
}

/// Fee payer transaction where a third party pays gas fees.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeePayerRawTransaction {
    /// The raw transaction.
    pub raw_txn: RawTransaction,
    /// Secondary signer addresses (for multi-agent).
    pub secondary_signer_addresses: Vec<AccountAddress>,
    /// The fee payer's address, [`AccountAddress::ZERO`] while unknown.
    pub fee_payer_address: AccountAddress,
}

impl FeePayerRawTransaction {
    /// Creates a new fee payer transaction.
    pub fn new(
        raw_txn: RawTransaction,
        secondary_signer_addresses: Vec<AccountAddress>,
        fee_payer_address: AccountAddress,
    ) -> Self {
        Self {
            raw_txn,
            secondary_signer_addresses,
            fee_payer_address,
        }
    }

    /// Creates a fee payer transaction without secondary signers.
    pub fn new_simple(raw_txn: RawTransaction, fee_payer_address: AccountAddress) -> Self {
        Self::new(raw_txn, vec![], fee_payer_address)
    }

    /// Creates a fee payer transaction whose fee payer is not yet known.
    pub fn with_unresolved_fee_payer(
        raw_txn: RawTransaction,
        secondary_signer_addresses: Vec<AccountAddress>,
    ) -> Self {
        Self::new(raw_txn, secondary_signer_addresses, AccountAddress::ZERO)
    }

    /// Returns true if the fee payer address is still the zero placeholder.
    pub fn is_fee_payer_unresolved(&self) -> bool {
        self.fee_payer_address == AccountAddress::ZERO
    }

    /// Generates the signing message for fee payer transactions.
    ///
    /// # Errors
    ///
    /// Returns an error if BCS serialization fails.
    pub fn signing_message(&self) -> AptosResult<Vec<u8>> {
        RawTransactionWithData::from(self.clone()).signing_message()
    }
}

impl From<FeePayerRawTransaction> for RawTransactionWithData {
    fn from(txn: FeePayerRawTransaction) -> Self {
        Self::MultiAgentWithFeePayer {
            raw_txn: txn.raw_txn,
            secondary_signer_addresses: txn.secondary_signer_addresses,
            fee_payer_address: txn.fee_payer_address,
        }
    }
}

/// A signed transaction ready for submission.
///
/// The BCS form is the inner [`RawTransaction`] followed by the
/// authenticator, also for multi-agent and fee payer transactions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    /// The raw transaction.
    pub raw_txn: RawTransaction,
    /// The authenticator (signature(s) and public key(s)).
    pub authenticator: TransactionAuthenticator,
}

impl SignedTransaction {
    /// Creates a new signed transaction.
    pub fn new(raw_txn: RawTransaction, authenticator: TransactionAuthenticator) -> Self {
        Self {
            raw_txn,
            authenticator,
        }
    }

    /// Returns the raw transaction.
    pub fn raw_txn(&self) -> &RawTransaction {
        &self.raw_txn
    }

    /// Returns the authenticator.
    pub fn authenticator(&self) -> &TransactionAuthenticator {
        &self.authenticator
    }

    /// Returns the sender address.
    pub fn sender(&self) -> AccountAddress {
        self.raw_txn.sender
    }

    /// Returns the sequence number.
    pub fn sequence_number(&self) -> u64 {
        self.raw_txn.sequence_number
    }

    /// Serializes this signed transaction to BCS bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if BCS serialization fails.
    pub fn to_bcs(&self) -> AptosResult<Vec<u8>> {
        Ok(bcs::to_bytes(self)?)
    }

    /// Decodes a signed transaction from BCS bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not exactly one signed transaction.
    pub fn from_bcs(bytes: &[u8]) -> AptosResult<Self> {
        Ok(bcs::from_bytes(bytes)?)
    }

    /// Computes the transaction hash:
    /// `SHA3-256(SHA3-256("APTOS::Transaction") || 0x00 || BCS(self))`.
    ///
    /// # Errors
    ///
    /// Returns an error if BCS serialization of the transaction fails.
    pub fn hash(&self) -> AptosResult<HashValue> {
        let bcs_bytes = self.to_bcs()?;
        Ok(HashValue::sha3_256_of([
            transaction_prehash().as_slice(),
            &[USER_TRANSACTION_VARIANT][..],
            bcs_bytes.as_slice(),
        ]))
    }

    /// Rebuilds the message the authenticator's signers signed.
    ///
    /// `fee_payer_address` overrides the fee payer recorded in the
    /// authenticator, so that signatures made before the fee payer was known
    /// can be checked against the zero placeholder.
    fn signing_message_with(
        &self,
        fee_payer_address: Option<AccountAddress>,
    ) -> AptosResult<Vec<u8>> {
        match &self.authenticator {
            TransactionAuthenticator::Ed25519 { .. }
            | TransactionAuthenticator::MultiEd25519 { .. }
            | TransactionAuthenticator::SingleSender { .. } => self.raw_txn.signing_message(),
            TransactionAuthenticator::MultiAgent {
                secondary_signer_addresses,
                ..
            } => RawTransactionWithData::MultiAgent {
                raw_txn: self.raw_txn.clone(),
                secondary_signer_addresses: secondary_signer_addresses.clone(),
            }
            .signing_message(),
            TransactionAuthenticator::FeePayer {
                secondary_signer_addresses,
                fee_payer_address: recorded,
                ..
            } => RawTransactionWithData::MultiAgentWithFeePayer {
                raw_txn: self.raw_txn.clone(),
                secondary_signer_addresses: secondary_signer_addresses.clone(),
                fee_payer_address: fee_payer_address.unwrap_or(*recorded),
            }
            .signing_message(),
        }
    }

    /// Returns the message the signers signed.
    ///
    /// # Errors
    ///
    /// Returns an error if BCS serialization fails.
    pub fn signing_message(&self) -> AptosResult<Vec<u8>> {
        self.signing_message_with(None)
    }

    /// Returns true if every signature in the authenticator is valid.
    ///
    /// For fee payer transactions the sender and secondary signers may have
    /// signed while the fee payer was still the zero placeholder, so each of
    /// their signatures is accepted over either message. The fee payer's own
    /// signature must cover its real address.
    pub fn verify(&self) -> bool {
        let Ok(message) = self.signing_message() else {
            return false;
        };
        let valid = match &self.authenticator {
            TransactionAuthenticator::FeePayer {
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_signer,
                ..
            } => {
                let Ok(placeholder_message) =
                    self.signing_message_with(Some(AccountAddress::ZERO))
                else {
                    return false;
                };
                let signed = |signer: &AccountAuthenticator| {
                    signer.verify(&message) || signer.verify(&placeholder_message)
                };
                secondary_signer_addresses.len() == secondary_signers.len()
                    && signed(sender)
                    && secondary_signers.iter().all(signed)
                    && fee_payer_signer.verify(&message)
            }
            authenticator => authenticator.verify(&message),
        };
        if !valid {
            tracing::debug!(
                sender = %self.raw_txn.sender,
                authenticator = self.authenticator.variant_index(),
                "transaction signature rejected"
            );
        }
        valid
    }
}

impl Encode for SignedTransaction {
    fn encode(&self, ser: &mut Serializer) {
        ser.write(&self.raw_txn);
        ser.write(&self.authenticator);
    }
}

impl Decode for SignedTransaction {
    fn decode(de: &mut Deserializer<'_>) -> BcsResult<Self> {
        Ok(Self {
            raw_txn: de.read()?,
            authenticator: de.read()?,
        })
    }
}
