//! Transaction builder.

use crate::account::Account;
use crate::config::TransactionConfig;
use crate::error::{AptosError, AptosResult};
use crate::transaction::authenticator::{AccountAuthenticator, TransactionAuthenticator};
use crate::transaction::payload::TransactionPayload;
use crate::transaction::types::{
    FeePayerRawTransaction, MultiAgentRawTransaction, RawTransaction, SignedTransaction,
};
use crate::types::{AccountAddress, ChainId};
use std::time::{SystemTime, UNIX_EPOCH};

/// Default maximum gas amount.
pub const DEFAULT_MAX_GAS_AMOUNT: u64 = 200_000;
/// Default gas unit price in octas.
pub const DEFAULT_GAS_UNIT_PRICE: u64 = 100;
/// Default transaction expiration time in seconds.
pub const DEFAULT_EXPIRATION_SECONDS: u64 = 600; // 10 minutes

pub(crate) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// A builder for constructing transactions.
///
/// # Example
///
/// ```rust
/// use aptos_sdk_core::transaction::{EntryFunction, TransactionBuilder};
/// use aptos_sdk_core::types::{AccountAddress, ChainId};
///
/// let payload = EntryFunction::apt_transfer(
///     AccountAddress::from_hex("0x123").unwrap(),
///     1000,
/// ).unwrap();
///
/// let txn = TransactionBuilder::new()
///     .sender(AccountAddress::ONE)
///     .sequence_number(0)
///     .payload(payload.into())
///     .chain_id(ChainId::testnet())
///     .build()
///     .unwrap();
/// assert_eq!(txn.max_gas_amount, 200_000);
/// ```
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    sender: Option<AccountAddress>,
    sequence_number: Option<u64>,
    payload: Option<TransactionPayload>,
    max_gas_amount: u64,
    gas_unit_price: u64,
    expiration_timestamp_secs: Option<u64>,
    expiration_secs: u64,
    chain_id: Option<ChainId>,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionBuilder {
    /// Creates a new transaction builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sender: None,
            sequence_number: None,
            payload: None,
            max_gas_amount: DEFAULT_MAX_GAS_AMOUNT,
            gas_unit_price: DEFAULT_GAS_UNIT_PRICE,
            expiration_timestamp_secs: None,
            expiration_secs: DEFAULT_EXPIRATION_SECONDS,
            chain_id: None,
        }
    }

    /// Creates a builder whose chain id, gas settings and expiration window
    /// come from `config`.
    #[must_use]
    pub fn from_config(config: &TransactionConfig) -> Self {
        Self {
            max_gas_amount: config.max_gas_amount,
            gas_unit_price: config.gas_unit_price,
            expiration_secs: config.expiration_secs,
            chain_id: Some(config.chain_id),
            ..Self::new()
        }
    }

    /// Sets the sender address.
    #[must_use]
    pub fn sender(mut self, sender: AccountAddress) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Sets the sequence number.
    #[must_use]
    pub fn sequence_number(mut self, sequence_number: u64) -> Self {
        self.sequence_number = Some(sequence_number);
        self
    }

    /// Sets the transaction payload.
    #[must_use]
    pub fn payload(mut self, payload: TransactionPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Sets the maximum gas amount.
    #[must_use]
    pub fn max_gas_amount(mut self, max_gas_amount: u64) -> Self {
        self.max_gas_amount = max_gas_amount;
        self
    }

    /// Sets the gas unit price in octas.
    #[must_use]
    pub fn gas_unit_price(mut self, gas_unit_price: u64) -> Self {
        self.gas_unit_price = gas_unit_price;
        self
    }

    /// Sets the expiration timestamp in seconds since Unix epoch.
    #[must_use]
    pub fn expiration_timestamp_secs(mut self, expiration_timestamp_secs: u64) -> Self {
        self.expiration_timestamp_secs = Some(expiration_timestamp_secs);
        self
    }

    /// Sets the expiration time relative to now.
    ///
    /// Uses saturating arithmetic to handle edge cases like system time going backwards.
    #[must_use]
    pub fn expiration_from_now(mut self, seconds: u64) -> Self {
        self.expiration_timestamp_secs = Some(now_secs().saturating_add(seconds));
        self
    }

    /// Sets the chain ID.
    #[must_use]
    pub fn chain_id(mut self, chain_id: ChainId) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Builds the raw transaction.
    ///
    /// Without an explicit expiration, the transaction expires the configured
    /// number of seconds (600 by default) after now.
    ///
    /// # Errors
    ///
    /// Returns an error if any required field is missing:
    /// - `sender` is required
    /// - `sequence_number` is required
    /// - `payload` is required
    /// - `chain_id` is required
    pub fn build(self) -> AptosResult<RawTransaction> {
        let sender = self
            .sender
            .ok_or_else(|| AptosError::transaction("sender is required"))?;
        let sequence_number = self
            .sequence_number
            .ok_or_else(|| AptosError::transaction("sequence_number is required"))?;
        let payload = self
            .payload
            .ok_or_else(|| AptosError::transaction("payload is required"))?;
        let chain_id = self
            .chain_id
            .ok_or_else(|| AptosError::transaction("chain_id is required"))?;

        let expiration_timestamp_secs = self
            .expiration_timestamp_secs
            .unwrap_or_else(|| now_secs().saturating_add(self.expiration_secs));

        tracing::debug!(
            %sender,
            sequence_number,
            payload = payload.variant_index(),
            %chain_id,
            "built raw transaction"
        );

        Ok(RawTransaction::new(
            sender,
            sequence_number,
            payload,
            self.max_gas_amount,
            self.gas_unit_price,
            expiration_timestamp_secs,
            chain_id,
        ))
    }

    /// Builds and signs the transaction with the given account.
    ///
    /// The sender defaults to the account's address.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be built or signed.
    pub fn build_and_sign<A: Account + ?Sized>(self, account: &A) -> AptosResult<SignedTransaction> {
        let sender = self.sender.unwrap_or_else(|| account.address());
        let raw_txn = Self {
            sender: Some(sender),
            ..self
        }
        .build()?;

        sign_transaction(&raw_txn, account)
    }
}

fn sign_all(signers: &[&dyn Account], message: &[u8]) -> AptosResult<Vec<AccountAuthenticator>> {
    signers.iter().map(|signer| signer.sign(message)).collect()
}

/// Signs a raw transaction with the given account.
///
/// # Errors
///
/// Returns an error if generating the signing message fails or if the account fails to sign.
pub fn sign_transaction<A: Account + ?Sized>(
    raw_txn: &RawTransaction,
    account: &A,
) -> AptosResult<SignedTransaction> {
    let signing_message = raw_txn.signing_message()?;
    let sender_auth = account.sign(&signing_message)?;
    tracing::debug!(
        sender = %raw_txn.sender,
        scheme = account.signature_scheme(),
        "signed transaction"
    );

    Ok(SignedTransaction::new(
        raw_txn.clone(),
        TransactionAuthenticator::from_account_authenticator(sender_auth),
    ))
}

/// Signs a multi-agent transaction.
///
/// Secondary signers must be given in the same order as
/// `secondary_signer_addresses`.
///
/// # Errors
///
/// Returns an error if the number of secondary signers does not match the
/// number of secondary addresses, if generating the signing message fails,
/// or if any signer fails to sign.
pub fn sign_multi_agent_transaction<A: Account + ?Sized>(
    multi_agent: &MultiAgentRawTransaction,
    sender: &A,
    secondary_signers: &[&dyn Account],
) -> AptosResult<SignedTransaction> {
    check_signer_count(
        multi_agent.secondary_signer_addresses.len(),
        secondary_signers.len(),
    )?;
    let signing_message = multi_agent.signing_message()?;

    let sender_auth = sender.sign(&signing_message)?;
    let secondary_auths = sign_all(secondary_signers, &signing_message)?;
    tracing::debug!(
        sender = %multi_agent.raw_txn.sender,
        secondary_signers = secondary_auths.len(),
        "signed multi-agent transaction"
    );

    let authenticator = TransactionAuthenticator::multi_agent(
        sender_auth,
        multi_agent.secondary_signer_addresses.clone(),
        secondary_auths,
    );

    Ok(SignedTransaction::new(
        multi_agent.raw_txn.clone(),
        authenticator,
    ))
}

/// Signs a fee payer transaction.
///
/// # Errors
///
/// Returns an error if the number of secondary signers does not match the
/// number of secondary addresses, if generating the signing message fails,
/// or if any signer fails to sign.
pub fn sign_fee_payer_transaction<A: Account + ?Sized>(
    fee_payer_txn: &FeePayerRawTransaction,
    sender: &A,
    secondary_signers: &[&dyn Account],
    fee_payer: &dyn Account,
) -> AptosResult<SignedTransaction> {
    check_signer_count(
        fee_payer_txn.secondary_signer_addresses.len(),
        secondary_signers.len(),
    )?;
    let signing_message = fee_payer_txn.signing_message()?;

    let sender_auth = sender.sign(&signing_message)?;
    let secondary_auths = sign_all(secondary_signers, &signing_message)?;
    let fee_payer_auth = fee_payer.sign(&signing_message)?;
    tracing::debug!(
        sender = %fee_payer_txn.raw_txn.sender,
        fee_payer = %fee_payer_txn.fee_payer_address,
        secondary_signers = secondary_auths.len(),
        "signed fee payer transaction"
    );

    let authenticator = TransactionAuthenticator::fee_payer(
        sender_auth,
        fee_payer_txn.secondary_signer_addresses.clone(),
        secondary_auths,
        fee_payer_txn.fee_payer_address,
        fee_payer_auth,
    );

    Ok(SignedTransaction::new(
        fee_payer_txn.raw_txn.clone(),
        authenticator,
    ))
}

fn check_signer_count(addresses: usize, signers: usize) -> AptosResult<()> {
    if addresses == signers {
        Ok(())
    } else {
        Err(AptosError::transaction(format!(
            "{addresses} secondary signer addresses but {signers} secondary signers"
        )))
    }
}
