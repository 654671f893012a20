//! Sponsored transaction helpers.
//!
//! A sponsored (fee payer) transaction lets one account pay the gas of a
//! transaction sent by another. The fee payer does not have to be known
//! when the sender signs: until it is resolved its address is the all-zero
//! placeholder, and a sender signature over that placeholder stays valid
//! after the fee payer fills in its own address.
//!
//! # Example
//!
//! ```rust
//! use aptos_sdk_core::account::Ed25519Account;
//! use aptos_sdk_core::transaction::{EntryFunction, PartiallySigned, SponsoredTransactionBuilder};
//! use aptos_sdk_core::types::{AccountAddress, ChainId};
//!
//! let user = Ed25519Account::generate();
//! let sponsor = Ed25519Account::generate();
//! let payload = EntryFunction::apt_transfer(AccountAddress::THREE, 1_000).unwrap();
//!
//! // The user signs before a sponsor is chosen.
//! let fee_payer_txn = SponsoredTransactionBuilder::new()
//!     .sender(user.address())
//!     .sequence_number(0)
//!     .payload(payload.into())
//!     .chain_id(ChainId::testnet())
//!     .build()
//!     .unwrap();
//! let mut pending = PartiallySigned::new(fee_payer_txn);
//! pending.sign_as_sender(&user).unwrap();
//!
//! // The sponsor resolves itself as fee payer and signs.
//! pending.sign_as_fee_payer(&sponsor).unwrap();
//! let signed = pending.finalize().unwrap();
//! assert!(signed.verify());
//! ```

use crate::account::Account;
use crate::config::TransactionConfig;
use crate::error::{AptosError, AptosResult};
use crate::transaction::authenticator::{AccountAuthenticator, TransactionAuthenticator};
use crate::transaction::builder::{sign_fee_payer_transaction, TransactionBuilder};
use crate::transaction::payload::TransactionPayload;
use crate::transaction::types::{FeePayerRawTransaction, SignedTransaction};
use crate::types::{AccountAddress, ChainId};

/// Builds fee payer transactions.
///
/// Wraps a [`TransactionBuilder`] for the raw transaction fields and adds
/// the secondary signers and the fee payer. Leaving the fee payer unset
/// builds a transaction whose fee payer is [`AccountAddress::ZERO`], to be
/// resolved by whoever sponsors it.
#[derive(Debug, Clone, Default)]
pub struct SponsoredTransactionBuilder {
    raw: TransactionBuilder,
    secondary_addresses: Vec<AccountAddress>,
    fee_payer_address: Option<AccountAddress>,
}

macro_rules! delegate {
    ($($(#[$doc:meta])* $name:ident($arg:ident: $ty:ty);)*) => {
        $(
            $(#[$doc])*
            #[must_use]
            pub fn $name(mut self, $arg: $ty) -> Self {
                self.raw = self.raw.$name($arg);
                self
            }
        )*
    };
}

impl SponsoredTransactionBuilder {
    /// Creates a builder with the default gas settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder whose chain id and gas settings come from `config`.
    #[must_use]
    pub fn from_config(config: &TransactionConfig) -> Self {
        Self {
            raw: TransactionBuilder::from_config(config),
            ..Self::default()
        }
    }

    delegate! {
        /// Sets the sender address.
        sender(address: AccountAddress);
        /// Sets the sender's sequence number.
        sequence_number(sequence_number: u64);
        /// Sets the transaction payload.
        payload(payload: TransactionPayload);
        /// Sets the maximum gas amount.
        max_gas_amount(max_gas_amount: u64);
        /// Sets the gas unit price in octas.
        gas_unit_price(gas_unit_price: u64);
        /// Sets an absolute expiration in seconds since the Unix epoch.
        expiration_timestamp_secs(expiration_timestamp_secs: u64);
        /// Expires the transaction `seconds` from now.
        expiration_from_now(seconds: u64);
        /// Sets the chain ID.
        chain_id(chain_id: ChainId);
    }

    /// Appends one secondary signer.
    #[must_use]
    pub fn secondary_signer(mut self, address: AccountAddress) -> Self {
        self.secondary_addresses.push(address);
        self
    }

    /// Appends secondary signers in order.
    #[must_use]
    pub fn secondary_signers(mut self, addresses: &[AccountAddress]) -> Self {
        self.secondary_addresses.extend_from_slice(addresses);
        self
    }

    /// Names the fee payer up front.
    #[must_use]
    pub fn fee_payer(mut self, address: AccountAddress) -> Self {
        self.fee_payer_address = Some(address);
        self
    }

    /// Builds the unsigned fee payer transaction.
    ///
    /// # Errors
    ///
    /// Returns the same required-field errors as [`TransactionBuilder::build`].
    pub fn build(self) -> AptosResult<FeePayerRawTransaction> {
        let raw_txn = self.raw.build()?;
        Ok(match self.fee_payer_address {
            Some(fee_payer) => {
                FeePayerRawTransaction::new(raw_txn, self.secondary_addresses, fee_payer)
            }
            None => FeePayerRawTransaction::with_unresolved_fee_payer(
                raw_txn,
                self.secondary_addresses,
            ),
        })
    }

    /// Builds and collects every signature in one go.
    ///
    /// An unset fee payer address is taken from `fee_payer`.
    ///
    /// # Errors
    ///
    /// Returns an error if building fails, if the secondary signers do not
    /// match the secondary addresses, or if any signer fails.
    pub fn build_and_sign<S, F>(
        mut self,
        sender: &S,
        secondary_signers: &[&dyn Account],
        fee_payer: &F,
    ) -> AptosResult<SignedTransaction>
    where
        S: Account,
        F: Account,
    {
        self.fee_payer_address.get_or_insert_with(|| fee_payer.address());
        let fee_payer_txn = self.build()?;
        sign_fee_payer_transaction(&fee_payer_txn, sender, secondary_signers, fee_payer)
    }
}

/// A fee payer transaction collecting signatures from its parties.
///
/// Parties sign independently and in any order. The fee payer may be
/// resolved after the sender and secondary signers have signed over the
/// zero placeholder.
#[derive(Debug, Clone)]
pub struct PartiallySigned {
    fee_payer_txn: FeePayerRawTransaction,
    sender_auth: Option<AccountAuthenticator>,
    secondary_auths: Vec<Option<AccountAuthenticator>>,
    fee_payer_auth: Option<AccountAuthenticator>,
}

impl PartiallySigned {
    /// Starts collecting signatures for `fee_payer_txn`.
    pub fn new(fee_payer_txn: FeePayerRawTransaction) -> Self {
        let secondary_auths = vec![None; fee_payer_txn.secondary_signer_addresses.len()];
        Self {
            fee_payer_txn,
            sender_auth: None,
            secondary_auths,
            fee_payer_auth: None,
        }
    }

    /// The transaction being signed, with the fee payer as resolved so far.
    pub fn transaction(&self) -> &FeePayerRawTransaction {
        &self.fee_payer_txn
    }

    /// Adds the sender's signature.
    ///
    /// # Errors
    ///
    /// Returns an error if `sender` is not the transaction's sender or if
    /// signing fails.
    pub fn sign_as_sender<A: Account + ?Sized>(&mut self, sender: &A) -> AptosResult<()> {
        let expected = self.fee_payer_txn.raw_txn.sender;
        expect_party("sender", expected, sender.address())?;
        self.sender_auth = Some(sender.sign(&self.fee_payer_txn.signing_message()?)?);
        tracing::debug!(sender = %expected, "sender signed sponsored transaction");
        Ok(())
    }

    /// Adds the signature of the secondary signer at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no secondary signer at `index`, if
    /// `signer` is not that account, or if signing fails.
    pub fn sign_as_secondary<A: Account + ?Sized>(
        &mut self,
        index: usize,
        signer: &A,
    ) -> AptosResult<()> {
        let expected = *self
            .fee_payer_txn
            .secondary_signer_addresses
            .get(index)
            .ok_or_else(|| {
                AptosError::transaction(format!(
                    "no secondary signer at index {index} ({} declared)",
                    self.secondary_auths.len()
                ))
            })?;
        expect_party("secondary signer", expected, signer.address())?;
        let auth = signer.sign(&self.fee_payer_txn.signing_message()?)?;
        self.secondary_auths[index] = Some(auth);
        tracing::debug!(index, signer = %expected, "secondary signed sponsored transaction");
        Ok(())
    }

    /// Adds the fee payer's signature.
    ///
    /// An unresolved fee payer is resolved to `fee_payer`'s address first, so
    /// the fee payer always signs over its real address.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction names a different fee payer or if
    /// signing fails.
    pub fn sign_as_fee_payer<A: Account + ?Sized>(&mut self, fee_payer: &A) -> AptosResult<()> {
        if self.fee_payer_txn.is_fee_payer_unresolved() {
            self.fee_payer_txn.fee_payer_address = fee_payer.address();
        }
        let expected = self.fee_payer_txn.fee_payer_address;
        expect_party("fee payer", expected, fee_payer.address())?;
        self.fee_payer_auth = Some(fee_payer.sign(&self.fee_payer_txn.signing_message()?)?);
        tracing::debug!(fee_payer = %expected, "fee payer signed sponsored transaction");
        Ok(())
    }

    /// Whether every party has signed.
    pub fn is_complete(&self) -> bool {
        self.sender_auth.is_some()
            && self.fee_payer_auth.is_some()
            && self.secondary_auths.iter().all(Option::is_some)
    }

    /// Assembles the signed transaction.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing signature.
    pub fn finalize(self) -> AptosResult<SignedTransaction> {
        let missing = |who: String| AptosError::transaction(format!("missing {who} signature"));
        let sender_auth = self.sender_auth.ok_or_else(|| missing("sender".into()))?;
        let secondary_auths = self
            .secondary_auths
            .into_iter()
            .enumerate()
            .map(|(i, auth)| auth.ok_or_else(|| missing(format!("secondary signer {i}"))))
            .collect::<AptosResult<Vec<_>>>()?;
        let fee_payer_auth = self.fee_payer_auth.ok_or_else(|| missing("fee payer".into()))?;

        let FeePayerRawTransaction {
            raw_txn,
            secondary_signer_addresses,
            fee_payer_address,
        } = self.fee_payer_txn;
        let authenticator = TransactionAuthenticator::fee_payer(
            sender_auth,
            secondary_signer_addresses,
            secondary_auths,
            fee_payer_address,
            fee_payer_auth,
        );
        Ok(SignedTransaction::new(raw_txn, authenticator))
    }
}

fn expect_party(role: &str, expected: AccountAddress, actual: AccountAddress) -> AptosResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(AptosError::transaction(format!(
            "account {actual} is not the {role} {expected}"
        )))
    }
}

/// Creates a simple sponsored transaction with minimal configuration.
///
/// # Errors
///
/// Returns an error if building the transaction fails or if any signer fails to sign.
pub fn sponsor_transaction<S, F>(
    sender: &S,
    sender_sequence_number: u64,
    fee_payer: &F,
    payload: TransactionPayload,
    chain_id: ChainId,
) -> AptosResult<SignedTransaction>
where
    S: Account,
    F: Account,
{
    SponsoredTransactionBuilder::new()
        .sender(sender.address())
        .sequence_number(sender_sequence_number)
        .fee_payer(fee_payer.address())
        .payload(payload)
        .chain_id(chain_id)
        .build_and_sign(sender, &[], fee_payer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{Ed25519Account, SingleKeyAccount};
    use crate::transaction::payload::EntryFunction;

    fn payload() -> TransactionPayload {
        let recipient = AccountAddress::from_hex("0x123").unwrap();
        EntryFunction::apt_transfer(recipient, 1000).unwrap().into()
    }

    fn unsigned(sender: AccountAddress, secondaries: &[AccountAddress]) -> FeePayerRawTransaction {
        SponsoredTransactionBuilder::new()
            .sender(sender)
            .sequence_number(0)
            .secondary_signers(secondaries)
            .payload(payload())
            .chain_id(ChainId::testnet())
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_missing_sender() {
        let result = SponsoredTransactionBuilder::new()
            .sequence_number(0)
            .fee_payer(AccountAddress::ONE)
            .payload(payload())
            .chain_id(ChainId::testnet())
            .build();

        assert!(result.unwrap_err().to_string().contains("sender"));
    }

    #[test]
    fn test_builder_without_fee_payer_uses_placeholder() {
        let fee_payer_txn = unsigned(AccountAddress::ONE, &[]);
        assert_eq!(fee_payer_txn.fee_payer_address, AccountAddress::ZERO);
        assert!(fee_payer_txn.is_fee_payer_unresolved());
    }

    #[test]
    fn test_builder_complete() {
        let fee_payer_txn = SponsoredTransactionBuilder::new()
            .sender(AccountAddress::ONE)
            .sequence_number(5)
            .fee_payer(AccountAddress::THREE)
            .payload(payload())
            .chain_id(ChainId::testnet())
            .max_gas_amount(100_000)
            .gas_unit_price(150)
            .build()
            .unwrap();

        assert_eq!(fee_payer_txn.raw_txn.sender, AccountAddress::ONE);
        assert_eq!(fee_payer_txn.raw_txn.sequence_number, 5);
        assert_eq!(fee_payer_txn.raw_txn.max_gas_amount, 100_000);
        assert_eq!(fee_payer_txn.raw_txn.gas_unit_price, 150);
        assert_eq!(fee_payer_txn.fee_payer_address, AccountAddress::THREE);
    }

    #[test]
    fn test_partially_signed_finalize_incomplete() {
        let partially_signed = PartiallySigned::new(unsigned(AccountAddress::ONE, &[]));
        assert!(!partially_signed.is_complete());
        let result = partially_signed.finalize();
        assert!(result.unwrap_err().to_string().contains("missing"));
    }

    #[test]
    fn test_full_sponsored_transaction() {
        let sender = Ed25519Account::generate();
        let fee_payer = Ed25519Account::generate();

        let signed_txn = SponsoredTransactionBuilder::new()
            .sender(sender.address())
            .sequence_number(0)
            .payload(payload())
            .chain_id(ChainId::testnet())
            .build_and_sign(&sender, &[], &fee_payer)
            .unwrap();

        assert_eq!(signed_txn.raw_txn.sender, sender.address());
        assert_eq!(
            signed_txn.authenticator.fee_payer_address(),
            Some(fee_payer.address())
        );
        assert!(signed_txn.verify());
    }

    #[test]
    fn test_sponsor_transaction_fn() {
        let sender = SingleKeyAccount::generate_secp256k1();
        let fee_payer = Ed25519Account::generate();

        let signed_txn =
            sponsor_transaction(&sender, 0, &fee_payer, payload(), ChainId::testnet()).unwrap();

        assert_eq!(signed_txn.raw_txn.sender, sender.address());
        assert!(signed_txn.verify());
    }

    #[test]
    fn test_partially_signed_flow_with_late_fee_payer() {
        let sender = Ed25519Account::generate();
        let secondary = Ed25519Account::generate();
        let fee_payer = Ed25519Account::generate();

        let mut partially_signed =
            PartiallySigned::new(unsigned(sender.address(), &[secondary.address()]));

        partially_signed.sign_as_sender(&sender).unwrap();
        assert!(!partially_signed.is_complete());

        partially_signed.sign_as_fee_payer(&fee_payer).unwrap();
        assert_eq!(
            partially_signed.transaction().fee_payer_address,
            fee_payer.address()
        );
        assert!(!partially_signed.is_complete());

        // Signs after resolution, over the real fee payer address.
        partially_signed.sign_as_secondary(0, &secondary).unwrap();
        assert!(partially_signed.is_complete());

        let signed_txn = partially_signed.finalize().unwrap();
        assert_eq!(signed_txn.raw_txn.sender, sender.address());
        assert!(signed_txn.verify());
    }

    #[test]
    fn test_wrong_parties_rejected() {
        let sender = Ed25519Account::generate();
        let fee_payer = Ed25519Account::generate();
        let stranger = Ed25519Account::generate();

        let mut partially_signed = PartiallySigned::new(unsigned(sender.address(), &[]));
        assert!(partially_signed.sign_as_sender(&stranger).is_err());
        assert!(partially_signed.sign_as_secondary(0, &stranger).is_err());

        partially_signed.sign_as_fee_payer(&fee_payer).unwrap();
        assert!(partially_signed.sign_as_fee_payer(&stranger).is_err());
    }

    #[test]
    fn test_fee_payer_signature_over_placeholder_is_rejected() {
        let sender = Ed25519Account::generate();
        let fee_payer = Ed25519Account::generate();

        let fee_payer_txn = unsigned(sender.address(), &[]);
        let message = fee_payer_txn.signing_message().unwrap();
        let signed = SignedTransaction::new(
            fee_payer_txn.raw_txn.clone(),
            TransactionAuthenticator::fee_payer(
                sender.sign(&message).unwrap(),
                vec![],
                vec![],
                fee_payer.address(),
                fee_payer.sign(&message).unwrap(),
            ),
        );
        assert!(!signed.verify());
    }

    #[test]
    fn test_from_config_carries_gas_settings() {
        let config = TransactionConfig::local()
            .with_max_gas_amount(9_000)
            .with_gas_unit_price(7);
        let fee_payer_txn = SponsoredTransactionBuilder::from_config(&config)
            .sender(AccountAddress::ONE)
            .sequence_number(1)
            .payload(payload())
            .build()
            .unwrap();
        assert_eq!(fee_payer_txn.raw_txn.chain_id, ChainId::new(4));
        assert_eq!(fee_payer_txn.raw_txn.max_gas_amount, 9_000);
        assert_eq!(fee_payer_txn.raw_txn.gas_unit_price, 7);
    }

    #[test]
    fn test_secondary_must_match_declared_address() {
        let sender = Ed25519Account::generate();
        let secondary = Ed25519Account::generate();
        let stranger = Ed25519Account::generate();
        let mut partially_signed =
            PartiallySigned::new(unsigned(sender.address(), &[secondary.address()]));
        assert!(partially_signed.sign_as_secondary(0, &stranger).is_err());
        assert!(partially_signed.sign_as_secondary(1, &secondary).is_err());
        partially_signed.sign_as_secondary(0, &secondary).unwrap();
        let err = partially_signed.finalize().unwrap_err();
        assert!(err.to_string().contains("missing sender signature"));
    }
}
