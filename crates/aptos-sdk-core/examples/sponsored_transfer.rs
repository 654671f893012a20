//! Example: Sponsored multi-agent transfer, assembled offline.
//!
//! The sender and a co-signer sign before anyone has agreed to pay for gas.
//! A sponsor then resolves itself as the fee payer, signs, and the result is
//! checked and printed as hex ready for submission.
//!
//! Run with: `RUST_LOG=debug cargo run --example sponsored_transfer`

use aptos_sdk_core::{
    account::{Account, Ed25519Account, SingleKeyAccount},
    config::TransactionConfig,
    transaction::{InputEntryFunctionData, PartiallySigned, SponsoredTransactionBuilder},
    AptosResult,
};
use tracing_subscriber::EnvFilter;

fn main() -> AptosResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let sender = Ed25519Account::generate();
    let co_signer = SingleKeyAccount::generate_secp256k1();
    let sponsor = Ed25519Account::generate();
    println!("Sender:    {}", sender.address());
    println!("Co-signer: {}", co_signer.address());
    println!("Sponsor:   {}", sponsor.address());

    let payload = InputEntryFunctionData::transfer_apt(co_signer.address(), 1_000)?;
    let unsigned = SponsoredTransactionBuilder::from_config(&TransactionConfig::testnet())
        .sender(sender.address())
        .sequence_number(0)
        .secondary_signer(co_signer.address())
        .payload(payload)
        .build()?;

    let mut pending = PartiallySigned::new(unsigned);
    pending.sign_as_sender(&sender)?;
    pending.sign_as_secondary(0, &co_signer)?;
    println!("Complete before sponsor: {}", pending.is_complete());

    pending.sign_as_fee_payer(&sponsor)?;
    let signed = pending.finalize()?;
    println!("Verifies: {}", signed.verify());
    println!("Hash:     {}", signed.hash()?);
    println!("Bytes:    0x{}", hex::encode(signed.to_bcs()?));

    Ok(())
}
