//! Hash functions for the Aptos SDK.
//!
//! SHA3-256 is the hash behind authentication keys, derived addresses,
//! signing messages and transaction hashes. SHA2-256 only appears inside
//! the WebAuthn assertion format.

use once_cell::sync::Lazy;
use sha2::Digest as Sha2Digest;

/// Domain separator for signing a bare raw transaction.
pub const RAW_TRANSACTION_SALT: &[u8] = b"APTOS::RawTransaction";

/// Domain separator for signing a multi-agent or fee payer transaction.
pub const RAW_TRANSACTION_WITH_DATA_SALT: &[u8] = b"APTOS::RawTransactionWithData";

/// Domain separator for the hash of a submitted transaction.
pub const TRANSACTION_SALT: &[u8] = b"APTOS::Transaction";

static RAW_TRANSACTION_PREHASH: Lazy<[u8; 32]> = Lazy::new(|| sha3_256(RAW_TRANSACTION_SALT));

static RAW_TRANSACTION_WITH_DATA_PREHASH: Lazy<[u8; 32]> =
    Lazy::new(|| sha3_256(RAW_TRANSACTION_WITH_DATA_SALT));

static TRANSACTION_PREHASH: Lazy<[u8; 32]> = Lazy::new(|| sha3_256(TRANSACTION_SALT));

/// `SHA3-256("APTOS::RawTransaction")`, computed once per process.
pub fn raw_transaction_prehash() -> &'static [u8; 32] {
    &RAW_TRANSACTION_PREHASH
}

/// `SHA3-256("APTOS::RawTransactionWithData")`, computed once per process.
pub fn raw_transaction_with_data_prehash() -> &'static [u8; 32] {
    &RAW_TRANSACTION_WITH_DATA_PREHASH
}

/// `SHA3-256("APTOS::Transaction")`, computed once per process.
pub fn transaction_prehash() -> &'static [u8; 32] {
    &TRANSACTION_PREHASH
}

/// Computes the SHA2-256 hash of the input.
///
/// # Example
///
/// ```rust
/// use aptos_sdk_core::crypto::sha2_256;
///
/// let hash = sha2_256(b"hello world");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha2_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = sha2::Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Computes the SHA3-256 hash of the input.
///
/// # Example
///
/// ```rust
/// use aptos_sdk_core::crypto::sha3_256;
///
/// let hash = sha3_256(b"hello world");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = sha3::Sha3_256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Computes the SHA3-256 hash of the concatenation of several byte slices.
pub fn sha3_256_of<I, T>(items: I) -> [u8; 32]
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut hasher = sha3::Sha3_256::new();
    for item in items {
        hasher.update(item.as_ref());
    }
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha2_256() {
        let hash = sha2_256(b"hello world");
        let expected =
            hex::decode("b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9")
                .unwrap();
        assert_eq!(hash.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_sha3_256() {
        let hash = sha3_256(b"hello world");
        let expected =
            hex::decode("644bcc7e564373040999aac89e7622f3ca71fba1d972fd94a31c3bfbf24e3938")
                .unwrap();
        assert_eq!(hash.as_slice(), expected.as_slice());
        assert_ne!(hash, sha2_256(b"hello world"));
    }

    #[test]
    fn test_sha3_256_of_multiple() {
        let hash1 = sha3_256(b"helloworld");
        let hash2 = sha3_256_of([b"hello".as_slice(), b"world".as_slice()]);
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_prehashes() {
        assert_eq!(*raw_transaction_prehash(), sha3_256(b"APTOS::RawTransaction"));
        assert_eq!(
            *raw_transaction_with_data_prehash(),
            sha3_256(b"APTOS::RawTransactionWithData")
        );
        assert_eq!(*transaction_prehash(), sha3_256(b"APTOS::Transaction"));
        assert_ne!(raw_transaction_prehash(), raw_transaction_with_data_prehash());
    }

    #[test]
    fn test_prehash_concurrent_init() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| *raw_transaction_prehash()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), sha3_256(RAW_TRANSACTION_SALT));
        }
    }
}
