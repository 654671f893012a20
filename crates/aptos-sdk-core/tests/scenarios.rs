//! Known-answer scenarios exercised through the public API only.

use aptos_sdk_core::account::{Account, SingleKeyAccount};
use aptos_sdk_core::bcs::{self, BcsError, Deserializer, Serializer};
use aptos_sdk_core::crypto::{
    sha3_256, AnyPublicKey, AnySignature, Ed25519PrivateKey, MultiKey, MultiKeySignature,
    Secp256k1PrivateKey,
};
use aptos_sdk_core::transaction::{EntryFunction, RawTransaction, TransactionPayload};
use aptos_sdk_core::types::{AccountAddress, ChainId, TypeTag};
use aptos_sdk_core::AptosError;

mod uleb128 {
    use super::*;

    fn encode(value: u32) -> Vec<u8> {
        let mut ser = Serializer::new();
        ser.write_uleb128(value);
        ser.into_bytes().unwrap()
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(encode(0x00), vec![0x00]);
        assert_eq!(encode(0x7f), vec![0x7f]);
        assert_eq!(encode(0x80), vec![0x80, 0x01]);
        assert_eq!(encode(0x3fff), vec![0xff, 0x7f]);
        assert_eq!(encode(0xffff_ffff), vec![0xff, 0xff, 0xff, 0xff, 0x0f]);
    }

    #[test]
    fn test_boundaries_decode() {
        for value in [0u32, 0x7f, 0x80, 0x3fff, 0x4000, u32::MAX] {
            let bytes = encode(value);
            let mut de = Deserializer::new(&bytes);
            assert_eq!(de.read_uleb128(), value);
            de.finish().unwrap();
        }
    }

    #[test]
    fn test_six_continuation_bytes_rejected() {
        let bytes = [0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x01];
        let mut de = Deserializer::new(&bytes);
        assert_eq!(de.read_uleb128(), 0);
        assert_eq!(
            de.check(),
            Err(BcsError::InvalidUleb128 { offset: 0 })
        );
    }
}

mod ed25519 {
    use super::*;

    const SEED: &str = "0xc5338cd251c22daa8c9c9cc94f498cc8a5c7e1d2e75287a5dda91096fe64efa5";
    const PUBLIC_KEY: &str = "0xde19e5d1880cac87d57484ce9ed2e84cf0f9599f12e7cc3a52e4e7657a763f2c";
    const AUTH_KEY: &str = "0x978c213990c4833df71548df7ce49d54c759d6b6d932de22b24d56060b7af2aa";
    const SIGNATURE: &str = "0x9e653d56a09247570bb174a389e85b9226abd5c403ea6c504b386626a145158cd4efd66fc5e071c0e19538a96a05ddbda24d3c51e1e6a9dacc6bb1ce775cce07";

    #[test]
    fn test_known_answer() {
        let private_key = Ed25519PrivateKey::from_hex(SEED).unwrap();
        let public_key = private_key.public_key();
        assert_eq!(public_key.to_hex(), PUBLIC_KEY);
        assert_eq!(public_key.authentication_key().to_hex(), AUTH_KEY);
        assert_eq!(public_key.to_address().to_long_string(), AUTH_KEY);

        let signature = private_key.sign(b"hello world");
        assert_eq!(signature.to_hex(), SIGNATURE);
        assert!(public_key.verify(b"hello world", &signature));
        assert!(!public_key.verify(b"hello worle", &signature));
    }

    #[test]
    fn test_auth_key_independent_of_key_encoding() {
        let from_hex = Ed25519PrivateKey::from_hex(SEED).unwrap();
        let from_aip80 = Ed25519PrivateKey::from_hex(&from_hex.to_aip80()).unwrap();
        let from_bytes = Ed25519PrivateKey::from_bytes(&from_hex.to_bytes()).unwrap();
        for key in [from_aip80, from_bytes] {
            assert_eq!(
                key.public_key().authentication_key(),
                from_hex.public_key().authentication_key()
            );
        }
    }
}

mod secp256k1 {
    use super::*;

    const PRIVATE_KEY: &str = "0xd107155adf816a0a94c6db3c9489c13ad8a1eda7ada2e558ba3bfa47c020347e";
    const SIGNATURE: &str = "0xd0d634e843b61339473b028105930ace022980708b2855954b977da09df84a770c0b68c29c8ca1b5409a5085b0ec263be80e433c83fcf6debb82f3447e71edca";
    const AUTH_KEY: &str = "0x5792c985bc96f436270bd2a3c692210b09c7febb8889345ceefdbae4bacfe498";

    #[test]
    fn test_known_answer() {
        let private_key = Secp256k1PrivateKey::from_hex(PRIVATE_KEY).unwrap();
        let message = hex::decode("68656c6c6f20776f726c64").unwrap();
        let signature = private_key.sign(&message);
        assert_eq!(signature.to_hex(), SIGNATURE);
        assert_eq!(signature.to_bytes().len(), 64);
        assert!(private_key.public_key().verify(&message, &signature));
    }

    #[test]
    fn test_single_key_authentication_key() {
        let private_key = Secp256k1PrivateKey::from_hex(PRIVATE_KEY).unwrap();
        let any = AnyPublicKey::from(private_key.public_key());
        assert_eq!(any.authentication_key().to_hex(), AUTH_KEY);

        let account = SingleKeyAccount::from_secp256k1_hex(PRIVATE_KEY).unwrap();
        assert_eq!(account.address().to_long_string(), AUTH_KEY);
        assert_eq!(account.authentication_key().to_hex(), AUTH_KEY);
    }
}

mod address {
    use super::*;

    #[test]
    fn test_special_short_form() {
        let one = AccountAddress::from_hex("0x1").unwrap();
        let mut expected = [0u8; 32];
        expected[31] = 1;
        assert_eq!(one.to_bytes(), expected);
        assert_eq!(one.to_string(), "0x1");
    }

    #[test]
    fn test_non_special_long_form() {
        let sixteen = AccountAddress::from_hex("0x10").unwrap();
        let mut expected = [0u8; 32];
        expected[31] = 0x10;
        assert_eq!(sixteen.to_bytes(), expected);
        assert_eq!(
            sixteen.to_string(),
            format!("0x{}10", "0".repeat(62))
        );
        assert_eq!(
            AccountAddress::from_hex(sixteen.to_string()).unwrap(),
            sixteen
        );
    }

    #[test]
    fn test_length_limits() {
        let full = format!("0x{}", "ff".repeat(32));
        assert_eq!(AccountAddress::from_hex(&full).unwrap().to_bytes(), [0xff; 32]);

        let too_long = format!("0x{}", "f".repeat(65));
        assert!(matches!(
            AccountAddress::from_hex(&too_long),
            Err(AptosError::AddressTooLong { length: 65 })
        ));
    }
}

mod multi_key {
    use super::*;

    #[test]
    fn test_two_of_three() {
        let a = Ed25519PrivateKey::generate();
        let b = Ed25519PrivateKey::generate();
        let c = Secp256k1PrivateKey::generate();
        let multi_key = MultiKey::new(
            vec![
                a.public_key().into(),
                b.public_key().into(),
                c.public_key().into(),
            ],
            2,
        )
        .unwrap();

        let sig_a = AnySignature::from(a.sign(b"test"));
        let sig_c = AnySignature::from(c.sign(b"test"));
        let signature =
            MultiKeySignature::new(vec![(0, sig_a), (2, sig_c.clone())]).unwrap();
        assert_eq!(signature.bitmap().as_bytes(), &[0xa0, 0x00, 0x00, 0x00]);
        assert!(multi_key.verify(b"test", &signature));
        assert!(!multi_key.verify(b"tset", &signature));

        // Drop A's signature but keep the bitmap.
        let mut ser = Serializer::new();
        ser.write_sequence(&[sig_c]);
        ser.write(signature.bitmap());
        let tampered: MultiKeySignature = bcs::from_bytes(&ser.into_bytes().unwrap()).unwrap();
        assert!(!multi_key.verify(b"test", &tampered));
    }
}

mod raw_transaction {
    use super::*;

    fn transaction() -> RawTransaction {
        let payload = EntryFunction::from_function_id(
            "0x1::coin::transfer",
            vec![TypeTag::from_str_strict("0x1::aptos_coin::AptosCoin").unwrap()],
            vec![
                AccountAddress::from_hex("0x2").unwrap().to_bytes().to_vec(),
                1000u64.to_le_bytes().to_vec(),
            ],
        )
        .unwrap();
        RawTransaction::new(
            AccountAddress::ONE,
            42,
            TransactionPayload::EntryFunction(payload),
            200_000,
            100,
            1_700_000_000,
            ChainId::new(4),
        )
    }

    #[test]
    fn test_roundtrip_and_signing_message() {
        let txn = transaction();
        let bytes = txn.to_bcs().unwrap();
        assert_eq!(transaction().to_bcs().unwrap(), bytes);
        assert_eq!(bcs::from_bytes::<RawTransaction>(&bytes).unwrap(), txn);

        let message = txn.signing_message().unwrap();
        assert_eq!(message.len(), 32 + bytes.len());
        assert_eq!(&message[..32], &sha3_256(b"APTOS::RawTransaction"));
        assert_eq!(&message[32..], &bytes[..]);
    }

    #[test]
    fn test_layout() {
        let bytes = transaction().to_bcs().unwrap();
        assert_eq!(&bytes[..32], AccountAddress::ONE.as_bytes());
        assert_eq!(&bytes[32..40], &42u64.to_le_bytes());
        // EntryFunction tag, then the module address.
        assert_eq!(bytes[40], 0);
        assert_eq!(&bytes[41..73], AccountAddress::ONE.as_bytes());
        assert_eq!(bytes[bytes.len() - 1], 4);
        assert_eq!(
            &bytes[bytes.len() - 9..bytes.len() - 1],
            &1_700_000_000u64.to_le_bytes()
        );
    }

    #[test]
    fn test_signed_by_account_verifies() {
        let account = SingleKeyAccount::generate_ed25519();
        let mut txn = transaction();
        txn.sender = account.address();
        let signed = aptos_sdk_core::transaction::sign_transaction(&txn, &account).unwrap();
        assert!(signed.verify());
        let decoded =
            aptos_sdk_core::transaction::SignedTransaction::from_bcs(&signed.to_bcs().unwrap())
                .unwrap();
        assert_eq!(decoded, signed);
        assert_eq!(decoded.hash().unwrap(), signed.hash().unwrap());
    }
}
