//! End-to-end relay tests over a scripted transport.

use antenna_core::{
    k256::{ecdsa::SigningKey, elliptic_curve::sec1::ToEncodedPoint},
    types::{
        to_replay_protected_v, AccountMeta, Action, ActionHash, ActionPayload, Address, Bytes,
        LegacyTransaction, Recipient, RecoveredSigner, Signature, U256,
    },
    utils::serialize,
};
use antenna_providers::{Provider, RelayError};
use hex_literal::hex;

const TEST_KEY: [u8; 32] =
    hex!("4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318");

/// IoTeX mainnet chain id, as folded into the replay protection.
const CHAIN_ID: u64 = 4689;

fn test_key() -> SigningKey {
    SigningKey::from_slice(&TEST_KEY).unwrap()
}

fn recipient_address() -> Address {
    "d1f23226fb4d2b7d2f3bcdd99381b038de705a64".parse().unwrap()
}

fn account_meta(is_contract: bool) -> AccountMeta {
    AccountMeta {
        address: "0xd1f23226fb4d2b7d2f3bcdd99381b038de705a64".to_string(),
        balance: "0".to_string(),
        nonce: 0,
        is_contract,
    }
}

/// Signs `tx` the way an Ethereum wallet does under `chain_id`, returning
/// the raw wire bytes together with the identity a relay must recover.
fn sign_legacy(
    tx: &LegacyTransaction,
    key: &SigningKey,
    chain_id: u64,
) -> (Vec<u8>, RecoveredSigner) {
    let sighash = tx.sighash(chain_id);
    let (sig, recovery_id) = key.sign_prehash_recoverable(sighash.as_bytes()).unwrap();
    let rs = sig.to_bytes();

    let signature = Signature {
        r: U256::from_big_endian(&rs[..32]),
        s: U256::from_big_endian(&rs[32..]),
        v: to_replay_protected_v(recovery_id.to_byte(), chain_id),
    };
    let raw = tx.rlp_signed(&signature).to_vec();

    let mut public_key = [0u8; 65];
    public_key.copy_from_slice(key.verifying_key().to_encoded_point(false).as_bytes());
    let mut canonical = [0u8; 65];
    canonical[..64].copy_from_slice(&rs);
    canonical[64] = recovery_id.to_byte();

    (raw, RecoveredSigner { public_key, signature: canonical })
}

fn one_iotx_transfer() -> LegacyTransaction {
    LegacyTransaction {
        nonce: 1u64.into(),
        gas_price: 1_000_000_000_000u64.into(),
        gas: 21_000u64.into(),
        to: Some(recipient_address()),
        value: 1_000_000_000_000_000_000u64.into(),
        data: Bytes::default(),
    }
}

#[tokio::test]
async fn relays_transfer_to_plain_account() {
    let (provider, mock) = Provider::mocked();
    let submitted = ActionHash::repeat_byte(0xab);
    mock.push::<Option<AccountMeta>, _>(Some(account_meta(false))).unwrap();
    mock.push::<ActionHash, _>(submitted).unwrap();

    let tx = one_iotx_transfer();
    let (raw, signer) = sign_legacy(&tx, &test_key(), CHAIN_ID);
    let hash = provider.relay_raw_transaction(&raw, CHAIN_ID).await.unwrap();
    assert_eq!(hash, submitted);

    // the envelope the relay must have produced, from first principles
    let expected = Action::from_legacy(&tx, &signer, Recipient::Account(recipient_address()))
        .unwrap();
    match &expected.payload {
        ActionPayload::Transfer(transfer) => {
            assert_eq!(transfer.amount, "1000000000000000000");
            assert!(transfer.payload.is_empty());
        }
        ActionPayload::Execution(_) => panic!("plain account must map to a transfer"),
    }
    assert_eq!(expected.core.chain_id, 0);
    assert_eq!(
        expected.sender_pub_key.as_ref(),
        test_key().verifying_key().to_encoded_point(false).as_bytes()
    );

    mock.assert_request("iotx_getAccount", ["0xd1f23226fb4d2b7d2f3bcdd99381b038de705a64"])
        .unwrap();
    mock.assert_request("iotx_sendAction", [serialize(&expected)]).unwrap();
    assert_eq!(mock.pending_requests(), 0);
}

#[tokio::test]
async fn relays_execution_to_contract() {
    let (provider, mock) = Provider::mocked();
    mock.push::<Option<AccountMeta>, _>(Some(account_meta(true))).unwrap();
    mock.push::<ActionHash, _>(ActionHash::repeat_byte(0xcd)).unwrap();

    let tx = LegacyTransaction {
        data: hex!("a9059cbb000000000000000000000000d1f23226fb4d2b7d2f3bcdd99381b038de705a640000000000000000000000000000000000000000000000000de0b6b3a7640000").to_vec().into(),
        value: U256::zero(),
        ..one_iotx_transfer()
    };
    let (raw, signer) = sign_legacy(&tx, &test_key(), CHAIN_ID);
    provider.relay_raw_transaction(&raw, CHAIN_ID).await.unwrap();

    let expected = Action::from_legacy(&tx, &signer, Recipient::Contract(recipient_address()))
        .unwrap();
    match &expected.payload {
        ActionPayload::Execution(execution) => {
            assert_eq!(execution.contract, "0xd1f23226fb4d2b7d2f3bcdd99381b038de705a64");
            assert_eq!(execution.data, tx.data);
        }
        ActionPayload::Transfer(_) => panic!("contract must map to an execution"),
    }

    mock.assert_request("iotx_getAccount", ["0xd1f23226fb4d2b7d2f3bcdd99381b038de705a64"])
        .unwrap();
    mock.assert_request("iotx_sendAction", [serialize(&expected)]).unwrap();
}

#[tokio::test]
async fn creation_submits_without_classification() {
    let (provider, mock) = Provider::mocked();
    mock.push::<ActionHash, _>(ActionHash::repeat_byte(0xef)).unwrap();

    let tx = LegacyTransaction {
        to: None,
        gas: 1_000_000u64.into(),
        value: U256::zero(),
        data: hex!("6080604052").to_vec().into(),
        ..one_iotx_transfer()
    };
    let (raw, signer) = sign_legacy(&tx, &test_key(), CHAIN_ID);
    provider.relay_raw_transaction(&raw, CHAIN_ID).await.unwrap();

    // no recipient, no lookup: the submission is the only call made
    assert_eq!(mock.pending_requests(), 1);
    let expected = Action::from_legacy(&tx, &signer, Recipient::Creation).unwrap();
    mock.assert_request("iotx_sendAction", [serialize(&expected)]).unwrap();
}

#[tokio::test]
async fn missing_account_metadata_aborts_before_submission() {
    let (provider, mock) = Provider::mocked();
    mock.push::<Option<AccountMeta>, _>(None).unwrap();

    let (raw, _) = sign_legacy(&one_iotx_transfer(), &test_key(), CHAIN_ID);
    let err = provider.relay_raw_transaction(&raw, CHAIN_ID).await.unwrap_err();
    assert!(matches!(err, RelayError::Classification(_)));

    // exactly one call went out, and it was the lookup
    assert_eq!(mock.pending_requests(), 1);
    mock.assert_request("iotx_getAccount", ["0xd1f23226fb4d2b7d2f3bcdd99381b038de705a64"])
        .unwrap();
}

#[tokio::test]
async fn foreign_chain_signature_never_reaches_the_gateway() {
    let (provider, mock) = Provider::mocked();

    // signed for Ethereum mainnet, relayed with the IoTeX chain id
    let (raw, _) = sign_legacy(&one_iotx_transfer(), &test_key(), 1);
    let err = provider.relay_raw_transaction(&raw, CHAIN_ID).await.unwrap_err();
    assert!(matches!(err, RelayError::Recovery(_)));
    assert_eq!(mock.pending_requests(), 0);
}

#[tokio::test]
async fn malformed_raw_bytes_never_reach_the_gateway() {
    let (provider, mock) = Provider::mocked();

    let err = provider.relay_raw_transaction(&[0xc0], CHAIN_ID).await.unwrap_err();
    assert!(matches!(err, RelayError::Decode(_)));
    assert_eq!(mock.pending_requests(), 0);
}
