//! The native action envelope and its construction from a decoded legacy
//! transaction.

use crate::types::{Address, Bytes, LegacyTransaction, RecoveredSigner, U256};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Protocol version stamped on every action core.
const ACTION_VERSION: u32 = 1;

/// Chain id carried by the outer envelope. This is a protocol-internal
/// sentinel: the chain id a relayed signature was verified under lives in
/// the re-signing payload, never here.
const ENVELOPE_CHAIN_ID: u32 = 0;

/// An error involving envelope construction.
#[derive(Debug, Error)]
pub enum ActionError {
    /// A legacy field is wider than the action core's 64-bit slot
    #[error("{field} {value} does not fit the action core's 64-bit field")]
    FieldOverflow { field: &'static str, value: U256 },
}

/// Wire encoding of the signature attached to an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    /// Native protobuf signing payload
    Protobuf = 0,
    /// Ethereum RLP signing payload with replay protection
    Ethereum = 1,
}

impl Serialize for Encoding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(*self as u32)
    }
}

impl<'de> Deserialize<'de> for Encoding {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u32::deserialize(deserializer)? {
            0 => Ok(Encoding::Protobuf),
            1 => Ok(Encoding::Ethereum),
            other => Err(serde::de::Error::custom(format!("unknown encoding {other}"))),
        }
    }
}

/// The destination of a relayed transaction, as classified against the
/// target chain's account state.
///
/// Classification is part of the type so a payload can only ever be built
/// one way; there is no "unclassified" envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recipient {
    /// An externally-owned account: funds move, the payload rides along
    Account(Address),
    /// A deployed contract: the payload is executed
    Contract(Address),
    /// No recipient; the payload deploys new code
    Creation,
}

/// A native coin transfer to an externally-owned account.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transfer {
    /// Amount in the chain's smallest denomination, as a decimal string
    pub amount: String,
    /// Recipient address
    pub recipient: String,
    /// Opaque payload carried with the transfer
    pub payload: Bytes,
}

/// A contract call, or a deployment when `contract` is empty.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Execution {
    /// Amount in the chain's smallest denomination, as a decimal string
    pub amount: String,
    /// Contract address, empty for deployment
    pub contract: String,
    /// Call data or init code
    pub data: Bytes,
}

/// Exactly one operation per action.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ActionPayload {
    Transfer(Transfer),
    Execution(Execution),
}

/// The fields common to every action.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActionCore {
    pub version: u32,
    pub nonce: u64,
    pub gas_limit: u64,
    /// Decimal string, matching the gateway's arbitrary-precision fields
    pub gas_price: String,
    #[serde(rename = "chainID")]
    pub chain_id: u32,
}

/// A sealed action envelope, ready for submission.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub core: ActionCore,
    /// SEC1 uncompressed public key of the sender
    pub sender_pub_key: Bytes,
    /// 65-byte `r || s || recovery id` signature
    pub signature: Bytes,
    pub encoding: Encoding,
    pub payload: ActionPayload,
}

impl Action {
    /// Seals a decoded legacy transaction into the envelope the chain
    /// expects, choosing the operation variant from the recipient
    /// classification.
    ///
    /// The envelope's own `chain_id` stays at the internal sentinel `0`;
    /// it is not the chain id the signature was recovered under.
    pub fn from_legacy(
        tx: &LegacyTransaction,
        signer: &RecoveredSigner,
        recipient: Recipient,
    ) -> Result<Self, ActionError> {
        let core = ActionCore {
            version: ACTION_VERSION,
            nonce: narrow(tx.nonce, "nonce")?,
            gas_limit: narrow(tx.gas, "gas limit")?,
            gas_price: tx.gas_price.to_string(),
            chain_id: ENVELOPE_CHAIN_ID,
        };

        let amount = tx.value.to_string();
        let payload = match recipient {
            Recipient::Account(to) => ActionPayload::Transfer(Transfer {
                amount,
                recipient: address_literal(&to),
                payload: tx.data.clone(),
            }),
            Recipient::Contract(to) => ActionPayload::Execution(Execution {
                amount,
                contract: address_literal(&to),
                data: tx.data.clone(),
            }),
            Recipient::Creation => ActionPayload::Execution(Execution {
                amount,
                contract: String::new(),
                data: tx.data.clone(),
            }),
        };

        Ok(Action {
            core,
            sender_pub_key: signer.public_key.into(),
            signature: signer.signature.into(),
            encoding: Encoding::Ethereum,
            payload,
        })
    }
}

fn address_literal(address: &Address) -> String {
    format!("{address:?}")
}

fn narrow(value: U256, field: &'static str) -> Result<u64, ActionError> {
    if value.bits() > 64 {
        return Err(ActionError::FieldOverflow { field, value })
    }
    Ok(value.as_u64())
}
