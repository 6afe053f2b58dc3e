//! IoTeX datatypes, plus the Ethereum types carried over by the legacy
//! transaction wire format.

/// The hash identifying a submitted action.
pub use ethereum_types::H256 as ActionHash;

// Re-export common datatypes. Addresses keep their Ethereum layout: the
// legacy wire format carries 20-byte recipients.
pub use ethereum_types::{Address, H160, H256, U256, U64};

mod bytes;
pub use bytes::{deserialize_bytes, serialize_bytes, Bytes, ParseBytesError};

mod transaction;
pub use transaction::{DecodeError, LegacyTransaction};

mod signature;
pub use signature::{to_replay_protected_v, RecoveredSigner, RecoveryError, Signature};

mod action;
pub use action::{
    Action, ActionCore, ActionError, ActionPayload, Encoding, Execution, Recipient, Transfer,
};

mod account;
pub use account::AccountMeta;
