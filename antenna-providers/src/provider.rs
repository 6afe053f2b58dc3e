//! The gateway provider and the legacy raw-transaction relay.

use crate::{Http, JsonRpcClient, MockClient};

use antenna_core::{
    types::{
        AccountMeta, Action, ActionError, ActionHash, Address, DecodeError, LegacyTransaction,
        Recipient, RecoveryError, U256,
    },
    utils::serialize,
};

use rlp::Rlp;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// An error thrown by a [`Provider`] RPC binding.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// An internal error in the JSON-RPC client
    #[error(transparent)]
    JsonRpcClientError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// An error produced while relaying a legacy raw transaction.
///
/// Every variant is terminal for the relay: either a complete envelope is
/// submitted and an action hash returned, or nothing is submitted at all.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The raw bytes were not a well-formed signed legacy tuple
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The signature could not be resolved to a public key
    #[error(transparent)]
    Recovery(#[from] RecoveryError),

    /// A decoded field does not fit the action envelope
    #[error(transparent)]
    Action(#[from] ActionError),

    /// The gateway holds no metadata for the recipient, so it cannot be
    /// classified as account or contract
    #[error("no account metadata for recipient {0}")]
    Classification(String),

    /// The transport failed; nothing was retried
    #[error(transparent)]
    Transport(#[from] ProviderError),
}

/// A client for the gateway's native JSON-RPC namespace, generic over the
/// data transport.
#[derive(Clone, Debug)]
pub struct Provider<P> {
    client: P,
}

impl<P> Provider<P> {
    /// Instantiate a new provider with a transport.
    pub fn new(client: P) -> Self {
        Self { client }
    }

    /// A reference to the underlying transport.
    pub fn client(&self) -> &P {
        &self.client
    }
}

// JSON-RPC bindings
impl<P: JsonRpcClient> Provider<P> {
    async fn request<T, R>(&self, method: &str, params: T) -> Result<R, ProviderError>
    where
        T: Debug + serde::Serialize + Send + Sync,
        R: DeserializeOwned,
    {
        self.client.request(method, params).await.map_err(Into::into)
    }

    /// Fetches the account record for `address`, or `None` if the gateway
    /// has no metadata for it.
    pub async fn get_account(&self, address: Address) -> Result<Option<AccountMeta>, ProviderError> {
        let address = serialize(&format!("{address:?}"));
        self.request("iotx_getAccount", [address]).await
    }

    /// Submits a sealed action and returns its hash.
    pub async fn send_action(&self, action: &Action) -> Result<ActionHash, ProviderError> {
        let action = serialize(action);
        self.request("iotx_sendAction", [action]).await
    }

    /// Asks the gateway for its current gas price suggestion.
    pub async fn suggest_gas_price(&self) -> Result<U256, ProviderError> {
        self.request("iotx_suggestGasPrice", ()).await
    }

    /// Estimates the gas an action would consume if submitted now.
    pub async fn estimate_action_gas(&self, action: &Action) -> Result<U256, ProviderError> {
        let action = serialize(action);
        self.request("iotx_estimateActionGasConsumption", [action]).await
    }

    /// Relays an externally signed Ethereum legacy transaction as a native
    /// action: decode the raw tuple, recover the signer under `chain_id`,
    /// classify the recipient against gateway state, seal the envelope and
    /// submit it.
    ///
    /// The single attempt either returns the submitted action's hash or
    /// fails as a whole; no envelope is ever submitted after an earlier
    /// stage fails.
    pub async fn relay_raw_transaction(
        &self,
        raw: &[u8],
        chain_id: u64,
    ) -> Result<ActionHash, RelayError> {
        let (tx, sig) = LegacyTransaction::decode_signed_rlp(&Rlp::new(raw))?;
        let signer = sig.recover_signer(tx.sighash(chain_id), chain_id)?;
        debug!(nonce = %tx.nonce, to = ?tx.to, chain_id, "decoded legacy transaction");

        let recipient = match tx.to {
            Some(to) => match self.get_account(to).await? {
                Some(meta) if meta.is_contract => Recipient::Contract(to),
                Some(_) => Recipient::Account(to),
                None => return Err(RelayError::Classification(format!("{to:?}"))),
            },
            None => Recipient::Creation,
        };
        debug!(?recipient, "classified recipient");

        let action = Action::from_legacy(&tx, &signer, recipient)?;
        let hash = self.send_action(&action).await?;
        debug!(hash = ?hash, "submitted action");
        Ok(hash)
    }
}

impl Provider<Http> {
    /// Connects to the gateway at the given URL.
    pub fn connect(url: impl Into<Url>) -> Self {
        Self::new(Http::new(url))
    }
}

impl TryFrom<&str> for Provider<Http> {
    type Error = url::ParseError;

    fn try_from(src: &str) -> Result<Self, Self::Error> {
        Ok(Provider::new(src.parse::<Http>()?))
    }
}

impl TryFrom<String> for Provider<Http> {
    type Error = url::ParseError;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        Provider::try_from(src.as_str())
    }
}

impl Provider<MockClient> {
    /// Returns a provider over a scripted transport, along with a handle
    /// to drive and inspect it.
    pub fn mocked() -> (Self, MockClient) {
        let mock = MockClient::new();
        (Self::new(mock.clone()), mock)
    }
}
