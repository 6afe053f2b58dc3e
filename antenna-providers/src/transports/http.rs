use crate::{provider::ProviderError, JsonRpcClient};

use super::common::{JsonRpcError, Request, Response};

use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fmt::Debug,
    str::FromStr,
    sync::atomic::{AtomicU64, Ordering},
};
use thiserror::Error;
use url::Url;

/// A low-level JSON-RPC client over HTTP.
///
/// # Example
///
/// ```no_run
/// use antenna_providers::{Http, JsonRpcClient};
/// use std::str::FromStr;
///
/// # async fn foo() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Http::from_str("http://localhost:15014")?;
/// let gas_price: String = client.request("iotx_suggestGasPrice", ()).await?;
/// # Ok(())
/// # }
/// ```
pub struct Provider {
    id: AtomicU64,
    client: Client,
    url: Url,
}

impl Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Http {{ id: {:?}, url: {} }}", self.id, self.url)
    }
}

/// Error thrown when sending an HTTP request
#[derive(Error, Debug)]
pub enum ClientError {
    /// Thrown if the request failed
    #[error(transparent)]
    ReqwestError(#[from] ReqwestError),

    /// Thrown if the gateway answered with a JSON-RPC error object
    #[error(transparent)]
    JsonRpcError(#[from] JsonRpcError),
}

impl From<ClientError> for ProviderError {
    fn from(src: ClientError) -> Self {
        ProviderError::JsonRpcClientError(Box::new(src))
    }
}

#[async_trait]
impl JsonRpcClient for Provider {
    type Error = ClientError;

    /// Sends a POST request with the provided method and the params
    /// serialized as JSON over HTTP
    async fn request<T: Debug + Serialize + Send + Sync, R: DeserializeOwned>(
        &self,
        method: &str,
        params: T,
    ) -> Result<R, ClientError> {
        let next_id = self.id.fetch_add(1, Ordering::SeqCst);
        let payload = Request::new(next_id, method, params);

        let res = self.client.post(self.url.as_ref()).json(&payload).send().await?;
        let res = res.json::<Response<R>>().await?;

        Ok(res.data.into_result()?)
    }
}

impl Provider {
    /// Initializes a new HTTP client
    ///
    /// # Example
    ///
    /// ```
    /// use antenna_providers::Http;
    /// use url::Url;
    ///
    /// let url = Url::parse("http://localhost:15014").unwrap();
    /// let client = Http::new(url);
    /// ```
    pub fn new(url: impl Into<Url>) -> Self {
        Self { id: AtomicU64::new(1), client: Client::new(), url: url.into() }
    }

    /// The gateway endpoint this client posts to
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl FromStr for Provider {
    type Err = url::ParseError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(src)?;
        Ok(Provider::new(url))
    }
}

impl Clone for Provider {
    fn clone(&self) -> Self {
        Self { id: AtomicU64::new(1), client: self.client.clone(), url: self.url.clone() }
    }
}
