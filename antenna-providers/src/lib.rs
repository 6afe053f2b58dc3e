#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]
//! # Clients for the IoTeX gateway JSON-RPC API
//!
//! This crate provides asynchronous clients for the gateway's native
//! namespace, and the raw-transaction relay built on top of them: an
//! externally signed Ethereum legacy transaction goes in, a native action
//! hash comes out.
//!
//! ```no_run
//! use antenna_providers::{Http, Provider};
//!
//! # async fn foo() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = Provider::<Http>::try_from("http://localhost:15014")?;
//!
//! // bytes exactly as produced by an Ethereum wallet for chain id 4689
//! let raw = std::fs::read("transfer.rlp")?;
//! let hash = provider.relay_raw_transaction(&raw, 4689).await?;
//! println!("submitted action {hash:?}");
//! # Ok(())
//! # }
//! ```

mod transports;
pub use transports::*;

mod provider;
pub use provider::{Provider, ProviderError, RelayError};

use async_trait::async_trait;
use auto_impl::auto_impl;
use serde::{de::DeserializeOwned, Serialize};
use std::{error::Error, fmt::Debug};

/// Trait which must be implemented by data transports to be used with the
/// gateway JSON-RPC provider.
#[async_trait]
#[auto_impl(&, Box, Arc)]
pub trait JsonRpcClient: Debug + Send + Sync {
    /// A transport-specific error
    type Error: Error + Into<ProviderError>;

    /// Sends a request with the provided method and parameters serialized
    /// as JSON
    async fn request<T, R>(&self, method: &str, params: T) -> Result<R, Self::Error>
    where
        T: Debug + Serialize + Send + Sync,
        R: DeserializeOwned;
}
