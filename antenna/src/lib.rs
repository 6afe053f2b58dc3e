#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]
//! # antenna-rs
//!
//! A Rust client for the IoTeX gateway, focused on relaying externally
//! signed Ethereum legacy transactions as native actions.
//!
//! # Quickstart
//!
//! A prelude is provided which imports all the important things for you.
//!
//! ```no_run
//! use antenna::prelude::*;
//!
//! # async fn foo() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = Provider::<Http>::try_from("http://localhost:15014")?;
//! let raw = std::fs::read("transfer.rlp")?;
//! let hash = provider.relay_raw_transaction(&raw, 4689).await?;
//! # Ok(())
//! # }
//! ```

/// IoTeX data types, cryptography and utilities.
pub mod core {
    pub use antenna_core::*;
}

/// Asynchronous gateway clients and the raw-transaction relay.
pub mod providers {
    pub use antenna_providers::*;
}

/// Commonly used data types.
pub mod types {
    pub use antenna_core::types::*;
}

/// Hashing and serialization helpers.
pub mod utils {
    pub use antenna_core::utils::*;
}

/// Easy imports of frequently used types and traits.
pub mod prelude {
    pub use super::{core::k256, providers::*, types::*, utils::*};
}
