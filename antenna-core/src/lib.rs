#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]
//! IoTeX data types, cryptography and utilities.
//!
//! This crate provides the typed building blocks for relaying externally
//! signed Ethereum legacy transactions onto IoTeX: the RLP decoder for the
//! signed legacy tuple, public key recovery from its replay-protected
//! signature, and the native action envelope the chain expects.
//!
//! All of the pipeline stages in this crate are synchronous and free of
//! side effects; anything that talks to a gateway lives in
//! `antenna-providers`.

pub mod types;

pub mod utils;

/// Re-export of the secp256k1 implementation backing signature recovery,
/// so downstream crates and tests sign with the exact same curve arithmetic.
pub use k256;
