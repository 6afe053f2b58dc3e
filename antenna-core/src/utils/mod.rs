//! Hashing and serialization helpers shared across the workspace.

mod hash;
pub use hash::{keccak256, serialize};
