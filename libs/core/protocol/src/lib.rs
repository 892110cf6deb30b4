// [libs/core/protocol/src/lib.rs]
#![deny(missing_docs)]

//! Protocol handler: dispatches wire messages against the blob map and
//! the membership summary, preserving the invariant that the two never
//! observably disagree.

/// Key-format validation and the content-addressing scheme.
pub mod hashing;
/// The `Server` type and its request dispatch.
pub mod server;

pub use crate::hashing::{authenticates, encode_key, parse_key, sha256};
pub use crate::server::{derive_key, Server, SERVER_PROTO};
