// [libs/core/vicbf/src/lib.rs]
#![deny(missing_docs)]

//! Variable-increment counting Bloom filter (VICBF).
//!
//! A counting Bloom filter where each of the `k` hash positions draws its
//! own increment from `1..=l` rather than a fixed `+1`. This crate owns the
//! filter itself, the fixed hashing scheme used to derive slot/increment
//! pairs, and a memoized compressed-serialization cache so that serving
//! the filter to clients doesn't re-serialize it on every handshake.

/// Failure modes for filter construction, removal and deserialization.
pub mod errors;
/// Deterministic slot/increment derivation shared by insert, remove and contains.
pub mod hashing;
/// The counting filter: construction, mutation, membership, wire format.
pub mod filter;
/// A filter paired with its memoized compressed serialization.
pub mod cache;

pub use crate::cache::CachedVicbf;
pub use crate::errors::FilterError;
pub use crate::filter::{Vicbf, WIRE_VERSION};
