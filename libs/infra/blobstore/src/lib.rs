// [libs/infra/blobstore/src/lib.rs]
#![deny(missing_docs)]

//! Durable, content-addressed blob storage backed by an embedded libSQL
//! database file.
//!
//! This crate owns the on-disk schema, connection bootstrap, and the
//! `BlobStore` API used by the protocol layer to persist and retrieve
//! blobs keyed by their 32-byte content address.

/// Failure modes of the durable blob map.
pub mod errors;
/// Connection bootstrap for the underlying libSQL database file.
pub mod client;
/// Schema creation and migration bookkeeping.
pub mod schema;
/// The `BlobStore` key-value API.
pub mod store;

pub use crate::errors::DbError;
pub use crate::store::BlobStore;
