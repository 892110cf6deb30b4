// [libs/infra/blobstore/src/errors.rs]

use thiserror::Error;

/// Failure modes of the durable blob map.
#[derive(Error, Debug)]
pub enum DbError {
    /// Failed to open or bootstrap the local database file.
    #[error("[L3_DB_CONNECTION_FAULT]: {0}")]
    ConnectionError(String),

    /// A query or statement was rejected by the embedded SQL engine.
    #[error("[L3_DB_QUERY_FAULT]: {0}")]
    QueryError(#[from] libsql::Error),

    /// `insert` was attempted against a key that already has a value.
    #[error("[L3_DB_KEY_TAKEN]: key already in use")]
    KeyTaken,
}
