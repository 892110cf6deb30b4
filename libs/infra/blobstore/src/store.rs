// [libs/infra/blobstore/src/store.rs]
//! The durable blob map: `key -> value`, keyed by a 32-byte content address.

use crate::client::DbClient;
use crate::errors::DbError;
use libsql::params;
use tracing::instrument;

/// A durable, content-addressed key-value store.
pub struct BlobStore {
    client: DbClient,
}

impl BlobStore {
    /// Opens the store at `path`, creating the schema if this is a fresh file.
    pub async fn open(path: &str) -> Result<Self, DbError> {
        let client = DbClient::connect(path).await?;
        Ok(Self { client })
    }

    /// Inserts `value` under `key`. Fails with [`DbError::KeyTaken`] if the
    /// key already has a value -- this store never overwrites a blob.
    #[instrument(skip(self, value))]
    pub async fn insert(&self, key: &[u8; 32], value: &[u8]) -> Result<(), DbError> {
        let conn = self.client.connection()?;
        if self.get_inner(&conn, key).await?.is_some() {
            return Err(DbError::KeyTaken);
        }
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)",
            params![key.as_slice(), value],
        )
        .await?;
        Ok(())
    }

    /// Fetches the value stored under `key`, if any.
    #[instrument(skip(self))]
    pub async fn get(&self, key: &[u8; 32]) -> Result<Option<Vec<u8>>, DbError> {
        let conn = self.client.connection()?;
        self.get_inner(&conn, key).await
    }

    async fn get_inner(
        &self,
        conn: &libsql::Connection,
        key: &[u8; 32],
    ) -> Result<Option<Vec<u8>>, DbError> {
        let mut rows = conn
            .query("SELECT value FROM kv WHERE key = ?1", params![key.as_slice()])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<Vec<u8>>(0)?)),
            None => Ok(None),
        }
    }

    /// Deletes the blob stored under `key`. Returns whether a row existed.
    #[instrument(skip(self))]
    pub async fn delete(&self, key: &[u8; 32]) -> Result<bool, DbError> {
        let conn = self.client.connection()?;
        let changed = conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key.as_slice()])
            .await?;
        Ok(changed > 0)
    }

    /// Lists every key currently held, for rebuilding the membership filter
    /// at startup.
    #[instrument(skip(self))]
    pub async fn all_keys(&self) -> Result<Vec<[u8; 32]>, DbError> {
        let conn = self.client.connection()?;
        let mut rows = conn.query("SELECT key FROM kv", ()).await?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next().await? {
            let raw: Vec<u8> = row.get(0)?;
            let key: [u8; 32] = raw.try_into().map_err(|raw: Vec<u8>| {
                DbError::ConnectionError(format!("stored key had {} bytes, expected 32", raw.len()))
            })?;
            keys.push(key);
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};

    fn key_for(label: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(label);
        hasher.finalize().into()
    }

    async fn open_temp() -> (BlobStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blobs.db");
        let store = BlobStore::open(path.to_str().unwrap()).await.unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let (store, _dir) = open_temp().await;
        let key = key_for(b"alpha");
        store.insert(&key, b"hello world").await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), Some(b"hello world".to_vec()));
    }

    #[tokio::test]
    async fn get_on_absent_key_is_none() {
        let (store, _dir) = open_temp().await;
        assert_eq!(store.get(&key_for(b"ghost")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn insert_on_existing_key_is_key_taken() {
        let (store, _dir) = open_temp().await;
        let key = key_for(b"beta");
        store.insert(&key, b"first").await.unwrap();
        let err = store.insert(&key, b"second").await.unwrap_err();
        assert!(matches!(err, DbError::KeyTaken));
    }

    #[tokio::test]
    async fn delete_removes_and_reports_presence() {
        let (store, _dir) = open_temp().await;
        let key = key_for(b"gamma");
        assert!(!store.delete(&key).await.unwrap());
        store.insert(&key, b"value").await.unwrap();
        assert!(store.delete(&key).await.unwrap());
        assert_eq!(store.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn all_keys_lists_every_inserted_key() {
        let (store, _dir) = open_temp().await;
        let a = key_for(b"one");
        let b = key_for(b"two");
        store.insert(&a, b"1").await.unwrap();
        store.insert(&b, b"2").await.unwrap();

        let mut keys = store.all_keys().await.unwrap();
        keys.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(keys, expected);
    }
}
