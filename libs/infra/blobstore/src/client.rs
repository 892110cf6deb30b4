// [libs/infra/blobstore/src/client.rs]
//! Connection bootstrap for the local libSQL database file.

use crate::errors::DbError;
use crate::schema::apply_schema;
use libsql::{Builder, Connection, Database};
use std::sync::Arc;
use tracing::{info, instrument};

/// Owns the libSQL database handle and hands out fresh connections.
#[derive(Clone)]
pub struct DbClient {
    database: Arc<Database>,
}

impl DbClient {
    /// Opens (and creates, if absent) the database file at `path` and
    /// applies the schema on a bootstrap connection.
    #[instrument]
    pub async fn connect(path: &str) -> Result<Self, DbError> {
        if path.is_empty() {
            return Err(DbError::ConnectionError("database path is empty".into()));
        }

        info!(path, "opening blob store database");
        let database = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DbError::ConnectionError(format!("failed to open {path}: {e}")))?;

        let bootstrap = database
            .connect()
            .map_err(|e| DbError::ConnectionError(format!("bootstrap connection failed: {e}")))?;
        apply_schema(&bootstrap).await?;

        Ok(Self {
            database: Arc::new(database),
        })
    }

    /// Hands out a fresh connection against the shared database handle.
    pub fn connection(&self) -> Result<Connection, DbError> {
        self.database
            .connect()
            .map_err(|e| DbError::ConnectionError(e.to_string()))
    }
}
