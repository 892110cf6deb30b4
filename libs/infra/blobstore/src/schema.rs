// [libs/infra/blobstore/src/schema.rs]
//! Schema bootstrap for the local blob map.
//!
//! A single `kv` table plus `PRAGMA user_version` as a migration marker.
//! The reference implementation this store replaces also carried legacy
//! `study`/`studyEntry` tables; this store is content-addressed blobs only
//! and does not reinstate them.

use crate::errors::DbError;
use libsql::Connection;
use tracing::{debug, info, instrument};

const SCHEMA_VERSION: i64 = 1;

const TABLES: &[(&str, &str)] = &[(
    "TABLE_KV",
    r#"
        CREATE TABLE IF NOT EXISTS kv (
            key BLOB PRIMARY KEY,
            value BLOB NOT NULL
        );
    "#,
)];

/// Creates the `kv` table if absent and stamps the schema version.
#[instrument(skip(conn))]
pub async fn apply_schema(conn: &Connection) -> Result<(), DbError> {
    for (name, sql) in TABLES {
        debug!(table = *name, "applying schema statement");
        conn.execute(sql, ()).await?;
    }

    let mut rows = conn.query("PRAGMA user_version", ()).await?;
    let current: i64 = match rows.next().await? {
        Some(row) => row.get(0)?,
        None => 0,
    };

    if current < SCHEMA_VERSION {
        conn.execute(&format!("PRAGMA user_version = {SCHEMA_VERSION}"), ())
            .await?;
        info!(from = current, to = SCHEMA_VERSION, "bumped schema version");
    }

    Ok(())
}
