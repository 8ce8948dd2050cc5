//! Forward-only schema migrations governed by the `schema_version` meta row.
//!
//! Run on the writer at open, inside one transaction. A database newer
//! than this binary fails startup with `SchemaMismatch`.

mod v001_initial;

use rusqlite::{params, Connection, OptionalExtension};

use engram_core::constants::SCHEMA_VERSION;
use engram_core::errors::{EngramError, EngramResult};

use crate::store_err;

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> EngramResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS meta (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
    )
    .map_err(|e| store_err(e.to_string()))?;

    let current = read_schema_version(conn)?;
    if current > SCHEMA_VERSION {
        return Err(EngramError::SchemaMismatch {
            found: current,
            supported: SCHEMA_VERSION,
        });
    }

    let tx = conn
        .unchecked_transaction()
        .map_err(|e| store_err(format!("migrations begin: {e}")))?;

    if current < 1 {
        v001_initial::migrate(&tx)?;
    }

    write_meta(&tx, "schema_version", &SCHEMA_VERSION.to_string())?;
    tx.commit()
        .map_err(|e| store_err(format!("migrations commit: {e}")))?;

    if current < SCHEMA_VERSION {
        tracing::info!(from = current, to = SCHEMA_VERSION, "schema migrated");
    }
    Ok(())
}

/// Read the current schema version; 0 means a fresh database.
pub fn read_schema_version(conn: &Connection) -> EngramResult<u32> {
    let value = read_meta(conn, "schema_version")?;
    match value {
        Some(v) => v
            .parse::<u32>()
            .map_err(|e| store_err(format!("schema_version not an integer: {e}"))),
        None => Ok(0),
    }
}

/// Read a meta row.
pub fn read_meta(conn: &Connection, key: &str) -> EngramResult<Option<String>> {
    conn.query_row(
        "SELECT value FROM meta WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| store_err(e.to_string()))
}

/// Upsert a meta row.
pub fn write_meta(conn: &Connection, key: &str, value: &str) -> EngramResult<()> {
    conn.execute(
        "INSERT INTO meta (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )
    .map_err(|e| store_err(e.to_string()))?;
    Ok(())
}
