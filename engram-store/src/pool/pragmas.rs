//! PRAGMA configuration applied to every SQLite connection.
//!
//! WAL mode, NORMAL sync, 5s busy_timeout, foreign_keys ON.

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use crate::store_err;

/// Apply performance and safety pragmas to the write connection.
pub fn apply_pragmas(conn: &Connection) -> EngramResult<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        PRAGMA foreign_keys = ON;
        ",
    )
    .map_err(|e| store_err(e.to_string()))?;
    Ok(())
}

/// Pragmas for read connections: same settings minus journal control.
pub fn apply_read_pragmas(conn: &Connection) -> EngramResult<()> {
    conn.execute_batch(
        "
        PRAGMA busy_timeout = 5000;
        PRAGMA foreign_keys = ON;
        ",
    )
    .map_err(|e| store_err(e.to_string()))?;
    Ok(())
}

/// Verify that WAL mode is active on a connection.
pub fn verify_wal_mode(conn: &Connection) -> EngramResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| store_err(e.to_string()))?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
