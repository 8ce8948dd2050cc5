//! Recall access-stat updates.

use rusqlite::{params, Connection};

use engram_core::errors::EngramResult;

use crate::store_err;

/// Atomically increment `access_count` and set `last_accessed` for each id.
/// One transaction; missing ids are ignored.
pub fn bump_access(conn: &Connection, ids: &[String], at: i64) -> EngramResult<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| store_err(format!("bump begin: {e}")))?;
    {
        let mut stmt = tx
            .prepare_cached(
                "UPDATE memories
                 SET access_count = access_count + 1,
                     last_accessed = ?1
                 WHERE id = ?2",
            )
            .map_err(|e| store_err(e.to_string()))?;
        for id in ids {
            stmt.execute(params![at, id])
                .map_err(|e| store_err(e.to_string()))?;
        }
    }
    tx.commit().map_err(|e| store_err(format!("bump commit: {e}")))
}
