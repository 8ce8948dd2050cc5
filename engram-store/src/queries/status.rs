//! Aggregate counts for the status surface.

use std::collections::BTreeMap;

use rusqlite::Connection;

use engram_core::errors::EngramResult;
use engram_core::models::MemoryStats;

use crate::store_err;

/// Collect total / embedded / per-category / per-namespace counts.
pub fn memory_stats(conn: &Connection) -> EngramResult<MemoryStats> {
    let total: i64 = conn
        .query_row("SELECT COUNT(*) FROM memories", [], |row| row.get(0))
        .map_err(|e| store_err(e.to_string()))?;
    let with_embeddings: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM memories WHERE embedding IS NOT NULL",
            [],
            |row| row.get(0),
        )
        .map_err(|e| store_err(e.to_string()))?;

    let by_category = grouped_counts(conn, "category")?;
    let by_namespace = grouped_counts(conn, "namespace")?;

    Ok(MemoryStats {
        total: total.max(0) as u64,
        with_embeddings: with_embeddings.max(0) as u64,
        by_category,
        by_namespace,
    })
}

fn grouped_counts(conn: &Connection, column: &str) -> EngramResult<BTreeMap<String, u64>> {
    let sql = format!("SELECT {column}, COUNT(*) FROM memories GROUP BY {column}");
    let mut stmt = conn.prepare(&sql).map_err(|e| store_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })
        .map_err(|e| store_err(e.to_string()))?;

    let mut out = BTreeMap::new();
    for row in rows {
        let (key, count) = row.map_err(|e| store_err(e.to_string()))?;
        out.insert(key, count.max(0) as u64);
    }
    Ok(out)
}
