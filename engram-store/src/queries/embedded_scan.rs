//! Bounded scan over embedded memories for recall candidate gathering and
//! consolidation clustering.

use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};

use engram_core::errors::EngramResult;
use engram_core::memory::Category;

use crate::codec;
use crate::store_err;

/// Slim row for scoring: id, vector, and the stats the scorer needs.
/// Ordered by id so the scan is restartable and deterministic.
#[derive(Debug, Clone)]
pub struct EmbeddedRow {
    pub id: String,
    pub embedding: Vec<f32>,
    pub confidence: f64,
    pub access_count: u64,
    pub decay_rate: f64,
    pub created_at: i64,
    pub updated_at: i64,
    pub last_accessed: Option<i64>,
}

/// Scan embedded memories in scope, at most `cap` rows, ordered by id.
/// Rows whose blob length disagrees with the dimension are skipped.
pub fn iterate_embedded(
    conn: &Connection,
    namespace: Option<&str>,
    category: Option<Category>,
    cap: usize,
    dim: usize,
) -> EngramResult<Vec<EmbeddedRow>> {
    let mut where_clauses = vec!["embedding IS NOT NULL"];
    let mut args: Vec<SqlValue> = Vec::new();

    if let Some(ns) = namespace {
        where_clauses.push("namespace = ?");
        args.push(SqlValue::Text(ns.to_string()));
    }
    if let Some(cat) = category {
        where_clauses.push("category = ?");
        args.push(SqlValue::Text(cat.as_str().to_string()));
    }
    args.push(SqlValue::Integer(cap.min(i64::MAX as usize) as i64));

    let sql = format!(
        "SELECT id, embedding, confidence, access_count, decay_rate,
                created_at, updated_at, last_accessed
         FROM memories
         WHERE {}
         ORDER BY id ASC
         LIMIT ?",
        where_clauses.join(" AND ")
    );

    let mut stmt = conn.prepare(&sql).map_err(|e| store_err(e.to_string()))?;
    let rows = stmt
        .query_map(params_from_iter(args.iter()), |row| {
            let blob: Vec<u8> = row.get(1)?;
            Ok((
                row.get::<_, String>(0)?,
                blob,
                row.get::<_, f64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, i64>(5)?,
                row.get::<_, i64>(6)?,
                row.get::<_, Option<i64>>(7)?,
            ))
        })
        .map_err(|e| store_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        let (id, blob, confidence, access_count, decay_rate, created_at, updated_at, last_accessed) =
            row.map_err(|e| store_err(e.to_string()))?;
        let Some(embedding) = codec::blob_to_embedding(&blob, dim) else {
            tracing::warn!(memory_id = %id, "embedding blob length mismatch, skipping row");
            continue;
        };
        out.push(EmbeddedRow {
            id,
            embedding,
            confidence,
            access_count: access_count.max(0) as u64,
            decay_rate,
            created_at,
            updated_at,
            last_accessed,
        });
    }
    Ok(out)
}

/// Count embedded memories in scope (for scan-cap warnings).
pub fn count_embedded(conn: &Connection, namespace: Option<&str>) -> EngramResult<u64> {
    let (sql, args): (&str, Vec<String>) = match namespace {
        Some(ns) => (
            "SELECT COUNT(*) FROM memories WHERE embedding IS NOT NULL AND namespace = ?",
            vec![ns.to_string()],
        ),
        None => ("SELECT COUNT(*) FROM memories WHERE embedding IS NOT NULL", vec![]),
    };
    let count: i64 = conn
        .query_row(sql, params_from_iter(args.iter()), |row| row.get(0))
        .map_err(|e| store_err(e.to_string()))?;
    Ok(count.max(0) as u64)
}

/// Distinct namespaces that hold at least one embedded memory.
pub fn embedded_namespaces(conn: &Connection) -> EngramResult<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT DISTINCT namespace FROM memories
             WHERE embedding IS NOT NULL ORDER BY namespace",
        )
        .map_err(|e| store_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| store_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| store_err(e.to_string()))?);
    }
    Ok(out)
}
