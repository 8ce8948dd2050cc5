//! Insert, get, delete, bulk delete for memories.

use rusqlite::{params, Connection, OptionalExtension, Row};

use engram_core::errors::{EngramError, EngramResult};
use engram_core::memory::{Category, Confidence, Memory, Source};

use crate::codec;
use crate::store_err;

/// Insert a single memory. Fails with `DuplicateId` when the id exists.
/// The FTS row is written by the insert trigger in the same statement.
pub fn insert_memory(conn: &Connection, memory: &Memory) -> EngramResult<()> {
    let tags_json =
        serde_json::to_string(&memory.tags).map_err(|e| store_err(e.to_string()))?;
    let blob = memory.embedding.as_ref().map(|v| codec::embedding_to_blob(v));

    let result = conn.execute(
        "INSERT INTO memories (
            id, content, entity, category, confidence, embedding, source,
            namespace, tags, access_count, decay_rate, created_at,
            updated_at, last_accessed
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            memory.id,
            memory.content,
            memory.entity,
            memory.category.as_str(),
            memory.confidence.value(),
            blob,
            memory.source.as_str(),
            memory.namespace,
            tags_json,
            memory.access_count as i64,
            memory.decay_rate,
            memory.created_at,
            memory.updated_at,
            memory.last_accessed,
        ],
    );

    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(e, message))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            if id_exists(conn, &memory.id)? {
                Err(EngramError::DuplicateId {
                    id: memory.id.clone(),
                })
            } else {
                Err(store_err(format!("constraint violation: {message:?}")))
            }
        }
        Err(e) => Err(store_err(e.to_string())),
    }
}

fn id_exists(conn: &Connection, id: &str) -> EngramResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM memories WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| store_err(e.to_string()))?;
    Ok(found.is_some())
}

/// Get a single memory by id.
pub fn get_memory(conn: &Connection, id: &str, dim: usize) -> EngramResult<Option<Memory>> {
    let mut stmt = conn
        .prepare_cached(&format!("SELECT {MEMORY_COLUMNS} FROM memories WHERE id = ?1"))
        .map_err(|e| store_err(e.to_string()))?;

    stmt.query_row(params![id], |row| parse_memory_row(row, dim))
        .optional()
        .map_err(|e| store_err(e.to_string()))
}

/// Fetch several memories by id. Missing ids are skipped; order follows
/// the input.
pub fn get_bulk(conn: &Connection, ids: &[String], dim: usize) -> EngramResult<Vec<Memory>> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(m) = get_memory(conn, id, dim)? {
            out.push(m);
        }
    }
    Ok(out)
}

/// Delete one memory and any unresolved contradictions referencing it.
/// Returns whether a row was removed. The FTS delete trigger fires in the
/// same transaction.
pub fn delete_memory(conn: &Connection, id: &str) -> EngramResult<bool> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| store_err(format!("delete begin: {e}")))?;

    super::contradiction_ops::cascade_unresolved(&tx, &[id.to_string()])?;
    let deleted = tx
        .execute("DELETE FROM memories WHERE id = ?1", params![id])
        .map_err(|e| store_err(e.to_string()))?;

    tx.commit()
        .map_err(|e| store_err(format!("delete commit: {e}")))?;
    Ok(deleted > 0)
}

/// Delete several memories in one transaction; returns the count removed.
pub fn bulk_delete(conn: &Connection, ids: &[String]) -> EngramResult<usize> {
    if ids.is_empty() {
        return Ok(0);
    }
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| store_err(format!("bulk delete begin: {e}")))?;

    super::contradiction_ops::cascade_unresolved(&tx, ids)?;
    let mut deleted = 0;
    {
        let mut stmt = tx
            .prepare_cached("DELETE FROM memories WHERE id = ?1")
            .map_err(|e| store_err(e.to_string()))?;
        for id in ids {
            deleted += stmt
                .execute(params![id])
                .map_err(|e| store_err(e.to_string()))?;
        }
    }

    tx.commit()
        .map_err(|e| store_err(format!("bulk delete commit: {e}")))?;
    Ok(deleted)
}

/// Column list shared by every SELECT that maps to a full `Memory`.
pub const MEMORY_COLUMNS: &str = "id, content, entity, category, confidence, embedding, \
     source, namespace, tags, access_count, decay_rate, created_at, updated_at, last_accessed";

/// Map a row selected with `MEMORY_COLUMNS` to a `Memory`. The embedding is
/// read together with its blob in the same query; a length mismatch with
/// the dimension yields `None`, never a misshaped vector.
pub fn parse_memory_row(row: &Row<'_>, dim: usize) -> rusqlite::Result<Memory> {
    let category_str: String = row.get(3)?;
    let source_str: String = row.get(6)?;
    let tags_json: String = row.get(8)?;
    let blob: Option<Vec<u8>> = row.get(5)?;

    Ok(Memory {
        id: row.get(0)?,
        content: row.get(1)?,
        entity: row.get(2)?,
        category: Category::parse(&category_str).unwrap_or_default(),
        confidence: Confidence::new(row.get::<_, f64>(4)?),
        embedding: blob.and_then(|b| codec::blob_to_embedding(&b, dim)),
        source: Source::parse(&source_str).unwrap_or_default(),
        namespace: row.get(7)?,
        tags: serde_json::from_str(&tags_json).unwrap_or_default(),
        access_count: row.get::<_, i64>(9)?.max(0) as u64,
        decay_rate: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
        last_accessed: row.get(13)?,
    })
}
