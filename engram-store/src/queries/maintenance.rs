//! Queries backing the consolidation passes: decay candidates, batched
//! confidence updates, stale-row selection, entity-grouped rows.

use rusqlite::{params, Connection};

use engram_core::errors::EngramResult;
use engram_core::memory::Category;

use crate::codec;
use crate::store_err;

/// Row shape for the decay pass.
#[derive(Debug, Clone)]
pub struct DecayRow {
    pub id: String,
    pub confidence: f64,
    pub decay_rate: f64,
    pub updated_at: i64,
    pub last_accessed: Option<i64>,
}

/// All memories with a positive decay rate, ordered by id.
pub fn decay_candidates(conn: &Connection) -> EngramResult<Vec<DecayRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, confidence, decay_rate, updated_at, last_accessed
             FROM memories WHERE decay_rate > 0 ORDER BY id ASC",
        )
        .map_err(|e| store_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok(DecayRow {
                id: row.get(0)?,
                confidence: row.get(1)?,
                decay_rate: row.get(2)?,
                updated_at: row.get(3)?,
                last_accessed: row.get(4)?,
            })
        })
        .map_err(|e| store_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| store_err(e.to_string()))?);
    }
    Ok(out)
}

/// Write a batch of decayed confidences in one transaction, touching
/// `updated_at` on each written row.
pub fn apply_confidence_updates(
    conn: &Connection,
    updates: &[(String, f64)],
    updated_at: i64,
) -> EngramResult<()> {
    if updates.is_empty() {
        return Ok(());
    }
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| store_err(format!("decay begin: {e}")))?;
    {
        let mut stmt = tx
            .prepare_cached(
                "UPDATE memories SET confidence = ?1, updated_at = ?2 WHERE id = ?3",
            )
            .map_err(|e| store_err(e.to_string()))?;
        for (id, confidence) in updates {
            stmt.execute(params![confidence, updated_at, id])
                .map_err(|e| store_err(e.to_string()))?;
        }
    }
    tx.commit().map_err(|e| store_err(format!("decay commit: {e}")))
}

/// Ids eligible for stale cleanup: low confidence, old, never recalled.
pub fn stale_candidate_ids(
    conn: &Connection,
    max_confidence: f64,
    min_age_days: f64,
    now_ms: i64,
) -> EngramResult<Vec<String>> {
    let cutoff = now_ms - (min_age_days * engram_core::time::MS_PER_DAY) as i64;
    let mut stmt = conn
        .prepare(
            "SELECT id FROM memories
             WHERE confidence < ?1 AND created_at < ?2 AND access_count = 0
             ORDER BY id ASC",
        )
        .map_err(|e| store_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![max_confidence, cutoff], |row| row.get::<_, String>(0))
        .map_err(|e| store_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| store_err(e.to_string()))?);
    }
    Ok(out)
}

/// Row shape for contradiction detection: embedded rows that name an entity.
#[derive(Debug, Clone)]
pub struct EntityRow {
    pub id: String,
    pub entity: String,
    pub content: String,
    pub category: Category,
    pub namespace: String,
    pub confidence: f64,
    pub created_at: i64,
    pub embedding: Vec<f32>,
}

/// Embedded memories with a non-null entity, ordered by (entity,
/// created_at, id) so callers can group by entity in one pass and pairs
/// come out in ingest order.
pub fn embedded_with_entity(conn: &Connection, dim: usize) -> EngramResult<Vec<EntityRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, entity, content, category, namespace, confidence, created_at, embedding
             FROM memories
             WHERE entity IS NOT NULL AND embedding IS NOT NULL
             ORDER BY entity ASC, created_at ASC, id ASC",
        )
        .map_err(|e| store_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, f64>(5)?,
                row.get::<_, i64>(6)?,
                row.get::<_, Vec<u8>>(7)?,
            ))
        })
        .map_err(|e| store_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        let (id, entity, content, category, namespace, confidence, created_at, blob) =
            row.map_err(|e| store_err(e.to_string()))?;
        let Some(embedding) = codec::blob_to_embedding(&blob, dim) else {
            continue;
        };
        out.push(EntityRow {
            id,
            entity,
            content,
            category: Category::parse(&category).unwrap_or_default(),
            namespace,
            confidence,
            created_at,
            embedding,
        });
    }
    Ok(out)
}
