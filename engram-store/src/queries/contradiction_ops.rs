//! Contradiction CRUD and the unresolved-cascade applied on memory deletes.

use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use engram_core::errors::{EngramError, EngramResult};
use engram_core::memory::Category;
use engram_core::models::{Contradiction, ContradictionStatus, ResolutionAction};

use crate::store_err;

/// Insert a detected contradiction.
pub fn put_contradiction(conn: &Connection, c: &Contradiction) -> EngramResult<()> {
    conn.execute(
        "INSERT INTO contradictions (
            id, memory1_id, memory2_id, entity, confidence, reason,
            status, resolution_action, detected_at, resolved_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            c.id,
            c.memory1_id,
            c.memory2_id,
            c.entity,
            c.confidence,
            c.reason,
            c.status.as_str(),
            c.resolution_action.map(|a| a.as_str()),
            c.detected_at,
            c.resolved_at,
        ],
    )
    .map_err(|e| store_err(e.to_string()))?;
    Ok(())
}

/// Whether an unresolved contradiction already links this pair (either order).
pub fn unresolved_pair_exists(
    conn: &Connection,
    memory1_id: &str,
    memory2_id: &str,
) -> EngramResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM contradictions
             WHERE status = 'unresolved'
               AND ((memory1_id = ?1 AND memory2_id = ?2)
                 OR (memory1_id = ?2 AND memory2_id = ?1))",
            params![memory1_id, memory2_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| store_err(e.to_string()))?;
    Ok(found.is_some())
}

/// Sort orders for contradiction listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContradictionSort {
    #[default]
    DetectedDesc,
    ConfidenceDesc,
}

/// List contradictions with optional status and memory-category filters,
/// plus the unresolved total under the same category filter.
pub fn list_contradictions(
    conn: &Connection,
    status: Option<ContradictionStatus>,
    category: Option<Category>,
    sort: ContradictionSort,
) -> EngramResult<(Vec<Contradiction>, u64)> {
    let mut where_clauses: Vec<&str> = Vec::new();
    let mut args: Vec<String> = Vec::new();

    if let Some(s) = status {
        where_clauses.push("c.status = ?");
        args.push(s.as_str().to_string());
    }
    if let Some(cat) = category {
        where_clauses.push(CATEGORY_FILTER);
        args.push(cat.as_str().to_string());
    }

    let where_sql = if where_clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", where_clauses.join(" AND "))
    };
    let order_sql = match sort {
        ContradictionSort::DetectedDesc => "ORDER BY c.detected_at DESC, c.id ASC",
        ContradictionSort::ConfidenceDesc => "ORDER BY c.confidence DESC, c.id ASC",
    };

    let sql = format!(
        "SELECT c.id, c.memory1_id, c.memory2_id, c.entity, c.confidence,
                c.reason, c.status, c.resolution_action, c.detected_at, c.resolved_at
         FROM contradictions c {where_sql} {order_sql}"
    );

    let mut stmt = conn.prepare(&sql).map_err(|e| store_err(e.to_string()))?;
    let rows = stmt
        .query_map(params_from_iter(args.iter()), parse_contradiction_row)
        .map_err(|e| store_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| store_err(e.to_string()))?);
    }

    let mut count_args: Vec<String> = Vec::new();
    let count_sql = match category {
        Some(cat) => {
            count_args.push(cat.as_str().to_string());
            format!(
                "SELECT COUNT(*) FROM contradictions c
                 WHERE c.status = 'unresolved' AND {CATEGORY_FILTER}"
            )
        }
        None => "SELECT COUNT(*) FROM contradictions c WHERE c.status = 'unresolved'".to_string(),
    };
    let unresolved: i64 = conn
        .query_row(&count_sql, params_from_iter(count_args.iter()), |row| row.get(0))
        .map_err(|e| store_err(e.to_string()))?;

    Ok((out, unresolved.max(0) as u64))
}

/// A contradiction matches a category filter when either referenced memory
/// has that category.
const CATEGORY_FILTER: &str = "EXISTS (
    SELECT 1 FROM memories m
    WHERE m.id IN (c.memory1_id, c.memory2_id) AND m.category = ?
)";

/// Load one contradiction.
pub fn get_contradiction(conn: &Connection, id: &str) -> EngramResult<Option<Contradiction>> {
    conn.query_row(
        "SELECT id, memory1_id, memory2_id, entity, confidence, reason,
                status, resolution_action, detected_at, resolved_at
         FROM contradictions WHERE id = ?1",
        params![id],
        parse_contradiction_row,
    )
    .optional()
    .map_err(|e| store_err(e.to_string()))
}

/// Resolve a contradiction in one transaction.
///
/// keep_first / keep_second delete the losing memory (a no-op when it is
/// already gone; the resolution is an idempotent sink); keep_both and
/// dismiss touch no memories. The row survives with its final status so
/// the outcome stays auditable.
pub fn resolve_contradiction(
    conn: &Connection,
    id: &str,
    action: ResolutionAction,
    at: i64,
) -> EngramResult<Contradiction> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| store_err(format!("resolve begin: {e}")))?;

    let Some(mut c) = get_contradiction(&tx, id)? else {
        return Err(EngramError::NotFound { id: id.to_string() });
    };

    let loser = match action {
        ResolutionAction::KeepFirst => Some(c.memory2_id.clone()),
        ResolutionAction::KeepSecond => Some(c.memory1_id.clone()),
        ResolutionAction::KeepBoth | ResolutionAction::Dismiss => None,
    };

    if let Some(loser_id) = loser {
        // Cascade other unresolved contradictions off the loser, then
        // delete it. This row is updated below, not cascaded.
        tx.execute(
            "DELETE FROM contradictions
             WHERE status = 'unresolved' AND id != ?1
               AND (memory1_id = ?2 OR memory2_id = ?2)",
            params![id, loser_id],
        )
        .map_err(|e| store_err(e.to_string()))?;
        tx.execute("DELETE FROM memories WHERE id = ?1", params![loser_id])
            .map_err(|e| store_err(e.to_string()))?;
    }

    c.status = action.final_status();
    c.resolution_action = Some(action);
    c.resolved_at = Some(at);

    tx.execute(
        "UPDATE contradictions
         SET status = ?1, resolution_action = ?2, resolved_at = ?3
         WHERE id = ?4",
        params![c.status.as_str(), action.as_str(), at, id],
    )
    .map_err(|e| store_err(e.to_string()))?;

    tx.commit()
        .map_err(|e| store_err(format!("resolve commit: {e}")))?;
    Ok(c)
}

/// Delete unresolved contradictions referencing any of the given memory
/// ids. Called inside every memory-delete transaction; resolved and
/// dismissed rows are historical records and stay.
pub fn cascade_unresolved(conn: &Connection, memory_ids: &[String]) -> EngramResult<()> {
    if memory_ids.is_empty() {
        return Ok(());
    }
    let mut stmt = conn
        .prepare_cached(
            "DELETE FROM contradictions
             WHERE status = 'unresolved'
               AND (memory1_id = ?1 OR memory2_id = ?1)",
        )
        .map_err(|e| store_err(e.to_string()))?;
    for id in memory_ids {
        stmt.execute(params![id])
            .map_err(|e| store_err(e.to_string()))?;
    }
    Ok(())
}

fn parse_contradiction_row(row: &Row<'_>) -> rusqlite::Result<Contradiction> {
    let status_str: String = row.get(6)?;
    let action_str: Option<String> = row.get(7)?;
    Ok(Contradiction {
        id: row.get(0)?,
        memory1_id: row.get(1)?,
        memory2_id: row.get(2)?,
        entity: row.get(3)?,
        confidence: row.get(4)?,
        reason: row.get(5)?,
        status: ContradictionStatus::parse(&status_str)
            .unwrap_or(ContradictionStatus::Unresolved),
        resolution_action: action_str.as_deref().and_then(ResolutionAction::parse),
        detected_at: row.get(8)?,
        resolved_at: row.get(9)?,
    })
}
