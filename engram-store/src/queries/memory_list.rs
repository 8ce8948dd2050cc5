//! Paged listing with namespace/category filters.

use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};

use engram_core::errors::EngramResult;
use engram_core::memory::{Category, Memory};

use super::memory_crud::{parse_memory_row, MEMORY_COLUMNS};
use crate::store_err;

/// List memories ordered by `created_at DESC, id ASC`, returning the page
/// and the total row count under the same filters.
pub fn list_memories(
    conn: &Connection,
    namespace: Option<&str>,
    category: Option<Category>,
    limit: usize,
    offset: usize,
    dim: usize,
) -> EngramResult<(Vec<Memory>, u64)> {
    let mut where_clauses: Vec<&str> = Vec::new();
    let mut args: Vec<SqlValue> = Vec::new();

    if let Some(ns) = namespace {
        where_clauses.push("namespace = ?");
        args.push(SqlValue::Text(ns.to_string()));
    }
    if let Some(cat) = category {
        where_clauses.push("category = ?");
        args.push(SqlValue::Text(cat.as_str().to_string()));
    }

    let where_sql = if where_clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", where_clauses.join(" AND "))
    };

    let total: i64 = conn
        .query_row(
            &format!("SELECT COUNT(*) FROM memories {where_sql}"),
            params_from_iter(args.iter()),
            |row| row.get(0),
        )
        .map_err(|e| store_err(e.to_string()))?;

    let sql = format!(
        "SELECT {MEMORY_COLUMNS} FROM memories {where_sql}
         ORDER BY created_at DESC, id ASC
         LIMIT ? OFFSET ?"
    );
    let mut page_args = args;
    page_args.push(SqlValue::Integer(limit as i64));
    page_args.push(SqlValue::Integer(offset as i64));

    let mut stmt = conn.prepare(&sql).map_err(|e| store_err(e.to_string()))?;
    let rows = stmt
        .query_map(params_from_iter(page_args.iter()), |row| {
            parse_memory_row(row, dim)
        })
        .map_err(|e| store_err(e.to_string()))?;

    let mut memories = Vec::new();
    for row in rows {
        memories.push(row.map_err(|e| store_err(e.to_string()))?);
    }
    Ok((memories, total.max(0) as u64))
}
