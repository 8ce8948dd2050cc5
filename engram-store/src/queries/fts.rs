//! FTS5 keyword search over (content, entity, category, namespace).

use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};

use engram_core::errors::EngramResult;
use engram_core::memory::Category;

use crate::store_err;

/// One keyword hit: the memory id and its raw bm25 rank (lower is better).
#[derive(Debug, Clone)]
pub struct FtsHit {
    pub id: String,
    pub rank: f64,
}

/// Run an FTS query restricted by namespace and category, returning at
/// most `limit` hits ordered by rank.
///
/// The caller's free-form query is reduced to its word tokens and each is
/// quoted, so FTS5 operator syntax in user input cannot break the MATCH
/// expression. Tokenization of the terms themselves follows the index
/// tokenizer (unicode folding, case-insensitive).
pub fn fts_query(
    conn: &Connection,
    query: &str,
    namespace: Option<&str>,
    category: Option<Category>,
    limit: usize,
) -> EngramResult<Vec<FtsHit>> {
    let Some(match_expr) = build_match_expr(query) else {
        return Ok(Vec::new());
    };

    let mut where_clauses = vec!["memories_fts MATCH ?"];
    let mut args: Vec<SqlValue> = vec![SqlValue::Text(match_expr)];

    if let Some(ns) = namespace {
        where_clauses.push("m.namespace = ?");
        args.push(SqlValue::Text(ns.to_string()));
    }
    if let Some(cat) = category {
        where_clauses.push("m.category = ?");
        args.push(SqlValue::Text(cat.as_str().to_string()));
    }
    args.push(SqlValue::Integer(limit as i64));

    let sql = format!(
        "SELECT m.id, rank
         FROM memories_fts fts
         JOIN memories m ON m.rowid = fts.rowid
         WHERE {}
         ORDER BY rank
         LIMIT ?",
        where_clauses.join(" AND ")
    );

    let mut stmt = conn.prepare(&sql).map_err(|e| store_err(e.to_string()))?;
    let rows = stmt
        .query_map(params_from_iter(args.iter()), |row| {
            Ok(FtsHit {
                id: row.get(0)?,
                rank: row.get(1)?,
            })
        })
        .map_err(|e| store_err(e.to_string()))?;

    let mut hits = Vec::new();
    for row in rows {
        hits.push(row.map_err(|e| store_err(e.to_string()))?);
    }
    Ok(hits)
}

/// Reduce free text to a quoted OR-of-terms MATCH expression.
/// Returns None when the query has no word tokens.
fn build_match_expr(query: &str) -> Option<String> {
    let terms: Vec<String> = query
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| !t.is_empty())
        .map(|t| format!("\"{t}\""))
        .collect();
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" OR "))
    }
}
