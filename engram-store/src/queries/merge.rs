//! Duplicate-cluster merge applied in one transaction.

use rusqlite::{params, Connection};

use engram_core::errors::EngramResult;

use crate::store_err;

/// Fields written onto the winner when a cluster merges.
#[derive(Debug, Clone)]
pub struct MergePatch {
    /// Sum of the cluster's access counts.
    pub access_count: u64,
    /// Ordered union of the cluster's tags.
    pub tags: Vec<String>,
    /// Max confidence across the cluster.
    pub confidence: f64,
    pub updated_at: i64,
}

/// In one transaction: update the winner, delete the losers, and drop
/// unresolved contradictions referencing the losers. The FTS triggers keep
/// the index in step.
pub fn apply_merge(
    conn: &Connection,
    winner_id: &str,
    loser_ids: &[String],
    patch: &MergePatch,
) -> EngramResult<()> {
    let tags_json =
        serde_json::to_string(&patch.tags).map_err(|e| store_err(e.to_string()))?;

    let tx = conn
        .unchecked_transaction()
        .map_err(|e| store_err(format!("merge begin: {e}")))?;

    tx.execute(
        "UPDATE memories
         SET access_count = ?1, tags = ?2, confidence = ?3, updated_at = ?4
         WHERE id = ?5",
        params![
            patch.access_count as i64,
            tags_json,
            patch.confidence,
            patch.updated_at,
            winner_id
        ],
    )
    .map_err(|e| store_err(e.to_string()))?;

    super::contradiction_ops::cascade_unresolved(&tx, loser_ids)?;
    {
        let mut stmt = tx
            .prepare_cached("DELETE FROM memories WHERE id = ?1")
            .map_err(|e| store_err(e.to_string()))?;
        for id in loser_ids {
            stmt.execute(params![id])
                .map_err(|e| store_err(e.to_string()))?;
        }
    }

    tx.commit().map_err(|e| store_err(format!("merge commit: {e}")))
}
