//! Candidate gathering: the FTS top hits unioned with the embedded
//! universe in scope, deduped by id and tagged with `in_fts`.

use std::collections::HashSet;

use engram_core::errors::EngramResult;
use engram_core::memory::Category;
use engram_store::StoreEngine;

/// One scoring candidate. A slim row; full memories are only fetched for
/// the ranked page.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: String,
    pub embedding: Option<Vec<f32>>,
    pub confidence: f64,
    pub access_count: u64,
    pub decay_rate: f64,
    pub created_at: i64,
    pub last_accessed: Option<i64>,
    pub in_fts: bool,
}

/// Gather candidates for a query.
///
/// Degraded mode (no query vector) keeps only the FTS hits; otherwise the
/// union with the bounded embedded scan. Namespace and category filters
/// are pushed into the store queries.
pub fn gather(
    store: &StoreEngine,
    query: &str,
    namespace: Option<&str>,
    category: Option<Category>,
    fts_limit: usize,
    scan_cap: usize,
    degraded: bool,
) -> EngramResult<Vec<Candidate>> {
    let fts_hits = store.fts_query(query, namespace, category, fts_limit)?;
    let fts_ids: HashSet<String> = fts_hits.iter().map(|h| h.id.clone()).collect();

    let mut candidates = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    if !degraded {
        let total = store.count_embedded(namespace)?;
        if total as usize > scan_cap {
            tracing::warn!(
                total,
                scan_cap,
                "embedded universe exceeds scan cap; recall is sampling"
            );
        }
        for row in store.iterate_embedded(namespace, category, scan_cap)? {
            seen.insert(row.id.clone());
            candidates.push(Candidate {
                in_fts: fts_ids.contains(&row.id),
                id: row.id,
                embedding: Some(row.embedding),
                confidence: row.confidence,
                access_count: row.access_count,
                decay_rate: row.decay_rate,
                created_at: row.created_at,
                last_accessed: row.last_accessed,
            });
        }
    }

    // FTS hits outside the embedded scan (vector-less rows, or degraded
    // mode where the scan was skipped).
    let missing: Vec<String> = fts_hits
        .iter()
        .filter(|h| !seen.contains(&h.id))
        .map(|h| h.id.clone())
        .collect();
    for memory in store.get_bulk(&missing)? {
        candidates.push(Candidate {
            id: memory.id,
            embedding: memory.embedding,
            confidence: memory.confidence.value(),
            access_count: memory.access_count,
            decay_rate: memory.decay_rate,
            created_at: memory.created_at,
            last_accessed: memory.last_accessed,
            in_fts: true,
        });
    }

    Ok(candidates)
}
