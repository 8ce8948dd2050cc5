//! Duplicate merge: cluster embedded memories per namespace at pairwise
//! cosine ≥ threshold, pick a winner, fold the rest into it.

use std::collections::HashMap;

use rayon::prelude::*;

use engram_core::config::ConsolidationConfig;
use engram_core::errors::EngramResult;
use engram_core::time::now_ms;
use engram_core::traits::{cosine, Cancellable};
use engram_store::{EmbeddedRow, MergePatch, StoreEngine};

use super::NAMESPACE_SCAN_CAP;

/// Run the pass. Returns the number of losers removed.
pub fn run(
    store: &StoreEngine,
    config: &ConsolidationConfig,
    cancel: &dyn Cancellable,
) -> EngramResult<usize> {
    let mut removed = 0;

    for namespace in store.embedded_namespaces()? {
        if cancel.is_cancelled() {
            break;
        }
        let rows = store.iterate_embedded(Some(&namespace), None, NAMESPACE_SCAN_CAP)?;
        if rows.len() < 2 {
            continue;
        }

        let clusters = cluster(&rows, config.duplicate_threshold);
        for cluster_indices in clusters {
            if cancel.is_cancelled() {
                break;
            }
            removed += merge_cluster(store, &rows, &cluster_indices, config)?;
        }
    }

    Ok(removed)
}

/// Greedy transitive clustering over the pairwise cosine matrix. Pair
/// computation fans out over rayon; union-find keeps clusters disjoint.
fn cluster(rows: &[EmbeddedRow], threshold: f64) -> Vec<Vec<usize>> {
    let n = rows.len();

    let edges: Vec<(usize, usize)> = (0..n)
        .into_par_iter()
        .flat_map_iter(|i| ((i + 1)..n).map(move |j| (i, j)))
        .filter(|(i, j)| cosine(&rows[*i].embedding, &rows[*j].embedding) >= threshold)
        .collect();

    let mut parent: Vec<usize> = (0..n).collect();
    fn find(parent: &mut Vec<usize>, x: usize) -> usize {
        if parent[x] != x {
            let root = find(parent, parent[x]);
            parent[x] = root;
        }
        parent[x]
    }
    for (i, j) in edges {
        let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
        if ri != rj {
            parent[rj] = ri;
        }
    }

    let mut groups: HashMap<usize, Vec<usize>> = HashMap::new();
    for i in 0..n {
        let root = find(&mut parent, i);
        groups.entry(root).or_default().push(i);
    }

    let mut clusters: Vec<Vec<usize>> = groups
        .into_values()
        .filter(|members| members.len() >= 2)
        .collect();
    // Deterministic processing order across runs.
    clusters.sort_by(|a, b| rows[a[0]].id.cmp(&rows[b[0]].id));
    clusters
}

/// Winner by (confidence desc, access_count desc, updated_at desc, id asc);
/// losers fold into it in one store transaction per batch.
fn merge_cluster(
    store: &StoreEngine,
    rows: &[EmbeddedRow],
    members: &[usize],
    config: &ConsolidationConfig,
) -> EngramResult<usize> {
    let Some(&winner_idx) = members.iter().max_by(|&&a, &&b| {
        let (ra, rb) = (&rows[a], &rows[b]);
        ra.confidence
            .partial_cmp(&rb.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| ra.access_count.cmp(&rb.access_count))
            .then_with(|| ra.updated_at.cmp(&rb.updated_at))
            .then_with(|| rb.id.cmp(&ra.id))
    }) else {
        return Ok(0);
    };
    let winner = &rows[winner_idx];

    let mut loser_ids: Vec<String> = members
        .iter()
        .filter(|&&i| i != winner_idx)
        .map(|&i| rows[i].id.clone())
        .collect();
    loser_ids.sort();

    // Tags need the full rows; read winner first so its tags lead the union.
    let mut fetch_ids = vec![winner.id.clone()];
    fetch_ids.extend(loser_ids.iter().cloned());
    let full_rows = store.get_bulk(&fetch_ids)?;

    let mut tags: Vec<String> = Vec::new();
    for m in &full_rows {
        for tag in &m.tags {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
    }

    let access_count: u64 = members.iter().map(|&i| rows[i].access_count).sum();
    let confidence = members
        .iter()
        .map(|&i| rows[i].confidence)
        .fold(f64::MIN, f64::max);

    let patch = MergePatch {
        access_count,
        tags,
        confidence,
        updated_at: now_ms(),
    };

    // Yield the writer between bounded batches.
    let mut removed = 0;
    for chunk in loser_ids.chunks(config.merge_batch_size) {
        store.apply_merge(&winner.id, chunk, &patch)?;
        removed += chunk.len();
    }

    tracing::info!(
        winner = %winner.id,
        losers = removed,
        "merged duplicate cluster"
    );
    Ok(removed)
}
